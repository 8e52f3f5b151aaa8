//! Default locations and names shared by the CLI, shell and configuration

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_RESULT_FILE: &str = "result.txt";

pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "dialysis_audit.log";
pub const DEFAULT_LOG_FILTER: &str = "dialysis_audit=info,warn";

/// Command that leaves the interactive shell (case-insensitive)
pub const EXIT_COMMAND: &str = "exit";
