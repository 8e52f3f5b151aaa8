use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::constants;
use crate::error::{AuditError, Result};
use crate::knowledge::KnowledgeBase;
use crate::lexicon::Lexicon;
use crate::rules::Rules;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Optional files overriding the built-in reference tables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub rules: Option<PathBuf>,
    pub knowledge: Option<PathBuf>,
    pub lexicon: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_file: PathBuf::from(constants::DEFAULT_RESULT_FILE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(constants::DEFAULT_LOG_DIR),
            file_name: constants::DEFAULT_LOG_FILE.to_string(),
            default_filter: constants::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the file when it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn rules(&self) -> Result<Rules> {
        match &self.sources.rules {
            Some(path) => {
                info!(path = %path.display(), "loading rules");
                Rules::load(path)
            }
            None => Ok(Rules::default()),
        }
    }

    pub fn knowledge(&self) -> Result<KnowledgeBase> {
        match &self.sources.knowledge {
            Some(path) => {
                info!(path = %path.display(), "loading knowledge base");
                KnowledgeBase::load(path)
            }
            None => Ok(KnowledgeBase::builtin()),
        }
    }

    pub fn lexicon(&self) -> Result<Lexicon> {
        match &self.sources.lexicon {
            Some(path) => {
                info!(path = %path.display(), "loading lexicon");
                Lexicon::load(path)
            }
            None => Ok(Lexicon::default()),
        }
    }

    /// Log which tables come from files and which are built in
    pub fn log_sources(&self) {
        if self.sources.rules.is_none() {
            warn!("no rules file configured, using built-in rules");
        }
        if self.sources.knowledge.is_none() {
            warn!("no knowledge file configured, using built-in knowledge base");
        }
        if self.sources.lexicon.is_none() {
            warn!("no lexicon file configured, using built-in dictionaries");
        }
    }
}
