use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown logic check: {0}")]
    UnknownCheck(String),

    #[error("Invalid pattern for keyword '{keyword}': {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, AuditError>;
