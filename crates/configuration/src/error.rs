use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration source: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    ValidationError(String),

    #[error("Invalid portfolio file {path}: {reason}")]
    InvalidPortfolio { path: String, reason: String },
}
