use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogbookError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
