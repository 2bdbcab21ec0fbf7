//! Error types for TarakaEKF

use thiserror::Error;

/// TarakaEKF error type
#[derive(Error, Debug)]
pub enum TarakaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Estimator error: {0}")]
    Estimator(String),
}

impl From<toml::de::Error> for TarakaError {
    fn from(e: toml::de::Error) -> Self {
        TarakaError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TarakaError>;
