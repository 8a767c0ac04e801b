use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShepherdError {
    #[error("Spawn error: {0}")]
    SpawnError(String),

    #[error("Signal error: {0}")]
    SignalError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, ShepherdError>;
