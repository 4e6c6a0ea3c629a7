use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[cfg(feature = "db")]
    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TodoError {
    pub fn storage(message: impl Into<String>) -> Self {
        TodoError::Storage {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
