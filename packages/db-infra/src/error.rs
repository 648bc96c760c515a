use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("Connection error: {message}")]
    Connection { message: String },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        DbInfraError::Config {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        DbInfraError::Connection {
            message: message.into(),
        }
    }
}
