use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(availability::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(availability::config))]
    Config(String),

    #[error("Feed request error: {0}")]
    #[diagnostic(code(availability::feed))]
    Feed(String),

    #[error("Feed responded with HTTP {0}")]
    #[diagnostic(code(availability::feed_status))]
    FeedStatus(u16),

    #[error(transparent)]
    #[diagnostic(code(availability::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(availability::other))]
    Other(String),
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create feed errors
pub fn feed_error(message: &str) -> Error {
    Error::Feed(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
