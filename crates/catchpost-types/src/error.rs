use thiserror::Error;

use crate::ids::UserId;

/// Errors from repository operations (used by trait definitions in catchpost-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from the messaging platform client.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("platform rejected call ({code}): {description}")]
    Api { code: u16, description: String },

    #[error("request timed out")]
    Timeout,

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Errors on the submission and resolution paths.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("no submitted draft for user {0}")]
    NotFound(UserId),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors surfaced by the wizard service while handling one event.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("missing required setting: {0}")]
    Missing(&'static str),
}
