//! Error types for the shell router, the embedded app adapter and their configuration.

use thiserror::Error;

/// Fatal conditions raised by navigation and inbound message handling.
///
/// None of these are retried internally; the embedding application decides
/// whether to log them, surface them to a user or abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Received message from not allowed origin: {origin}")]
    OriginRejected { origin: String },

    #[error("Outlet '{outlet}' not found for route '{path}'")]
    OutletMissing { outlet: String, path: String },
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Duplicate route path: {0}")]
    DuplicateRoute(String),

    #[error("Route #{index}: field '{field}' must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("Route #{index}: {field} '{value}' contains one of the reserved characters / : ( )")]
    ReservedCharacter {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Errors surfaced by the command-line front end
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output encoding failed: {0}")]
    Output(#[from] serde_json::Error),
}
