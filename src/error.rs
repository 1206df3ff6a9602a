//! Error types for the Speckle client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The verb is not in the resource's allow-list. Raised before any I/O.
    #[error("Method {verb} not supported for {resource} calls")]
    UnsupportedOperation { resource: String, verb: String },

    /// A query value was neither a string nor a list of strings. Raised before any I/O.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with `success: false` or a non-success status.
    #[error("Server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Schema already registered for type tag: {0}")]
    DuplicateSchema(String),

    #[error("Account cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The server-supplied message, when the failure came from the server
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerRejected { message, .. }
            | Self::AuthenticationFailed(message)
            | Self::RegistrationFailed(message) => Some(message),
            _ => None,
        }
    }

    /// True for failures detected locally, before a request was sent
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOperation { .. } | Self::InvalidQuery(_) | Self::UnknownResource(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
