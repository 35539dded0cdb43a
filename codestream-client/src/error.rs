//! Error types for the Code Stream client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Code Stream client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (DNS, TLS, connect, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service answered with a non-2xx status
    ///
    /// Displays as the service's own message.
    #[error("{message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Message from the service error envelope
        message: String,
    },

    /// Failed to parse a successful response
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// No usable credentials, or the identity service rejected them
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Request could not be built from the given input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create a service error from status code and message
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a service error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the service rejected the bearer token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}
