//! Error types for GitHub operations.
//!
//! Errors carry enough detail for server-side logs. None of them embed
//! tokens or client secrets, and callers must not show them to end users.

use std::fmt;

/// Errors from GitHub OAuth and REST operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubError {
    /// Invalid client configuration (bad URLs, HTTP client setup).
    Configuration { details: String },
    /// The authorization-code exchange failed.
    TokenExchange { details: String },
    /// The request could not be sent or no response was received.
    Request { endpoint: String, details: String },
    /// GitHub answered with a non-success status.
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// The response body did not have the expected shape.
    InvalidResponse { endpoint: String, details: String },
}

impl fmt::Display for GithubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { details } => {
                write!(f, "GitHub client configuration error: {details}")
            }
            Self::TokenExchange { details } => {
                write!(f, "GitHub token exchange failed: {details}")
            }
            Self::Request { endpoint, details } => {
                write!(f, "request to '{endpoint}' failed: {details}")
            }
            Self::Status {
                endpoint,
                status,
                message,
            } => {
                write!(f, "'{endpoint}' returned status {status}: {message}")
            }
            Self::InvalidResponse { endpoint, details } => {
                write!(f, "unexpected response from '{endpoint}': {details}")
            }
        }
    }
}

impl std::error::Error for GithubError {}
