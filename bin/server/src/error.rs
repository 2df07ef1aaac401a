//! Domain error types for server operations.
//!
//! `ConfigError` is fatal and only ever reaches the startup log.
//! `JoinError` is what the browser learns about a failed join: a stable
//! [`ErrorCode`] plus a generic message, never the upstream error itself.

use orgjoin_core::GithubLogin;
use std::fmt;

/// Configuration errors raised during startup.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration source could not be read or deserialized.
    Load { details: String },
    /// Required variables are missing or empty.
    MissingVariables { names: Vec<&'static str> },
    /// A variable is present but unusable.
    Invalid {
        variable: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { details } => write!(f, "failed to load configuration: {}", details),
            Self::MissingVariables { names } => {
                write!(
                    f,
                    "required environment variables are not set: {}",
                    names.join(", ")
                )
            }
            Self::Invalid { variable, reason } => {
                write!(f, "invalid value for {}: {}", variable, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Machine-readable reason sent to the error page as `error_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The callback's `state` did not match the issued token.
    InvalidState,
    /// The authorization code could not be exchanged for a token.
    OauthExchangeFailed,
    /// The user's GitHub profile could not be fetched.
    UserInfoFailed,
    /// GitHub refused the membership edit.
    InvitationFailed,
}

impl ErrorCode {
    /// Returns the wire value of this code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidState => "invalid_state",
            Self::OauthExchangeFailed => "oauth_exchange_failed",
            Self::UserInfoFailed => "user_info_failed",
            Self::InvitationFailed => "invitation_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed join, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// State token mismatch.
    InvalidState,
    /// Code exchange failed or GitHub declined the authorization.
    ExchangeFailed,
    /// Profile lookup failed.
    UserInfoFailed,
    /// Membership grant failed for this user.
    InvitationFailed { username: GithubLogin },
}

impl JoinError {
    /// Returns the code for the error page.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidState => ErrorCode::InvalidState,
            Self::ExchangeFailed => ErrorCode::OauthExchangeFailed,
            Self::UserInfoFailed => ErrorCode::UserInfoFailed,
            Self::InvitationFailed { .. } => ErrorCode::InvitationFailed,
        }
    }

    /// Returns the user-safe message for the error page.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidState => "State token mismatch. Please try again.".to_string(),
            Self::ExchangeFailed => "Could not verify your GitHub login.".to_string(),
            Self::UserInfoFailed => "Could not fetch your GitHub profile.".to_string(),
            Self::InvitationFailed { username } => format!(
                "Failed to invite '{}'. They may already be a member or already invited.",
                username
            ),
        }
    }
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.user_message())
    }
}

impl std::error::Error for JoinError {}
