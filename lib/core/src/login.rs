//! GitHub account login names.
//!
//! A login is the handle GitHub returns in the `login` field of a user
//! profile. It is the only user identity orgjoin carries between the
//! profile lookup and the membership grant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a usable GitHub login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLoginError {
    /// The rejected input.
    pub input: String,
    /// The reason it was rejected.
    pub reason: &'static str,
}

impl fmt::Display for ParseLoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid GitHub login '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for ParseLoginError {}

/// A GitHub login name, e.g. `octocat`.
///
/// Logins are ASCII alphanumerics and hyphens on github.com; GitHub
/// Enterprise managed users also carry an underscore-separated suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GithubLogin(String);

impl GithubLogin {
    /// Validates and wraps a login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the login is empty or contains characters GitHub
    /// never issues in a login.
    pub fn new(login: impl Into<String>) -> Result<Self, ParseLoginError> {
        let login = login.into();

        if login.is_empty() {
            return Err(ParseLoginError {
                input: login,
                reason: "login is empty",
            });
        }

        if !login
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ParseLoginError {
                input: login,
                reason: "login contains characters outside [A-Za-z0-9_-]",
            });
        }

        Ok(Self(login))
    }

    /// Returns the login as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GithubLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GithubLogin {
    type Err = ParseLoginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GithubLogin {
    type Error = ParseLoginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GithubLogin> for String {
    fn from(login: GithubLogin) -> Self {
        login.0
    }
}

impl AsRef<str> for GithubLogin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
