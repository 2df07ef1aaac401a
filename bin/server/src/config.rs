//! Centralized server configuration.
//!
//! Configuration is loaded once at startup via the `config` crate from
//! environment variables. Empty variables are treated as unset.
//!
//! Required:
//! - `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET` - the GitHub OAuth app
//! - `GITHUB_ORG_NAME` - the organization users are added to
//! - `GITHUB_PAT` - personal access token of an organization owner
//! - `SUCCESS_REDIRECT_URL`, `ERROR_REDIRECT_URL` - where the browser ends up
//!
//! Optional: `LISTEN_ADDR`, `GITHUB_REDIRECT_URL`, `GITHUB_API_URL`,
//! `GITHUB_AUTH_URL`, `GITHUB_TOKEN_URL`, `HTTP_TIMEOUT_SECONDS`.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use orgjoin_github::GithubAppConfig;
use orgjoin_github::config::{
    DEFAULT_API_URL, DEFAULT_AUTH_URL, DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_TOKEN_URL,
};
use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

/// Server configuration.
#[derive(Clone, Deserialize)]
pub struct ServerConfig {
    /// OAuth client ID of the GitHub app.
    #[serde(default)]
    pub github_client_id: String,

    /// OAuth client secret of the GitHub app.
    #[serde(default)]
    pub github_client_secret: String,

    /// Organization users are added to.
    #[serde(default)]
    pub github_org_name: String,

    /// Personal access token of an organization owner.
    #[serde(default)]
    pub github_pat: String,

    /// Where the browser is sent after a successful join.
    #[serde(default)]
    pub success_redirect_url: String,

    /// Base URL of the error page; `error_code` and `error_message` are
    /// added to it.
    #[serde(default)]
    pub error_redirect_url: String,

    /// Socket address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Callback URL sent to GitHub. Defaults to the one registered on the app.
    #[serde(default)]
    pub github_redirect_url: Option<String>,

    /// GitHub REST API root.
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// GitHub OAuth authorization endpoint.
    #[serde(default = "default_github_auth_url")]
    pub github_auth_url: String,

    /// GitHub OAuth token endpoint.
    #[serde(default = "default_github_token_url")]
    pub github_token_url: String,

    /// Timeout for each outbound GitHub request, in seconds.
    #[serde(default = "default_http_timeout_seconds")]
    pub http_timeout_seconds: u64,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_github_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_github_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_github_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_http_timeout_seconds() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl ServerConfig {
    /// Loads and validates configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error naming every required variable that is missing or
    /// empty, or describing the first invalid value.
    pub fn from_env() -> orgjoin_core::Result<Self, ConfigError> {
        Self::from_source(None)
    }

    /// Loads configuration from `source` instead of the process environment.
    ///
    /// Keys are environment variable names. `None` reads the real
    /// environment.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_source(
        source: Option<config::Map<String, String>>,
    ) -> orgjoin_core::Result<Self, ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .ignore_empty(true)
                    .source(source),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load {
                details: e.to_string(),
            })?;

        config.validate()?;

        Ok(config)
    }

    /// Checks that every required setting is present and usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariables`] listing all empty required
    /// settings, or [`ConfigError::Invalid`] for the first unusable value.
    pub fn validate(&self) -> orgjoin_core::Result<(), ConfigError> {
        let required = [
            ("GITHUB_CLIENT_ID", &self.github_client_id),
            ("GITHUB_CLIENT_SECRET", &self.github_client_secret),
            ("GITHUB_ORG_NAME", &self.github_org_name),
            ("GITHUB_PAT", &self.github_pat),
            ("SUCCESS_REDIRECT_URL", &self.success_redirect_url),
            ("ERROR_REDIRECT_URL", &self.error_redirect_url),
        ];

        let missing: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables { names: missing }.into());
        }

        // Sent verbatim as the Location header on success.
        if self.success_redirect_url.chars().any(char::is_control) {
            return Err(ConfigError::Invalid {
                variable: "SUCCESS_REDIRECT_URL",
                reason: "contains control characters".to_string(),
            }
            .into());
        }
        if let Err(e) = Url::parse(&self.success_redirect_url) {
            return Err(ConfigError::Invalid {
                variable: "SUCCESS_REDIRECT_URL",
                reason: format!("not an absolute URL: {e}"),
            }
            .into());
        }

        if self.http_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                variable: "HTTP_TIMEOUT_SECONDS",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Returns the GitHub OAuth app configuration.
    #[must_use]
    pub fn github_app(&self) -> GithubAppConfig {
        GithubAppConfig::builder(
            self.github_client_id.clone(),
            self.github_client_secret.clone(),
        )
        .auth_url(self.github_auth_url.clone())
        .token_url(self.github_token_url.clone())
        .api_url(self.github_api_url.clone())
        .redirect_uri(self.github_redirect_url.clone())
        .http_timeout(Duration::from_secs(self.http_timeout_seconds))
        .build()
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("github_client_id", &self.github_client_id)
            .field("github_client_secret", &"[redacted]")
            .field("github_org_name", &self.github_org_name)
            .field("github_pat", &"[redacted]")
            .field("success_redirect_url", &self.success_redirect_url)
            .field("error_redirect_url", &self.error_redirect_url)
            .field("listen_addr", &self.listen_addr)
            .field("github_redirect_url", &self.github_redirect_url)
            .field("github_api_url", &self.github_api_url)
            .field("github_auth_url", &self.github_auth_url)
            .field("github_token_url", &self.github_token_url)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}
