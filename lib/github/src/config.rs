//! GitHub OAuth app configuration.
//!
//! The defaults point at github.com. GitHub Enterprise Server deployments
//! override the endpoint URLs through the builder.

use std::fmt;
use std::time::Duration;

/// GitHub's OAuth authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://github.com/login/oauth/authorize";

/// GitHub's OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// GitHub's REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Scope needed to read the authenticated user's profile.
pub const DEFAULT_SCOPES: &str = "read:user";

/// Default timeout for outbound requests, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the GitHub OAuth app used to sign users in.
#[derive(Clone)]
pub struct GithubAppConfig {
    client_id: String,
    client_secret: String,
    /// Comma-separated scope list.
    scopes: String,
    auth_url: String,
    token_url: String,
    api_url: String,
    /// Callback URL sent with the authorization request. When unset GitHub
    /// uses the callback registered on the OAuth app.
    redirect_uri: Option<String>,
    http_timeout: Duration,
}

impl GithubAppConfig {
    /// Creates a configuration for github.com with the default scope.
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        GithubAppConfigBuilder::new(client_id, client_secret).build()
    }

    /// Creates a configuration builder for more customization.
    #[must_use]
    pub fn builder(client_id: String, client_secret: String) -> GithubAppConfigBuilder {
        GithubAppConfigBuilder::new(client_id, client_secret)
    }

    /// Returns the OAuth client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the scopes to request, parsed from the comma-separated list.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Returns the authorization endpoint URL.
    #[must_use]
    pub fn auth_url(&self) -> &str {
        &self.auth_url
    }

    /// Returns the token endpoint URL.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Returns the REST API root URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the redirect URI, if one is configured.
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Returns the timeout applied to outbound requests.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

impl fmt::Debug for GithubAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubAppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("scopes", &self.scopes)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Builder for `GithubAppConfig`.
#[derive(Debug)]
pub struct GithubAppConfigBuilder {
    client_id: String,
    client_secret: String,
    auth_url: String,
    token_url: String,
    api_url: String,
    redirect_uri: Option<String>,
    http_timeout: Duration,
}

impl GithubAppConfigBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            redirect_uri: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }

    /// Sets the authorization endpoint URL.
    #[must_use]
    pub fn auth_url(mut self, url: String) -> Self {
        self.auth_url = url;
        self
    }

    /// Sets the token endpoint URL.
    #[must_use]
    pub fn token_url(mut self, url: String) -> Self {
        self.token_url = url;
        self
    }

    /// Sets the REST API root URL.
    #[must_use]
    pub fn api_url(mut self, url: String) -> Self {
        self.api_url = url;
        self
    }

    /// Sets the redirect URI sent to GitHub.
    #[must_use]
    pub fn redirect_uri(mut self, uri: Option<String>) -> Self {
        self.redirect_uri = uri;
        self
    }

    /// Sets the timeout for outbound requests.
    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Builds the `GithubAppConfig`.
    #[must_use]
    pub fn build(self) -> GithubAppConfig {
        GithubAppConfig {
            client_id: self.client_id,
            client_secret: self.client_secret,
            scopes: DEFAULT_SCOPES.to_string(),
            auth_url: self.auth_url,
            token_url: self.token_url,
            api_url: self.api_url,
            redirect_uri: self.redirect_uri,
            http_timeout: self.http_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_github_defaults() {
        let config = GithubAppConfig::new("client-id".to_string(), "client-secret".to_string());

        assert_eq!(config.client_id(), "client-id");
        assert_eq!(config.client_secret(), "client-secret");
        assert_eq!(config.scopes(), vec!["read:user"]);
        assert_eq!(config.auth_url(), DEFAULT_AUTH_URL);
        assert_eq!(config.token_url(), DEFAULT_TOKEN_URL);
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.redirect_uri(), None);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn builder_allows_enterprise_endpoints() {
        let config = GithubAppConfig::builder("client-id".to_string(), "secret".to_string())
            .auth_url("https://ghe.example.com/login/oauth/authorize".to_string())
            .token_url("https://ghe.example.com/login/oauth/access_token".to_string())
            .api_url("https://ghe.example.com/api/v3".to_string())
            .redirect_uri(Some("https://join.example.com/github/callback".to_string()))
            .build();

        assert_eq!(config.api_url(), "https://ghe.example.com/api/v3");
        assert_eq!(
            config.redirect_uri(),
            Some("https://join.example.com/github/callback")
        );
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = GithubAppConfig::new("client-id".to_string(), "hunter2".to_string());
        let debug = format!("{config:?}");
        assert!(debug.contains("client-id"));
        assert!(!debug.contains("hunter2"));
    }
}
