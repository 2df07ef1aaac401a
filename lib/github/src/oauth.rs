//! GitHub OAuth authorization-code flow using the oauth2 crate.

use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::{
    AccessToken, AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use tracing::instrument;

use crate::config::GithubAppConfig;
use crate::error::GithubError;

/// Anti-forgery token sent as `state` on every authorization request.
///
/// This value is not random and not bound to the browser that started the
/// login, so it provides no CSRF protection.
// TODO: generate a random state per login and bind it to a short-lived signed cookie.
pub const OAUTH_STATE: &str = "random-string-for-csrf-protection";

/// OAuth client for signing users in with GitHub.
#[derive(Clone)]
pub struct GithubOAuthClient {
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: Option<RedirectUrl>,
    scopes: Vec<Scope>,
    http_client: reqwest::Client,
}

impl GithubOAuthClient {
    /// Creates a new OAuth client from configuration.
    ///
    /// `http_client` must not follow redirects; see [`crate::build_http_client`].
    ///
    /// # Errors
    ///
    /// Returns an error if any configured URL is invalid.
    pub fn new(
        config: &GithubAppConfig,
        http_client: reqwest::Client,
    ) -> orgjoin_core::Result<Self, GithubError> {
        let auth_url =
            AuthUrl::new(config.auth_url().to_string()).map_err(|e| GithubError::Configuration {
                details: format!("invalid authorization URL: {e}"),
            })?;

        let token_url =
            TokenUrl::new(config.token_url().to_string()).map_err(|e| GithubError::Configuration {
                details: format!("invalid token URL: {e}"),
            })?;

        let redirect_url = config
            .redirect_uri()
            .map(|uri| RedirectUrl::new(uri.to_string()))
            .transpose()
            .map_err(|e| GithubError::Configuration {
                details: format!("invalid redirect URL: {e}"),
            })?;

        Ok(Self {
            client_id: ClientId::new(config.client_id().to_string()),
            client_secret: ClientSecret::new(config.client_secret().to_string()),
            auth_url,
            token_url,
            redirect_url,
            scopes: config
                .scopes()
                .into_iter()
                .map(|scope| Scope::new(scope.to_string()))
                .collect(),
            http_client,
        })
    }

    /// Returns the URL to send the browser to for GitHub sign-in.
    pub fn authorization_url(&self) -> String {
        let client = self.base_client().set_auth_uri(self.auth_url.clone());

        let mut auth_request = client.authorize_url(|| CsrfToken::new(OAUTH_STATE.to_string()));

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(scope.clone());
        }

        // Online access only; no refresh token is wanted.
        auth_request = auth_request.add_extra_param("access_type", "online");

        let (auth_url, _state) = auth_request.url();

        auth_url.to_string()
    }

    /// Returns true if `received` is the state issued by [`Self::authorization_url`].
    #[must_use]
    pub fn state_matches(&self, received: &str) -> bool {
        received == OAUTH_STATE
    }

    /// Exchanges an authorization code for the user's access token.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::TokenExchange`] if the token endpoint cannot be
    /// reached or rejects the code.
    #[instrument(skip_all)]
    pub async fn exchange_code(&self, code: &str) -> orgjoin_core::Result<AccessToken, GithubError> {
        let client = self.base_client().set_token_uri(self.token_url.clone());

        let token_result: BasicTokenResponse = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| GithubError::TokenExchange {
                details: e.to_string(),
            })?;

        Ok(token_result.access_token().clone())
    }

    fn base_client(&self) -> BasicClient {
        let client = BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            // GitHub expects client credentials in the form body.
            .set_auth_type(AuthType::RequestBody);

        match &self.redirect_url {
            Some(redirect_url) => client.set_redirect_uri(redirect_url.clone()),
            None => client,
        }
    }
}

impl std::fmt::Debug for GithubOAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubOAuthClient")
            .field("client_id", &self.client_id.as_str())
            .field("auth_url", &self.auth_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("redirect_url", &self.redirect_url.as_ref().map(|u| u.as_str()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query_of(url: &str) -> HashMap<String, String> {
        url::Url::parse(url)
            .expect("valid URL")
            .query_pairs()
            .into_owned()
            .collect()
    }

    fn client_for(config: &GithubAppConfig) -> GithubOAuthClient {
        GithubOAuthClient::new(config, reqwest::Client::new()).expect("valid config")
    }

    #[test]
    fn authorization_url_carries_client_state_and_scope() {
        let config = GithubAppConfig::new("Iv1.abc".to_string(), "secret".to_string());
        let url = client_for(&config).authorization_url();

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));

        let query = query_of(&url);
        assert_eq!(query.get("client_id").map(String::as_str), Some("Iv1.abc"));
        assert_eq!(query.get("state").map(String::as_str), Some(OAUTH_STATE));
        assert_eq!(query.get("scope").map(String::as_str), Some("read:user"));
        assert_eq!(query.get("access_type").map(String::as_str), Some("online"));
        assert_eq!(query.get("response_type").map(String::as_str), Some("code"));
        assert!(!query.contains_key("redirect_uri"));
        assert!(!query.contains_key("client_secret"));
    }

    #[test]
    fn authorization_url_includes_configured_redirect() {
        let config = GithubAppConfig::builder("Iv1.abc".to_string(), "secret".to_string())
            .redirect_uri(Some("https://join.example.com/github/callback".to_string()))
            .build();
        let query = query_of(&client_for(&config).authorization_url());

        assert_eq!(
            query.get("redirect_uri").map(String::as_str),
            Some("https://join.example.com/github/callback")
        );
    }

    #[test]
    fn state_matches_only_the_issued_token() {
        let config = GithubAppConfig::new("Iv1.abc".to_string(), "secret".to_string());
        let client = client_for(&config);

        assert!(client.state_matches(OAUTH_STATE));
        assert!(!client.state_matches(""));
        assert!(!client.state_matches("forged"));
    }

    #[test]
    fn invalid_redirect_url_is_rejected() {
        let config = GithubAppConfig::builder("Iv1.abc".to_string(), "secret".to_string())
            .redirect_uri(Some("not a url".to_string()))
            .build();

        let result = GithubOAuthClient::new(&config, reqwest::Client::new());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn exchange_code_returns_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(body_string_contains("code=the-code"))
            .and(body_string_contains("client_id=Iv1.abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "gho_user_token",
                "token_type": "bearer",
                "scope": "read:user"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = GithubAppConfig::builder("Iv1.abc".to_string(), "secret".to_string())
            .token_url(format!("{}/login/oauth/access_token", server.uri()))
            .build();

        let token = client_for(&config)
            .exchange_code("the-code")
            .await
            .expect("exchange should succeed");

        assert_eq!(token.secret(), "gho_user_token");
    }

    #[tokio::test]
    async fn exchange_code_reports_rejected_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired."
            })))
            .mount(&server)
            .await;

        let config = GithubAppConfig::builder("Iv1.abc".to_string(), "secret".to_string())
            .token_url(format!("{}/login/oauth/access_token", server.uri()))
            .build();

        let result = client_for(&config).exchange_code("stale").await;

        let err = result.expect_err("exchange should fail");
        assert!(err.to_string().contains("token exchange failed"));
    }

    #[tokio::test]
    async fn exchange_code_reports_error_body_with_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired.",
                "error_uri": "https://docs.github.com/apps/troubleshooting-oauth-apps"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = GithubAppConfig::builder("Iv1.abc".to_string(), "secret".to_string())
            .token_url(format!("{}/login/oauth/access_token", server.uri()))
            .build();

        let result = client_for(&config).exchange_code("stale").await;

        let err = result.expect_err("error body should not yield a token");
        assert!(err.to_string().contains("token exchange failed"));
    }
}

