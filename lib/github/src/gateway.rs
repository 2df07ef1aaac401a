//! The outbound side of the join flow.
//!
//! `OrgJoinGateway` is the seam the server's callback handler drives. The
//! GitHub implementation combines the OAuth client (user token) with the REST
//! client authorized by the organization owner's token.

use async_trait::async_trait;
use oauth2::AccessToken;
use orgjoin_core::GithubLogin;
use tracing::info;

use crate::api::{GithubApi, OrgMembership};
use crate::error::GithubError;
use crate::oauth::GithubOAuthClient;

/// The three provider calls a join performs, in order.
#[async_trait]
pub trait OrgJoinGateway: Send + Sync {
    /// Exchanges an authorization code for the user's access token.
    async fn exchange_code(&self, code: &str) -> orgjoin_core::Result<AccessToken, GithubError>;

    /// Returns the login of the user who owns `token`.
    async fn fetch_login(
        &self,
        token: &AccessToken,
    ) -> orgjoin_core::Result<GithubLogin, GithubError>;

    /// Grants `login` membership in the configured organization using the
    /// privileged credential.
    async fn grant_membership(
        &self,
        login: &GithubLogin,
    ) -> orgjoin_core::Result<OrgMembership, GithubError>;
}

/// `OrgJoinGateway` backed by github.com or a GitHub Enterprise Server.
pub struct GithubOrgGateway {
    oauth: GithubOAuthClient,
    api: GithubApi,
    org: String,
    owner_token: AccessToken,
}

impl GithubOrgGateway {
    /// Creates a gateway that adds users to `org` with `owner_token`.
    #[must_use]
    pub fn new(
        oauth: GithubOAuthClient,
        api: GithubApi,
        org: String,
        owner_token: AccessToken,
    ) -> Self {
        Self {
            oauth,
            api,
            org,
            owner_token,
        }
    }
}

#[async_trait]
impl OrgJoinGateway for GithubOrgGateway {
    async fn exchange_code(&self, code: &str) -> orgjoin_core::Result<AccessToken, GithubError> {
        self.oauth.exchange_code(code).await
    }

    async fn fetch_login(
        &self,
        token: &AccessToken,
    ) -> orgjoin_core::Result<GithubLogin, GithubError> {
        let user = self.api.authenticated_user(token).await?;
        Ok(user.login)
    }

    async fn grant_membership(
        &self,
        login: &GithubLogin,
    ) -> orgjoin_core::Result<OrgMembership, GithubError> {
        let membership = self
            .api
            .set_org_membership(&self.owner_token, &self.org, login)
            .await?;

        info!(
            username = %login,
            org = %self.org,
            state = %membership.state,
            role = %membership.role,
            "organization membership granted"
        );

        Ok(membership)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MembershipState, build_http_client};
    use crate::config::GithubAppConfig;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> GithubOrgGateway {
        let config = GithubAppConfig::builder("Iv1.abc".to_string(), "secret".to_string())
            .token_url(format!("{}/login/oauth/access_token", server.uri()))
            .api_url(server.uri())
            .build();
        let http_client = build_http_client(Duration::from_secs(5)).expect("http client");
        let oauth = GithubOAuthClient::new(&config, http_client.clone()).expect("oauth client");
        let api = GithubApi::new(http_client, config.api_url()).expect("api client");

        GithubOrgGateway::new(
            oauth,
            api,
            "acme".to_string(),
            AccessToken::new("ghp_owner".to_string()),
        )
    }

    #[tokio::test]
    async fn full_join_uses_user_token_for_profile_and_owner_token_for_grant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "gho_user",
                "token_type": "bearer",
                "scope": "read:user"
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer gho_user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "id": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/orgs/acme/memberships/octocat"))
            .and(header("authorization", "Bearer ghp_owner"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "state": "active",
                "role": "member"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);

        let token = gateway.exchange_code("code").await.expect("exchange");
        let login = gateway.fetch_login(&token).await.expect("profile");
        let membership = gateway.grant_membership(&login).await.expect("grant");

        assert_eq!(login.as_str(), "octocat");
        assert_eq!(membership.state, MembershipState::Active);
    }
}
