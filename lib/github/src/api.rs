//! Minimal GitHub REST client for the join flow.
//!
//! Only two endpoints are used:
//! - `GET /user` - the profile of the token's owner
//! - `PUT /orgs/{org}/memberships/{username}` - invite or add a member

use std::time::Duration;

use oauth2::AccessToken;
use orgjoin_core::GithubLogin;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::GithubError;

/// Media type GitHub recommends for REST requests.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned on every request.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// User agent sent to GitHub, which rejects requests without one.
const USER_AGENT: &str = concat!("orgjoin/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by the OAuth and REST calls.
///
/// Redirects are disabled so the token endpoint cannot bounce credentials
/// to another host.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(timeout: Duration) -> orgjoin_core::Result<reqwest::Client, GithubError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| GithubError::Configuration {
            details: format!("failed to create HTTP client: {e}"),
        })?;

    Ok(client)
}

/// The subset of a GitHub user profile orgjoin reads.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    /// Login name; the key for the membership grant.
    pub login: GithubLogin,
    /// Numeric account ID.
    pub id: u64,
    /// Display name, if the user set one.
    #[serde(default)]
    pub name: Option<String>,
}

/// State of an organization membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// The user is a member.
    Active,
    /// The user has been invited and has not accepted yet.
    Pending,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for MembershipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Pending => write!(f, "pending"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Result of a membership edit.
#[derive(Debug, Clone, Deserialize)]
pub struct OrgMembership {
    /// Membership state after the edit.
    pub state: MembershipState,
    /// Role within the organization, e.g. `member` or `admin`.
    pub role: String,
}

/// Error payload GitHub returns on failed requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// GitHub REST API client.
///
/// The client holds no credentials; each call takes the token it should be
/// authorized with.
#[derive(Debug, Clone)]
pub struct GithubApi {
    http_client: reqwest::Client,
    base_url: Url,
}

impl GithubApi {
    /// Creates a client for the API rooted at `base_url`
    /// (`https://api.github.com`, or `https://HOST/api/v3` for GitHub
    /// Enterprise Server).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute http(s) URL.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
    ) -> orgjoin_core::Result<Self, GithubError> {
        let base_url = Url::parse(base_url).map_err(|e| GithubError::Configuration {
            details: format!("invalid API URL '{base_url}': {e}"),
        })?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(GithubError::Configuration {
                details: format!("API URL '{base_url}' must be an http(s) URL"),
            }
            .into());
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Fetches the profile of the user who owns `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, GitHub rejects the token, or
    /// the profile has no usable login.
    #[instrument(skip_all)]
    pub async fn authenticated_user(
        &self,
        token: &AccessToken,
    ) -> orgjoin_core::Result<GithubUser, GithubError> {
        let endpoint = self.endpoint(&["user"])?;
        let request = self
            .http_client
            .get(endpoint.clone())
            .bearer_auth(token.secret());

        let user: GithubUser = self.send(request, &endpoint).await?;
        debug!(login = %user.login, "fetched authenticated user");

        Ok(user)
    }

    /// Sets `login`'s membership in `org` without specifying a role.
    ///
    /// GitHub invites non-members (state `pending`) and leaves existing
    /// members' roles unchanged. `token` must belong to an organization owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or GitHub refuses the edit
    /// (insufficient permissions, rate limits, invitation limits).
    #[instrument(skip_all, fields(org = %org, login = %login))]
    pub async fn set_org_membership(
        &self,
        token: &AccessToken,
        org: &str,
        login: &GithubLogin,
    ) -> orgjoin_core::Result<OrgMembership, GithubError> {
        let endpoint = self.endpoint(&["orgs", org, "memberships", login.as_str()])?;
        let request = self
            .http_client
            .put(endpoint.clone())
            .bearer_auth(token.secret())
            .json(&serde_json::json!({}));

        let membership: OrgMembership = self.send(request, &endpoint).await?;
        debug!(state = %membership.state, role = %membership.role, "membership updated");

        Ok(membership)
    }

    fn endpoint(&self, segments: &[&str]) -> orgjoin_core::Result<Url, GithubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GithubError::Configuration {
                details: format!("API URL '{}' cannot be a base", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &Url,
    ) -> orgjoin_core::Result<T, GithubError> {
        let response = request
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| GithubError::Request {
                endpoint: endpoint.to_string(),
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            return Err(GithubError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| GithubError::InvalidResponse {
                endpoint: endpoint.to_string(),
                details: e.to_string(),
            })?;

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> GithubApi {
        let http_client = build_http_client(Duration::from_secs(5)).expect("http client");
        GithubApi::new(http_client, &server.uri()).expect("valid API URL")
    }

    fn login(name: &str) -> GithubLogin {
        GithubLogin::new(name).expect("valid login")
    }

    #[test]
    fn rejects_non_http_base_url() {
        let http_client = reqwest::Client::new();
        assert!(GithubApi::new(http_client.clone(), "mailto:ops@example.com").is_err());
        assert!(GithubApi::new(http_client, "not a url").is_err());
    }

    #[tokio::test]
    async fn authenticated_user_reads_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer gho_user"))
            .and(header("accept", GITHUB_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "id": 583231,
                "name": "The Octocat",
                "type": "User"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = api_for(&server)
            .authenticated_user(&AccessToken::new("gho_user".to_string()))
            .await
            .expect("profile fetch should succeed");

        assert_eq!(user.login.as_str(), "octocat");
        assert_eq!(user.id, 583231);
        assert_eq!(user.name.as_deref(), Some("The Octocat"));
    }

    #[tokio::test]
    async fn authenticated_user_reports_bad_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .authenticated_user(&AccessToken::new("revoked".to_string()))
            .await
            .expect_err("profile fetch should fail");

        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[tokio::test]
    async fn authenticated_user_rejects_profile_without_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1
            })))
            .mount(&server)
            .await;

        let result = api_for(&server)
            .authenticated_user(&AccessToken::new("gho_user".to_string()))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn set_org_membership_uses_owner_token() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/orgs/acme/memberships/octocat"))
            .and(header("authorization", "Bearer ghp_owner"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "state": "pending",
                "role": "member",
                "organization": { "login": "acme" },
                "user": { "login": "octocat" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let membership = api_for(&server)
            .set_org_membership(
                &AccessToken::new("ghp_owner".to_string()),
                "acme",
                &login("octocat"),
            )
            .await
            .expect("membership edit should succeed");

        assert_eq!(membership.state, MembershipState::Pending);
        assert_eq!(membership.role, "member");
    }

    #[tokio::test]
    async fn set_org_membership_reports_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/orgs/acme/memberships/octocat"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "message": "You must be an admin to add or update an organization membership."
            })))
            .mount(&server)
            .await;

        let err = api_for(&server)
            .set_org_membership(
                &AccessToken::new("ghp_member".to_string()),
                "acme",
                &login("octocat"),
            )
            .await
            .expect_err("membership edit should fail");

        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn enterprise_base_path_is_preserved() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "hubot",
                "id": 2
            })))
            .expect(1)
            .mount(&server)
            .await;

        let http_client = build_http_client(Duration::from_secs(5)).expect("http client");
        let api = GithubApi::new(http_client, &format!("{}/api/v3/", server.uri()))
            .expect("valid API URL");

        let user = api
            .authenticated_user(&AccessToken::new("gho_user".to_string()))
            .await
            .expect("profile fetch should succeed");

        assert_eq!(user.login.as_str(), "hubot");
    }
}
