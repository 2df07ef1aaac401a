//! The GitHub sign-in and organization join flow.
//!
//! This module provides:
//! - the `/login` and `/github/callback` handlers
//! - the error-page redirector used by every failure path
//! - `AppState`, the read-only state shared by all requests
//!
//! # Credentials
//!
//! The user's token, scoped to `read:user`, is only used to learn their
//! login. The membership write is done with the organization owner's token,
//! so users never grant organization-admin scopes to this app.

pub mod redirect;
pub mod routes;

use std::sync::Arc;

use orgjoin_github::{
    AccessToken, GithubApi, GithubError, GithubOAuthClient, GithubOrgGateway, OrgJoinGateway,
    build_http_client,
};

use crate::config::ServerConfig;

pub use redirect::redirect_to_error_page;
pub use routes::{callback, fallback, login};

/// Shared application state.
///
/// Built once during startup and never mutated afterwards.
pub struct AppState {
    /// Builds authorization URLs and checks the callback state.
    pub oauth_client: GithubOAuthClient,
    /// Outbound GitHub calls for the callback.
    pub gateway: Arc<dyn OrgJoinGateway>,
    /// Where the browser goes after a successful join.
    pub success_redirect_url: String,
    /// Base URL of the error page.
    pub error_redirect_url: String,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        oauth_client: GithubOAuthClient,
        gateway: Arc<dyn OrgJoinGateway>,
        success_redirect_url: String,
        error_redirect_url: String,
    ) -> Self {
        Self {
            oauth_client,
            gateway,
            success_redirect_url,
            error_redirect_url,
        }
    }

    /// Builds the state and GitHub clients from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured GitHub URL is invalid or the HTTP
    /// client cannot be created.
    pub fn from_config(config: &ServerConfig) -> orgjoin_core::Result<Self, GithubError> {
        let github_app = config.github_app();

        let http_client = build_http_client(github_app.http_timeout())?;
        let oauth_client = GithubOAuthClient::new(&github_app, http_client.clone())?;
        let api = GithubApi::new(http_client, github_app.api_url())?;

        let gateway = GithubOrgGateway::new(
            oauth_client.clone(),
            api,
            config.github_org_name.clone(),
            AccessToken::new(config.github_pat.clone()),
        );

        Ok(Self::new(
            oauth_client,
            Arc::new(gateway),
            config.success_redirect_url.clone(),
            config.error_redirect_url.clone(),
        ))
    }
}
