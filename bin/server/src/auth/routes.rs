//! Routes for sign-in, the GitHub callback, and unknown paths.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use orgjoin_core::GithubLogin;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use super::{AppState, redirect::redirect_to_error_page};
use crate::app::LOGIN_PATH;
use crate::error::JoinError;

/// Query parameters GitHub sends to the callback.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    state: String,
    code: String,
    /// Set instead of `code` when the user or GitHub declined.
    error: Option<String>,
    error_description: Option<String>,
}

impl CallbackQuery {
    /// Parses a raw query string.
    ///
    /// Never fails: unknown keys are ignored, missing ones stay empty, and
    /// the first value of a repeated key wins.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut state = None;
        let mut code = None;
        let mut error = None;
        let mut error_description = None;

        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "state" => &mut state,
                "code" => &mut code,
                "error" => &mut error,
                "error_description" => &mut error_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Self {
            state: state.unwrap_or_default(),
            code: code.unwrap_or_default(),
            error,
            error_description,
        }
    }
}

/// Starts sign-in by redirecting to GitHub's authorization page.
pub async fn login(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = state.oauth_client.authorization_url();
    debug!(url = %auth_url, "redirecting to GitHub authorization");

    Redirect::temporary(&auth_url)
}

/// Completes sign-in and adds the user to the organization.
///
/// Always answers with a redirect: to the success page, or to the error page
/// with the code of the first step that failed.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Response {
    let query = CallbackQuery::parse(raw.as_deref());

    match join(&state, &query).await {
        Ok(username) => {
            info!(username = %username, "successfully invited user");
            Redirect::temporary(&state.success_redirect_url).into_response()
        }
        Err(err) => {
            redirect_to_error_page(&state.error_redirect_url, err.code(), &err.user_message())
        }
    }
}

/// Sends every unknown path to the login page.
pub async fn fallback() -> Redirect {
    Redirect::temporary(LOGIN_PATH)
}

async fn join(state: &AppState, query: &CallbackQuery) -> Result<GithubLogin, JoinError> {
    if !state.oauth_client.state_matches(&query.state) {
        warn!("OAuth state mismatch on callback");
        return Err(JoinError::InvalidState);
    }

    if let Some(provider_error) = &query.error {
        warn!(
            error = %provider_error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "GitHub declined the authorization"
        );
        return Err(JoinError::ExchangeFailed);
    }

    if query.code.is_empty() {
        warn!("callback is missing the authorization code");
        return Err(JoinError::ExchangeFailed);
    }

    let token = state
        .gateway
        .exchange_code(&query.code)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to exchange code");
            JoinError::ExchangeFailed
        })?;

    let username = state.gateway.fetch_login(&token).await.map_err(|e| {
        error!(error = %e, "failed to get user info");
        JoinError::UserInfoFailed
    })?;

    if let Err(e) = state.gateway.grant_membership(&username).await {
        error!(username = %username, error = %e, "error inviting user");
        return Err(JoinError::InvitationFailed { username });
    }

    Ok(username)
}
