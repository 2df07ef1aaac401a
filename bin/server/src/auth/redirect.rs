//! Redirects to the configured error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use url::Url;

use crate::error::ErrorCode;

/// Query parameter carrying the machine-readable error code.
pub const ERROR_CODE_PARAM: &str = "error_code";

/// Query parameter carrying the human-readable message.
pub const ERROR_MESSAGE_PARAM: &str = "error_message";

/// Redirects (307) to `error_redirect_url` with `error_code` and
/// `error_message` set, replacing any existing values of those parameters.
///
/// If `error_redirect_url` does not parse, responds with a plain 500 since
/// there is nowhere to redirect to.
pub fn redirect_to_error_page(error_redirect_url: &str, code: ErrorCode, message: &str) -> Response {
    let mut url = match Url::parse(error_redirect_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "ERROR_REDIRECT_URL is not a valid URL");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error: Invalid error redirect URL.",
            )
                .into_response();
        }
    };

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| key != ERROR_CODE_PARAM && key != ERROR_MESSAGE_PARAM)
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(ERROR_CODE_PARAM, code.as_str())
        .append_pair(ERROR_MESSAGE_PARAM, message);

    Redirect::temporary(url.as_str()).into_response()
}
