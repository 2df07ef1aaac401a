//! orgjoin web server.
//!
//! Signs users in with GitHub and adds them to a configured organization.
//! Routes:
//! - `/login` - redirects to GitHub's authorization page
//! - `/github/callback` - completes sign-in and grants membership
//! - anything else - redirects to `/login`

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
