//! GitHub client library for orgjoin.
//!
//! This crate provides:
//! - GitHub OAuth app configuration (`GithubAppConfig`)
//! - The authorization-code flow against GitHub (`GithubOAuthClient`)
//! - The two REST calls the join flow needs (`GithubApi`)
//! - The `OrgJoinGateway` seam the server drives, with its GitHub
//!   implementation (`GithubOrgGateway`)
//!
//! # Credentials
//!
//! Two tokens are involved in a join:
//! - the user's access token, obtained from the code exchange and scoped to
//!   `read:user`, which is only used to learn who the user is
//! - the organization owner's personal access token, which performs the
//!   membership write for the login obtained with the first token
//!
//! # Example
//!
//! ```
//! use orgjoin_github::{GithubAppConfig, GithubOAuthClient, OAUTH_STATE};
//!
//! let config = GithubAppConfig::new("Iv1.0123456789abcdef".to_string(), "secret".to_string());
//! let client = GithubOAuthClient::new(&config, reqwest::Client::new()).expect("valid config");
//!
//! let url = client.authorization_url();
//! assert!(url.contains("client_id=Iv1.0123456789abcdef"));
//! assert!(client.state_matches(OAUTH_STATE));
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod oauth;

pub use api::{GithubApi, GithubUser, MembershipState, OrgMembership, build_http_client};
pub use config::{GithubAppConfig, GithubAppConfigBuilder};
pub use error::GithubError;
pub use gateway::{GithubOrgGateway, OrgJoinGateway};
pub use oauth::{GithubOAuthClient, OAUTH_STATE};

pub use oauth2::AccessToken;
