//! Core domain types and utilities for orgjoin.
//!
//! This crate provides the foundational types and error handling shared by
//! the GitHub client library and the server.

pub mod error;
pub mod login;

pub use error::Result;
pub use login::{GithubLogin, ParseLoginError};
