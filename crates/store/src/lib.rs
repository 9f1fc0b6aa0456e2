//! `tally-store` — the remote collaborators: service-account credential
//! loading, the JWT-bearer token exchange, the bounded ordered document
//! fetch, and projection of tagged documents into rows.

pub mod auth;
pub mod client;
pub mod document;

pub use auth::{acquire_token, build_assertion, load_credentials, ServiceCredentials, OAUTH_SCOPE};
pub use client::StoreClient;
pub use document::{project, Document, FieldValue};

use std::fmt;

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Credentials file unreadable or unparseable, or the key is invalid.
    Credentials(String),
    /// Token exchange rejected the assertion or returned no token.
    Auth(String),
    /// Transport failure or timeout. Retryable by re-running.
    Network(String),
    /// Non-success response from the document store. Retryable.
    Http(u16, String),
    /// Response body did not match the wire contract.
    Parse(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Credentials(msg) => write!(f, "credentials error: {msg}"),
            StoreError::Auth(msg) => write!(f, "auth error: {msg}"),
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Http(status, body) => write!(f, "document store HTTP {status}: {body}"),
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
