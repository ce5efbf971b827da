use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors returned by the `/token` endpoint, shaped like RFC 8628 responses.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthError {
    #[error("Unsupported grant type")]
    UnsupportedGrantType,

    #[error("Authorization pending")]
    AuthorizationPending,
}

impl OAuthError {
    /// Machine-readable `error` code.
    pub fn code(&self) -> &'static str {
        match self {
            OAuthError::UnsupportedGrantType => "unsupported_grant_type",
            OAuthError::AuthorizationPending => "authorization_pending",
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "error_description": self.to_string(),
        });

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config.json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Outcome of a forward that did not reach the receiver.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("Request to receiver failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Top-level failure of a mock server process.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("Failed to set tracing subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
