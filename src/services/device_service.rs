use serde::{Deserialize, Serialize};

use crate::errors::OAuthError;
use crate::state::auth::{TokenPollState, POLLS_BEFORE_GRANT};

/// `grant_type` accepted by `/token`.
pub const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Every issued access token starts with this; the WebSocket checks it.
pub const MOCK_TOKEN_PREFIX: &str = "mock-access-token";

pub const DEVICE_CODE_TTL_SECS: u64 = 1800;
pub const POLL_INTERVAL_SECS: u64 = 5;
pub const ACCESS_TOKEN_TTL_SECS: u64 = 3600;

/// Response of `/device-login`.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceLogin {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub expires_in: u64,
    pub interval: u64,
}

/// Body of `/token`. Both fields are optional so that any body parses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
    pub device_code: Option<String>,
}

/// Successful `/token` response.
#[derive(Debug, Clone, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub refresh_token: String,
    pub scope: &'static str,
}

pub fn start_device_login(verification_uri: &str, now_millis: i64) -> DeviceLogin {
    let device_code = format!("device_{now_millis}");

    DeviceLogin {
        user_code: user_code_for(&device_code),
        device_code,
        verification_uri: verification_uri.to_string(),
        expires_in: DEVICE_CODE_TTL_SECS,
        interval: POLL_INTERVAL_SECS,
    }
}

/// `USER-` followed by characters 7..13 of the device code.
pub fn user_code_for(device_code: &str) -> String {
    let slice: String = device_code.chars().skip(7).take(6).collect();
    format!("USER-{slice}")
}

/// Handle one poll. Only device-code grants move the counter.
pub fn poll_token(polls: &TokenPollState, req: &TokenRequest) -> Result<TokenBundle, OAuthError> {
    if req.grant_type.as_deref() != Some(DEVICE_CODE_GRANT) {
        return Err(OAuthError::UnsupportedGrantType);
    }

    let attempt = polls.record_poll();
    if attempt < POLLS_BEFORE_GRANT {
        tracing::info!("Token pending (attempt {}/{})", attempt, POLLS_BEFORE_GRANT);
        return Err(OAuthError::AuthorizationPending);
    }

    let device_code = req
        .device_code
        .as_deref()
        .filter(|code| !code.is_empty())
        .unwrap_or("default");

    tracing::info!("Token granted for {}", device_code);

    Ok(TokenBundle {
        access_token: format!("{MOCK_TOKEN_PREFIX}-{device_code}"),
        token_type: "bearer",
        expires_in: ACCESS_TOKEN_TTL_SECS,
        refresh_token: format!("mock-refresh-token-{device_code}"),
        scope: "read write",
    })
}

/// WebSocket admission check.
pub fn token_is_valid(token: Option<&str>) -> bool {
    token.is_some_and(|t| t.starts_with(MOCK_TOKEN_PREFIX))
}
