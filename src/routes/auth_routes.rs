use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::clock::now_millis;
use crate::errors::OAuthError;
use crate::routes::extract::Lenient;
use crate::services::device_service::{self, DeviceLogin, TokenRequest};
use crate::state::auth::AuthState;
use crate::views::verify_page;

/// Device flow routes: login, token polling and the verification page.
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/device-login", post(device_login))
        .route("/token", post(token))
        .route("/verify", get(verify))
        .route("/verify/authorize", post(authorize))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyParams {
    pub code: Option<String>,
}

//
// ─────────────────────────────────────────────────────────────
// POST /device-login
// Start a device session
// ─────────────────────────────────────────────────────────────
//
async fn device_login(State(state): State<AuthState>) -> Json<DeviceLogin> {
    let login = device_service::start_device_login(&state.config.verification_uri, now_millis());

    tracing::info!("Device login started: {:?}", login);
    Json(login)
}

//
// ─────────────────────────────────────────────────────────────
// POST /token
// Pending until the third poll, then a token bundle
// ─────────────────────────────────────────────────────────────
//
async fn token(
    State(state): State<AuthState>,
    Lenient(req): Lenient<TokenRequest>,
) -> Response {
    match device_service::poll_token(&state.polls, &req) {
        Ok(bundle) => Json(bundle).into_response(),
        Err(err @ OAuthError::UnsupportedGrantType) => {
            tracing::warn!("Rejected grant_type {:?}", req.grant_type);
            err.into_response()
        }
        Err(err) => err.into_response(),
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /verify?code=
// Human-facing approval page
// ─────────────────────────────────────────────────────────────
//
async fn verify(Query(params): Query<VerifyParams>) -> Html<String> {
    let code = params.code.unwrap_or_else(|| "unknown".to_string());
    Html(verify_page::render(&code))
}

//
// ─────────────────────────────────────────────────────────────
// POST /verify/authorize
// Skip the remaining polls
// ─────────────────────────────────────────────────────────────
//
async fn authorize(
    State(state): State<AuthState>,
    Lenient(params): Lenient<VerifyParams>,
) -> Html<String> {
    let code = params.code.unwrap_or_else(|| "unknown".to_string());
    let counter = state.polls.force_authorize();

    tracing::info!("Device {} authorized from verification page (counter = {})", code, counter);
    Html(verify_page::render_authorized(&code))
}
