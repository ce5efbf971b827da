use axum::Router;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes::{admin_routes, auth_routes, forward_routes, receiver_routes, ws_routes};
use crate::state::auth::AuthState;
use crate::state::receiver::ReceiverState;

/// Build the auth/notify mock:
/// - /device-login, /token, /verify   (device flow)
/// - /admin/*                         (broadcast + stats)
/// - /cli-forward                     (relay to the receiver)
/// - /ws and /                        (WebSocket push channel)
pub fn build_auth_app(state: AuthState) -> Router {
    Router::new()
        .merge(auth_routes::routes(state.clone()))
        .nest("/admin", admin_routes::routes(state.clone()))
        .merge(forward_routes::routes(state.clone()))
        .merge(ws_routes::routes(state))
        .layer(trace_layer())
}

/// Build the receiver mock: POST on any path, / and /health.
pub fn build_receiver_app(state: ReceiverState) -> Router {
    receiver_routes::routes(state).layer(trace_layer())
}

/// Request logging middleware shared by both mocks.
fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
