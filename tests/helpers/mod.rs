#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use paycli_mocks::app::{build_auth_app, build_receiver_app};
use paycli_mocks::config::AuthConfig;
use paycli_mocks::state::auth::AuthState;
use paycli_mocks::state::receiver::ReceiverState;

/// Nothing listens on the discard port.
pub(crate) const UNREACHABLE_RECEIVER: &str = "http://127.0.0.1:9";

pub(crate) fn auth_app_with_receiver(receiver_url: &str) -> (Router, AuthState) {
    let config = AuthConfig {
        receiver_url: receiver_url.to_string(),
        ..AuthConfig::default()
    };
    let state = AuthState::new(config);
    (build_auth_app(state.clone()), state)
}

pub(crate) fn auth_app() -> (Router, AuthState) {
    auth_app_with_receiver(UNREACHABLE_RECEIVER)
}

pub(crate) fn receiver_app() -> (Router, ReceiverState) {
    let state = ReceiverState::new(20);
    (build_receiver_app(state.clone()), state)
}

pub(crate) async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

pub(crate) async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub(crate) async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(form.to_string()))
        .unwrap();

    send(app, request).await
}

pub(crate) async fn get(app: &Router, uri: &str) -> (StatusCode, Bytes) {
    let request = Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

pub(crate) async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = get(app, uri).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Serve `app` on an ephemeral localhost port.
pub(crate) async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// A "receiver" that accepts connections and never answers. Each accepted
/// connection is reported on the returned channel and then held open.
pub(crate) async fn spawn_silent_receiver() -> (SocketAddr, tokio::sync::mpsc::UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (accepted, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
            let _ = accepted.send(());
        }
    });

    (addr, rx)
}
