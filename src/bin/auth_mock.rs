//! Auth/notify mock: device login, token polling, WebSocket pushes and the
//! relay to the receiver.

use paycli_mocks::app::build_auth_app;
use paycli_mocks::config::MockConfig;
use paycli_mocks::errors::ServerError;
use paycli_mocks::logging;
use paycli_mocks::server;
use paycli_mocks::state::auth::AuthState;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cfg = MockConfig::load()?.auth;

    logging::init(&cfg.log_level)?;
    tracing::info!("Loaded configuration: {:?}", cfg);
    tracing::info!("WebSocket on ws://localhost:{}/ws", cfg.port);
    tracing::info!("Forwarding to {}", cfg.receiver_url);

    let port = cfg.port;
    let app = build_auth_app(AuthState::new(cfg));

    server::run("Auth mock", port, app).await
}
