//! Receiver mock: logs every POST and shows the latest ones on `/`.

use paycli_mocks::app::build_receiver_app;
use paycli_mocks::config::MockConfig;
use paycli_mocks::errors::ServerError;
use paycli_mocks::logging;
use paycli_mocks::server;
use paycli_mocks::state::receiver::ReceiverState;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cfg = MockConfig::load()?.receiver;

    logging::init(&cfg.log_level)?;
    tracing::info!("Loaded configuration: {:?}", cfg);

    let app = build_receiver_app(ReceiverState::new(cfg.max_history));

    server::run("Receiver mock", cfg.port, app).await
}
