use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::ForwardError;

/// Relays notifications to the receiver without waiting for the result.
///
/// The client has no timeout and there is no retry.
#[derive(Clone, Debug)]
pub struct Forwarder {
    client: Client,
    target: String,
}

impl Forwarder {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Spawn the POST and return immediately. Callers on the request path
    /// drop the handle; the outcome is only logged.
    pub fn dispatch(&self, body: Value) -> JoinHandle<Result<StatusCode, ForwardError>> {
        let client = self.client.clone();
        let target = self.target.clone();

        tokio::spawn(async move {
            info!("Forwarding notification to {}", target);

            match client.post(&target).json(&body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        info!("Receiver answered {}", status);
                    } else {
                        warn!("Receiver answered {}", status);
                    }
                    Ok(status)
                }
                Err(e) => {
                    warn!("Error forwarding to {}: {}", target, e);
                    Err(ForwardError::Request(e))
                }
            }
        })
    }
}
