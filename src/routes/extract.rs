use std::convert::Infallible;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Body extractor that never rejects.
///
/// Form-encoded bodies are parsed as forms, everything else as JSON. A body
/// that does not parse becomes `T::default()`; the dropped payload is logged.
#[derive(Debug, Clone, Default)]
pub struct Lenient<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Lenient<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let parsed = match Form::<T>::from_request(req, state).await {
                Ok(Form(value)) => value,
                Err(e) => {
                    debug!("Form body ignored: {}", e);
                    T::default()
                }
            };
            return Ok(Lenient(parsed));
        }

        let bytes = match Bytes::from_request(req, state).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Request body could not be read, treating it as empty: {}", e);
                return Ok(Lenient(T::default()));
            }
        };

        // An empty body is the normal case for bodiless POSTs.
        if bytes.is_empty() {
            return Ok(Lenient(T::default()));
        }

        let parsed = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                debug!("Body of {} bytes is not valid JSON, ignored: {}", bytes.len(), e);
                T::default()
            }
        };
        Ok(Lenient(parsed))
    }
}

/// Missing or unparseable JSON bodies are treated as `{}`.
pub fn object_or_empty(value: serde_json::Value) -> serde_json::Value {
    if value.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        value
    }
}
