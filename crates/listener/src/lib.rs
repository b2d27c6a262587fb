//! Build notifier event source.
//!
//! Receives Pub/Sub push deliveries over HTTP and runs the
//! [`pipeline::Notifier`] once per delivery. A push delivery wraps the
//! message envelope:
//!
//! ```json
//! {"message": {"data": "eyJzdGF0dXMiOi...", "messageId": "1", "attributes": {}},
//!  "subscription": "projects/p/subscriptions/cloud-builds"}
//! ```
//!
//! ## Responses
//!
//! The HTTP status is the only thing the push subscription looks at: 2xx
//! acknowledges the message, anything else schedules a re-delivery.
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Delivered or skipped | `204 No Content` |
//! | [`pipeline::NotifierError::Decode`] | `400 Bad Request` |
//! | Other error, [`pipeline::RetryPolicy::Retryable`] | `503 Service Unavailable` |
//! | Other error, [`pipeline::RetryPolicy::NonRetryable`] | `500 Internal Server Error` |
//! | Push body is not a delivery | rejected by the JSON extractor (4xx) |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport details and envelope deserialisation live
//! here. The [`pipeline`] crate sees only [`pipeline::PubSubMessage`].

use std::future::Future;
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use pipeline::{Notifier, NotifierError, Outcome, PubSubMessage, RetryPolicy};
use serde::Deserialize;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

/// Errors raised while binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listen address could not be bound.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Push endpoint failed: {0}")]
    Serve(#[from] std::io::Error),
}

/// A Pub/Sub push delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct PushRequest {
    pub message: PubSubMessage,

    #[serde(default)]
    pub subscription: Option<String>,
}

/// Maps an invocation failure to the status returned to the push subscription.
pub fn status_for(error: &NotifierError) -> StatusCode {
    match (error, error.retry_policy()) {
        (NotifierError::Decode(_), _) => StatusCode::BAD_REQUEST,
        (_, RetryPolicy::Retryable) => StatusCode::SERVICE_UNAVAILABLE,
        (_, RetryPolicy::NonRetryable) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the push endpoint router.
pub fn router(notifier: Arc<Notifier>) -> Router {
    Router::new()
        .route("/", post(handle_push))
        .with_state(notifier)
}

async fn handle_push(
    State(notifier): State<Arc<Notifier>>,
    Json(push): Json<PushRequest>,
) -> StatusCode {
    let span = tracing::info_span!(
        "push",
        request_id = %Uuid::new_v4(),
        subscription = push.subscription.as_deref().unwrap_or_default(),
    );

    async move {
        match notifier.handle(&push.message).await {
            Ok(Outcome::Skipped(reason)) => {
                debug!(%reason, "Push delivery acknowledged without notification");
                StatusCode::NO_CONTENT
            }
            Ok(Outcome::Delivered) => StatusCode::NO_CONTENT,
            Err(e) => {
                let status = status_for(&e);
                error!(error = %e, status = status.as_u16(), "Build notification failed");
                status
            }
        }
    }
    .instrument(span)
    .await
}

/// Binds the push endpoint to `address` (e.g. `"0.0.0.0:8080"`).
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind {
            address: address.to_string(),
            source,
        })
}

/// Serves push deliveries on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    notifier: Arc<Notifier>,
    shutdown: F,
) -> Result<(), ListenerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!(%address, "Listening for push deliveries");
    }

    axum::serve(listener, router(notifier))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Push endpoint stopped");
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
