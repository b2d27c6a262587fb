//! Error and retry-policy types for the build notifier.
//!
//! [`NotifierError`] is what a single invocation fails with. It wraps one
//! error type per pipeline stage so callers can tell a malformed event
//! ([`DecodeError`]) from a failed trigger lookup ([`LookupError`]) or a failed
//! webhook post ([`DispatchError`]). [`ConfigurationError`] is only produced
//! while the process starts up, before any event is handled.
//!
//! None of these errors are retried inside the notifier. [`RetryPolicy`] tells
//! the hosting surface whether re-delivering the same event could succeed.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether re-delivering the event that produced an error could succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// The failure was transient (transport error, 5xx, rate limiting).
    Retryable,
    /// The same event will fail the same way again.
    NonRetryable,
}

/// Maps an HTTP status returned by a collaborator to a [`RetryPolicy`].
fn retry_policy_for_status(status: u16) -> RetryPolicy {
    if status == 429 || status >= 500 {
        RetryPolicy::Retryable
    } else {
        RetryPolicy::NonRetryable
    }
}

// ---------------------------------------------------------------------------
// Invocation errors
// ---------------------------------------------------------------------------

/// Errors that abort a single invocation of the notification pipeline.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// The inbound event payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Trigger metadata could not be retrieved.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The chat message could not be delivered.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl NotifierError {
    /// Whether re-delivering the same event could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            NotifierError::Decode(_) => RetryPolicy::NonRetryable,
            NotifierError::Lookup(e) => e.retry_policy(),
            NotifierError::Dispatch(e) => e.retry_policy(),
        }
    }
}

// ---------------------------------------------------------------------------

/// The inbound payload was not base64-encoded JSON of the expected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The envelope `data` field was not valid base64.
    #[error("Event data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes were not valid UTF-8 text.
    #[error("Event data is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The decoded text was not a JSON object with string values for the known keys.
    #[error("Event data is not a valid build payload: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------

/// Trigger metadata could not be retrieved from the build-orchestration service.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The event named a trigger but no project to look it up in.
    #[error("Build event has a trigger id but no project id")]
    MissingProject,

    /// The service reported that the trigger does not exist.
    #[error("Trigger '{trigger_id}' not found in project '{project_id}'")]
    NotFound {
        project_id: String,
        trigger_id: String,
    },

    /// No access token could be obtained for the request.
    #[error("Could not obtain credentials for trigger lookup: {message}")]
    Credentials { message: String },

    /// The request did not complete (connection, TLS, timeout).
    #[error("Trigger lookup request failed: {message}")]
    Transport { message: String },

    /// The service answered with a non-success status other than not-found.
    #[error("Trigger lookup returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered successfully but the body could not be parsed.
    #[error("Trigger lookup returned an invalid response: {message}")]
    InvalidResponse { message: String },
}

impl LookupError {
    /// Returns `true` if the trigger was reported as not existing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }

    /// Whether re-delivering the same event could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            LookupError::Credentials { .. } | LookupError::Transport { .. } => {
                RetryPolicy::Retryable
            }
            LookupError::Status { status, .. } => retry_policy_for_status(*status),
            LookupError::MissingProject
            | LookupError::NotFound { .. }
            | LookupError::InvalidResponse { .. } => RetryPolicy::NonRetryable,
        }
    }
}

// ---------------------------------------------------------------------------

/// The chat message could not be delivered to the webhook.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message could not be serialised to the wire format.
    #[error("Chat message could not be serialised: {message}")]
    Serialize { message: String },

    /// The request did not complete (connection, TLS, timeout).
    #[error("Webhook request failed: {message}")]
    Transport { message: String },

    /// The webhook answered with a non-2xx status.
    #[error("Webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl DispatchError {
    /// Whether re-delivering the same event could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            DispatchError::Serialize { .. } => RetryPolicy::NonRetryable,
            DispatchError::Transport { .. } => RetryPolicy::Retryable,
            DispatchError::Status { status, .. } => retry_policy_for_status(*status),
        }
    }
}

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

/// The process cannot start: a required setting or credential is unavailable.
///
/// Produced at startup only; the notifier never starts with an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required setting was not provided.
    #[error("Required setting '{name}' is not set")]
    MissingSetting { name: String },

    /// A setting was provided but its value is unusable.
    #[error("Setting '{name}' is invalid: {message}")]
    InvalidSetting { name: String, message: String },

    /// Ambient credentials could not be discovered.
    #[error("Credentials are unavailable: {message}")]
    Credentials { message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
