//! Port traits implemented by infrastructure crates.
//!
//! The notifier reaches the outside world only through these two traits.
//! Implementations are constructed once at startup, shared behind `Arc`, and
//! never mutated afterwards, so concurrent invocations can use them freely.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`TriggerLookup`] | `cloudbuild::CloudBuildClient` |
//! | [`MessageDispatcher`] | `chat::WebhookDispatcher` |

use async_trait::async_trait;

use crate::{ChatMessage, DispatchError, LookupError, ProjectId, TriggerId, TriggerMetadata};

/// Keyed read of trigger metadata from the build-orchestration service.
#[async_trait]
pub trait TriggerLookup: Send + Sync {
    /// Fetches the trigger `trigger_id` owned by `project_id`.
    ///
    /// A trigger that does not exist must be reported as
    /// [`LookupError::NotFound`] so that callers can choose to tolerate it.
    async fn get_trigger(
        &self,
        project_id: &ProjectId,
        trigger_id: &TriggerId,
    ) -> Result<TriggerMetadata, LookupError>;
}

/// Delivery of a formatted chat message.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Delivers `message` with a single attempt.
    ///
    /// Any non-2xx answer is an error; the response body is otherwise ignored.
    async fn dispatch(&self, message: &ChatMessage) -> Result<(), DispatchError>;
}
