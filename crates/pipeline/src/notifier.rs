//! The notification pipeline: decode, guard, resolve, format, dispatch.
//!
//! [`Notifier`] holds the shared, immutable collaborators and runs the
//! pipeline once per inbound message. Stages run strictly in sequence; the
//! first error aborts the invocation and nothing is retried.

use std::sync::Arc;

use tracing::{debug, info, Instrument};

use crate::{
    decode_build_event, format_message, resolve_trigger, skip_reason, LookupFailurePolicy,
    MessageDispatcher, NotifierError, PubSubMessage, SkipReason, TriggerLookup,
};

/// Result of a successful invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was dropped by the guard; no outbound call was made.
    Skipped(SkipReason),
    /// Exactly one chat message was delivered.
    Delivered,
}

/// Runs the notification pipeline against injected collaborators.
///
/// Constructed once per process and shared (e.g. behind an `Arc`) by every
/// invocation. Nothing in it is mutated after construction.
pub struct Notifier {
    lookup: Arc<dyn TriggerLookup>,
    dispatcher: Arc<dyn MessageDispatcher>,
    lookup_failure_policy: LookupFailurePolicy,
}

impl Notifier {
    /// Creates a notifier with the default [`LookupFailurePolicy::Fatal`].
    pub fn new(lookup: Arc<dyn TriggerLookup>, dispatcher: Arc<dyn MessageDispatcher>) -> Self {
        Self {
            lookup,
            dispatcher,
            lookup_failure_policy: LookupFailurePolicy::default(),
        }
    }

    /// Replaces the lookup failure policy.
    pub fn with_lookup_failure_policy(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_failure_policy = policy;
        self
    }

    /// Returns the active lookup failure policy.
    pub fn lookup_failure_policy(&self) -> LookupFailurePolicy {
        self.lookup_failure_policy
    }

    /// Handles one inbound message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Decode`] for a malformed payload,
    /// [`NotifierError::Lookup`] when trigger resolution fails and the policy
    /// does not tolerate it, and [`NotifierError::Dispatch`] when delivery fails.
    pub async fn handle(&self, message: &PubSubMessage) -> Result<Outcome, NotifierError> {
        let span = tracing::info_span!(
            "notify",
            message_id = message.message_id.as_deref().unwrap_or_default(),
            build_id = tracing::field::Empty,
            project_id = tracing::field::Empty,
            status = tracing::field::Empty,
        );

        self.run(message).instrument(span).await
    }

    async fn run(&self, message: &PubSubMessage) -> Result<Outcome, NotifierError> {
        let event = decode_build_event(message)?;

        let span = tracing::Span::current();
        if let Some(build_id) = &event.build_id {
            span.record("build_id", build_id.as_str());
        }
        if let Some(project_id) = &event.project_id {
            span.record("project_id", project_id.as_str());
        }
        if let Some(status) = &event.status {
            span.record("status", status.as_str());
        }

        if let Some(reason) = skip_reason(&event) {
            debug!(%reason, "Skipping build event");
            return Ok(Outcome::Skipped(reason));
        }

        let trigger = resolve_trigger(
            self.lookup.as_ref(),
            event.project_id.as_ref(),
            event.trigger_id.as_ref(),
            self.lookup_failure_policy,
        )
        .await?;

        let chat_message = format_message(&event, trigger.as_ref());
        self.dispatcher.dispatch(&chat_message).await?;

        info!(
            trigger_resolved = trigger.is_some(),
            "Build notification delivered"
        );
        Ok(Outcome::Delivered)
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
