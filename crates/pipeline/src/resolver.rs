//! Trigger metadata resolution.

use tracing::warn;

use crate::{LookupError, ProjectId, TriggerId, TriggerLookup, TriggerMetadata};

/// How a failed trigger lookup affects the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupFailurePolicy {
    /// Every lookup failure aborts the invocation; nothing is delivered.
    #[default]
    Fatal,
    /// A trigger that does not exist renders as placeholders; other failures abort.
    TolerateNotFound,
    /// Every lookup failure renders as placeholders and the message is still delivered.
    TolerateAll,
}

impl LookupFailurePolicy {
    /// Returns `true` if `error` should be swallowed under this policy.
    pub fn tolerates(self, error: &LookupError) -> bool {
        match self {
            LookupFailurePolicy::Fatal => false,
            LookupFailurePolicy::TolerateNotFound => error.is_not_found(),
            LookupFailurePolicy::TolerateAll => true,
        }
    }
}

/// Resolves the metadata of the trigger that started a build.
///
/// Returns `Ok(None)` without calling `lookup` when `trigger_id` is absent.
/// When the event names a trigger but no project, the lookup cannot be keyed
/// and fails with [`LookupError::MissingProject`].
///
/// # Errors
///
/// Returns the [`LookupError`] unless `policy` tolerates it, in which case the
/// failure is logged and `Ok(None)` is returned.
pub async fn resolve_trigger(
    lookup: &dyn TriggerLookup,
    project_id: Option<&ProjectId>,
    trigger_id: Option<&TriggerId>,
    policy: LookupFailurePolicy,
) -> Result<Option<TriggerMetadata>, LookupError> {
    let Some(trigger_id) = trigger_id else {
        return Ok(None);
    };

    let result = match project_id {
        Some(project_id) => lookup.get_trigger(project_id, trigger_id).await,
        None => Err(LookupError::MissingProject),
    };

    match result {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if policy.tolerates(&e) => {
            warn!(
                trigger_id = %trigger_id,
                error = %e,
                "Trigger lookup failed; rendering placeholders"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
