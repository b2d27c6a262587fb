//! Shared value types for the build notifier domain.
//!
//! Every value here is ephemeral: a [`BuildEvent`] is decoded once per
//! invocation, optionally paired with [`TriggerMetadata`], turned into a
//! [`ChatMessage`], serialised, and dropped.
//!
//! Fields that may be absent are `Option`s. The placeholder text shown in a
//! chat card for an absent value is a formatting concern and lives in
//! [`crate::formatter`], never in these types.

use serde::{Deserialize, Serialize};

use crate::{BuildId, ProjectId, TriggerId};

// ---------------------------------------------------------------------------
// Build events
// ---------------------------------------------------------------------------

/// Lifecycle status of a build as reported by Cloud Build.
///
/// Known values include `QUEUED`, `WORKING`, `SUCCESS`, `FAILURE`, `TIMEOUT`
/// and `CANCELLED`. The value is carried verbatim and never validated; only
/// [`BuildStatus::is_queued`] gives any value a meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildStatus(String);

impl BuildStatus {
    /// Status reported while a build is waiting for a worker.
    pub const QUEUED: &'static str = "QUEUED";

    /// Creates a [`BuildStatus`], returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the status as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the build has not yet left the queue.
    ///
    /// The comparison is exact and case-sensitive.
    pub fn is_queued(&self) -> bool {
        self.0 == Self::QUEUED
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// The completion state of one build, extracted from an inbound event.
///
/// Immutable after decoding. Missing or empty keys in the payload are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildEvent {
    /// Build identifier (`buildId`). Logged only; never displayed.
    pub build_id: Option<BuildId>,

    /// Owning project (`projectId`).
    pub project_id: Option<ProjectId>,

    /// Trigger that started the build (`buildTriggerId`). Manual builds have none.
    pub trigger_id: Option<TriggerId>,

    /// Build status (`status`).
    pub status: Option<BuildStatus>,

    /// Start timestamp (`startTime`), carried as the raw string.
    pub start_time: Option<String>,

    /// Finish timestamp (`finishTime`), carried as the raw string.
    pub finish_time: Option<String>,
}

impl BuildEvent {
    /// Returns `true` if the event reports a build that is still queued.
    pub fn is_queued(&self) -> bool {
        self.status.as_ref().is_some_and(BuildStatus::is_queued)
    }
}

// ---------------------------------------------------------------------------
// Trigger metadata
// ---------------------------------------------------------------------------

/// Display metadata of the trigger that started a build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerMetadata {
    /// Human-readable trigger name.
    pub name: Option<String>,

    /// Source branch pattern the trigger watches (e.g. `"main"` or `"^release-.*$"`).
    pub branch_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Chat message (wire format)
// ---------------------------------------------------------------------------

/// A chat message carrying one or more cards.
///
/// Serialises to the card format accepted by chat incoming webhooks:
///
/// ```json
/// {"cards":[{"header":{"title":"...","imageUrl":"..."},
///            "sections":[{"widgets":[{"keyValue":{"topLabel":"...","content":"..."}}]}]}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub cards: Vec<Card>,
}

/// A card: a header followed by sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub header: CardHeader,
    pub sections: Vec<Section>,
}

/// Title and icon shown at the top of a [`Card`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHeader {
    pub title: String,
    pub image_url: String,
}

/// An ordered group of widgets within a [`Card`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub widgets: Vec<Widget>,
}

/// A single widget. Only label/value widgets are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub key_value: KeyValue,
}

/// A label with a text value underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    pub top_label: String,
    pub content: String,
}

impl Widget {
    /// Creates a label/value widget.
    pub fn key_value(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key_value: KeyValue {
                top_label: label.into(),
                content: content.into(),
            },
        }
    }

    /// Returns the label shown above the value.
    pub fn label(&self) -> &str {
        &self.key_value.top_label
    }

    /// Returns the displayed value.
    pub fn content(&self) -> &str {
        &self.key_value.content
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
