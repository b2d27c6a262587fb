//! Event decoding and the notification guard.
//!
//! A [`PubSubMessage`] carries a base64-encoded JSON object describing a build.
//! [`decode_build_event`] extracts the six keys the notifier uses into a
//! [`BuildEvent`]; all other keys are ignored. [`skip_reason`] then decides
//! whether the event is worth a notification at all.

use std::collections::HashMap;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{BuildEvent, BuildId, BuildStatus, DecodeError, ProjectId, TriggerId};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The message envelope delivered by the hosting platform.
///
/// Only `data` is used. The remaining fields are accepted so that complete
/// envelopes deserialise, and `message_id` is recorded in logs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubMessage {
    /// Base64-encoded event payload.
    pub data: String,

    #[serde(default)]
    pub attributes: HashMap<String, String>,

    #[serde(default, alias = "message_id")]
    pub message_id: Option<String>,

    #[serde(default, alias = "publish_time")]
    pub publish_time: Option<String>,
}

impl PubSubMessage {
    /// Creates an envelope whose `data` is the base64 encoding of `payload`.
    pub fn from_payload(payload: impl AsRef<[u8]>) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(payload),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Accepts `data` with or without trailing `=` padding.
const DATA_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes the envelope payload into a [`BuildEvent`].
///
/// Missing keys, `null` values and empty strings all decode as absent.
/// Unknown keys are ignored. When a key appears more than once, the last
/// occurrence wins.
///
/// # Errors
///
/// Returns [`DecodeError`] if `data` is not base64, the bytes are not UTF-8,
/// the text is not a JSON object, or one of the known keys holds a non-string
/// value.
pub fn decode_build_event(message: &PubSubMessage) -> Result<BuildEvent, DecodeError> {
    let bytes = DATA_ENGINE.decode(message.data.trim())?;
    let text = String::from_utf8(bytes)?;
    let mut payload: Map<String, Value> = serde_json::from_str(&text)?;

    Ok(BuildEvent {
        build_id: string_field(&mut payload, "buildId")?.and_then(BuildId::new),
        project_id: string_field(&mut payload, "projectId")?.and_then(ProjectId::new),
        trigger_id: string_field(&mut payload, "buildTriggerId")?.and_then(TriggerId::new),
        status: string_field(&mut payload, "status")?.and_then(BuildStatus::new),
        start_time: string_field(&mut payload, "startTime")?,
        finish_time: string_field(&mut payload, "finishTime")?,
    })
}

/// Takes `key` out of `payload`; `null` and `""` count as absent.
fn string_field(payload: &mut Map<String, Value>, key: &str) -> Result<Option<String>, DecodeError> {
    let Some(value) = payload.remove(key) else {
        return Ok(None);
    };
    let text: Option<String> = serde_json::from_value(value)?;
    Ok(text.filter(|s| !s.is_empty()))
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Why an event was dropped without a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The build is still queued.
    Queued,
    /// The build was not started by a trigger.
    NoTrigger,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Queued => write!(f, "build is queued"),
            SkipReason::NoTrigger => write!(f, "build has no trigger"),
        }
    }
}

/// Returns the reason to drop `event`, or `None` if it should be notified.
///
/// Only builds that have progressed past queuing and were started by a
/// trigger produce a notification.
pub fn skip_reason(event: &BuildEvent) -> Option<SkipReason> {
    if event.is_queued() {
        Some(SkipReason::Queued)
    } else if event.trigger_id.is_none() {
        Some(SkipReason::NoTrigger)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
