//! Chat card formatting.
//!
//! [`format_message`] is a pure function: one card, one fixed header, one
//! section with exactly six label/value widgets in a fixed order. Absent
//! values render as [`PLACEHOLDER`]; no widget is ever omitted.
//!
//! | Order | Label | Value |
//! |-------|-------|-------|
//! | 1 | Project id | [`BuildEvent::project_id`] |
//! | 2 | Trigger Name | [`TriggerMetadata::name`] |
//! | 3 | Branch Name | [`TriggerMetadata::branch_name`] |
//! | 4 | Status | [`BuildEvent::status`] |
//! | 5 | Start Time | [`BuildEvent::start_time`] |
//! | 6 | Finish Time | [`BuildEvent::finish_time`] |

use crate::{BuildEvent, Card, CardHeader, ChatMessage, Section, TriggerMetadata, Widget};

/// Title shown in the header of every card.
pub const CARD_TITLE: &str = "Debo - The Deployer Bot";

/// Icon shown in the header of every card.
pub const CARD_IMAGE_URL: &str = "https://goo.gl/aeDtrS";

/// Text rendered in place of an absent value.
pub const PLACEHOLDER: &str = " - ";

/// Widget labels, in display order.
pub const WIDGET_LABELS: [&str; 6] = [
    "Project id",
    "Trigger Name",
    "Branch Name",
    "Status",
    "Start Time",
    "Finish Time",
];

fn or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(PLACEHOLDER)
}

/// Builds the chat message announcing `event`.
pub fn format_message(event: &BuildEvent, trigger: Option<&TriggerMetadata>) -> ChatMessage {
    let values = [
        or_placeholder(event.project_id.as_ref().map(|p| p.as_str())),
        or_placeholder(trigger.and_then(|t| t.name.as_deref())),
        or_placeholder(trigger.and_then(|t| t.branch_name.as_deref())),
        or_placeholder(event.status.as_ref().map(|s| s.as_str())),
        or_placeholder(event.start_time.as_deref()),
        or_placeholder(event.finish_time.as_deref()),
    ];

    let widgets = WIDGET_LABELS
        .iter()
        .zip(values)
        .map(|(label, value)| Widget::key_value(*label, value))
        .collect();

    ChatMessage {
        cards: vec![Card {
            header: CardHeader {
                title: CARD_TITLE.to_string(),
                image_url: CARD_IMAGE_URL.to_string(),
            },
            sections: vec![Section { widgets }],
        }],
    }
}

#[cfg(test)]
#[path = "formatter_tests.rs"]
mod tests;
