//! Core domain of the build notifier.
//!
//! Turns a build status event into a chat card: decode the event, drop it if
//! it is not worth announcing, look up the trigger that started the build,
//! format the card, and hand it to a dispatcher. Infrastructure crates
//! implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate performs no network I/O.
//! It defines *what* is needed; `cloudbuild` and `chat` define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`BuildId`, `ProjectId`, `TriggerId`) |
//! | [`types`] | `BuildEvent`, `TriggerMetadata`, and the `ChatMessage` wire types |
//! | [`errors`] | Error taxonomy and retry policy |
//! | [`decoder`] | Envelope decoding and the notification guard |
//! | [`resolver`] | Trigger metadata resolution and the lookup failure policy |
//! | [`formatter`] | Card formatting |
//! | [`ports`] | `TriggerLookup` and `MessageDispatcher` traits |
//! | [`notifier`] | The pipeline orchestrator |

pub mod decoder;
pub mod errors;
pub mod formatter;
pub mod identifiers;
pub mod notifier;
pub mod ports;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use decoder::{decode_build_event, skip_reason, PubSubMessage, SkipReason};
pub use errors::{
    ConfigurationError, DecodeError, DispatchError, LookupError, NotifierError, RetryPolicy,
};
pub use formatter::{format_message, CARD_IMAGE_URL, CARD_TITLE, PLACEHOLDER, WIDGET_LABELS};
pub use identifiers::{BuildId, ProjectId, TriggerId};
pub use notifier::{Notifier, Outcome};
pub use ports::{MessageDispatcher, TriggerLookup};
pub use resolver::{resolve_trigger, LookupFailurePolicy};
pub use types::{
    BuildEvent, BuildStatus, Card, CardHeader, ChatMessage, KeyValue, Section, TriggerMetadata,
    Widget,
};
