//! Newtype domain identifiers.
//!
//! Each identity carried by a build event is a distinct newtype wrapping a
//! string. This prevents accidentally passing a [`TriggerId`] where a
//! [`ProjectId`] is expected even though both are plain strings on the wire.
//!
//! Empty strings are never valid identifiers: [`ProjectId::new`] and friends
//! return `None` for them, so "absent" and "empty" collapse into one case.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies a single Cloud Build execution (`buildId`).
    BuildId
}

string_id! {
    /// Identifies the cloud project that owns the build and its trigger.
    ProjectId
}

string_id! {
    /// Identifies the build trigger that started a build (`buildTriggerId`).
    TriggerId
}

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;
