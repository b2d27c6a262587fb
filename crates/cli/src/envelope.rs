//! Reading a single message for the `handle` subcommand.

use anyhow::Context;
use listener::PushRequest;
use pipeline::PubSubMessage;
use serde::Deserialize;
use tokio::io::AsyncReadExt;

/// Either a bare Pub/Sub message or a full push delivery wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum EnvelopeInput {
    Push(PushRequest),
    Message(PubSubMessage),
}

/// Parses a JSON message envelope.
pub fn parse_envelope(text: &str) -> anyhow::Result<PubSubMessage> {
    let input: EnvelopeInput = serde_json::from_str(text)
        .context("envelope must be a Pub/Sub message or a push delivery")?;

    Ok(match input {
        EnvelopeInput::Push(push) => push.message,
        EnvelopeInput::Message(message) => message,
    })
}

/// Reads and parses an envelope from `source`, a file path or `-` for stdin.
pub async fn read_envelope(source: &str) -> anyhow::Result<PubSubMessage> {
    let text = if source == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read envelope from stdin")?;
        text
    } else {
        tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read envelope from '{source}'"))?
    };

    parse_envelope(&text)
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
