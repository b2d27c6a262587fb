//! Command-line and environment configuration.
//!
//! Every setting can be given as a flag or through the environment variable
//! named next to it. The webhook URL is the only required setting; it is
//! checked before any client is constructed.

use clap::{Parser, Subcommand, ValueEnum};
use pipeline::{ConfigurationError, LookupFailurePolicy};

/// Environment variable holding the chat webhook URL.
pub const CHAT_WEBHOOK_ENV: &str = "CHAT_WEBHOOK";

/// Announces Cloud Build results in a chat space.
#[derive(Debug, Parser)]
#[command(name = "build-notifier", version)]
pub struct Cli {
    /// Incoming webhook URL of the chat space to post to.
    #[arg(long, env = "CHAT_WEBHOOK", hide_env_values = true, global = true)]
    pub chat_webhook: Option<String>,

    /// What to do when the trigger of a build cannot be looked up.
    #[arg(
        long,
        env = "NOTIFIER_LOOKUP_FAILURE",
        value_enum,
        default_value_t = LookupFailureMode::Fatal,
        global = true
    )]
    pub lookup_failure: LookupFailureMode,

    /// Base URL of the Cloud Build API.
    #[arg(
        long,
        env = "CLOUDBUILD_ENDPOINT",
        default_value = cloudbuild::DEFAULT_ENDPOINT,
        global = true
    )]
    pub cloudbuild_endpoint: String,

    /// Pre-issued OAuth2 access token. When unset, application default credentials are used.
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Json, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Receive Pub/Sub push deliveries over HTTP.
    Serve {
        #[arg(long, env = "ADDRESS", default_value = "0.0.0.0")]
        address: String,

        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Handle a single Pub/Sub message read from a file, or `-` for stdin.
    Handle {
        #[arg(long, default_value = "-")]
        envelope: String,
    },
}

/// Command-line spelling of [`LookupFailurePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupFailureMode {
    /// Abort the invocation; nothing is posted.
    Fatal,
    /// Post with placeholders when the trigger does not exist.
    TolerateNotFound,
    /// Post with placeholders whenever the lookup fails.
    TolerateAll,
}

impl From<LookupFailureMode> for LookupFailurePolicy {
    fn from(mode: LookupFailureMode) -> Self {
        match mode {
            LookupFailureMode::Fatal => LookupFailurePolicy::Fatal,
            LookupFailureMode::TolerateNotFound => LookupFailurePolicy::TolerateNotFound,
            LookupFailureMode::TolerateAll => LookupFailurePolicy::TolerateAll,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    Pretty,
}

impl Cli {
    /// Returns the configured webhook URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSetting`] if no non-empty URL was given.
    pub fn webhook_url(&self) -> Result<&str, ConfigurationError> {
        self.chat_webhook
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigurationError::MissingSetting {
                name: CHAT_WEBHOOK_ENV.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
