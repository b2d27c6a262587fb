//! Build notifier Cloud Build adapter.
//!
//! Implements [`pipeline::TriggerLookup`] over the Cloud Build REST API
//! (`GET /v1/projects/{projectId}/triggers/{triggerId}`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, authentication, and response parsing
//! live here. The [`pipeline`] crate sees only [`pipeline::TriggerLookup`]
//! and [`pipeline::TriggerMetadata`].
//!
//! ## Credentials
//!
//! [`CloudBuildClient`] depends on credentials only through
//! [`AccessTokenProvider`]. [`discover_credentials`] picks a provider once at
//! startup: a static token if one is configured, Application Default
//! Credentials otherwise.

pub mod auth;
pub mod client;

pub use auth::{
    discover_credentials, AccessToken, AccessTokenProvider, ApplicationDefaultTokenProvider,
    CredentialsError, StaticTokenProvider, CLOUD_PLATFORM_SCOPE,
};
pub use client::{CloudBuildClient, DEFAULT_ENDPOINT};
