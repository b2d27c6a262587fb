//! Cloud Build REST client.

use std::sync::Arc;

use async_trait::async_trait;
use pipeline::{
    ConfigurationError, LookupError, ProjectId, TriggerId, TriggerLookup, TriggerMetadata,
};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::AccessTokenProvider;

/// Public Cloud Build API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://cloudbuild.googleapis.com";

// ---------------------------------------------------------------------------
// Wire types (subset of the BuildTrigger resource)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildTriggerResource {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    trigger_template: Option<RepoSource>,
    #[serde(default)]
    github: Option<GitHubEventsConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoSource {
    #[serde(default)]
    branch_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GitHubEventsConfig {
    #[serde(default)]
    push: Option<BranchFilter>,
    #[serde(default)]
    pull_request: Option<BranchFilter>,
}

#[derive(Debug, Default, Deserialize)]
struct BranchFilter {
    #[serde(default)]
    branch: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<BuildTriggerResource> for TriggerMetadata {
    fn from(resource: BuildTriggerResource) -> Self {
        // Repository triggers carry the branch in the template; GitHub App
        // triggers carry it in the push or pull-request filter.
        let template_branch = resource.trigger_template.and_then(|t| non_empty(t.branch_name));
        let github_branch = resource.github.and_then(|g| {
            non_empty(g.push.and_then(|p| p.branch))
                .or_else(|| non_empty(g.pull_request.and_then(|p| p.branch)))
        });

        TriggerMetadata {
            name: non_empty(resource.name),
            branch_name: template_branch.or(github_branch),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Reads build triggers from the Cloud Build API.
///
/// Holds a pooled HTTP client and a token provider; both are shared by every
/// lookup and never mutated after construction.
pub struct CloudBuildClient {
    http: reqwest::Client,
    endpoint: Url,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl CloudBuildClient {
    /// Creates a client for the public API at [`DEFAULT_ENDPOINT`].
    pub fn new(tokens: Arc<dyn AccessTokenProvider>) -> Result<Self, ConfigurationError> {
        Self::with_endpoint(DEFAULT_ENDPOINT, tokens)
    }

    /// Creates a client for the API served at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidSetting`] if `endpoint` is not an
    /// absolute http(s) URL.
    pub fn with_endpoint(
        endpoint: &str,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self, ConfigurationError> {
        let invalid = |message: String| ConfigurationError::InvalidSetting {
            name: "cloudbuild-endpoint".to_string(),
            message,
        };

        let endpoint = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if endpoint.cannot_be_a_base() || !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!("'{endpoint}' is not an http(s) URL")));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            tokens,
        })
    }

    fn trigger_url(&self, project_id: &ProjectId, trigger_id: &TriggerId) -> Url {
        let mut url = self.endpoint.clone();
        // Base URLs were validated in the constructor, so segments are always available.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "v1",
                "projects",
                project_id.as_str(),
                "triggers",
                trigger_id.as_str(),
            ]);
        }
        url
    }
}

#[async_trait]
impl TriggerLookup for CloudBuildClient {
    async fn get_trigger(
        &self,
        project_id: &ProjectId,
        trigger_id: &TriggerId,
    ) -> Result<TriggerMetadata, LookupError> {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| LookupError::Credentials {
                message: e.to_string(),
            })?;

        let url = self.trigger_url(project_id, trigger_id);
        debug!(%url, "Fetching build trigger");

        let response = self
            .http
            .get(url)
            .bearer_auth(token.secret())
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                project_id: project_id.to_string(),
                trigger_id: trigger_id.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Cloud Build returned error");
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let resource: BuildTriggerResource =
            response.json().await.map_err(|e| LookupError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(resource.into())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
