//! GitHub repository host
//!
//! Talks to the REST API (`/repos/{owner}/{name}` and the contents
//! endpoint with the raw media type). Rate limits, server errors and
//! connection failures are retried; everything else surfaces at once.

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::traits::RepositoryHost;
use crate::core::retry::{retry_async, RetryPolicy};
use crate::model::api::RepoMetadata;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

#[derive(Debug, Clone)]
pub struct GitHubHost {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
    retry: RetryPolicy,
}

/// Fields of the repository resource we use
#[derive(Debug, Deserialize)]
struct RepositoryResource {
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    pushed_at: Option<DateTime<Utc>>,
    language: Option<String>,
    size: Option<u64>,
}

impl From<RepositoryResource> for RepoMetadata {
    fn from(resource: RepositoryResource) -> Self {
        RepoMetadata {
            description: resource.description,
            stars: resource.stargazers_count,
            pushed_at: resource.pushed_at,
            language: resource.language,
            size_kb: resource.size,
        }
    }
}

impl GitHubHost {
    pub fn new(api_base: &str, token: Option<String>, timeout: Duration) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("reporank/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Network {
                url: api_base.to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            retry: RetryPolicy::default(),
        })
    }

    async fn request(&self, url: &str, accept: &str) -> BackendResult<reqwest::Response> {
        let mut request = self.client.get(url).header(reqwest::header::ACCEPT, accept);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| BackendError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            reqwest::StatusCode::NOT_FOUND => Err(BackendError::NotFound {
                what: url.to_string(),
            }),
            status => Err(BackendError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    async fn send(&self, url: &str, accept: &str) -> BackendResult<reqwest::Response> {
        retry_async(
            url,
            &self.retry,
            BackendError::is_transient,
            || self.request(url, accept),
        )
        .await
    }
}

#[async_trait::async_trait]
impl RepositoryHost for GitHubHost {
    async fn get(&self, owner: &str, name: &str) -> BackendResult<RepoMetadata> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, name);
        let response = self.send(&url, JSON_MEDIA_TYPE).await?;
        let resource: RepositoryResource =
            response
                .json()
                .await
                .map_err(|e| BackendError::Serialization {
                    what: url.clone(),
                    message: e.to_string(),
                })?;
        Ok(resource.into())
    }

    async fn get_file_content(
        &self,
        owner: &str,
        name: &str,
        path: &str,
    ) -> BackendResult<Vec<u8>> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            owner,
            name,
            path.trim_start_matches('/')
        );
        let response = self.send(&url, RAW_MEDIA_TYPE).await?;
        let body = response.bytes().await.map_err(|e| BackendError::Network {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(body.to_vec())
    }
}
