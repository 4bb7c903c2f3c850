//! GitHub contents API client for publishing the hero file.
//!
//! Publishing reads the current blob SHA of the file and overwrites it with
//! a new commit on the configured branch.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::GitHubConfig;

/// GitHub REST API version.
const API_VERSION: &str = "2022-11-28";

/// Errors that can occur when interacting with GitHub.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response or build a header.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// GitHub contents API client.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    contents_url: String,
    branch: String,
    path: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Deserialize)]
struct UpdateResponse {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &GitHubConfig) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.token.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| GitHubError::Parse(format!("Invalid token format: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(USER_AGENT, HeaderValue::from_static("watchpost-storefront"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            contents_url: format!(
                "{}/repos/{}/contents/{}",
                config.api_url,
                config.repo,
                config.path.trim_start_matches('/')
            ),
            branch: config.branch.clone(),
            path: config.path.clone(),
        })
    }

    /// Path of the published file inside the repository.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current blob SHA of the file, or `None` if it does not exist yet.
    async fn current_sha(&self) -> Result<Option<String>, GitHubError> {
        let response = self
            .client
            .get(&self.contents_url)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::Parse(e.to_string()))?;
        Ok(Some(contents.sha))
    }

    /// Overwrite the file with `content` in a new commit.
    ///
    /// Returns the commit SHA.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Api` if GitHub rejects the update (for example
    /// on a SHA mismatch after a concurrent commit).
    #[instrument(skip(self, content), fields(path = %self.path, branch = %self.branch))]
    pub async fn publish(&self, content: &str, message: &str) -> Result<String, GitHubError> {
        let sha = self.current_sha().await?;

        let body = UpdateRequest {
            message,
            content: BASE64.encode(content.as_bytes()),
            branch: &self.branch,
            sha,
        };

        let response = self.client.put(&self.contents_url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let update: UpdateResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::Parse(e.to_string()))?;
        debug!(commit = %update.commit.sha, "Published file to GitHub");

        Ok(update.commit.sha)
    }
}

async fn api_error(response: reqwest::Response) -> GitHubError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.message)
        .unwrap_or(text);
    GitHubError::Api { status, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use super::*;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn config(api_url: String) -> GitHubConfig {
        GitHubConfig {
            api_url,
            token: SecretString::from("ghp_test"),
            repo: "watchpost/site".to_string(),
            branch: "main".to_string(),
            path: "crates/storefront/content/hero.json".to_string(),
        }
    }

    #[tokio::test]
    async fn test_publish_sends_sha_and_base64_content() {
        let received: Arc<Mutex<Option<Value>>> = Arc::default();
        let router = Router::new()
            .route(
                "/repos/watchpost/site/contents/crates/storefront/content/hero.json",
                get(|| async { Json(json!({"sha": "abc123"})) }).put(
                    |State(received): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                        *received.lock().unwrap() = Some(body);
                        Json(json!({"commit": {"sha": "def456"}}))
                    },
                ),
            )
            .with_state(Arc::clone(&received));
        let client = GitHubClient::new(&config(spawn(router).await)).unwrap();

        let commit = client.publish("[]", "Update hero slides").await.unwrap();
        assert_eq!(commit, "def456");

        let body = received.lock().unwrap().clone().unwrap();
        assert_eq!(body["sha"], "abc123");
        assert_eq!(body["branch"], "main");
        assert_eq!(body["content"], BASE64.encode("[]"));
    }

    #[tokio::test]
    async fn test_publish_reports_conflict() {
        let router = Router::new().route(
            "/repos/watchpost/site/contents/crates/storefront/content/hero.json",
            get(|| async { Json(json!({"sha": "stale"})) }).put(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"message": "hero.json does not match stale"})),
                )
            }),
        );
        let client = GitHubClient::new(&config(spawn(router).await)).unwrap();

        let err = client.publish("[]", "Update hero slides").await.unwrap_err();
        assert!(matches!(err, GitHubError::Api { status: 409, .. }));
        assert!(err.to_string().contains("does not match"));
    }
}
