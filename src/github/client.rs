use anyhow::{Context, Result};
use octocrab::Octocrab;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::warn;

use super::graphql::GraphQlError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Authentication failed. Your GitHub token may be invalid or expired.")]
    Unauthorized,

    #[error("Not found or no access. Check token permissions (needs 'repo' scope for private repos).")]
    NotFound,

    #[error("GitHub API rate limit exceeded. Wait a few minutes and try again.")]
    RateLimited,

    #[error("GitHub API error: {0}")]
    Api(String),

    #[error(transparent)]
    GraphQl(#[from] GraphQlError),
}

impl FetchError {
    /// Only unclassified API failures (network, 5xx) are worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Api(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }
}

/// Create a GitHub client authenticated with a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}

/// Map an HTTP status (and GitHub's message) onto an actionable error.
/// `None` means the failure is not one the user can fix, such as a 5xx.
fn classify_status(status: u16, message: &str) -> Option<FetchError> {
    match status {
        401 => Some(FetchError::Unauthorized),
        403 | 429 if message.to_lowercase().contains("rate limit") => {
            Some(FetchError::RateLimited)
        }
        429 => Some(FetchError::RateLimited),
        403 | 404 => Some(FetchError::NotFound),
        _ => None,
    }
}

/// Map octocrab's error into something a user can act on
fn classify(err: octocrab::Error) -> FetchError {
    let classified = match &err {
        octocrab::Error::GitHub { source, .. } => {
            classify_status(source.status_code.as_u16(), &source.message)
        }
        _ => None,
    };
    classified.unwrap_or_else(|| FetchError::Api(err.to_string()))
}

/// POST a GraphQL payload, retrying transient failures with exponential backoff
pub async fn run_query(client: &Octocrab, payload: &Value) -> Result<Value, FetchError> {
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    RetryIf::start(
        retry_strategy,
        || async move {
            client
                .graphql::<Value>(payload)
                .await
                .map_err(classify)
        },
        |err: &FetchError| {
            let retry = err.is_transient();
            if retry {
                warn!(error = %err, "GitHub request failed, retrying");
            }
            retry
        },
    )
    .await
}
