use anyhow::Result;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use std::collections::HashSet;
use tracing::debug;

use crate::config::Config;
use crate::github::types::{PullRequest, RankedPullRequest};
use crate::github::{fetch_viewer_login, search_review_requests};
use crate::scoring::{rank, Clock};

/// Identity and search settings for one run. CLI flags override config.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub login: Option<String>,
    pub reviewer: Option<String>,
    pub limit: u32,
}

impl FetchOptions {
    pub fn from_config(config: &Config, login: Option<String>, reviewer: Option<String>) -> Self {
        Self {
            login: login.or_else(|| config.login.clone()),
            reviewer: reviewer.or_else(|| config.reviewer.clone()),
            limit: config.effective_limit(),
        }
    }
}

/// Result of fetching and ranking the caller's review requests
#[derive(Debug, Clone)]
pub struct ReviewQueue {
    pub caller_login: String,
    pub reviewer: String,
    pub now: DateTime<Utc>,
    pub prs: Vec<RankedPullRequest>,
}

/// Drop repeated PRs, keeping the first occurrence
pub fn dedupe_by_id(prs: Vec<PullRequest>) -> Vec<PullRequest> {
    let mut seen = HashSet::new();
    prs.into_iter()
        .filter(|pr| seen.insert(pr.id.clone()))
        .collect()
}

/// Resolve the caller, fetch their review requests and rank them.
///
/// Called from main.rs for both `list` and `open`.
pub async fn fetch_and_rank(
    client: &Octocrab,
    options: &FetchOptions,
    clock: &dyn Clock,
) -> Result<ReviewQueue> {
    let caller_login = match &options.login {
        Some(login) => login.clone(),
        None => fetch_viewer_login(client).await?,
    };
    let reviewer = options
        .reviewer
        .clone()
        .unwrap_or_else(|| caller_login.clone());

    let fetched = search_review_requests(client, &reviewer, options.limit).await?;
    let fetched_count = fetched.len();
    let unique = dedupe_by_id(fetched);
    if unique.len() != fetched_count {
        debug!(
            fetched = fetched_count,
            unique = unique.len(),
            "dropped duplicate search results"
        );
    }

    let now = clock.now();
    let prs = rank(&unique, Some(&caller_login), now);

    Ok(ReviewQueue {
        caller_login,
        reviewer,
        now,
        prs,
    })
}
