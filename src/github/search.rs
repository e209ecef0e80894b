use octocrab::Octocrab;
use serde_json::json;
use tracing::{debug, info};

use super::client::{run_query, FetchError};
use super::graphql::{
    parse_search_response, parse_viewer_response, review_requested_query, SEARCH_QUERY,
    VIEWER_QUERY,
};
use super::types::PullRequest;

/// Login of the account that owns the token
pub async fn fetch_viewer_login(client: &Octocrab) -> Result<String, FetchError> {
    let response = run_query(client, &json!({ "query": VIEWER_QUERY })).await?;
    let login = parse_viewer_response(response)?;
    debug!(login = %login, "resolved viewer");
    Ok(login)
}

/// Open PRs requesting a review from `reviewer`, newest first, at most `limit`
pub async fn search_review_requests(
    client: &Octocrab,
    reviewer: &str,
    limit: u32,
) -> Result<Vec<PullRequest>, FetchError> {
    let query_string = review_requested_query(reviewer);
    debug!(query = %query_string, limit, "searching review requests");

    let payload = json!({
        "query": SEARCH_QUERY,
        "variables": {
            "queryString": query_string,
            "first": limit,
        }
    });
    let response = run_query(client, &payload).await?;
    let prs = parse_search_response(response)?;

    info!(count = prs.len(), reviewer = %reviewer, "fetched review requests");
    Ok(prs)
}
