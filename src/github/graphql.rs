//! GraphQL search query for review requests and the wire shapes it returns.
//!
//! GitHub wraps every list in a connection (`{ "nodes": [...] }`) and returns
//! search hits as `edges[].node`. Everything here exists to flatten that into
//! [`PullRequest`] records; nothing downstream sees connection types.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use super::types::{Author, Commit, Label, PullRequest, Repository, Review};

pub const SEARCH_QUERY: &str = r#"
query ReviewRequests($queryString: String!, $first: Int!) {
  search(query: $queryString, type: ISSUE, first: $first) {
    edges {
      node {
        ... on PullRequest {
          id
          title
          url
          isDraft
          createdAt
          updatedAt
          repository { nameWithOwner }
          author { login avatarUrl }
          additions
          deletions
          changedFiles
          reviews(last: 5) {
            nodes { state submittedAt author { login } }
          }
          labels(first: 10) {
            nodes { name }
          }
          commits(last: 20) {
            nodes { commit { committedDate } }
          }
        }
      }
    }
  }
}
"#;

pub const VIEWER_QUERY: &str = "query { viewer { login } }";

/// Search string for open PRs that request a review from `reviewer`
pub fn review_requested_query(reviewer: &str) -> String {
    format!("is:pr is:open review-requested:{} sort:created-desc", reviewer)
}

#[derive(Debug, Error)]
pub enum GraphQlError {
    #[error("GitHub GraphQL errors: {}", .0.join("; "))]
    Errors(Vec<String>),

    #[error("GitHub GraphQL response has no data")]
    MissingData,

    #[error("unexpected GraphQL response shape: {0}")]
    Shape(#[source] serde_json::Error),

    #[error("search result {index} is not a valid pull request: {source}")]
    Node {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: Search,
}

#[derive(Debug, Deserialize)]
struct Search {
    #[serde(default)]
    edges: Vec<Option<Edge>>,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: Viewer,
}

#[derive(Debug, Deserialize)]
struct Viewer {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    nodes: Option<Vec<Option<T>>>,
}

fn flatten<T>(connection: Option<Connection<T>>) -> Vec<T> {
    connection
        .and_then(|c| c.nodes)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    id: String,
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default, alias = "draft")]
    is_draft: bool,
    #[serde(alias = "created_at")]
    created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    repository: Option<Repository>,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    additions: Option<u64>,
    #[serde(default)]
    deletions: Option<u64>,
    #[serde(default)]
    changed_files: Option<u64>,
    #[serde(default)]
    reviews: Option<Connection<Review>>,
    #[serde(default)]
    labels: Option<Connection<Label>>,
    #[serde(default)]
    commits: Option<Connection<Commit>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        PullRequest {
            id: node.id,
            title: node.title,
            url: node.url,
            draft: node.is_draft,
            created_at: node.created_at,
            updated_at: node.updated_at,
            repository: node.repository,
            author: node.author,
            additions: node.additions.unwrap_or(0),
            deletions: node.deletions.unwrap_or(0),
            changed_files: node.changed_files.unwrap_or(0),
            reviews: flatten(node.reviews),
            labels: flatten(node.labels),
            commits: flatten(node.commits),
            extra: node.extra,
        }
    }
}

fn into_data<T>(response: Response<T>) -> Result<T, GraphQlError> {
    if !response.errors.is_empty() {
        return Err(GraphQlError::Errors(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    response.data.ok_or(GraphQlError::MissingData)
}

/// Normalize a raw `search` response into pull requests, in search order.
///
/// Non-PR hits come back as empty objects and are skipped.
pub fn parse_search_response(value: Value) -> Result<Vec<PullRequest>, GraphQlError> {
    let response: Response<SearchData> =
        serde_json::from_value(value).map_err(GraphQlError::Shape)?;
    let search = into_data(response)?.search;

    let mut prs = Vec::with_capacity(search.edges.len());
    for (index, node) in search
        .edges
        .into_iter()
        .map(|edge| edge.and_then(|e| e.node))
        .enumerate()
    {
        let node = match node {
            Some(Value::Object(map)) if !map.is_empty() => Value::Object(map),
            _ => {
                warn!(index, "skipping search result that is not a pull request");
                continue;
            }
        };
        let node: PullRequestNode = serde_json::from_value(node)
            .map_err(|source| GraphQlError::Node { index, source })?;
        prs.push(node.into());
    }
    Ok(prs)
}

pub fn parse_viewer_response(value: Value) -> Result<String, GraphQlError> {
    let response: Response<ViewerData> =
        serde_json::from_value(value).map_err(GraphQlError::Shape)?;
    Ok(into_data(response)?.viewer.login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::ReviewState;
    use serde_json::json;

    fn search_response(nodes: Vec<Value>) -> Value {
        json!({
            "data": {
                "search": {
                    "edges": nodes.into_iter().map(|n| json!({ "node": n })).collect::<Vec<_>>()
                }
            }
        })
    }

    fn full_node() -> Value {
        json!({
            "id": "PR_kwDOA",
            "title": "Add retry to uploader",
            "url": "https://github.com/acme/api/pull/42",
            "isDraft": false,
            "createdAt": "2026-10-13T08:00:00Z",
            "updatedAt": "2026-10-14T08:00:00Z",
            "repository": { "nameWithOwner": "acme/api" },
            "author": { "login": "carol", "avatarUrl": "https://avatars.example/carol" },
            "additions": 12,
            "deletions": 3,
            "changedFiles": 2,
            "reviews": { "nodes": [
                { "state": "CHANGES_REQUESTED", "submittedAt": "2026-10-13T10:00:00Z", "author": { "login": "alice" } },
                { "state": "COMMENTED", "submittedAt": null, "author": null }
            ]},
            "labels": { "nodes": [ { "name": "backend" } ] },
            "commits": { "nodes": [ { "commit": { "committedDate": "2026-10-13T12:00:00Z" } } ] }
        })
    }

    #[test]
    fn test_review_requested_query() {
        assert_eq!(
            review_requested_query("alice"),
            "is:pr is:open review-requested:alice sort:created-desc"
        );
    }

    #[test]
    fn test_parse_full_node() {
        let prs = parse_search_response(search_response(vec![full_node()])).unwrap();
        assert_eq!(prs.len(), 1);

        let pr = &prs[0];
        assert_eq!(pr.id, "PR_kwDOA");
        assert_eq!(pr.short_ref(), "acme/api");
        assert_eq!(pr.author_login(), Some("carol"));
        assert_eq!(pr.lines_changed(), 15);
        assert_eq!(pr.changed_files, 2);
        assert_eq!(pr.reviews.len(), 2);
        assert_eq!(pr.reviews[0].state, ReviewState::ChangesRequested);
        assert_eq!(pr.reviews[0].author_login(), Some("alice"));
        assert!(pr.reviews[1].submitted_at.is_none());
        assert_eq!(pr.labels[0].name, "backend");
        assert_eq!(pr.commits.len(), 1);
    }

    #[test]
    fn test_missing_connections_become_empty() {
        let node = json!({
            "id": "PR_1",
            "title": "Bump deps",
            "createdAt": "2026-10-13T08:00:00Z",
            "reviews": null,
            "labels": { "nodes": null },
            "commits": {}
        });
        let prs = parse_search_response(search_response(vec![node])).unwrap();
        assert!(prs[0].reviews.is_empty());
        assert!(prs[0].labels.is_empty());
        assert!(prs[0].commits.is_empty());
        assert_eq!(prs[0].additions, 0);
    }

    #[test]
    fn test_unqueried_node_fields_are_kept() {
        let mut node = full_node();
        node["number"] = json!(42);
        let prs = parse_search_response(search_response(vec![node])).unwrap();
        assert_eq!(prs[0].extra.get("number"), Some(&json!(42)));
        assert!(!prs[0].extra.contains_key("isDraft"));
    }

    #[test]
    fn test_original_aliases_accepted() {
        let node = json!({
            "id": "PR_1",
            "title": "Bump deps",
            "draft": true,
            "created_at": "2026-10-13T08:00:00Z",
            "updated_at": "2026-10-13T09:00:00Z"
        });
        let prs = parse_search_response(search_response(vec![node])).unwrap();
        assert!(prs[0].draft);
        assert!(prs[0].updated_at.is_some());
    }

    #[test]
    fn test_non_pr_nodes_skipped() {
        let prs =
            parse_search_response(search_response(vec![json!({}), full_node(), Value::Null]))
                .unwrap();
        assert_eq!(prs.len(), 1);
    }

    #[test]
    fn test_node_without_title_reports_index() {
        let node = json!({ "id": "PR_1", "createdAt": "2026-10-13T08:00:00Z" });
        let err = parse_search_response(search_response(vec![full_node(), node])).unwrap_err();
        match err {
            GraphQlError::Node { index, source } => {
                assert_eq!(index, 1);
                assert!(source.to_string().contains("title"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_graphql_errors_surface() {
        let value = json!({
            "data": null,
            "errors": [ { "message": "Something went wrong" } ]
        });
        let err = parse_search_response(value).unwrap_err();
        assert!(err.to_string().contains("Something went wrong"));
    }

    #[test]
    fn test_missing_data() {
        let err = parse_search_response(json!({ "data": null })).unwrap_err();
        assert!(matches!(err, GraphQlError::MissingData));
    }

    #[test]
    fn test_parse_viewer() {
        let login = parse_viewer_response(json!({ "data": { "viewer": { "login": "alice" } } }))
            .unwrap();
        assert_eq!(login, "alice");
    }
}
