use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A pull request awaiting review, normalized from the provider's wire shape.
///
/// Missing `labels`, `reviews` and `commits` (absent or `null`) deserialize to
/// empty vectors so scoring never deals with optional collections. Fields the
/// scorer does not read are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "isDraft")]
    pub draft: bool,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub additions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deletions: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub changed_files: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<Label>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub commits: Vec<Commit>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PullRequest {
    /// Time elapsed between creation and `now`. Negative if `created_at` is in the future.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }

    /// Total lines touched (additions + deletions)
    pub fn lines_changed(&self) -> u64 {
        self.additions.saturating_add(self.deletions)
    }

    /// "owner/repo" when known, otherwise the PR URL
    pub fn short_ref(&self) -> &str {
        match &self.repository {
            Some(repo) if !repo.name_with_owner.is_empty() => &repo.name_with_owner,
            _ => &self.url,
        }
    }

    pub fn author_login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name_with_owner: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub state: ReviewState,
    /// `None` for reviews that are still pending
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<ReviewAuthor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    pub fn author_login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub login: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Review status as reported by GitHub. Unrecognized values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    Other(String),
}

impl ReviewState {
    pub fn as_str(&self) -> &str {
        match self {
            ReviewState::Approved => "APPROVED",
            ReviewState::ChangesRequested => "CHANGES_REQUESTED",
            ReviewState::Commented => "COMMENTED",
            ReviewState::Dismissed => "DISMISSED",
            ReviewState::Pending => "PENDING",
            ReviewState::Other(s) => s,
        }
    }
}

impl From<String> for ReviewState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "APPROVED" => ReviewState::Approved,
            "CHANGES_REQUESTED" => ReviewState::ChangesRequested,
            "COMMENTED" => ReviewState::Commented,
            "DISMISSED" => ReviewState::Dismissed,
            "PENDING" => ReviewState::Pending,
            _ => ReviewState::Other(s),
        }
    }
}

impl From<ReviewState> for String {
    fn from(state: ReviewState) -> Self {
        match state {
            ReviewState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit on the PR branch. Only the commit date matters for ranking.
///
/// Accepts both `{ "committedDate": ... }` and GitHub's nested
/// `{ "commit": { "committedDate": ... } }`, and serializes back in the shape
/// it was read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CommitRepr", into = "CommitRepr")]
pub struct Commit {
    pub committed_date: DateTime<Utc>,
    pub shape: CommitShape,
}

impl Commit {
    /// A commit in GitHub's nested shape
    pub fn new(committed_date: DateTime<Utc>) -> Self {
        Commit {
            committed_date,
            shape: CommitShape::Nested,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitShape {
    #[default]
    Nested,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitDate {
    committed_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NestedCommit {
    commit: CommitDate,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CommitRepr {
    Nested(NestedCommit),
    Flat(CommitDate),
}

impl From<CommitRepr> for Commit {
    fn from(repr: CommitRepr) -> Self {
        match repr {
            CommitRepr::Nested(n) => Commit {
                committed_date: n.commit.committed_date,
                shape: CommitShape::Nested,
            },
            CommitRepr::Flat(d) => Commit {
                committed_date: d.committed_date,
                shape: CommitShape::Flat,
            },
        }
    }
}

impl From<Commit> for CommitRepr {
    fn from(c: Commit) -> Self {
        let date = CommitDate {
            committed_date: c.committed_date,
        };
        match c.shape {
            CommitShape::Nested => CommitRepr::Nested(NestedCommit { commit: date }),
            CommitShape::Flat => CommitRepr::Flat(date),
        }
    }
}

/// A pull request with its urgency score attached.
///
/// Serializes flat: every `PullRequest` field plus `urgencyScore` and `reason`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPullRequest {
    #[serde(flatten)]
    pub pr: PullRequest,
    pub urgency_score: u32,
    pub reason: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
