//! Fixtures shared by unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Map;

use crate::github::types::{
    Commit, Label, PullRequest, Repository, Review, ReviewAuthor, ReviewState,
};

/// Fixed "now" used across tests
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

/// A non-draft, unlabeled, unreviewed 150-line PR created `age_hours` before `now()`
pub fn sample_pr(id: &str, age_hours: i64) -> PullRequest {
    PullRequest {
        id: id.to_string(),
        title: "Refactor session handling".to_string(),
        url: format!("https://github.com/owner/repo/pull/{}", id),
        draft: false,
        created_at: now() - Duration::hours(age_hours),
        updated_at: Some(now()),
        repository: Some(Repository {
            name_with_owner: "owner/repo".to_string(),
            extra: Map::new(),
        }),
        author: None,
        additions: 100,
        deletions: 50,
        changed_files: 3,
        reviews: vec![],
        labels: vec![],
        commits: vec![],
        extra: Map::new(),
    }
}

pub fn label(name: &str) -> Label {
    Label {
        name: name.to_string(),
        extra: Map::new(),
    }
}

pub fn review(state: ReviewState, login: &str, submitted_at: DateTime<Utc>) -> Review {
    Review {
        state,
        submitted_at: Some(submitted_at),
        author: Some(ReviewAuthor {
            login: login.to_string(),
            extra: Map::new(),
        }),
        extra: Map::new(),
    }
}

pub fn commit(committed_date: DateTime<Utc>) -> Commit {
    Commit::new(committed_date)
}
