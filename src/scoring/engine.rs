use chrono::{DateTime, Utc};
use tracing::debug;

use super::rules::{ScoreContext, Urgency, LADDER, NORMAL_REASON};
use crate::github::types::PullRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32,
    pub reason: String,
    pub urgency: Urgency,
}

/// Score one PR against the ladder. `now` is sampled once by the caller so
/// every age-dependent rule sees the same instant.
pub fn calculate_score(
    pr: &PullRequest,
    caller_login: Option<&str>,
    now: DateTime<Utc>,
) -> ScoreResult {
    let ctx = ScoreContext::new(pr, caller_login, now);

    let (urgency, reason) = LADDER
        .iter()
        .find_map(|rule| (rule.check)(&ctx).map(|reason| (rule.urgency, reason)))
        .unwrap_or_else(|| (Urgency::Normal, NORMAL_REASON.to_string()));

    debug!(pr = %pr.id, rule = %urgency, score = urgency.score(), "scored pull request");

    ScoreResult {
        score: urgency.score(),
        reason,
        urgency,
    }
}
