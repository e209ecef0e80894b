use chrono::{DateTime, Utc};
use tracing::info;

use super::clock::Clock;
use super::engine::calculate_score;
use crate::github::types::{PullRequest, RankedPullRequest};

/// Score every PR once and order by score, highest first.
///
/// The sort is stable: PRs with equal scores keep their input order.
pub fn rank(
    prs: &[PullRequest],
    caller_login: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<RankedPullRequest> {
    let mut ranked: Vec<RankedPullRequest> = prs
        .iter()
        .map(|pr| {
            let result = calculate_score(pr, caller_login, now);
            RankedPullRequest {
                pr: pr.clone(),
                urgency_score: result.score,
                reason: result.reason,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.urgency_score.cmp(&a.urgency_score));

    info!(count = ranked.len(), "ranked pull requests");
    ranked
}

/// Same as [`rank`], sampling `clock` once for the whole batch
pub fn rank_with_clock(
    prs: &[PullRequest],
    caller_login: Option<&str>,
    clock: &dyn Clock,
) -> Vec<RankedPullRequest> {
    rank(prs, caller_login, clock.now())
}
