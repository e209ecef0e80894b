use chrono::{DateTime, Utc};
use std::fmt;

use crate::github::types::{PullRequest, ReviewState};

pub const SCORE_CRITICAL: u32 = 1000;
pub const SCORE_RE_REVIEW: u32 = 900;
pub const SCORE_STALE: u32 = 800;
pub const SCORE_SMALL_NEW: u32 = 700;
pub const SCORE_NORMAL: u32 = 500;
pub const SCORE_LARGE: u32 = 300;
pub const SCORE_DRAFT: u32 = 10;

/// Title substrings (matched against the lowercased title) that mark a PR as critical.
/// Checked in this order; the first hit is reported.
pub const CRITICAL_KEYWORDS: [&str; 5] = ["hotfix", "critical", "urgent", "bugfix", "fix:"];

/// Label names (compared lowercased, whole name) that mark a PR as critical
pub const CRITICAL_LABELS: [&str; 5] = ["critical", "bug", "p0", "security", "hotfix"];

const WIP_MARKER: &str = "[wip]";
const STALE_AFTER_HOURS: f64 = 24.0;
const SMALL_PR_MAX_LINES: u64 = 100;
const LARGE_PR_MIN_LINES: u64 = 500;

/// Which rung of the ladder decided a PR's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    Draft,
    Critical,
    ReReview,
    Stale,
    SmallNew,
    Large,
    Normal,
}

impl Urgency {
    pub fn score(self) -> u32 {
        match self {
            Urgency::Draft => SCORE_DRAFT,
            Urgency::Critical => SCORE_CRITICAL,
            Urgency::ReReview => SCORE_RE_REVIEW,
            Urgency::Stale => SCORE_STALE,
            Urgency::SmallNew => SCORE_SMALL_NEW,
            Urgency::Large => SCORE_LARGE,
            Urgency::Normal => SCORE_NORMAL,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Urgency::Draft => "draft",
            Urgency::Critical => "critical",
            Urgency::ReReview => "re-review",
            Urgency::Stale => "stale",
            Urgency::SmallNew => "small-new",
            Urgency::Large => "large",
            Urgency::Normal => "normal",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values derived once per PR and shared by every rule.
#[derive(Debug)]
pub struct ScoreContext<'a> {
    pub pr: &'a PullRequest,
    pub caller_login: Option<&'a str>,
    pub title_lower: String,
    /// Fractional hours since creation, measured against a single `now`
    pub hours_since_creation: f64,
    pub lines_changed: u64,
}

impl<'a> ScoreContext<'a> {
    pub fn new(pr: &'a PullRequest, caller_login: Option<&'a str>, now: DateTime<Utc>) -> Self {
        let hours_since_creation = pr.age(now).num_milliseconds() as f64 / 3_600_000.0;
        Self {
            pr,
            caller_login,
            title_lower: pr.title.to_lowercase(),
            hours_since_creation,
            lines_changed: pr.lines_changed(),
        }
    }

    fn has_reviews(&self) -> bool {
        !self.pr.reviews.is_empty()
    }
}

/// One rung of the ladder: `check` returns the reason when the rule fires.
pub struct Rule {
    pub urgency: Urgency,
    pub check: fn(&ScoreContext<'_>) -> Option<String>,
}

/// The decision ladder, highest precedence first. The first rule that fires wins;
/// `Urgency::Normal` applies when none do.
pub const LADDER: &[Rule] = &[
    Rule {
        urgency: Urgency::Draft,
        check: draft_or_wip,
    },
    Rule {
        urgency: Urgency::Critical,
        check: critical_marker,
    },
    Rule {
        urgency: Urgency::ReReview,
        check: needs_re_review,
    },
    Rule {
        urgency: Urgency::Stale,
        check: stale_without_reviews,
    },
    Rule {
        urgency: Urgency::SmallNew,
        check: small_and_new,
    },
    Rule {
        urgency: Urgency::Large,
        check: large,
    },
];

pub const NORMAL_REASON: &str = "Normal priority";

pub fn draft_or_wip(ctx: &ScoreContext<'_>) -> Option<String> {
    if ctx.pr.draft || ctx.title_lower.contains(WIP_MARKER) {
        Some("Draft or WIP PR".to_string())
    } else {
        None
    }
}

/// A matching label is reported even when a title keyword also matches.
pub fn critical_marker(ctx: &ScoreContext<'_>) -> Option<String> {
    let matched_label = ctx
        .pr
        .labels
        .iter()
        .find(|l| CRITICAL_LABELS.contains(&l.name.to_lowercase().as_str()));
    if let Some(label) = matched_label {
        return Some(format!("Critical label: {}", label.name));
    }

    CRITICAL_KEYWORDS
        .iter()
        .find(|keyword| ctx.title_lower.contains(*keyword))
        .map(|keyword| format!("Critical keyword in title: {}", keyword))
}

/// Fires when a commit landed after the caller's latest CHANGES_REQUESTED review.
pub fn needs_re_review(ctx: &ScoreContext<'_>) -> Option<String> {
    let login = ctx.caller_login?;

    let last_request = ctx
        .pr
        .reviews
        .iter()
        .filter(|r| r.author_login() == Some(login) && r.state == ReviewState::ChangesRequested)
        .filter_map(|r| r.submitted_at)
        .max()?;

    let has_newer_commits = ctx
        .pr
        .commits
        .iter()
        .any(|c| c.committed_date > last_request);

    has_newer_commits.then(|| "New commits after you requested changes".to_string())
}

pub fn stale_without_reviews(ctx: &ScoreContext<'_>) -> Option<String> {
    if ctx.hours_since_creation > STALE_AFTER_HOURS && !ctx.has_reviews() {
        Some(format!(
            "Stale PR ({} hours old with no reviews)",
            ctx.hours_since_creation.floor() as i64
        ))
    } else {
        None
    }
}

/// The `!has_reviews()` half overlaps with `stale_without_reviews`; only the
/// "24 hours or younger" case can reach this rule.
pub fn small_and_new(ctx: &ScoreContext<'_>) -> Option<String> {
    if ctx.lines_changed <= SMALL_PR_MAX_LINES
        && ctx.hours_since_creation <= STALE_AFTER_HOURS
        && !ctx.has_reviews()
    {
        Some(format!("Small PR ({} lines changed)", ctx.lines_changed))
    } else {
        None
    }
}

pub fn large(ctx: &ScoreContext<'_>) -> Option<String> {
    if ctx.lines_changed > LARGE_PR_MIN_LINES {
        Some(format!("Large PR ({} lines changed)", ctx.lines_changed))
    } else {
        None
    }
}
