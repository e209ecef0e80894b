use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::github::types::RankedPullRequest;
use crate::scoring::rules::{SCORE_CRITICAL, SCORE_DRAFT, SCORE_STALE};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, counting chars rather than bytes
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn colorize_score(score: u32, padded: &str) -> String {
    if score >= SCORE_CRITICAL {
        padded.red().bold().to_string()
    } else if score >= SCORE_STALE {
        padded.yellow().bold().to_string()
    } else if score <= SCORE_DRAFT {
        padded.dimmed().to_string()
    } else {
        padded.bold().to_string()
    }
}

/// Format ranked PRs as a table: index, score, title, repo, reason.
/// No headers. Index column is 1-based to match `open <index>`.
pub fn format_ranked_table(prs: &[RankedPullRequest], use_colors: bool) -> String {
    if prs.is_empty() {
        return "No pull requests awaiting your review.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 5;
    let separator = "  ";

    prs.iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>width$}", ranked.urgency_score, width = score_width);
            let short_ref = ranked.pr.short_ref();

            let fixed_width = index_width
                + 1
                + score_width
                + separator.len() * 3
                + short_ref.chars().count()
                + ranked.reason.chars().count();

            let title = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&ranked.pr.title, width - fixed_width)
                }
                Some(_) => truncate(&ranked.pr.title, 20),
                None => ranked.pr.title.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    colorize_score(ranked.urgency_score, &score_padded),
                    separator,
                    title,
                    separator,
                    short_ref.cyan(),
                    separator,
                    ranked.reason.italic()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str,
                    score_padded,
                    separator,
                    title,
                    separator,
                    short_ref,
                    separator,
                    ranked.reason
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line description of one ranked PR (verbose mode)
pub fn format_pr_detail(ranked: &RankedPullRequest, now: DateTime<Utc>, use_colors: bool) -> String {
    let pr = &ranked.pr;
    let age = format_age(pr.age(now));
    let author = pr.author_login().unwrap_or("(unknown)");

    if use_colors {
        format!(
            "{}\n  Repo: {}\n  Author: {}\n  Age: {}\n  Size: +{}/-{} ({} lines, {} files)\n  Reviews: {}\n  Score: {} ({})\n  URL: {}",
            pr.title.bold(),
            pr.short_ref().cyan(),
            author.yellow(),
            age,
            pr.additions.green(),
            pr.deletions.red(),
            pr.lines_changed(),
            pr.changed_files,
            pr.reviews.len(),
            ranked.urgency_score.bold(),
            ranked.reason,
            pr.url.underline()
        )
    } else {
        format!(
            "{}\n  Repo: {}\n  Author: {}\n  Age: {}\n  Size: +{}/-{} ({} lines, {} files)\n  Reviews: {}\n  Score: {} ({})\n  URL: {}",
            pr.title,
            pr.short_ref(),
            author,
            age,
            pr.additions,
            pr.deletions,
            pr.lines_changed(),
            pr.changed_files,
            pr.reviews.len(),
            ranked.urgency_score,
            ranked.reason,
            pr.url
        )
    }
}

/// Format ranked PRs as tab-separated values for scripting
/// Columns: score, title, repo, url, reason (no headers, no colors)
pub fn format_tsv(prs: &[RankedPullRequest]) -> String {
    prs.iter()
        .map(|ranked| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                ranked.urgency_score,
                ranked.pr.title,
                ranked.pr.short_ref(),
                ranked.pr.url,
                ranked.reason
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    prs: &'a [RankedPullRequest],
}

/// Pretty JSON in the `{ "prs": [...] }` envelope the web API returned
pub fn format_json(prs: &[RankedPullRequest]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonEnvelope { prs })
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::Author;
    use crate::input::parse_pull_requests;
    use crate::scoring::rank;
    use crate::testutil::{now, sample_pr};

    fn ranked(id: &str, score: u32, reason: &str) -> RankedPullRequest {
        let mut pr = sample_pr(id, 5);
        pr.title = format!("Title {}", id);
        RankedPullRequest {
            pr,
            urgency_score: score,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_format_table_empty() {
        assert_eq!(
            format_ranked_table(&[], false),
            "No pull requests awaiting your review."
        );
    }

    #[test]
    fn test_format_table_rows() {
        let prs = vec![
            ranked("1", 1000, "Critical label: bug"),
            ranked("2", 500, "Normal priority"),
        ];
        let result = format_ranked_table(&prs, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[0].contains(" 1000"));
        assert!(lines[0].contains("Title 1"));
        assert!(lines[0].contains("owner/repo"));
        assert!(lines[0].ends_with("Critical label: bug"));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[1].contains("  500"));
    }

    #[test]
    fn test_format_tsv() {
        let prs = vec![ranked("7", 800, "Stale PR (30 hours old with no reviews)")];
        assert_eq!(
            format_tsv(&prs),
            "800\tTitle 7\towner/repo\thttps://github.com/owner/repo/pull/7\tStale PR (30 hours old with no reviews)"
        );
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_json_envelope() {
        let prs = vec![ranked("1", 700, "Small PR (50 lines changed)")];
        let json = format_json(&prs).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["prs"][0]["urgencyScore"], 700);
        assert_eq!(value["prs"][0]["reason"], "Small PR (50 lines changed)");
        assert_eq!(value["prs"][0]["repository"]["nameWithOwner"], "owner/repo");
    }

    #[test]
    fn test_json_output_reads_back_as_input() {
        let input = vec![sample_pr("1", 30), sample_pr("2", 2)];
        let ranked = rank(&input, None, now());
        let json = format_json(&ranked).unwrap();

        let reparsed = parse_pull_requests(&json).unwrap();
        let originals: Vec<_> = ranked.iter().map(|r| r.pr.clone()).collect();
        assert_eq!(reparsed, originals);
    }

    #[test]
    fn test_ranking_preserves_every_input_field() {
        let raw = serde_json::json!([{
            "id": "PR_1",
            "title": "Tidy docs",
            "url": "https://github.com/owner/repo/pull/7",
            "number": 7,
            "draft": false,
            "createdAt": "2026-10-14T10:00:00Z",
            "updatedAt": "2026-10-14T11:00:00Z",
            "repository": { "nameWithOwner": "owner/repo", "isPrivate": false },
            "author": { "login": "a", "id": 5 },
            "additions": 3,
            "deletions": 1,
            "changedFiles": 1,
            "reviews": [],
            "labels": [ { "name": "docs", "color": "0075ca" } ],
            "commits": [
                { "committedDate": "2026-10-14T10:30:00Z" },
                { "commit": { "committedDate": "2026-10-14T10:45:00Z" } }
            ]
        }]);

        let prs = parse_pull_requests(&raw.to_string()).unwrap();
        let ranked = rank(&prs, None, now());
        let json = format_json(&ranked).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let output = value["prs"][0].as_object().unwrap();
        for (key, expected) in raw[0].as_object().unwrap() {
            assert_eq!(output.get(key), Some(expected), "field {}", key);
        }
        assert_eq!(output["urgencyScore"], 700);
        assert_eq!(output["reason"], "Small PR (4 lines changed)");
    }

    #[test]
    fn test_format_pr_detail() {
        let mut r = ranked("3", 300, "Large PR (550 lines changed)");
        r.pr.additions = 300;
        r.pr.deletions = 250;
        r.pr.author = Some(Author {
            login: "octocat".to_string(),
            avatar_url: None,
            extra: Default::default(),
        });
        let result = format_pr_detail(&r, now(), false);
        assert!(result.contains("Title 3"));
        assert!(result.contains("Author: octocat"));
        assert!(result.contains("Age: 5h"));
        assert!(result.contains("Size: +300/-250 (550 lines, 3 files)"));
        assert!(result.contains("Score: 300 (Large PR (550 lines changed))"));
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("This is a very long title", 15), "This is a ve...");
        assert_eq!(truncate("Short", 20), "Short");
        assert_eq!(truncate("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(30)), "now");
        assert_eq!(format_age(Duration::minutes(30)), "30m");
        assert_eq!(format_age(Duration::hours(3)), "3h");
        assert_eq!(format_age(Duration::days(2)), "2d");
        assert_eq!(format_age(Duration::weeks(2)), "2w");
    }
}
