use anyhow::{Context, Result};

use crate::github::types::RankedPullRequest;

/// Look up a ranked PR by its 1-based position, as printed by `list`
pub fn select_by_index(prs: &[RankedPullRequest], index: usize) -> Result<&RankedPullRequest> {
    if index == 0 || index > prs.len() {
        anyhow::bail!(
            "Invalid index {}. Must be between 1 and {}.",
            index,
            prs.len()
        );
    }
    Ok(&prs[index - 1])
}

/// Open a PR's URL in the user's default browser
pub fn open_pr(ranked: &RankedPullRequest) -> Result<()> {
    if ranked.pr.url.is_empty() {
        anyhow::bail!("Pull request {} has no URL", ranked.pr.id);
    }
    webbrowser::open(&ranked.pr.url)
        .with_context(|| format!("Failed to open browser for URL: {}", ranked.pr.url))?;
    Ok(())
}
