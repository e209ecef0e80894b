mod prompt;

use anyhow::Result;
use tracing::debug;

pub use prompt::prompt_for_token;

/// Environment variable checked first for a GitHub token
pub const ENV_TOKEN_VAR: &str = "PR_HUB_GH_TOKEN";

/// Fallback variable, shared with other GitHub tooling
pub const FALLBACK_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Pick the first non-blank token among the known variables, using `lookup`
/// to read them
pub fn token_from_vars<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [ENV_TOKEN_VAR, FALLBACK_TOKEN_VAR].iter().find_map(|var| {
        let trimmed = lookup(var)?.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            debug!(source = %var, "using token from environment");
            Some(trimmed)
        }
    })
}

pub fn get_token_from_env() -> Option<String> {
    token_from_vars(|var| std::env::var(var).ok())
}

/// Token from the environment, or prompt for one if none is set
pub fn resolve_token() -> Result<String> {
    match get_token_from_env() {
        Some(token) => Ok(token),
        None => prompt_for_token(),
    }
}
