use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

pub const DEFAULT_LIMIT: u32 = 20;

/// Contents of `~/.config/pr-hub/config.yaml`. Every field is optional.
///
/// Example YAML:
/// ```yaml
/// login: alice          # who "you" are when matching your own reviews
/// reviewer: alice       # whose review requests to search (defaults to login)
/// limit: 20
/// format: table
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Caller login override. When unset, the token owner's login is used.
    #[serde(default)]
    pub login: Option<String>,

    /// Search review requests for this user instead of the caller
    #[serde(default)]
    pub reviewer: Option<String>,

    /// Maximum number of PRs fetched per run (1-100)
    #[serde(default)]
    pub limit: Option<u32>,

    /// Default output format when `--format` is not given
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}
