use anyhow::{Context, Result};

use super::ENV_TOKEN_VAR;

/// Prompts user to enter a GitHub personal access token
pub fn prompt_for_token() -> Result<String> {
    eprintln!("GitHub personal access token required.");
    eprintln!("Create one at: https://github.com/settings/tokens");
    eprintln!("Required scopes: repo, read:user");
    eprintln!("Set {} to skip this prompt.", ENV_TOKEN_VAR);
    eprintln!();

    let token = rpassword::prompt_password("Enter token: ")
        .context("Failed to read token from terminal")?;

    let token = token.trim();

    if token.is_empty() {
        anyhow::bail!("Token cannot be empty");
    }

    Ok(token.to_string())
}
