pub mod formatter;

use serde::{Deserialize, Serialize};

pub use formatter::{
    format_age, format_json, format_pr_detail, format_ranked_table, format_tsv,
    should_use_colors,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, colored table for terminals
    #[default]
    Table,
    /// Tab-separated values for scripting
    Tsv,
    /// Pretty JSON, `{ "prs": [...] }`
    Json,
}
