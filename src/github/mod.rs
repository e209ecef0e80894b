pub mod client;
pub mod graphql;
pub mod search;
pub mod types;

pub use client::{create_client, FetchError};
pub use graphql::GraphQlError;
pub use search::{fetch_viewer_login, search_review_requests};
pub use types::{PullRequest, RankedPullRequest};
