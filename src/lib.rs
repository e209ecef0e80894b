//! Rank the pull requests waiting on your review by urgency.
//!
//! The scoring core ([`scoring`]) is pure and synchronous; [`github`] and
//! [`fetch`] supply its input, [`output`] renders its result.

pub mod browser;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod github;
pub mod input;
pub mod output;
pub mod scoring;

#[cfg(test)]
mod testutil;
