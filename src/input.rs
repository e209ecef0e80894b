//! Loading pull request records from JSON before they reach the ranker.
//!
//! Accepted documents:
//! - an array of pull request objects
//! - an object with a `prs` array (the shape `list --format json` writes)
//! - a raw GitHub GraphQL search response (`{ "data": { "search": ... } }`)
//!
//! Malformed records are rejected here with the index of the offending record,
//! so scoring only ever sees well-formed input.

use serde_json::Value;
use std::io::Read;
use thiserror::Error;

use crate::github::graphql::{parse_search_response, GraphQlError};
use crate::github::types::PullRequest;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected an array of pull requests, found {found}")]
    NotASequence { found: &'static str },

    #[error("pull request {index} is not an object")]
    NotAnObject { index: usize },

    #[error("pull request {index} has no title")]
    MissingTitle { index: usize },

    #[error("pull request {index}: `title` must be a string, found {found}")]
    InvalidTitle { index: usize, found: &'static str },

    #[error("pull request {index}: `{field}` must be an array, found {found}")]
    NotAnArray {
        index: usize,
        field: &'static str,
        found: &'static str,
    },

    #[error("pull request {index} is malformed: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    GraphQl(#[from] GraphQlError),
}

const SEQUENCE_FIELDS: [&str; 3] = ["labels", "reviews", "commits"];
const RANKING_FIELDS: [&str; 2] = ["urgencyScore", "reason"];

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn read_pull_requests<R: Read>(mut reader: R) -> Result<Vec<PullRequest>, InputError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_pull_requests(&text)
}

pub fn parse_pull_requests(text: &str) -> Result<Vec<PullRequest>, InputError> {
    let value: Value = serde_json::from_str(text).map_err(InputError::Json)?;
    pull_requests_from_value(value)
}

pub fn pull_requests_from_value(value: Value) -> Result<Vec<PullRequest>, InputError> {
    match value {
        Value::Array(records) => records_from_array(records),
        Value::Object(mut map) => {
            if map.contains_key("data") || map.contains_key("errors") {
                return Ok(parse_search_response(Value::Object(map))?);
            }
            match map.remove("prs") {
                Some(Value::Array(records)) => records_from_array(records),
                Some(other) => Err(InputError::NotASequence { found: kind(&other) }),
                None => Err(InputError::NotASequence { found: "an object" }),
            }
        }
        other => Err(InputError::NotASequence { found: kind(&other) }),
    }
}

fn records_from_array(records: Vec<Value>) -> Result<Vec<PullRequest>, InputError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| validate_record(index, record))
        .collect()
}

fn validate_record(index: usize, mut record: Value) -> Result<PullRequest, InputError> {
    let map = match &record {
        Value::Object(map) => map,
        _ => return Err(InputError::NotAnObject { index }),
    };

    match map.get("title") {
        None | Some(Value::Null) => return Err(InputError::MissingTitle { index }),
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(InputError::InvalidTitle {
                index,
                found: kind(other),
            })
        }
    }

    for field in SEQUENCE_FIELDS {
        match map.get(field) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(InputError::NotAnArray {
                    index,
                    field,
                    found: kind(other),
                })
            }
        }
    }

    // Ranking output fed back in: these are recomputed, not carried
    if let Value::Object(map) = &mut record {
        for field in RANKING_FIELDS {
            map.remove(field);
        }
    }

    serde_json::from_value(record).map_err(|source| InputError::Record { index, source })
}
