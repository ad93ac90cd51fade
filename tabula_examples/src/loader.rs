// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON record loader.
//!
//! Records are decoded the way a generic JSON decoder sees them: every number becomes a
//! `Float`. Inserting into a table then narrows floats into integer columns.

use serde_json::Value as Json;
use tabula_core::{Row, Value};
use thiserror::Error;

/// Errors returned while turning JSON text into rows.
#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of records")]
    NotAnArray,
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("record {index}, field `{field}`: nested values are not supported")]
    Nested { index: usize, field: String },
}

/// Parses a JSON array of flat objects into rows.
pub(crate) fn rows_from_json(text: &str) -> Result<Vec<Row>, LoadError> {
    let Json::Array(records) = serde_json::from_str(text)? else {
        return Err(LoadError::NotAnArray);
    };
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let Json::Object(fields) = record else {
                return Err(LoadError::NotAnObject { index });
            };
            fields
                .into_iter()
                .map(|(field, json)| match scalar(json) {
                    Some(value) => Ok((field, value)),
                    None => Err(LoadError::Nested { index, field }),
                })
                .collect::<Result<Row, _>>()
        })
        .collect()
}

fn scalar(json: Json) -> Option<Value> {
    match json {
        Json::Null => Some(Value::Null),
        Json::Bool(b) => Some(Value::Boolean(b)),
        Json::Number(n) => n.as_f64().map(Value::Float),
        Json::String(s) => Some(Value::String(s)),
        Json::Array(_) | Json::Object(_) => None,
    }
}
