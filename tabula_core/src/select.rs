// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection with computed columns.

extern crate alloc;

use alloc::vec::Vec;

use tracing::trace;

use crate::{Calculated, Result, Row, Schema, Table, Value, ValueType};

impl Table {
    /// Projects columns and appends computed ones.
    ///
    /// - An empty `keep` keeps every column with its declared type. Otherwise the result has
    ///   exactly the `keep` columns, in that order; unknown names fail with
    ///   [`TableError::UnknownColumn`](crate::TableError::UnknownColumn).
    /// - Each entry of `add` becomes a `Float` column computed from the source row.
    ///
    /// Computed columns are written after kept ones, so on a name collision the computed value
    /// (and the `Float` type) wins.
    pub fn select(&self, keep: &[&str], add: &[Calculated<'_>]) -> Result<Self> {
        let mut schema = if keep.is_empty() {
            self.schema().clone()
        } else {
            let mut schema = Schema::new();
            for &name in keep {
                schema.push(name, self.schema().require(name)?)?;
            }
            schema
        };
        for calc in add {
            schema.upsert(calc.name(), ValueType::Float);
        }

        let rows: Vec<Row> = self
            .iter()
            .map(|row| {
                let mut out = if keep.is_empty() {
                    row.clone()
                } else {
                    keep.iter()
                        .map(|&name| (name, row.value_or_null(name).clone()))
                        .collect()
                };
                for calc in add {
                    out.set(calc.name(), Value::Float(calc.calculate(row)));
                }
                out
            })
            .collect();

        trace!(columns = schema.len(), rows = rows.len(), "select");
        Ok(Self::with_rows(schema, rows))
    }
}
