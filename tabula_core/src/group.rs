// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouping and aggregation.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use tracing::debug;

use crate::key::{RowKey, row_key};
use crate::{Aggregate, Result, Row, Schema, Table, Value, ValueType};

impl Table {
    /// Partitions rows by the values at `group_cols` and summarizes each partition.
    ///
    /// Each output row holds the group column values followed by one `Float` column per entry of
    /// `aggregates`, computed over the whole row group. Groups for which `having` returns `false`
    /// are dropped. The output schema is the group columns with their declared types plus the
    /// aggregate columns.
    ///
    /// Partitioning uses the structural tuple of values, so distinct tuples never merge. Groups
    /// are emitted in order of first appearance, but callers should not rely on any order unless
    /// they sort afterwards. An empty table produces an empty result, including when
    /// `group_cols` is empty.
    pub fn group_by<H>(
        &self,
        group_cols: &[&str],
        aggregates: &[Aggregate<'_>],
        having: H,
    ) -> Result<Self>
    where
        H: Fn(&[&Row]) -> bool,
    {
        let mut schema = Schema::new();
        for &name in group_cols {
            schema.push(name, self.schema().require(name)?)?;
        }
        for agg in aggregates {
            schema.upsert(agg.name(), ValueType::Float);
        }

        let groups = partition(self.rows(), group_cols);
        let mut rows = Vec::with_capacity(groups.len());
        for group in &groups {
            let Some(first) = group.first() else {
                continue;
            };
            if !having(group.as_slice()) {
                continue;
            }
            let mut out: Row = group_cols
                .iter()
                .map(|&name| (name, first.value_or_null(name).clone()))
                .collect();
            for agg in aggregates {
                out.set(agg.name(), Value::Float(agg.aggregate(group)));
            }
            rows.push(out);
        }

        debug!(groups = groups.len(), kept = rows.len(), "group by");
        Ok(Self::with_rows(schema, rows))
    }

    /// [`Table::group_by`] keeping every group.
    pub fn aggregate(&self, group_cols: &[&str], aggregates: &[Aggregate<'_>]) -> Result<Self> {
        self.group_by(group_cols, aggregates, |_| true)
    }
}

fn partition<'a>(rows: &'a [Row], columns: &[&str]) -> Vec<Vec<&'a Row>> {
    let mut index: HashMap<RowKey<'a>, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'a Row>> = Vec::new();
    for row in rows {
        match index.entry(row_key(row, columns)) {
            Entry::Occupied(e) => groups[*e.get()].push(row),
            Entry::Vacant(e) => {
                e.insert(groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}
