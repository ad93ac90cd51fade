// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Equi-joins.
//!
//! By default two tables join on **every column name they share** (the natural-join rule).
//! Tables that happen to share an unrelated column name will therefore also be matched on it;
//! use [`JoinSpec::on`] to name the key columns explicitly.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use tracing::debug;

use crate::key::{RowKey, row_key};
use crate::{Column, Result, Row, Table, Value};

/// Whether unmatched left rows are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    /// Emit only matched pairs.
    #[default]
    Inner,
    /// Also emit each unmatched left row once, with the right-only columns set to null.
    LeftOuter,
}

/// Algorithm used to find matching right rows.
///
/// Both produce identical output, in identical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinStrategy {
    /// Compare every left row with every right row.
    NestedLoop,
    /// Index the right table by its key tuple, then probe once per left row.
    #[default]
    Hash,
}

/// Join configuration for [`Table::join_with`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinSpec {
    keys: Option<Vec<String>>,
    kind: JoinKind,
    strategy: JoinStrategy,
}

impl JoinSpec {
    /// Join on every column name present in both schemas.
    #[must_use]
    pub fn natural() -> Self {
        Self::default()
    }

    /// Join on the named columns only. Each must exist in both schemas.
    ///
    /// Other columns present in both tables are taken from the left row.
    #[must_use]
    pub fn on<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Some(keys.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Switches to [`JoinKind::LeftOuter`].
    #[must_use]
    pub fn left_outer(self) -> Self {
        self.with_kind(JoinKind::LeftOuter)
    }

    /// Sets the join kind.
    #[must_use]
    pub fn with_kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the matching algorithm.
    #[must_use]
    pub fn with_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Explicit key columns, or `None` for the natural-join rule.
    #[must_use]
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    /// The join kind.
    #[must_use]
    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    /// The matching algorithm.
    #[must_use]
    pub fn strategy(&self) -> JoinStrategy {
        self.strategy
    }
}

impl Table {
    /// Joins with `other` on every shared column name.
    ///
    /// The result schema is this schema followed by `other`'s columns that this table lacks.
    /// Left rows appear in order; each is followed by its matches in `other`'s order. With
    /// `left_outer`, a left row without matches appears once with the right-only columns null.
    /// Tables without shared columns produce their cross product.
    #[must_use]
    pub fn join(&self, other: &Self, left_outer: bool) -> Self {
        let kind = if left_outer {
            JoinKind::LeftOuter
        } else {
            JoinKind::Inner
        };
        let keys = self.schema().shared_columns(other.schema());
        self.join_on_keys(other, &keys, kind, JoinStrategy::default())
    }

    /// Joins with `other` as configured by `spec`.
    ///
    /// Fails with [`TableError::UnknownColumn`](crate::TableError::UnknownColumn) if an explicit
    /// key is missing from either schema.
    pub fn join_with(&self, other: &Self, spec: &JoinSpec) -> Result<Self> {
        let keys: Vec<&str> = match spec.keys() {
            None => self.schema().shared_columns(other.schema()),
            Some(keys) => {
                for key in keys {
                    self.schema().require(key)?;
                    other.schema().require(key)?;
                }
                keys.iter().map(String::as_str).collect()
            }
        };
        Ok(self.join_on_keys(other, &keys, spec.kind(), spec.strategy()))
    }

    fn join_on_keys(
        &self,
        other: &Self,
        keys: &[&str],
        kind: JoinKind,
        strategy: JoinStrategy,
    ) -> Self {
        let extra: Vec<&Column> = other
            .schema()
            .iter()
            .filter(|c| !self.schema().contains(&c.name))
            .collect();
        let mut schema = self.schema().clone();
        for column in &extra {
            schema.upsert(&column.name, column.ty);
        }

        let index = match strategy {
            JoinStrategy::Hash => Some(RightIndex::build(other.rows(), keys)),
            JoinStrategy::NestedLoop => None,
        };

        let mut rows = Vec::new();
        let mut unmatched = 0_usize;
        for left in self.iter() {
            let matches: Vec<&Row> = match &index {
                Some(index) => index.probe(left, keys),
                None => other
                    .iter()
                    .filter(|right| keys_equal(left, right, keys))
                    .collect(),
            };
            for right in &matches {
                let mut merged = left.clone();
                for column in &extra {
                    merged.set(column.name.as_str(), right.value_or_null(&column.name).clone());
                }
                rows.push(merged);
            }
            if matches.is_empty() {
                unmatched += 1;
                if kind == JoinKind::LeftOuter {
                    let mut padded = left.clone();
                    for column in &extra {
                        padded.set(column.name.as_str(), Value::Null);
                    }
                    rows.push(padded);
                }
            }
        }

        debug!(
            left = self.len(),
            right = other.len(),
            keys = keys.len(),
            unmatched,
            rows = rows.len(),
            ?strategy,
            "join"
        );
        Self::with_rows(schema, rows)
    }
}

fn keys_equal(left: &Row, right: &Row, keys: &[&str]) -> bool {
    keys.iter()
        .all(|key| left.value_or_null(key) == right.value_or_null(key))
}

/// Right-side rows indexed by key tuple, positions kept in table order.
struct RightIndex<'a> {
    rows: &'a [Row],
    positions: HashMap<RowKey<'a>, Vec<usize>>,
}

impl<'a> RightIndex<'a> {
    fn build(rows: &'a [Row], keys: &[&str]) -> Self {
        let mut positions: HashMap<RowKey<'a>, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            positions.entry(row_key(row, keys)).or_default().push(i);
        }
        Self { rows, positions }
    }

    /// Matching right rows, in table order.
    ///
    /// A NaN key never equals anything, mirroring [`keys_equal`].
    fn probe(&self, left: &'a Row, keys: &[&str]) -> Vec<&'a Row> {
        let key = row_key(left, keys);
        if key.iter().any(|k| k.is_nan()) {
            return Vec::new();
        }
        let rows = self.rows;
        self.positions
            .get(&key)
            .map(|positions| positions.iter().map(|&i| &rows[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::{Schema, TableError, ValueType};

    fn users() -> Table {
        let schema = Schema::from_columns([
            ("userID", ValueType::Integer),
            ("name", ValueType::String),
        ])
        .unwrap();
        Table::with_rows(
            schema,
            vec![
                Row::new().with("userID", 0).with("name", "Hero"),
                Row::new().with("userID", 1).with("name", "Dunn"),
                Row::new().with("userID", 2).with("name", "Sue"),
            ],
        )
    }

    fn interests() -> Table {
        let schema = Schema::from_columns([
            ("userID", ValueType::Integer),
            ("interest", ValueType::String),
        ])
        .unwrap();
        Table::with_rows(
            schema,
            vec![
                Row::new().with("userID", 0).with("interest", "SQL"),
                Row::new().with("userID", 0).with("interest", "NoSQL"),
                Row::new().with("userID", 2).with("interest", "SQL"),
                Row::new().with("userID", 2).with("interest", "MySQL"),
            ],
        )
    }

    fn pairs(t: &Table) -> Vec<(Value, Value)> {
        t.iter()
            .map(|r| {
                (
                    r.value_or_null("name").clone(),
                    r.value_or_null("interest").clone(),
                )
            })
            .collect()
    }

    #[test]
    fn inner_join_emits_one_row_per_match_in_order() {
        let joined = users().join(&interests(), false);
        let cols: Vec<&str> = joined.schema().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, vec!["userID", "name", "interest"]);
        assert_eq!(
            pairs(&joined),
            vec![
                ("Hero".into(), "SQL".into()),
                ("Hero".into(), "NoSQL".into()),
                ("Sue".into(), "SQL".into()),
                ("Sue".into(), "MySQL".into()),
            ]
        );
    }

    #[test]
    fn left_outer_pads_unmatched_rows_with_null() {
        let joined = users().join(&interests(), true);
        assert_eq!(joined.len(), 5);
        assert_eq!(pairs(&joined)[2], ("Dunn".into(), Value::Null));
    }

    #[test]
    fn strategies_agree() {
        let mut left = users();
        left.insert(Row::new().with("userID", 2).with("name", "Sue2"))
            .unwrap();
        for kind in [JoinKind::Inner, JoinKind::LeftOuter] {
            let spec = JoinSpec::natural().with_kind(kind);
            let hash = left
                .join_with(&interests(), &spec.clone().with_strategy(JoinStrategy::Hash))
                .unwrap();
            let nested = left
                .join_with(&interests(), &spec.with_strategy(JoinStrategy::NestedLoop))
                .unwrap();
            assert_eq!(hash, nested, "{kind:?}");
        }
    }

    #[test]
    fn hash_index_probes_rows_from_another_table() {
        let left = users();
        let right = interests();
        let index = RightIndex::build(right.rows(), &["userID"]);
        let hits: Vec<_> = left
            .iter()
            .map(|row| index.probe(row, &["userID"]).len())
            .collect();
        assert_eq!(hits, vec![2, 0, 2]);

        let hashed = users()
            .filter(|r| r.get("userID") == Some(&Value::Integer(2)))
            .join_with(&right, &JoinSpec::natural())
            .unwrap();
        assert_eq!(hashed.len(), 2);
    }

    #[test]
    fn nan_keys_never_match() {
        let schema = Schema::from_columns([("k", ValueType::Float)]).unwrap();
        let left = Table::with_rows(schema.clone(), vec![Row::new().with("k", f64::NAN)]);
        let right = Table::with_rows(schema, vec![Row::new().with("k", f64::NAN)]);
        for strategy in [JoinStrategy::Hash, JoinStrategy::NestedLoop] {
            let spec = JoinSpec::natural().with_strategy(strategy);
            assert!(left.join_with(&right, &spec).unwrap().is_empty(), "{strategy:?}");
        }
    }

    #[test]
    fn no_shared_columns_is_a_cross_product() {
        let schema = Schema::from_columns([("color", ValueType::String)]).unwrap();
        let colors = Table::with_rows(
            schema,
            vec![Row::new().with("color", "red"), Row::new().with("color", "blue")],
        );
        assert_eq!(users().join(&colors, false).len(), 6);
    }

    #[test]
    fn explicit_keys_ignore_other_shared_columns() {
        let schema = Schema::from_columns([
            ("userID", ValueType::Integer),
            ("name", ValueType::String),
            ("team", ValueType::String),
        ])
        .unwrap();
        let teams = Table::with_rows(
            schema,
            vec![Row::new().with("userID", 1).with("name", "D.").with("team", "blue")],
        );
        assert!(users().join(&teams, false).is_empty());

        let joined = users().join_with(&teams, &JoinSpec::on(["userID"])).unwrap();
        assert_eq!(joined.len(), 1);
        let row = joined.get(0).unwrap();
        assert_eq!(row.get("name"), Some(&Value::from("Dunn")));
        assert_eq!(row.get("team"), Some(&Value::from("blue")));
    }

    #[test]
    fn explicit_key_must_exist_on_both_sides() {
        let err = users()
            .join_with(&interests(), &JoinSpec::on(["name"]))
            .unwrap_err();
        assert_eq!(err, TableError::UnknownColumn("name".into()));
    }

    #[test]
    fn join_results_do_not_alias_inputs() {
        let left = users();
        let mut joined = left.join(&interests(), false);
        joined.get_mut(0).unwrap().set("name", "Changed");
        assert_eq!(left.get(0).unwrap().get("name"), Some(&Value::from("Hero")));
    }
}
