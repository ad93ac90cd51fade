// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-supplied row functions.
//!
//! Operators take plain closures:
//! - predicates are `Fn(&Row) -> bool`,
//! - calculations are `Fn(&Row) -> f64` (wrapped in [`Calculated`] to give them a column name),
//! - aggregators are `Fn(&[&Row]) -> f64` (wrapped in [`Aggregate`]).
//!
//! All of them must be pure; each is evaluated once per row (or per group) during a pass.
//! [`Compare`] and [`AggregateOp`] cover the common cases declaratively.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

use crate::{Row, Value};

/// Comparison operators for [`Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CompareOp {
    fn eval(self, ord: Option<Ordering>) -> bool {
        match self {
            Self::Lt => ord == Some(Ordering::Less),
            Self::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            Self::Gt => ord == Some(Ordering::Greater),
            Self::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            Self::Eq => ord == Some(Ordering::Equal),
            Self::Ne => ord != Some(Ordering::Equal),
        }
    }
}

/// A declarative row predicate: `column <op> value`.
///
/// Values are compared with [`Value::compare`]. Incomparable pairs (such as null against a
/// number) only satisfy [`CompareOp::Ne`].
#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    /// Column to read. A missing field reads as null.
    pub column: String,
    /// Comparison operator.
    pub op: CompareOp,
    /// Right-hand constant.
    pub value: Value,
}

impl Compare {
    /// Creates a predicate.
    #[must_use]
    pub fn new(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluates the predicate against a row.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        self.op
            .eval(row.value_or_null(&self.column).compare(&self.value))
    }
}

/// A computed output column for [`Table::select`](crate::Table::select).
pub struct Calculated<'a> {
    name: String,
    calc: Box<dyn Fn(&Row) -> f64 + 'a>,
}

impl<'a> Calculated<'a> {
    /// Names a calculation.
    pub fn new<F>(name: impl Into<String>, calc: F) -> Self
    where
        F: Fn(&Row) -> f64 + 'a,
    {
        Self {
            name: name.into(),
            calc: Box::new(calc),
        }
    }

    /// Output column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the calculation for one row.
    #[must_use]
    pub fn calculate(&self, row: &Row) -> f64 {
        (self.calc)(row)
    }
}

impl fmt::Debug for Calculated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculated")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Built-in aggregation operations for [`Aggregate::field`].
///
/// Operations read one input column and skip nulls and non-numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Number of non-null values (SQL `COUNT(col)`).
    Count,
    /// Sum of numeric values. `0` for a group without any.
    Sum,
    /// Minimum numeric value (skips NaN). NaN for a group without any.
    Min,
    /// Maximum numeric value (skips NaN). NaN for a group without any.
    Max,
    /// Mean of numeric values. NaN for a group without any.
    Mean,
}

impl AggregateOp {
    /// Applies the operation to `input` over a row group.
    #[must_use]
    pub fn apply(self, rows: &[&Row], input: &str) -> f64 {
        let values = rows.iter().map(|row| row.value_or_null(input));
        match self {
            Self::Count => values.filter(|v| !v.is_null()).count() as f64,
            Self::Sum => values.filter_map(Value::as_f64).sum(),
            Self::Min => extremum(values.filter_map(Value::as_f64), |a, b| a < b),
            Self::Max => extremum(values.filter_map(Value::as_f64), |a, b| a > b),
            Self::Mean => {
                let (sum, n) = values
                    .filter_map(Value::as_f64)
                    .fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
                if n == 0 { f64::NAN } else { sum / n as f64 }
            }
        }
    }
}

fn extremum(values: impl Iterator<Item = f64>, better: impl Fn(f64, f64) -> bool) -> f64 {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |best: Option<f64>, v| match best {
            Some(b) if !better(v, b) => Some(b),
            _ => Some(v),
        })
        .unwrap_or(f64::NAN)
}

/// A named aggregate output column for [`Table::group_by`](crate::Table::group_by).
pub struct Aggregate<'a> {
    name: String,
    agg: Box<dyn Fn(&[&Row]) -> f64 + 'a>,
}

impl<'a> Aggregate<'a> {
    /// Names an aggregator closure.
    pub fn new<F>(name: impl Into<String>, agg: F) -> Self
    where
        F: Fn(&[&Row]) -> f64 + 'a,
    {
        Self {
            name: name.into(),
            agg: Box::new(agg),
        }
    }

    /// A built-in aggregation over one input column.
    pub fn field(name: impl Into<String>, op: AggregateOp, input: impl Into<String>) -> Self {
        let input = input.into();
        Self::new(name, move |rows| op.apply(rows, &input))
    }

    /// Number of rows in the group (SQL `COUNT(*)`).
    pub fn count_rows(name: impl Into<String>) -> Self {
        Self::new(name, |rows| rows.len() as f64)
    }

    /// Output column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates the aggregator over a row group.
    #[must_use]
    pub fn aggregate(&self, rows: &[&Row]) -> f64 {
        (self.agg)(rows)
    }
}

impl fmt::Debug for Aggregate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
