// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hashable tuple keys over row values, used by grouping and hash joins.

use core::hash::{Hash, Hasher};
use core::mem;

use smallvec::SmallVec;

use crate::{Row, Value};

/// A borrowed value with `Eq`/`Hash` defined for grouping.
///
/// Floats compare by bit pattern after folding `-0.0` into `0.0` and every NaN into one
/// canonical NaN. Values of different variants are never equal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyValue<'a>(&'a Value);

impl KeyValue<'_> {
    pub(crate) fn is_nan(&self) -> bool {
        matches!(self.0, Value::Float(v) if v.is_nan())
    }
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for KeyValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.0, other.0) {
            (Value::Float(a), Value::Float(b)) => float_bits(*a) == float_bits(*b),
            (a, b) => a == b,
        }
    }
}

impl Eq for KeyValue<'_> {}

impl Hash for KeyValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self.0).hash(state);
        match self.0 {
            Value::Integer(v) => v.hash(state),
            Value::Float(v) => float_bits(*v).hash(state),
            Value::String(v) => v.hash(state),
            Value::Boolean(v) => v.hash(state),
            Value::Null => {}
        }
    }
}

/// The tuple of values a row holds at a list of columns.
///
/// Missing fields read as null.
pub(crate) type RowKey<'a> = SmallVec<[KeyValue<'a>; 4]>;

pub(crate) fn row_key<'a>(row: &'a Row, columns: &[&str]) -> RowKey<'a> {
    columns
        .iter()
        .map(|column| KeyValue(row.value_or_null(column)))
        .collect()
}
