// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar values stored in table cells.

extern crate alloc;

use alloc::string::String;
use core::cmp::Ordering;
use core::fmt;

/// A single cell value.
///
/// The set of representable types is closed: every column holds integers, floats, strings or
/// booleans, and any cell may be [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A 64-bit float.
    Float(f64),
    /// An owned UTF-8 string.
    String(String),
    /// A boolean.
    Boolean(bool),
    /// The absence of a value. Accepted in every column.
    Null,
}

/// Declared type of a column.
///
/// There is no `Null` tag: null is a value, not a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// [`Value::Integer`].
    Integer,
    /// [`Value::Float`].
    Float,
    /// [`Value::String`].
    String,
    /// [`Value::Boolean`].
    Boolean,
}

impl ValueType {
    /// Returns `true` if values of this type have a natural total order usable by
    /// [`Table::order_by`](crate::Table::order_by).
    #[must_use]
    pub fn is_ordered(self) -> bool {
        !matches!(self, Self::Boolean)
    }

    /// Lowercase name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Returns the runtime type of this value, or `None` for [`Value::Null`].
    #[must_use]
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Integer(_) => Some(ValueType::Integer),
            Self::Float(_) => Some(ValueType::Float),
            Self::String(_) => Some(ValueType::String),
            Self::Boolean(_) => Some(ValueType::Boolean),
            Self::Null => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns a numeric payload as `f64`. Integers are widened.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the boolean payload.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Compares two values for predicates.
    ///
    /// Integers and floats compare numerically with each other. Two nulls are equal. Any other
    /// pairing of different types (including null against non-null) is incomparable.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Converts this value so it conforms to a column of type `ty`.
    ///
    /// Null conforms to every type. The only implicit conversion is Float into Integer, which
    /// truncates toward zero (saturating, NaN becomes `0`). On failure the value's own type is
    /// returned.
    pub(crate) fn coerce_to(self, ty: ValueType) -> Result<Self, ValueType> {
        match (self, ty) {
            (Self::Float(v), ValueType::Integer) => Ok(Self::Integer(truncate(v))),
            (value, ty) => match value.value_type() {
                Some(found) if found != ty => Err(found),
                _ => Ok(value),
            },
        }
    }

    /// Total order used by sorting.
    ///
    /// Values of the same type use their natural order; floats place NaN after every number.
    /// An integer and a float compare numerically, with the integer first on a tie. Other mixed
    /// types (only reachable through unvalidated seeded rows) fall back to a fixed rank with null
    /// first.
    pub(crate) fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a
                .partial_cmp(b)
                .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan())),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Integer(_), Self::Float(_)) | (Self::Float(_), Self::Integer(_)) => {
                let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) else {
                    return self.rank().cmp(&other.rank());
                };
                match a.partial_cmp(&b) {
                    Some(Ordering::Equal) => self.rank().cmp(&other.rank()),
                    Some(ord) => ord,
                    None => a.is_nan().cmp(&b.is_nan()),
                }
            }
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) => 2,
            Self::Float(_) => 3,
            Self::String(_) => 4,
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "narrowing a float into an integer column truncates by definition"
)]
fn truncate(v: f64) -> i64 {
    v as i64
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
