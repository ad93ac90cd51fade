// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column declarations and row validation.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::slice;

use crate::{Result, Row, TableError, Value, ValueType};

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name, unique within its schema.
    pub name: String,
    /// Declared type.
    pub ty: ValueType,
}

/// The columns of a table.
///
/// Column order only affects rendering and the column order of derived schemas; lookups are by
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schema from `(name, type)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ValueType)>,
        S: Into<String>,
    {
        let mut schema = Self::new();
        for (name, ty) in columns {
            schema.push(name, ty)?;
        }
        Ok(schema)
    }

    /// Appends a column.
    ///
    /// Fails with [`TableError::DuplicateColumn`] if the name is already declared.
    pub fn push(&mut self, name: impl Into<String>, ty: ValueType) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, ty });
        Ok(())
    }

    /// Declares `name` with type `ty`, replacing the type in place if the column already exists.
    pub(crate) fn upsert(&mut self, name: &str, ty: ValueType) {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.ty = ty,
            None => self.columns.push(Column {
                name: name.into(),
                ty,
            }),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Iterates over the columns in declaration order.
    pub fn iter(&self) -> slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Declared type of a column.
    #[must_use]
    pub fn column_type(&self, name: &str) -> Option<ValueType> {
        self.column(name).map(|c| c.ty)
    }

    /// Returns `true` if a column named `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Declared type of a column, or [`TableError::UnknownColumn`].
    pub fn require(&self, name: &str) -> Result<ValueType> {
        self.column_type(name)
            .ok_or_else(|| TableError::UnknownColumn(name.into()))
    }

    /// Column names declared by both schemas, in this schema's order.
    ///
    /// This is the implicit join rule of [`Table::join`](crate::Table::join).
    #[must_use]
    pub fn shared_columns<'a>(&'a self, other: &Self) -> Vec<&'a str> {
        self.columns
            .iter()
            .filter(|c| other.contains(&c.name))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Checks a row against this schema and returns it in conforming form.
    ///
    /// The row must have exactly one field per column. Every non-null value must match its
    /// column's type, except that floats are truncated into integer columns.
    pub fn validate(&self, row: Row) -> Result<Row> {
        if row.len() != self.len() {
            return Err(TableError::SchemaViolation {
                expected: self.len(),
                found: row.len(),
            });
        }
        row.into_iter()
            .map(|(column, value)| {
                let value = self.validate_value(&column, value)?;
                Ok::<_, TableError>((column, value))
            })
            .collect()
    }

    /// Checks a single value destined for `column`.
    pub(crate) fn validate_value(&self, column: &str, value: Value) -> Result<Value> {
        let expected = self.require(column)?;
        value
            .coerce_to(expected)
            .map_err(|found| TableError::TypeMismatch {
                column: column.into(),
                expected,
                found,
            })
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", column.name, column.ty)?;
        }
        f.write_str("}")
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    fn users() -> Schema {
        Schema::from_columns([
            ("id", ValueType::Integer),
            ("name", ValueType::String),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = Schema::from_columns([("a", ValueType::Integer), ("a", ValueType::Float)])
            .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }

    #[test]
    fn arity_mismatch_is_a_schema_violation() {
        let err = users().validate(Row::new().with("id", 1)).unwrap_err();
        assert_eq!(
            err,
            TableError::SchemaViolation {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn unknown_field_with_matching_arity_is_rejected() {
        let row = Row::new().with("id", 1).with("nick", "a");
        assert_eq!(
            users().validate(row).unwrap_err(),
            TableError::UnknownColumn("nick".into())
        );
    }

    #[test]
    fn wrong_type_is_a_type_mismatch() {
        let row = Row::new().with("id", "1").with("name", "a");
        assert_eq!(
            users().validate(row).unwrap_err(),
            TableError::TypeMismatch {
                column: "id".into(),
                expected: ValueType::Integer,
                found: ValueType::String,
            }
        );
    }

    #[test]
    fn validation_narrows_floats_and_accepts_nulls() {
        let row = Row::new().with("id", 7.8).with("name", Value::Null);
        let row = users().validate(row).unwrap();
        assert_eq!(row.get("id"), Some(&Value::Integer(7)));
        assert_eq!(row.get("name"), Some(&Value::Null));
    }

    #[test]
    fn shared_columns_follow_left_order() {
        let other = Schema::from_columns([
            ("name", ValueType::String),
            ("id", ValueType::Integer),
            ("interest", ValueType::String),
        ])
        .unwrap();
        assert_eq!(users().shared_columns(&other), vec!["id", "name"]);
    }

    #[test]
    fn display_lists_columns_in_order() {
        assert_eq!(users().to_string(), "{id: integer, name: string}");
    }
}
