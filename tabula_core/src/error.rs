// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table error types.

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

use crate::ValueType;

/// Result type for table operations.
pub type Result<T, E = TableError> = core::result::Result<T, E>;

/// Errors returned by table operations.
///
/// Every variant describes malformed input or API misuse. Operations that fail leave their
/// receiver unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A row's field count differs from the schema's column count.
    #[error("row has {found} fields but the schema declares {expected} columns")]
    SchemaViolation {
        /// Number of columns in the schema.
        expected: usize,
        /// Number of fields in the rejected row.
        found: usize,
    },

    /// A value's type disagrees with its column and no implicit conversion applies.
    #[error("column `{column}` expects {expected} but got {found}")]
    TypeMismatch {
        /// The offending column.
        column: String,
        /// The column's declared type.
        expected: ValueType,
        /// The type of the rejected value.
        found: ValueType,
    },

    /// A sort was requested on a column whose type has no defined order.
    #[error("cannot order by column `{column}`: {ty} has no defined sort order")]
    SortTypeUnsupported {
        /// The requested sort column.
        column: String,
        /// The column's declared type.
        ty: ValueType,
    },

    /// A positional access past the current row count.
    #[error("row index {index} is out of range for a table of {len} rows")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of rows at the time of the access.
        len: usize,
    },

    /// A named column does not exist in the schema.
    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    /// A schema declares the same column name twice.
    #[error("column `{0}` is declared more than once")]
    DuplicateColumn(String),
}
