// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned table representation and its mutators.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::slice;

use tracing::{debug, trace};

use crate::{Result, Row, Schema, TableError};

/// A schema plus an ordered sequence of rows.
///
/// A table exclusively owns its rows. Query operators return new tables holding clones of the
/// rows they keep, so a result can be mutated without affecting its source (and vice versa).
///
/// A `Table` has no internal synchronization. Hosts that share one across threads must guard it
/// with their own lock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Creates a table pre-seeded with `rows`.
    ///
    /// Seeded rows are **not** validated; the caller is responsible for their conformance.
    /// Use [`Table::insert`] for checked appends.
    #[must_use]
    pub fn with_rows(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// The table's schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// All rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows in order.
    pub fn iter(&self) -> slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Returns the row at `index`.
    pub fn get(&self, index: usize) -> Result<&Row> {
        let len = self.rows.len();
        self.rows
            .get(index)
            .ok_or(TableError::IndexOutOfRange { index, len })
    }

    /// Returns the row at `index` for in-place editing.
    ///
    /// Edits made through this reference are not validated.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Row> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(TableError::IndexOutOfRange { index, len })
    }

    /// Validates `row` against the schema and appends it.
    ///
    /// On error the table is left unchanged.
    pub fn insert(&mut self, row: Row) -> Result<()> {
        match self.schema.validate(row) {
            Ok(row) => {
                self.rows.push(row);
                trace!(rows = self.rows.len(), "inserted row");
                Ok(())
            }
            Err(err) => {
                debug!(%err, "rejected insert");
                Err(err)
            }
        }
    }

    /// Overwrites the columns present in `patch` on every row matching `predicate`.
    ///
    /// Columns absent from `patch` are left untouched. The patch is checked with the same rules
    /// as [`Table::insert`] (every column must exist, values must conform, floats narrow into
    /// integer columns) before any row is modified. Returns the number of rows updated.
    pub fn update<P>(&mut self, patch: Row, predicate: P) -> Result<usize>
    where
        P: Fn(&Row) -> bool,
    {
        let patch = match self.validate_patch(patch) {
            Ok(patch) => patch,
            Err(err) => {
                debug!(%err, "rejected update");
                return Err(err);
            }
        };
        let mut updated = 0;
        for row in self.rows.iter_mut().filter(|row| predicate(row)) {
            for (column, value) in &patch {
                row.set(column.as_str(), value.clone());
            }
            updated += 1;
        }
        debug!(updated, columns = patch.len(), "update");
        Ok(updated)
    }

    /// [`Table::update`] applied to every row.
    pub fn update_all(&mut self, patch: Row) -> Result<usize> {
        self.update(patch, |_| true)
    }

    fn validate_patch(&self, patch: Row) -> Result<Row> {
        patch
            .into_iter()
            .map(|(column, value)| {
                let value = self.schema.validate_value(&column, value)?;
                Ok::<_, TableError>((column, value))
            })
            .collect()
    }

    /// Removes every row matching `predicate`, keeping the survivors in order.
    ///
    /// Returns the number of rows removed.
    pub fn delete<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&Row) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| !predicate(row));
        let deleted = before - self.rows.len();
        debug!(deleted, remaining = self.rows.len(), "delete");
        deleted
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Returns the rows matching `predicate` (SQL `WHERE`), in order, as a new table.
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Row) -> bool,
    {
        let rows: Vec<Row> = self.rows.iter().filter(|r| predicate(r)).cloned().collect();
        trace!(kept = rows.len(), of = self.rows.len(), "filter");
        Self::with_rows(self.schema.clone(), rows)
    }

    /// Returns the first `min(n, len)` rows as a new table.
    #[must_use]
    pub fn limit(&self, n: usize) -> Self {
        Self::with_rows(self.schema.clone(), self.rows.iter().take(n).cloned().collect())
    }

    /// Returns every row after the first `n` as a new table.
    #[must_use]
    pub fn offset(&self, n: usize) -> Self {
        Self::with_rows(self.schema.clone(), self.rows.iter().skip(n).cloned().collect())
    }

    /// Diagnostic rendering with options.
    ///
    /// The format is meant for humans and may change.
    #[must_use]
    pub fn display(&self) -> TableDisplay<'_> {
        TableDisplay {
            table: self,
            max_rows: None,
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Renders a [`Table`]: its schema, then one line per row in schema column order.
///
/// Created by [`Table::display`].
#[derive(Debug, Clone, Copy)]
pub struct TableDisplay<'a> {
    table: &'a Table,
    max_rows: Option<usize>,
}

impl TableDisplay<'_> {
    /// Stops after `n` rows and prints a `...` marker if rows were omitted.
    #[must_use]
    pub fn max_rows(mut self, n: usize) -> Self {
        self.max_rows = Some(n);
        self
    }
}

impl fmt::Display for TableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Table { schema, rows } = self.table;
        writeln!(f, "Table(")?;
        writeln!(f, "   {schema}")?;
        let shown = self.max_rows.unwrap_or(rows.len()).min(rows.len());
        for row in &rows[..shown] {
            f.write_str("   {")?;
            for (i, column) in schema.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", column.name, row.value_or_null(&column.name))?;
            }
            f.write_str("}\n")?;
        }
        if shown < rows.len() {
            writeln!(f, "   ... ({} more)", rows.len() - shown)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(), f)
    }
}
