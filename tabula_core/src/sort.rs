// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable single-column sorting.

use tracing::{debug, trace};

use crate::{Result, Table, TableError};

/// Sorting order for [`Table::order_by_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl Table {
    /// Returns the rows sorted ascending by `column`, as a new table.
    ///
    /// See [`Table::order_by_with`].
    pub fn order_by(&self, column: &str) -> Result<Self> {
        self.order_by_with(column, SortOrder::Asc)
    }

    /// Returns the rows sorted by `column` in the given order, as a new table.
    ///
    /// The sort is stable: rows with equal keys keep their relative order. Integer, float and
    /// string columns use their natural order; nulls come first in ascending order and floats
    /// place NaN after every number. Boolean columns have no defined order and fail with
    /// [`TableError::SortTypeUnsupported`].
    pub fn order_by_with(&self, column: &str, order: SortOrder) -> Result<Self> {
        let ty = self.schema().require(column)?;
        if !ty.is_ordered() {
            debug!(column, %ty, "rejected sort");
            return Err(TableError::SortTypeUnsupported {
                column: column.into(),
                ty,
            });
        }
        let mut rows = self.rows().to_vec();
        rows.sort_by(|a, b| {
            let ord = a.value_or_null(column).sort_cmp(b.value_or_null(column));
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        trace!(column, ?order, rows = rows.len(), "order by");
        Ok(Self::with_rows(self.schema().clone(), rows))
    }
}
