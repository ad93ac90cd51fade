// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory, dynamically-typed tables.
//!
//! This crate provides:
//! - a [`Table`] that owns a [`Schema`] and an ordered list of [`Row`]s, with schema-checked
//!   [`insert`](Table::insert), [`update`](Table::update) and [`delete`](Table::delete), and
//! - a small relational algebra over tables: [`filter`](Table::filter),
//!   [`limit`](Table::limit), [`select`](Table::select), [`group_by`](Table::group_by),
//!   [`order_by`](Table::order_by) and [`join`](Table::join).
//!
//! Query operators never modify their inputs. Each returns a new table holding its own copies
//! of the rows, so operators chain freely:
//!
//! ```
//! use tabula_core::{Aggregate, AggregateOp, Row, Schema, Table, Value, ValueType};
//!
//! let schema = Schema::from_columns([("g", ValueType::String), ("v", ValueType::Integer)])?;
//! let mut t = Table::new(schema);
//! t.insert(Row::new().with("g", "x").with("v", 1))?;
//! t.insert(Row::new().with("g", "x").with("v", 2))?;
//! t.insert(Row::new().with("g", "y").with("v", 5))?;
//!
//! let sums = t
//!     .filter(|row| row.get("v") != Some(&Value::Integer(5)))
//!     .aggregate(&["g"], &[Aggregate::field("sum", AggregateOp::Sum, "v")])?;
//! assert_eq!(sums.get(0)?.get("sum"), Some(&Value::Float(3.0)));
//! # Ok::<(), tabula_core::TableError>(())
//! ```
//!
//! There is no persistence, indexing, transaction or locking layer: everything runs
//! synchronously over owned, in-memory data.

#![no_std]

extern crate alloc;

mod error;
mod func;
mod group;
mod join;
mod key;
mod row;
mod schema;
mod select;
mod sort;
mod table;
#[cfg(test)]
mod table_tests;
mod value;

pub use error::{Result, TableError};
pub use func::{Aggregate, AggregateOp, Calculated, Compare, CompareOp};
pub use join::{JoinKind, JoinSpec, JoinStrategy};
pub use row::Row;
pub use schema::{Column, Schema};
pub use sort::SortOrder;
pub use table::{Table, TableDisplay};
pub use value::{Value, ValueType};
