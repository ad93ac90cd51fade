// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenarios chaining several operators.

extern crate std;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::{
    Aggregate, AggregateOp, Calculated, Compare, CompareOp, JoinSpec, Row, Schema, SortOrder,
    Table, TableError, Value, ValueType,
};

fn users() -> Table {
    let schema = Schema::from_columns([
        ("userID", ValueType::Integer),
        ("name", ValueType::String),
        ("nfriends", ValueType::Integer),
    ])
    .unwrap();
    let mut t = Table::new(schema);
    let data = [
        (0, "Hero", 0),
        (1, "Dunn", 2),
        (2, "Sue", 3),
        (3, "Chi", 3),
        (4, "Thor", 3),
        (5, "Clive", 2),
        (6, "Hicks", 3),
        (7, "Devin", 2),
        (8, "Kate", 2),
        (9, "Klein", 3),
        (10, "Jen", 1),
    ];
    for (id, name, nfriends) in data {
        t.insert(
            Row::new()
                .with("userID", id)
                .with("name", name)
                .with("nfriends", nfriends),
        )
        .unwrap();
    }
    t
}

fn interests() -> Table {
    let schema = Schema::from_columns([
        ("userID", ValueType::Integer),
        ("interest", ValueType::String),
    ])
    .unwrap();
    let mut t = Table::new(schema);
    for (id, interest) in [(0, "SQL"), (0, "NoSQL"), (2, "SQL"), (2, "MySQL")] {
        t.insert(Row::new().with("userID", id).with("interest", interest))
            .unwrap();
    }
    t
}

fn user_is(id: i64) -> Compare {
    Compare::new("userID", CompareOp::Eq, id)
}

fn first_letter() -> Calculated<'static> {
    // Calculations are numeric, so the letter is encoded as its code point.
    Calculated::new("first_letter", |row| {
        row.get("name")
            .and_then(Value::as_str)
            .and_then(|s| s.chars().next())
            .map_or(0.0, |c| f64::from(u32::from(c)))
    })
}

fn column_f64(t: &Table, column: &str) -> Vec<f64> {
    t.iter()
        .map(|r| r.get(column).and_then(Value::as_f64).unwrap_or(f64::NAN))
        .collect()
}

#[test]
fn where_then_delete_on_small_table() {
    let schema =
        Schema::from_columns([("id", ValueType::Integer), ("name", ValueType::String)]).unwrap();
    let mut t = Table::new(schema);
    t.insert(Row::new().with("id", 1).with("name", "a")).unwrap();
    t.insert(Row::new().with("id", 2).with("name", "b")).unwrap();

    let one = Compare::new("id", CompareOp::Eq, 1);
    let filtered = t.filter(|r| one.matches(r));
    assert_eq!(filtered.rows(), &[Row::new().with("id", 1).with("name", "a")]);

    assert_eq!(t.delete(|r| one.matches(r)), 1);
    assert_eq!(t.get(0), Ok(&Row::new().with("id", 2).with("name", "b")));
}

#[test]
fn update_then_where_finds_patched_user() {
    let mut t = users();
    let dunn = user_is(1);
    t.update(Row::new().with("nfriends", 3), |r| dunn.matches(r))
        .unwrap();
    assert_eq!(t.get(1).unwrap().get("nfriends"), Some(&Value::Integer(3)));

    let three = Compare::new("nfriends", CompareOp::Eq, 3);
    let friendly = t.filter(|r| three.matches(r));
    assert_eq!(friendly.len(), 6);
    assert!(friendly.rows().iter().any(|r| dunn.matches(r)));
}

#[test]
fn sum_of_ids_above_one() {
    let above_one = Compare::new("userID", CompareOp::Gt, 1);
    let out = users()
        .filter(|r| above_one.matches(r))
        .aggregate(&[], &[Aggregate::field("userid_sum", AggregateOp::Sum, "userID")])
        .unwrap();
    assert_eq!(column_f64(&out, "userid_sum"), vec![54.0]);
}

#[test]
fn stats_by_name_length() {
    let name_len = Calculated::new("name_len", |row| {
        row.get("name").and_then(Value::as_str).map_or(0.0, |s| s.len() as f64)
    });
    let stats = users()
        .select(&[], &[name_len])
        .unwrap()
        .aggregate(
            &["name_len"],
            &[
                Aggregate::field("min_userid", AggregateOp::Min, "userID"),
                Aggregate::count_rows("nusers"),
            ],
        )
        .unwrap()
        .order_by("name_len")
        .unwrap();
    assert_eq!(column_f64(&stats, "name_len"), vec![3.0, 4.0, 5.0]);
    assert_eq!(column_f64(&stats, "min_userid"), vec![2.0, 0.0, 5.0]);
    assert_eq!(column_f64(&stats, "nusers"), vec![3.0, 4.0, 4.0]);
}

#[test]
fn average_friends_by_first_letter_with_having() {
    let avg = Aggregate::field("avg_nfriends", AggregateOp::Mean, "nfriends");
    let by_letter = users()
        .select(&[], &[first_letter()])
        .unwrap()
        .group_by(&["first_letter"], &[avg], |rows| {
            AggregateOp::Mean.apply(rows, "nfriends") > 1.0
        })
        .unwrap()
        .order_by_with("avg_nfriends", SortOrder::Desc)
        .unwrap()
        .limit(4);

    let letters: String = column_f64(&by_letter, "first_letter")
        .into_iter()
        .filter_map(|c| char::from_u32(c as u32))
        .collect();
    // S (3.0) and T (3.0) keep their first-seen order; H has 1.5, C has 2.5, K 2.5, D 2.0.
    assert_eq!(letters, "STCK");
    assert!(by_letter.iter().all(|r| r.get("avg_nfriends") != Some(&Value::Float(1.0))));
}

#[test]
fn interests_per_user_via_left_join() {
    let counts = users()
        .join(&interests(), true)
        .aggregate(
            &["userID"],
            &[Aggregate::field("ninterests", AggregateOp::Count, "interest")],
        )
        .unwrap()
        .order_by("userID")
        .unwrap();
    assert_eq!(counts.len(), 11);
    let n = column_f64(&counts, "ninterests");
    assert_eq!(&n[..4], &[2.0, 0.0, 2.0, 0.0]);
}

#[test]
fn names_of_sql_users_via_inner_join() {
    let sql = Compare::new("interest", CompareOp::Eq, "SQL");
    let names = users()
        .join(&interests(), false)
        .filter(|r| sql.matches(r))
        .select(&["name"], &[])
        .unwrap();
    assert_eq!(
        names.rows(),
        &[Row::new().with("name", "Hero"), Row::new().with("name", "Sue")]
    );
}

#[test]
fn explicit_join_spec_matches_natural_join_here() {
    let natural = users().join(&interests(), true);
    let explicit = users()
        .join_with(&interests(), &JoinSpec::on(["userID"]).left_outer())
        .unwrap();
    assert_eq!(natural, explicit);
}

#[test]
fn insert_errors_are_recoverable() {
    let mut t = users();
    let short = Row::new().with("userID", 11);
    assert_eq!(
        t.insert(short),
        Err(TableError::SchemaViolation {
            expected: 3,
            found: 1
        })
    );
    let wrong = Row::new()
        .with("userID", 11)
        .with("name", 42)
        .with("nfriends", 0);
    assert!(matches!(
        t.insert(wrong),
        Err(TableError::TypeMismatch {
            expected: ValueType::String,
            found: ValueType::Integer,
            ..
        })
    ));
    let narrowed = Row::new()
        .with("userID", 11.0)
        .with("name", "Ann")
        .with("nfriends", Value::Null);
    t.insert(narrowed).unwrap();
    assert_eq!(t.len(), 12);
    assert_eq!(t.get(11).unwrap().get("userID"), Some(&Value::Integer(11)));
}

#[test]
fn seeded_rows_bypass_validation_but_sort_safely() {
    let schema = Schema::from_columns([("v", ValueType::Integer)]).unwrap();
    let t = Table::with_rows(
        schema,
        vec![
            Row::new().with("v", "oops"),
            Row::new().with("v", 2),
            Row::new(),
            Row::new().with("v", 1),
        ],
    );
    let sorted = t.order_by("v").unwrap();
    let vs: Vec<Value> = sorted.iter().map(|r| r.value_or_null("v").clone()).collect();
    assert_eq!(
        vs,
        vec![Value::Null, Value::Integer(1), Value::Integer(2), Value::from("oops")]
    );
}
