// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walkthrough binary for `tabula_core`.
//!
//! Loads a users table from JSON, then runs every mutator and query operator over it, printing
//! each intermediate table. Set `RUST_LOG=debug` to see the engine's events on stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use std::thread;

use clap::{Parser, ValueEnum, ValueHint};
use tabula_core::{
    Aggregate, AggregateOp, Calculated, Compare, CompareOp, JoinSpec, JoinStrategy, Row, Schema,
    SortOrder, Table, TableError, Value, ValueType,
};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod loader;

use loader::{LoadError, rows_from_json};

const SAMPLE_USERS: &str = r#"[
  {"userID": 0, "name": "Hero", "nfriends": 0},
  {"userID": 1, "name": "Dunn", "nfriends": 2},
  {"userID": 2, "name": "Sue", "nfriends": 3},
  {"userID": 3, "name": "Chi", "nfriends": 3},
  {"userID": 4, "name": "Thor", "nfriends": 3},
  {"userID": 5, "name": "Clive", "nfriends": 2},
  {"userID": 6, "name": "Hicks", "nfriends": 3},
  {"userID": 7, "name": "Devin", "nfriends": 2},
  {"userID": 8, "name": "Kate", "nfriends": 2},
  {"userID": 9, "name": "Klein", "nfriends": 3},
  {"userID": 10, "name": "Jen", "nfriends": 1}
]"#;

#[derive(Parser, Debug)]
#[command(
    name = "tabula",
    version,
    about = "Run the tabula_core walkthrough over a users table"
)]
struct Cli {
    #[arg(
        long,
        help = "JSON array of {userID, name, nfriends} records (default: built-in sample)",
        value_hint = ValueHint::FilePath
    )]
    data: Option<PathBuf>,
    #[arg(long, default_value_t = 20, help = "Rows printed per table before truncating")]
    max_rows: usize,
    #[arg(
        long,
        value_enum,
        default_value = "hash",
        help = "Join algorithm: nested-loop|hash"
    )]
    join_strategy: StrategyArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StrategyArg {
    NestedLoop,
    Hash,
}

impl From<StrategyArg> for JoinStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::NestedLoop => Self::NestedLoop,
            StrategyArg::Hash => Self::Hash,
        }
    }
}

#[derive(Debug, Error)]
enum DemoError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("a reader thread panicked")]
    Reader,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "walkthrough failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<(), DemoError> {
    let show = |label: &str, table: &Table| {
        println!("{label}:\n{}", table.display().max_rows(cli.max_rows));
    };

    let users = load_users(cli)?;
    show("created", &users);
    println!("before update: {:?}", users.get(1)?);

    // The engine has no locking of its own; a shared table lives behind the host's lock.
    let shared = RwLock::new(users);
    let dunn = Compare::new("userID", CompareOp::Eq, 1);
    shared
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .update(Row::new().with("nfriends", 3), |r| dunn.matches(r))?;
    println!("after update: {:?}", read(&shared).get(1)?);

    let three = Compare::new("nfriends", CompareOp::Eq, 3);
    let (friendly, first_four) = thread::scope(|s| {
        let friendly = s.spawn(|| read(&shared).filter(|r| three.matches(r)));
        let first_four = s.spawn(|| read(&shared).limit(4));
        (friendly.join(), first_four.join())
    });
    show("nfriends == 3", &friendly.map_err(|_| DemoError::Reader)?);
    show("limit 4", &first_four.map_err(|_| DemoError::Reader)?);

    let mut users = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
    let deleted = users.delete(|r| dunn.matches(r));
    info!(deleted, "deleted user 1");
    show("delete", &users);

    let below_six = Compare::new("userID", CompareOp::Lt, 6);
    let ids = users.select(&["userID", "name"], &[])?;
    show("select", &ids);
    show("where", &ids.filter(|r| below_six.matches(r)));
    show("all data", &users.select(&[], &[])?);

    let sum_uids = || Aggregate::field("sumUids", AggregateOp::Sum, "userID");
    show("group by", &users.aggregate(&[], &[sum_uids()])?);
    show(
        "group by nfriends",
        &users.aggregate(&["nfriends"], &[sum_uids()])?,
    );
    show("sorted", &users.order_by("nfriends")?);

    let avg_friends = Aggregate::field("avg_nfriends", AggregateOp::Mean, "nfriends");
    let by_letter = users
        .select(&[], &[first_letter()])?
        .group_by(&["first_letter"], &[avg_friends], |rows| {
            AggregateOp::Mean.apply(rows, "nfriends") > 1.0
        })?
        .order_by_with("avg_nfriends", SortOrder::Desc)?
        .limit(4);
    show("friendliest first letters", &by_letter);

    let mut interests = Table::with_rows(
        Schema::from_columns([
            ("userID", ValueType::Integer),
            ("interest", ValueType::String),
        ])?,
        vec![
            Row::new().with("userID", 0).with("interest", "SQL"),
            Row::new().with("userID", 0).with("interest", "NoSQL"),
            Row::new().with("userID", 2).with("interest", "SQL"),
        ],
    );
    show("user interests before insertion", &interests);
    interests.insert(Row::new().with("userID", 2).with("interest", "MySQL"))?;
    show("user interests after insertion", &interests);

    let spec = JoinSpec::natural()
        .left_outer()
        .with_strategy(cli.join_strategy.into());
    let joined = users.join_with(&interests, &spec)?;
    show("join table", &joined);

    let counts = joined.aggregate(
        &["userID"],
        &[Aggregate::field("ninterests", AggregateOp::Count, "interest")],
    )?;
    show("interests per user", &counts.order_by("userID")?);
    Ok(())
}

fn load_users(cli: &Cli) -> Result<Table, DemoError> {
    let text = match &cli.data {
        Some(path) => fs::read_to_string(path).map_err(|source| DemoError::Read {
            path: path.clone(),
            source,
        })?,
        None => SAMPLE_USERS.to_owned(),
    };
    let mut users = Table::new(Schema::from_columns([
        ("userID", ValueType::Integer),
        ("name", ValueType::String),
        ("nfriends", ValueType::Integer),
    ])?);
    for row in rows_from_json(&text)? {
        users.insert(row)?;
    }
    info!(rows = users.len(), "loaded users");
    Ok(users)
}

fn read(lock: &RwLock<Table>) -> RwLockReadGuard<'_, Table> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// First letter of `name` as a code point (calculations are numeric).
fn first_letter() -> Calculated<'static> {
    Calculated::new("first_letter", |row| {
        row.get("name")
            .and_then(Value::as_str)
            .and_then(|s| s.chars().next())
            .map_or(0.0, |c| f64::from(u32::from(c)))
    })
}
