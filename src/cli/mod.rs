//! Command line interface - argument definitions and command handlers.
//!
//! Each subcommand is one user action: it runs against the database, and its
//! handler returns the text to print. Failures are reported once by `main`.

/// Subcommand implementations
pub mod handlers;

use crate::entities::Satuan;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

/// Top-level command line arguments.
#[derive(Parser, Debug)]
#[command(name = "plastic-weighlog")]
#[command(about = "Plastic waste weighing ledger with period reports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// One weighed item as given on the command line: `CATEGORY_ID:WEIGHT[:UNIT]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemArg {
    /// Category id
    pub category_id: i64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Optional packing unit
    pub satuan: Option<Satuan>,
}

/// Parses `CATEGORY_ID:WEIGHT[:UNIT]`, e.g. `3:12.5:SAK`.
pub fn parse_item(value: &str) -> Result<ItemArg, String> {
    let mut parts = value.split(':');
    let category = parts.next().unwrap_or_default();
    let weight = parts
        .next()
        .ok_or_else(|| format!("expected CATEGORY_ID:WEIGHT[:UNIT], got '{value}'"))?;
    let unit = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(format!("too many ':' separated parts in '{value}'"));
    }

    let category_id = category
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid category id '{category}': {e}"))?;
    let weight_kg = weight
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid weight '{weight}': {e}"))?;
    let satuan = Satuan::parse(unit).map_err(unknown_unit)?;

    Ok(ItemArg {
        category_id,
        weight_kg,
        satuan,
    })
}

/// New unit for `update-item`; `UnitUpdate(None)` clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitUpdate(pub Option<Satuan>);

/// Parses a unit for `update-item`; `none` or an empty value clears it.
pub fn parse_unit_update(value: &str) -> Result<UnitUpdate, String> {
    if value.trim().eq_ignore_ascii_case("none") {
        return Ok(UnitUpdate(None));
    }
    Satuan::parse(value).map(UnitUpdate).map_err(unknown_unit)
}

fn unknown_unit(unit: String) -> String {
    format!("unknown unit '{unit}' (expected SAK, PRESS or BAL)")
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List plastic categories, or add new ones
    Categories {
        /// Category names to add
        #[arg(long = "add")]
        add: Vec<String>,
    },

    /// Record a weighing session
    Record {
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Person responsible for the weighing
        #[arg(long)]
        pic: String,

        /// Owner of the goods
        #[arg(long)]
        owner: String,

        /// Weighed item as CATEGORY_ID:WEIGHT[:UNIT]; repeat for every item
        #[arg(long = "item", value_parser = parse_item, required = true)]
        items: Vec<ItemArg>,

        /// Selected category ids; defaults to the categories used by the items
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<i64>>,

        /// When weight entry started (RFC 3339)
        #[arg(long)]
        started_at: Option<DateTime<Utc>>,

        /// When the session was submitted (RFC 3339)
        #[arg(long)]
        ended_at: Option<DateTime<Utc>>,
    },

    /// Show one session with its items
    Show {
        /// Session id
        id: Uuid,

        /// Write the session report into this directory as plain text (.txt)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Session history grouped by year, month and week
    History {
        /// Earliest transaction date, inclusive
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest transaction date, inclusive
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Filter by PIC name (case-insensitive substring)
        #[arg(long)]
        pic: Option<String>,

        /// Filter by owner name (case-insensitive substring)
        #[arg(long)]
        owner: Option<String>,
    },

    /// Edit session header fields
    UpdateSession {
        /// Session id
        id: Uuid,

        /// New transaction date
        #[arg(long)]
        date: Option<NaiveDate>,

        /// New PIC name
        #[arg(long)]
        pic: Option<String>,

        /// New owner name
        #[arg(long)]
        owner: Option<String>,

        /// New selected category ids
        #[arg(long, value_delimiter = ',')]
        categories: Option<Vec<i64>>,
    },

    /// Edit one item
    UpdateItem {
        /// Item id
        id: Uuid,

        /// New category id
        #[arg(long)]
        category: Option<i64>,

        /// New weight in kilograms
        #[arg(long)]
        weight: Option<f64>,

        /// New unit (SAK, PRESS, BAL, or none)
        #[arg(long, value_parser = parse_unit_update)]
        unit: Option<UnitUpdate>,
    },

    /// Delete one item
    DeleteItem {
        /// Item id
        id: Uuid,
    },

    /// Delete a session and its items, recording the deletion
    Delete {
        /// Session id
        id: Uuid,

        /// Client description stored in the deletion log
        #[arg(long, env = "WEIGHLOG_USER_AGENT")]
        user_agent: Option<String>,
    },

    /// Totals for the current Monday–Sunday week
    Dashboard,

    /// List closing periods with session counts
    Periods {
        /// Include deactivated periods
        #[arg(long)]
        all: bool,
    },

    /// Create a closing period
    AddPeriod {
        /// Period name, e.g. "Desember 2025"
        name: String,

        /// First day (YYYY-MM-DD)
        start: NaiveDate,

        /// Last day (YYYY-MM-DD)
        end: NaiveDate,
    },

    /// Rename or re-date a closing period
    UpdatePeriod {
        /// Period id
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New first day
        #[arg(long)]
        start: Option<NaiveDate>,

        /// New last day
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Deactivate a closing period
    ClosePeriod {
        /// Period id
        id: i64,
    },

    /// Report for a closing period, or the current week when no id is given
    PeriodReport {
        /// Closing period id
        id: Option<i64>,

        /// Write the printable report into this directory as plain text (.txt)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show the deletion log
    Logs,

    /// Remove deletion log entries past the retention window
    PurgeLogs {
        /// Retention in days; defaults to the configured value
        #[arg(long)]
        days: Option<i64>,
    },
}
