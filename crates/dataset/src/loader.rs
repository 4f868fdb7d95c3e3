//! One-shot CSV ingestion for the transactions dataset.
//!
//! Expected columns:
//!   Product Name, Division, Region, State, City, Order Date, Ship Date,
//!   Sales, Cost, Gross Profit, Units
//!
//! `Gross Profit` may be absent, in which case it is derived as
//! `Sales - Cost`. Any other schema mismatch is fatal: the dashboard never
//! starts on a partial dataset.

use crate::error::DatasetError;
use chrono::NaiveDate;
use core_types::Transaction;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Columns that must be present in the header row. `Gross Profit` is the one
/// optional column.
const REQUIRED_COLUMNS: [&str; 10] = [
    "Product Name",
    "Division",
    "Region",
    "State",
    "City",
    "Order Date",
    "Ship Date",
    "Sales",
    "Cost",
    "Units",
];

/// A raw CSV record, field names matching the source file headers.
/// Dates are kept as strings here because the file mixes date conventions;
/// they are parsed (strictly) in [`into_transaction`].
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Product Name")]
    product: String,
    #[serde(rename = "Division")]
    division: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Order Date")]
    order_date: String,
    #[serde(rename = "Ship Date")]
    ship_date: String,
    #[serde(rename = "Sales")]
    sales: Decimal,
    #[serde(rename = "Cost")]
    cost: Decimal,
    #[serde(rename = "Gross Profit", default)]
    gross_profit: Option<Decimal>,
    #[serde(rename = "Units")]
    units: i64,
}

/// Parses a date that may be written as ISO (`2024-03-01`) or US
/// (`3/1/2024`) form.
fn parse_date(value: &str, column: &'static str, line: u64) -> Result<NaiveDate, DatasetError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .map_err(|_| DatasetError::InvalidDate {
            line,
            column,
            value: value.to_string(),
        })
}

fn into_transaction(raw: RawRecord, line: u64) -> Result<Transaction, DatasetError> {
    let order_date = parse_date(&raw.order_date, "Order Date", line)?;
    let ship_date = parse_date(&raw.ship_date, "Ship Date", line)?;
    // The source file carries a precomputed Gross Profit column; trust it
    // when present, derive it otherwise.
    let gross_profit = raw.gross_profit.unwrap_or(raw.sales - raw.cost);

    Ok(Transaction {
        product: raw.product,
        division: raw.division,
        region: raw.region,
        state: raw.state,
        city: raw.city,
        order_date,
        ship_date,
        sales: raw.sales,
        cost: raw.cost,
        gross_profit,
        units: raw.units,
    })
}

/// Loads transactions from any CSV reader.
///
/// Rows with non-positive sales or units are dropped here, before the engine
/// ever sees them; returns, credit lines, and zero-unit adjustments are not
/// order lines and would distort every ratio downstream. The engine still
/// guards every division on its own, since filters and groupings can produce
/// zero-sum aggregates from clean rows.
pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // 1. Validate the schema up front so the failure names the column,
    //    not whichever record happened to trip serde first.
    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column.to_string()));
        }
    }

    // 2. Deserialize and convert every record. Line numbers are 1-based and
    //    account for the header row.
    let mut transactions = Vec::new();
    let mut dropped = 0usize;
    for (index, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let line = index as u64 + 2;
        let raw = result.map_err(|source| DatasetError::Malformed { line, source })?;
        let transaction = into_transaction(raw, line)?;

        if transaction.sales <= Decimal::ZERO || transaction.units <= 0 {
            dropped += 1;
            continue;
        }
        transactions.push(transaction);
    }

    if dropped > 0 {
        debug!(dropped, "dropped rows with non-positive sales or units");
    }
    info!(rows = transactions.len(), "loaded transactions dataset");

    Ok(transactions)
}

/// Loads transactions from a CSV file path.
pub fn load_transactions_file<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_transactions(file)
}
