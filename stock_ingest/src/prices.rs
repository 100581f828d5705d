//! Price-history loader.
//!
//! ## What this does
//! - Finds `<TICKER>.csv` files in a directory and processes them in sorted order.
//! - Parses each row (`Date, Open, High, Low, Close, Adjusted Close, Volume`) into a
//!   [`NewPrice`], with `Date` in `DD-MM-YYYY` and empty numeric fields becoming NULL.
//! - Drops rows whose `Adjusted Close` is empty or unparseable; those are filtered, not errors.
//! - Upserts with `ON CONFLICT (ticker, date) DO NOTHING`, so reruns never alter stored rows.
//!
//! ## Transactions
//! One file is one transaction. The first bad row (bad date, bad number, ragged CSV
//! record, database rejection) stops reading that file and rolls back everything it
//! wrote. The failure lands in that file's [`FileReport`] and the run moves on.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::error::LoadError;
use crate::models::NewPrice;
use crate::store::IngestStore;
use crate::summary::{FileReport, RunSummary};

/// Text format of the `Date` column.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// One CSV record, by header name, before any type coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPriceRow {
    /// `Date`
    #[serde(rename = "Date")]
    pub date: String,
    /// `Open`
    #[serde(rename = "Open")]
    pub open: String,
    /// `High`
    #[serde(rename = "High")]
    pub high: String,
    /// `Low`
    #[serde(rename = "Low")]
    pub low: String,
    /// `Close`
    #[serde(rename = "Close")]
    pub close: String,
    /// `Adjusted Close`
    #[serde(rename = "Adjusted Close")]
    pub adj_close: String,
    /// `Volume`
    #[serde(rename = "Volume")]
    pub volume: String,
}

/// Symbol for a price file: the file stem, trimmed and uppercased.
///
/// `data/aapl.csv` -> `AAPL`
pub fn ticker_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_uppercase())
        .unwrap_or_default()
}

/// Regular files in `dir` with a `.csv` extension (any case), sorted by name.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LoadError::io(dir, e))?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parse a `DD-MM-YYYY` date.
pub fn parse_date(raw: &str, line: u64) -> Result<NaiveDate, LoadError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| LoadError::BadDate {
        line,
        value: raw.to_string(),
    })
}

// Blank (or whitespace-only) means NULL; anything else must parse.
fn parse_optional<T: FromStr>(
    raw: &str,
    field: &'static str,
    line: u64,
) -> Result<Option<T>, LoadError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).map_err(|_| LoadError::BadNumber {
        line,
        field,
        value: raw.to_string(),
    })
}

// Like `parse_optional`, but NaN and infinities are bad numbers too.
fn parse_optional_price(
    raw: &str,
    field: &'static str,
    line: u64,
) -> Result<Option<f64>, LoadError> {
    match parse_optional::<f64>(raw, field, line)? {
        Some(v) if !v.is_finite() => Err(LoadError::BadNumber {
            line,
            field,
            value: raw.to_string(),
        }),
        parsed => Ok(parsed),
    }
}

/// Coerce one raw record into a row for `ticker`.
///
/// Returns `Ok(None)` when `Adjusted Close` is empty, unparseable or not a
/// finite number: the row
/// is dropped without failing the file. The date and the other numeric
/// fields are checked first, so a malformed date still fails even on a row
/// that would have been dropped.
pub fn parse_price_row(
    ticker: &str,
    raw: &RawPriceRow,
    line: u64,
) -> Result<Option<NewPrice>, LoadError> {
    let date = parse_date(&raw.date, line)?;
    let open = parse_optional_price(&raw.open, "Open", line)?;
    let high = parse_optional_price(&raw.high, "High", line)?;
    let low = parse_optional_price(&raw.low, "Low", line)?;
    let close = parse_optional_price(&raw.close, "Close", line)?;
    let volume = parse_optional(&raw.volume, "Volume", line)?;

    let adj_close = match raw.adj_close.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return Ok(None),
    };

    Ok(Some(NewPrice {
        ticker: ticker.to_string(),
        date,
        open,
        high,
        low,
        close,
        adj_close,
        volume,
        dividend: None,
    }))
}

/// Load CSV rows from `input` for `ticker` inside a single transaction.
///
/// Returns the number of rows upserted. Any error rolls back the whole input.
pub fn load_price_reader<S, R>(store: &mut S, ticker: &str, input: R) -> Result<usize, LoadError>
where
    S: IngestStore,
    R: Read,
{
    let mut reader = csv::Reader::from_reader(input);

    store.in_transaction(|store| {
        let headers = reader.headers()?.clone();
        let mut record = StringRecord::new();
        let mut rows = 0usize;

        while reader.read_record(&mut record)? {
            let line = record.position().map_or(0, |p| p.line());
            let raw: RawPriceRow = record.deserialize(Some(&headers))?;

            let Some(price) = parse_price_row(ticker, &raw, line)? else {
                debug!(ticker, line, date = %raw.date, "no adjusted close, row dropped");
                continue;
            };

            store
                .upsert_price(&price)
                .map_err(|source| LoadError::Upsert {
                    line,
                    date: price.date,
                    source,
                })?;
            rows += 1;
        }

        Ok(rows)
    })
}

/// Load one `<TICKER>.csv` file. See [`load_price_reader`].
pub fn load_price_file<S: IngestStore>(store: &mut S, path: &Path) -> Result<usize, LoadError> {
    let ticker = ticker_from_path(path);
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    load_price_reader(store, &ticker, file)
}

/// Load every CSV file in `dir`, one transaction per file.
///
/// Only a directory that cannot be listed is an error here; per-file
/// failures are recorded in the returned [`RunSummary`].
pub fn load_price_dir<S: IngestStore>(store: &mut S, dir: &Path) -> Result<RunSummary, LoadError> {
    let files = discover_csv_files(dir)?;
    info!(dir = %dir.display(), "Found {} CSV files", files.len());

    let mut summary = RunSummary::default();
    for path in files {
        let ticker = ticker_from_path(&path);
        let result = load_price_file(store, &path);
        match &result {
            Ok(rows) => info!(ticker = %ticker, "Ingested {rows} rows for {ticker}"),
            Err(e) => error!(ticker = %ticker, "Error ingesting {ticker}, file rolled back: {e}"),
        }
        summary.files.push(FileReport {
            ticker,
            path,
            result,
        });
    }

    Ok(summary)
}
