//! Diesel models mapping to the database schema.
//!
//! These types mirror the two tables in [`crate::schema`]:
//! - [`crate::schema::stock_data`] — one daily OHLCV bar per `(ticker, date)`
//! - [`crate::schema::tickers`] — company reference data keyed by `ticker`
//!
//! The `New*` structs are what the loaders insert; the `Stored*` structs are
//! read back by [`crate::store::IngestStore`] queries.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::schema::*;

/// Insertable form of a daily price bar, produced by the price loader.
///
/// Owned strings here because rows are parsed out of a reused CSV record buffer.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = stock_data)]
pub struct NewPrice {
    /// Uppercase symbol derived from the source file name (e.g., "AAPL").
    pub ticker: String,
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price; `None` when the source field was empty.
    pub open: Option<f64>,
    /// Session high; `None` when the source field was empty.
    pub high: Option<f64>,
    /// Session low; `None` when the source field was empty.
    pub low: Option<f64>,
    /// Closing price; `None` when the source field was empty.
    pub close: Option<f64>,
    /// Adjusted close. Rows without one are never built.
    pub adj_close: f64,
    /// Shares traded; `None` when the source field was empty.
    pub volume: Option<i64>,
    /// Reserved column, always `None` at ingestion time.
    pub dividend: Option<f64>,
}

/// A row in [`crate::schema::stock_data`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = stock_data)]
pub struct StoredPrice {
    /// Ticker symbol.
    pub ticker: String,
    /// Trading day.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Option<f64>,
    /// Session high.
    pub high: Option<f64>,
    /// Session low.
    pub low: Option<f64>,
    /// Closing price.
    pub close: Option<f64>,
    /// Adjusted close.
    pub adj_close: f64,
    /// Shares traded.
    pub volume: Option<i64>,
    /// Dividend, if populated by some other process.
    pub dividend: Option<f64>,
}

/// Insertable form of a company reference row.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = tickers)]
pub struct NewTicker {
    /// Trimmed, uppercased symbol.
    pub ticker: String,
    /// Company name, verbatim from the source.
    pub company_name: String,
    /// Industry (sector), verbatim from the source.
    pub industry: String,
    /// Sub-industry, verbatim from the source.
    pub sub_industry: String,
}

/// A row in [`crate::schema::tickers`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = tickers)]
pub struct StoredTicker {
    /// Ticker symbol.
    pub ticker: String,
    /// Company name.
    pub company_name: String,
    /// Industry.
    pub industry: String,
    /// Sub-industry.
    pub sub_industry: String,
}
