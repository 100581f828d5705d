//! Batch loaders for historical stock prices and company reference data.
//!
//! - [`prices`]: `<TICKER>.csv` files into `stock_data`, one transaction per file.
//! - [`tickers`]: one reference CSV into `tickers`, skipping bad rows.
//!
//! Both take an explicit [`store::IngestStore`] handle; [`db::connect`] opens one.

#![deny(missing_docs)]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod prices;
#[allow(missing_docs)]
pub mod schema;
pub mod store;
pub mod summary;
pub mod tickers;

pub use error::LoadError;
pub use store::IngestStore;
