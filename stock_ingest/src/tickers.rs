//! Ticker reference loader.
//!
//! Reads one CSV with `Ticker, Name, Industry, Sub-Industry` and upserts it into
//! `tickers`, overwriting the descriptive fields of existing symbols.
//!
//! Failure handling is deliberately looser than the price loader's: the file
//! runs in one transaction committed at the end, but each row gets its own
//! savepoint. A row that fails to read or upsert is rolled back to its
//! savepoint, logged and skipped; rows already written stay. Only a missing
//! file, a missing header column or an I/O error aborts the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::LoadError;
use crate::models::NewTicker;
use crate::store::IngestStore;
use crate::summary::{RowFailure, TickerSummary};

const COLUMNS: [&str; 4] = ["Ticker", "Name", "Industry", "Sub-Industry"];

/// One reference record, by header name.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTickerRow {
    /// `Ticker`
    #[serde(rename = "Ticker")]
    pub ticker: String,
    /// `Name`
    #[serde(rename = "Name")]
    pub name: String,
    /// `Industry`
    #[serde(rename = "Industry")]
    pub industry: String,
    /// `Sub-Industry`
    #[serde(rename = "Sub-Industry")]
    pub sub_industry: String,
}

impl From<RawTickerRow> for NewTicker {
    /// Trims and uppercases the symbol; the other fields are kept verbatim.
    fn from(raw: RawTickerRow) -> Self {
        NewTicker {
            ticker: raw.ticker.trim().to_uppercase(),
            company_name: raw.name,
            industry: raw.industry,
            sub_industry: raw.sub_industry,
        }
    }
}

fn check_columns(headers: &StringRecord) -> Result<(), LoadError> {
    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn(column));
        }
    }
    Ok(())
}

/// Upsert every reference row from `input`.
pub fn load_ticker_reader<S, R>(store: &mut S, input: R) -> Result<TickerSummary, LoadError>
where
    S: IngestStore,
    R: Read,
{
    let mut reader = csv::Reader::from_reader(input);

    let summary = store.in_transaction(|store| {
        let headers = reader.headers()?.clone();
        check_columns(&headers)?;
        let byte_headers = reader.byte_headers()?.clone();
        let ticker_col = headers.iter().position(|h| h == "Ticker");

        let mut summary = TickerSummary::default();
        // Raw bytes, so a bad encoding elsewhere in the row still leaves the symbol readable.
        let mut record = ByteRecord::new();

        loop {
            match reader.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    let line = e.position().map(|p| p.line());
                    warn!(line, "Error processing row for ticker N/A: {e}");
                    summary.failures.push(RowFailure {
                        line,
                        ticker: "N/A".to_string(),
                        error: e.into(),
                    });
                    continue;
                }
            }

            let line = record.position().map(|p| p.line());
            let outcome = record
                .deserialize::<RawTickerRow>(Some(&byte_headers))
                .map_err(LoadError::from)
                .and_then(|raw| {
                    let row = NewTicker::from(raw);
                    store.in_transaction(|store| Ok(store.upsert_ticker(&row)?))
                });

            match outcome {
                Ok(_) => summary.upserted += 1,
                Err(error) => {
                    let ticker = ticker_col
                        .and_then(|i| record.get(i))
                        .map(|raw| String::from_utf8_lossy(raw).into_owned())
                        .unwrap_or_else(|| "N/A".to_string());
                    warn!(line, "Error processing row for ticker {ticker}: {error}");
                    summary.failures.push(RowFailure {
                        line,
                        ticker,
                        error,
                    });
                }
            }
        }

        Ok(summary)
    })?;

    info!(
        skipped = summary.failures.len(),
        "Inserted/Updated {} rows into tickers table.",
        summary.upserted
    );
    Ok(summary)
}

/// Upsert every reference row from the CSV at `path`.
pub fn load_ticker_file<S: IngestStore>(store: &mut S, path: &Path) -> Result<TickerSummary, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    load_ticker_reader(store, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_is_normalized_and_rest_kept_verbatim() {
        let row = NewTicker::from(RawTickerRow {
            ticker: "  brk.b ".into(),
            name: " Berkshire Hathaway ".into(),
            industry: "Financials".into(),
            sub_industry: "Multi-Sector Holdings".into(),
        });
        assert_eq!(row.ticker, "BRK.B");
        assert_eq!(row.company_name, " Berkshire Hathaway ");
        assert_eq!(row.sub_industry, "Multi-Sector Holdings");
    }

    #[test]
    fn header_must_name_every_column() {
        let headers = StringRecord::from(vec!["Ticker", "Name", "Industry"]);
        let err = check_columns(&headers).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Sub-Industry")));

        let full = StringRecord::from(vec!["Sub-Industry", "Industry", "Name", "Ticker", "CIK"]);
        assert!(check_columns(&full).is_ok());
    }
}
