//! Run results for both loaders.
//!
//! The price loader turns each file into a [`FileReport`] instead of
//! unwinding on error, and the run as a whole into a [`RunSummary`].

use std::fmt;
use std::path::PathBuf;

use crate::error::LoadError;

/// Outcome of loading one `<TICKER>.csv` file.
#[derive(Debug)]
pub struct FileReport {
    /// Symbol derived from the file name.
    pub ticker: String,
    /// Source file.
    pub path: PathBuf,
    /// Rows upserted and committed, or the error that rolled the file back.
    pub result: Result<usize, LoadError>,
}

impl FileReport {
    /// True when the file committed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes of one price-loader run, in processing order.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One entry per discovered file.
    pub files: Vec<FileReport>,
}

impl RunSummary {
    /// Files that committed.
    pub fn succeeded(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_ok())
    }

    /// Files that were rolled back.
    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.is_ok())
    }

    /// Console lines for the end of a run: one `FAILED` line per rolled-back
    /// file, the totals, then `complete`.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .files
            .iter()
            .filter_map(|f| match &f.result {
                Ok(_) => None,
                Err(e) => Some(format!("FAILED {}: {e}", f.ticker)),
            })
            .collect();
        lines.push(self.to_string());
        lines.push("complete".to_string());
        lines
    }

    /// Total rows committed across all files.
    pub fn rows_ingested(&self) -> usize {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().ok())
            .sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} loaded, {} failed, {} rows ingested",
            self.files.len(),
            self.succeeded().count(),
            self.failed().count(),
            self.rows_ingested()
        )
    }
}

/// A ticker row that was skipped.
#[derive(Debug)]
pub struct RowFailure {
    /// Source line, when known.
    pub line: Option<u64>,
    /// Raw ticker text, or `"N/A"` when the record could not be read.
    pub ticker: String,
    /// Why the row was skipped.
    pub error: LoadError,
}

/// Result of one ticker-loader run.
#[derive(Debug, Default)]
pub struct TickerSummary {
    /// Rows inserted or updated.
    pub upserted: usize,
    /// Rows skipped because of an error.
    pub failures: Vec<RowFailure>,
}

impl TickerSummary {
    /// Console lines for the end of a run: the totals, then `Done.`.
    pub fn report_lines(&self) -> Vec<String> {
        vec![self.to_string(), "Done.".to_string()]
    }
}

impl fmt::Display for TickerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Inserted/Updated {} rows into tickers table ({} skipped)",
            self.upserted,
            self.failures.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(ticker: &str, result: Result<usize, LoadError>) -> FileReport {
        FileReport {
            ticker: ticker.to_string(),
            path: PathBuf::from(format!("{ticker}.csv")),
            result,
        }
    }

    #[test]
    fn totals_only_count_committed_files() {
        let summary = RunSummary {
            files: vec![
                report("AAPL", Ok(3)),
                report(
                    "BAD",
                    Err(LoadError::BadDate {
                        line: 2,
                        value: "2020-01-01".into(),
                    }),
                ),
                report("MSFT", Ok(4)),
            ],
        };

        assert_eq!(summary.rows_ingested(), 7);
        assert_eq!(summary.succeeded().count(), 2);
        assert_eq!(
            summary.failed().map(|f| f.ticker.as_str()).collect::<Vec<_>>(),
            vec!["BAD"]
        );
        assert_eq!(
            summary.to_string(),
            "3 files: 2 loaded, 1 failed, 7 rows ingested"
        );
        assert_eq!(
            summary.report_lines(),
            vec![
                "FAILED BAD: line 2: invalid date \"2020-01-01\" (expected DD-MM-YYYY)",
                "3 files: 2 loaded, 1 failed, 7 rows ingested",
                "complete",
            ]
        );
    }

    #[test]
    fn empty_run_still_reports_completion() {
        assert_eq!(
            RunSummary::default().report_lines(),
            vec!["0 files: 0 loaded, 0 failed, 0 rows ingested", "complete"]
        );
    }

    #[test]
    fn ticker_report_ends_with_done() {
        let summary = TickerSummary {
            upserted: 4,
            failures: vec![RowFailure {
                line: Some(3),
                ticker: "N/A".into(),
                error: LoadError::MissingColumn("Name"),
            }],
        };
        assert_eq!(
            summary.report_lines(),
            vec!["Inserted/Updated 4 rows into tickers table (1 skipped)", "Done."]
        );
    }
}
