#![allow(dead_code)]

use diesel::QueryableByName;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use std::path::{Path, PathBuf};
use stock_ingest::db::connect_sqlite;
use tempfile::TempDir;

/// Table layout the loaders expect. The CHECK constraints give tests a way to
/// make the database reject an otherwise well-formed row.
pub const SCHEMA_SQL: &str = "
CREATE TABLE stock_data (
    ticker     VARCHAR(16) NOT NULL,
    date       DATE NOT NULL,
    open       DOUBLE PRECISION,
    high       DOUBLE PRECISION,
    low        DOUBLE PRECISION,
    close      DOUBLE PRECISION,
    adj_close  DOUBLE PRECISION NOT NULL,
    volume     BIGINT CHECK (volume IS NULL OR volume >= 0),
    dividend   DOUBLE PRECISION,
    PRIMARY KEY (ticker, date)
);
CREATE TABLE tickers (
    ticker       VARCHAR(16) NOT NULL PRIMARY KEY CHECK (length(ticker) > 0),
    company_name TEXT NOT NULL,
    industry     TEXT NOT NULL,
    sub_industry TEXT NOT NULL
);
";

pub const PRICE_HEADER: &str = "Date,Open,High,Low,Close,Adjusted Close,Volume\n";
pub const TICKER_HEADER: &str = "Ticker,Name,Industry,Sub-Industry\n";

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("test.db").to_string_lossy().to_string();

    let mut conn = connect_sqlite(&path).expect("connect");
    conn.batch_execute(SCHEMA_SQL).expect("schema");
    (TestDb { _dir: dir, path }, conn)
}

/// Write `body` to `<dir>/<name>` and return the path.
pub fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write fixture");
    path
}

/// A price CSV with the standard header followed by `rows`.
pub fn price_csv(rows: &[&str]) -> String {
    let mut body = PRICE_HEADER.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}

#[derive(QueryableByName)]
struct Cnt {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
        .get_result::<Cnt>(conn)
        .expect("count")
        .n
}
