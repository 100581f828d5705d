//! Connection helpers.
//!
//! [`connect_sqlite`] opens a SQLite database and applies the PRAGMAs the
//! loaders rely on: WAL journaling, foreign_keys=ON, and a 5000ms busy_timeout.
//! [`connect`] dispatches on the URL scheme and returns a [`DbConnection`].
//!
//! Example:
//! ```no_run
//! use stock_ingest::db::connection::connect_sqlite;
//!
//! let path = std::env::temp_dir().join("stock_ingest_example.db");
//! let _conn = connect_sqlite(path.to_str().unwrap()).expect("open sqlite");
//! ```

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

use crate::error::LoadError;

/// An open connection to one of the compiled-in backends.
pub enum DbConnection {
    /// SQLite file or in-memory database.
    Sqlite(SqliteConnection),
    /// PostgreSQL server.
    #[cfg(feature = "postgres")]
    Postgres(diesel::PgConnection),
}

impl DbConnection {
    /// Short backend name for log lines.
    pub fn backend(&self) -> &'static str {
        match self {
            DbConnection::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(_) => "postgres",
        }
    }
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, LoadError> {
    let mut conn = SqliteConnection::establish(database_url)?;

    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    Ok(conn)
}

/// Open a connection for `database_url`.
///
/// `postgres://` and `postgresql://` go to PostgreSQL; `sqlite:` prefixed
/// URLs, bare paths and `:memory:` go to SQLite. Any other scheme is rejected.
pub fn connect(database_url: &str) -> Result<DbConnection, LoadError> {
    let url = database_url.trim();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        return connect_postgres(url);
    }
    if let Some(path) = url.strip_prefix("sqlite://") {
        return Ok(DbConnection::Sqlite(connect_sqlite(path)?));
    }
    if let Some(path) = url.strip_prefix("sqlite:") {
        return Ok(DbConnection::Sqlite(connect_sqlite(path)?));
    }
    if let Some((scheme, _)) = url.split_once("://") {
        if scheme != "file" {
            return Err(LoadError::UnsupportedUrl(format!("{scheme}://…")));
        }
    }
    Ok(DbConnection::Sqlite(connect_sqlite(url)?))
}

#[cfg(feature = "postgres")]
fn connect_postgres(url: &str) -> Result<DbConnection, LoadError> {
    Ok(DbConnection::Postgres(diesel::PgConnection::establish(url)?))
}

#[cfg(not(feature = "postgres"))]
fn connect_postgres(_url: &str) -> Result<DbConnection, LoadError> {
    Err(LoadError::UnsupportedUrl(
        "postgres (built without the `postgres` feature)".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_url_opens_sqlite() {
        let conn = connect(":memory:").expect("in-memory sqlite");
        assert_eq!(conn.backend(), "sqlite");
    }

    #[test]
    fn sqlite_prefix_is_stripped() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prefixed.db");
        let url = format!("sqlite:{}", path.display());

        let conn = connect(&url).expect("sqlite url");
        assert_eq!(conn.backend(), "sqlite");
        assert!(path.exists());
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = connect("mysql://root:pw@localhost:3306/stock_data_db")
            .err()
            .expect("mysql is not a compiled backend");
        assert!(matches!(err, LoadError::UnsupportedUrl(ref s) if s == "mysql://…"));
    }

    #[cfg(not(feature = "postgres"))]
    #[test]
    fn postgres_needs_feature() {
        let err = connect("postgres://u:p@localhost/db").err().expect("feature off");
        assert!(matches!(err, LoadError::UnsupportedUrl(_)));
    }
}
