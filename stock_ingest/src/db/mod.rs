//! Database connection utilities.
//!
//! This module provides:
//! - [`connection::connect_sqlite`]: SQLite with WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - [`connection::connect`]: scheme-based dispatch to SQLite or, with the `postgres`
//!   feature, PostgreSQL.
//!
//! Tables are expected to exist already; this crate does not manage schema.
//!
//! Note: Building with PostgreSQL support requires the system libpq (e.g., libpq-dev on Debian/Ubuntu).

pub mod connection;

pub use connection::{DbConnection, connect, connect_sqlite};
