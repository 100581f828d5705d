//! Persistence surface used by the loaders.
//!
//! Loaders never hold a global connection: they receive `&mut impl IngestStore`,
//! so tests can hand them a throwaway SQLite database. The Diesel
//! implementations below are generated once per compiled backend.

use diesel::QueryResult;

use crate::error::LoadError;
use crate::models::{NewPrice, NewTicker, StoredPrice, StoredTicker};

/// Write and read operations over `stock_data` and `tickers`.
pub trait IngestStore {
    /// Runs `f` atomically: commit on `Ok`, roll back on `Err`.
    ///
    /// Calling this again from inside `f` opens a savepoint, so an inner
    /// failure only undoes the inner work.
    fn in_transaction<T, F>(&mut self, f: F) -> Result<T, LoadError>
    where
        F: FnOnce(&mut Self) -> Result<T, LoadError>;

    /// Inserts a price bar. An existing `(ticker, date)` row is left as is.
    ///
    /// Returns the number of rows written (0 on conflict).
    fn upsert_price(&mut self, row: &NewPrice) -> QueryResult<usize>;

    /// Inserts a ticker or overwrites its descriptive fields.
    fn upsert_ticker(&mut self, row: &NewTicker) -> QueryResult<usize>;

    /// All stored bars for `ticker`, oldest first.
    fn price_history(&mut self, ticker: &str) -> QueryResult<Vec<StoredPrice>>;

    /// Number of stored bars for `ticker`.
    fn count_prices(&mut self, ticker: &str) -> QueryResult<i64>;

    /// Reference row for `ticker`, if any.
    fn find_ticker(&mut self, ticker: &str) -> QueryResult<Option<StoredTicker>>;
}

macro_rules! impl_ingest_store {
    ($conn:ty) => {
        impl IngestStore for $conn {
            fn in_transaction<T, F>(&mut self, f: F) -> Result<T, LoadError>
            where
                F: FnOnce(&mut Self) -> Result<T, LoadError>,
            {
                diesel::Connection::transaction(self, f)
            }

            fn upsert_price(&mut self, row: &NewPrice) -> QueryResult<usize> {
                use crate::schema::stock_data::dsl as sd;
                use diesel::prelude::*;

                diesel::insert_into(sd::stock_data)
                    .values(row)
                    .on_conflict((sd::ticker, sd::date))
                    .do_nothing()
                    .execute(self)
            }

            fn upsert_ticker(&mut self, row: &NewTicker) -> QueryResult<usize> {
                use crate::schema::tickers::dsl as tk;
                use diesel::prelude::*;
                use diesel::upsert::excluded;

                diesel::insert_into(tk::tickers)
                    .values(row)
                    .on_conflict(tk::ticker)
                    .do_update()
                    .set((
                        tk::company_name.eq(excluded(tk::company_name)),
                        tk::industry.eq(excluded(tk::industry)),
                        tk::sub_industry.eq(excluded(tk::sub_industry)),
                    ))
                    .execute(self)
            }

            fn price_history(&mut self, symbol: &str) -> QueryResult<Vec<StoredPrice>> {
                use crate::schema::stock_data::dsl as sd;
                use diesel::prelude::*;

                sd::stock_data
                    .filter(sd::ticker.eq(symbol))
                    .order(sd::date.asc())
                    .select(StoredPrice::as_select())
                    .load(self)
            }

            fn count_prices(&mut self, symbol: &str) -> QueryResult<i64> {
                use crate::schema::stock_data::dsl as sd;
                use diesel::prelude::*;

                sd::stock_data
                    .filter(sd::ticker.eq(symbol))
                    .count()
                    .get_result(self)
            }

            fn find_ticker(&mut self, symbol: &str) -> QueryResult<Option<StoredTicker>> {
                use crate::schema::tickers::dsl as tk;
                use diesel::prelude::*;

                tk::tickers
                    .find(symbol)
                    .select(StoredTicker::as_select())
                    .first(self)
                    .optional()
            }
        }
    };
}

impl_ingest_store!(diesel::SqliteConnection);

#[cfg(feature = "postgres")]
impl_ingest_store!(diesel::PgConnection);
