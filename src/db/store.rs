use migration::Migrator;
use rusqlite::{types::FromSql, Connection, OptionalExtension, Row};
use sea_query::QueryStatementWriter;

use crate::config::StoreConfig;

use super::{
    error::{DbError, DbResult},
    util::{open_rusqlite, SeaRusqliteAdapter},
};

/// Access to the ridership database file.
///
/// Every call opens its own connection and closes it again before returning,
/// so a `Store` holds no state besides its configuration.
#[derive(Debug, Clone)]
pub struct Store {
    config: StoreConfig,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn connect(&self) -> DbResult<Connection> {
        Ok(open_rusqlite(&self.config)?)
    }

    /// Opens and closes a connection, e.g. to check all is well at startup
    pub fn test_connection(&self) -> bool {
        match self.connect().and_then(|db| {
            db.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))?;
            Ok(())
        }) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Connection test failed for {:?}: {}", self.config.path, e);
                false
            }
        }
    }

    /// Brings the schema up to date, returning the number of migrations applied
    pub fn migrate(&self) -> DbResult<usize> {
        let mut db = self.connect()?;
        Ok(Migrator::up(&mut db)?)
    }

    /// Runs a query and maps every returned row
    pub fn query_rows<Q, T, F>(&self, query: &Q, map: F) -> DbResult<Vec<T>>
    where
        Q: QueryStatementWriter,
        F: FnMut(&Row) -> Result<T, rusqlite::Error>,
    {
        let db = self.connect()?;
        let rows = query.prepare(&db)?.query_map(map)?;
        Ok(rows)
    }

    /// Runs a query and maps its first row, failing with [`DbError::NotFound`]
    /// when there are none
    pub fn query_row<Q, T, F>(&self, query: &Q, map: F) -> DbResult<T>
    where
        Q: QueryStatementWriter,
        F: FnOnce(&Row) -> Result<T, rusqlite::Error>,
    {
        let db = self.connect()?;
        let row = query.prepare(&db)?.query_row(map).optional()?;
        row.ok_or(DbError::NotFound)
    }

    /// Runs a query and returns the first column of its first row
    pub fn query_scalar<Q, T>(&self, query: &Q) -> DbResult<T>
    where
        Q: QueryStatementWriter,
        T: FromSql,
    {
        self.query_row(query, |r| r.get(0))
    }

    /// Runs an insert/update/delete and returns the number of rows changed
    pub fn execute<Q>(&self, statement: &Q) -> DbResult<usize>
    where
        Q: QueryStatementWriter,
    {
        let db = self.connect()?;
        let changed = statement.prepare(&db)?.execute()?;
        Ok(changed)
    }
}
