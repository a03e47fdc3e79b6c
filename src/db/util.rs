use log::log_enabled;
use rusqlite::{params_from_iter, types::Value as SqlValue, OpenFlags, ParamsFromIter};
use sea_query::{
    Expr, Func, FunctionCall, IntoColumnRef, QueryStatementWriter, SimpleExpr, SqliteQueryBuilder,
};

use crate::config::StoreConfig;

use super::error::{DbError, DbResult};

pub fn open_rusqlite(config: &StoreConfig) -> Result<rusqlite::Connection, rusqlite::Error> {
    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    if config.create_if_missing {
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }

    let conn = rusqlite::Connection::open_with_flags(&config.path, flags)?;
    conn.pragma_update(None, "foreign_keys", if config.foreign_keys { "ON" } else { "OFF" })?;
    conn.pragma_update(None, "cache_size", config.cache_size)?;

    Ok(conn)
}

fn sea_value_to_sql_value(value: sea_query::Value) -> DbResult<SqlValue> {
    use sea_query::Value as SeaValue;

    let value = match value {
        SeaValue::Bool(v) => v.map(|v| SqlValue::Integer(v as i64)),
        SeaValue::TinyInt(v) => v.map(|v| SqlValue::Integer(v.into())),
        SeaValue::SmallInt(v) => v.map(|v| SqlValue::Integer(v.into())),
        SeaValue::Int(v) => v.map(|v| SqlValue::Integer(v.into())),
        SeaValue::BigInt(v) => v.map(SqlValue::Integer),
        SeaValue::TinyUnsigned(v) => v.map(|v| SqlValue::Integer(v.into())),
        SeaValue::SmallUnsigned(v) => v.map(|v| SqlValue::Integer(v.into())),
        SeaValue::Unsigned(v) => v.map(|v| SqlValue::Integer(v.into())),
        SeaValue::BigUnsigned(v) => match v {
            Some(v) => Some(SqlValue::Integer(i64::try_from(v).map_err(|_| {
                DbError::Prepare(format!("{} is outside the supported integer range", v))
            })?)),
            None => None,
        },
        SeaValue::Float(v) => v.map(|v| SqlValue::Real(v.into())),
        SeaValue::Double(v) => v.map(SqlValue::Real),
        SeaValue::String(v) => v.map(|v| SqlValue::Text(*v)),
        SeaValue::Char(v) => v.map(|v| SqlValue::Text(v.to_string())),
        SeaValue::Bytes(v) => v.map(|v| SqlValue::Blob(*v)),
        #[allow(unreachable_patterns)]
        other => {
            return Err(DbError::Prepare(format!(
                "Unsupported statement value: {:?}",
                other
            )))
        }
    };

    Ok(value.unwrap_or(SqlValue::Null))
}

pub trait SeaRusqliteAdapter {
    /// Prepares a sea query for use with rusqlite
    fn prepare<'conn>(&self, db: &'conn rusqlite::Connection)
        -> DbResult<SeaRusqlitePrepared<'conn>>;
}

impl<Q: QueryStatementWriter> SeaRusqliteAdapter for Q {
    fn prepare<'conn>(
        &self,
        db: &'conn rusqlite::Connection,
    ) -> DbResult<SeaRusqlitePrepared<'conn>> {
        let (sql, values) = self.build(SqliteQueryBuilder);

        log::debug!("Prepared SQL: {}", sql);
        if log_enabled!(log::Level::Trace) {
            log::trace!("Prepared values: {:?}", values);
        }

        let values = values
            .into_iter()
            .map(sea_value_to_sql_value)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(SeaRusqlitePrepared {
            statement: db.prepare_cached(&sql)?,
            params: params_from_iter(values),
        })
    }
}

pub struct SeaRusqlitePrepared<'conn> {
    pub statement: rusqlite::CachedStatement<'conn>,
    pub params: ParamsFromIter<Vec<SqlValue>>,
}

impl<'conn> SeaRusqlitePrepared<'conn> {
    pub fn execute(&mut self) -> Result<usize, rusqlite::Error> {
        self.statement.execute(self.params.clone())
    }

    pub fn query_row<T, F>(&mut self, f: F) -> Result<T, rusqlite::Error>
    where
        F: FnOnce(&rusqlite::Row) -> Result<T, rusqlite::Error>,
    {
        self.statement.query_row(self.params.clone(), f)
    }

    pub fn query_map<T, F>(&mut self, f: F) -> Result<Vec<T>, rusqlite::Error>
    where
        F: FnMut(&rusqlite::Row) -> Result<T, rusqlite::Error>,
    {
        self.statement
            .query_map(self.params.clone(), f)?
            .collect()
    }
}

/// Short hand for sea_query::Expr::col
pub fn col<T>(n: T) -> Expr
where
    T: IntoColumnRef,
{
    Expr::col(n)
}

/// `COALESCE(SUM(expr), 0)`, sums over no rows are NULL in SQL
pub fn sum_or_zero<T>(expr: T) -> FunctionCall
where
    T: Into<SimpleExpr>,
{
    Func::coalesce([Func::sum(expr).into(), Expr::val(0).into()])
}

#[cfg(test)]
mod test {
    use sea_query::{Iden, Query};

    use super::*;

    #[derive(Iden)]
    #[iden = "Items"]
    enum Items {
        Table,
        #[iden = "ItemID"]
        ItemId,
        #[iden = "Label"]
        Label,
    }

    fn db() -> rusqlite::Connection {
        let db = rusqlite::Connection::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE Items (ItemID INTEGER PRIMARY KEY, Label TEXT NOT NULL);
             INSERT INTO Items VALUES (1, 'it''s'), (2, 'plain');",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_values_are_bound_not_inlined() {
        let db = db();

        let statement = Query::select()
            .column(Items::ItemId)
            .from(Items::Table)
            .and_where(col(Items::Label).eq("it's"))
            .to_owned();

        let (sql, _) = statement.build(SqliteQueryBuilder);
        assert_eq!(sql, r#"SELECT "ItemID" FROM "Items" WHERE "Label" = ?"#);

        let id: i64 = statement.prepare(&db).unwrap().query_row(|r| r.get(0)).unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_sum_or_zero_over_no_rows() {
        let db = db();

        let total: i64 = Query::select()
            .expr(sum_or_zero(col(Items::ItemId)))
            .from(Items::Table)
            .and_where(col(Items::Label).eq("missing"))
            .prepare(&db)
            .unwrap()
            .query_row(|r| r.get(0))
            .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_bool_and_unsigned_values() {
        assert_eq!(
            sea_value_to_sql_value(true.into()).unwrap(),
            SqlValue::Integer(1)
        );
        assert_eq!(
            sea_value_to_sql_value(10u64.into()).unwrap(),
            SqlValue::Integer(10)
        );
        assert!(sea_value_to_sql_value(u64::MAX.into()).is_err());
        assert_eq!(
            sea_value_to_sql_value(sea_query::Value::String(None)).unwrap(),
            SqlValue::Null
        );
    }
}
