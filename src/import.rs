use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use migration::{raw::RawSql, Sql000001CtaTables, Sql000002CtaIndexes};
use rusqlite::{functions::FunctionFlags, vtab::csvtab, Connection, OptionalExtension};
use sea_query::{Alias, DynIden, Expr, Func, IntoIden, Query, SimpleExpr, SqliteQueryBuilder};

use crate::db::{
    schema::{Lines, Riderships, Stations, StopDetails, Stops},
    store::Store,
    util::open_rusqlite,
};

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("Missing import file: {0:?}")]
    MissingFile(PathBuf),

    #[error("Import path is not valid UTF-8: {0:?}")]
    InvalidPath(PathBuf),

    #[error("{count} rows of {table} reference missing {parent} rows")]
    ForeignKey {
        table: String,
        parent: String,
        count: i64,
    },

    #[error("Database query error: {0}")]
    Prepare(#[from] sea_query::error::Error),

    #[error("CSV Import error: {0}")]
    Csv(#[from] rusqlite::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;

// Parents before children
const FILE_NAMES: [&str; 5] = [
    "stations.csv",
    "lines.csv",
    "stops.csv",
    "stop_details.csv",
    "riderships.csv",
];

/// Name of the SQL function normalising ridership dates
const CTA_DATE: &str = "cta_date";
/// Name of the SQL function reading flags as 0/1
const CTA_BOOL: &str = "cta_bool";

/// Reads `MM/DD/YYYY` as exported by the CTA data portal, or an ISO date
fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn register_functions(db: &Connection) -> rusqlite::Result<()> {
    db.create_scalar_function(
        CTA_BOOL,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let raw: String = ctx.get(0)?;
            match parse_bool(&raw) {
                Some(flag) => Ok(flag as i64),
                None => Err(rusqlite::Error::UserFunctionError(
                    format!("not a flag: '{}'", raw).into(),
                )),
            }
        },
    )?;

    db.create_scalar_function(
        CTA_DATE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let raw: String = ctx.get(0)?;
            let date = parse_date(&raw).map_err(|e| {
                rusqlite::Error::UserFunctionError(format!("{}: '{}'", e, raw).into())
            })?;
            Ok(date.format("%Y-%m-%d").to_string())
        },
    )
}

/// Column copied as is from the csv column of the same name
fn same<T: IntoIden + Copy + 'static>(column: T) -> (DynIden, SimpleExpr) {
    (column.into_iden(), Expr::col(column).into())
}

/// Column passed through one of the registered SQL functions
fn converted<T: IntoIden + Copy + 'static>(column: T, function: &str) -> (DynIden, SimpleExpr) {
    (
        column.into_iden(),
        Func::cust(Alias::new(function)).arg(Expr::col(column)).into(),
    )
}

fn insert_from_csv(
    csv_table: &str,
    table: impl IntoIden + 'static,
    columns: Vec<(DynIden, SimpleExpr)>,
) -> ImportResult<String> {
    let (names, values): (Vec<_>, Vec<_>) = columns.into_iter().unzip();

    let csv_data = Query::select()
        .exprs(values)
        .from(Alias::new(csv_table))
        .to_owned();

    let insert = Query::insert()
        .into_table(table)
        .columns(names)
        .select_from(csv_data)?
        .to_owned();

    Ok(insert.to_string(SqliteQueryBuilder))
}

fn insert_statement(filename: &str, csv_table: &str) -> ImportResult<String> {
    match filename {
        "stations.csv" => insert_from_csv(
            csv_table,
            Stations::Table,
            vec![same(Stations::StationId), same(Stations::Name)],
        ),
        "lines.csv" => insert_from_csv(
            csv_table,
            Lines::Table,
            vec![same(Lines::LineId), same(Lines::Color)],
        ),
        "stops.csv" => insert_from_csv(
            csv_table,
            Stops::Table,
            vec![
                same(Stops::StopId),
                same(Stops::Name),
                same(Stops::StationId),
                same(Stops::Direction),
                converted(Stops::Ada, CTA_BOOL),
                same(Stops::Latitude),
                same(Stops::Longitude),
            ],
        ),
        "stop_details.csv" => insert_from_csv(
            csv_table,
            StopDetails::Table,
            vec![same(StopDetails::StopId), same(StopDetails::LineId)],
        ),
        "riderships.csv" => insert_from_csv(
            csv_table,
            Riderships::Table,
            vec![
                same(Riderships::StationId),
                converted(Riderships::Date, CTA_DATE),
                same(Riderships::TypeOfDay),
                same(Riderships::DailyTotal),
            ],
        ),
        other => unreachable!("FILE_NAMES out of sync with insert code: {}", other),
    }
}

/// Fails on the first table holding rows whose parent row is missing
fn check_foreign_keys(db: &Connection) -> ImportResult<()> {
    let violation = db
        .query_row(
            "SELECT \"table\", \"parent\", COUNT(*) FROM pragma_foreign_key_check \
             GROUP BY \"table\", \"parent\" ORDER BY \"table\", \"parent\"",
            [],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;

    match violation {
        Some((table, parent, count)) => Err(ImportError::ForeignKey {
            table,
            parent,
            count,
        }),
        None => Ok(()),
    }
}

/// Replaces everything in the store with the CSV files found in `dir`,
/// in a single transaction. Returns the number of records imported.
pub fn import_dir(store: &Store, dir: &Path) -> ImportResult<usize> {
    let mut paths = Vec::with_capacity(FILE_NAMES.len());
    for filename in FILE_NAMES {
        let path = dir.join(filename);
        if !path.is_file() {
            return Err(ImportError::MissingFile(path));
        }
        paths.push((filename, path));
    }

    // Checked once all files are in, see check_foreign_keys
    let mut config = store.config().clone();
    config.foreign_keys = false;
    let mut db = open_rusqlite(&config)?;

    // Rusqlite is used directly for its csv import functionality
    csvtab::load_module(&db)?;
    register_functions(&db)?;

    let tx = db.transaction()?;

    log::info!("Recreating tables for import");
    if let Some(down_sql) = Sql000001CtaTables::down_sql() {
        tx.execute_batch(&down_sql)?;
    }
    tx.execute_batch(&Sql000001CtaTables::up_sql())?;

    let mut insert_count = 0;
    for (filename, path) in paths {
        let path = path.to_str().ok_or_else(|| ImportError::InvalidPath(path.clone()))?;
        let csv_table = format!("csv_{}", filename.trim_end_matches(".csv"));

        tx.execute_batch(&format!(
            "CREATE VIRTUAL TABLE temp.{csv_table} USING csv(filename='{}', header=yes);",
            path.replace('\'', "''")
        ))?;

        let insert_sql = insert_statement(filename, &csv_table)?;
        log::trace!("{}", insert_sql);
        let inserted = tx.execute(&insert_sql, [])?;

        tx.execute_batch(&format!("DROP TABLE temp.{csv_table};"))?;

        log::info!("Imported {} records from {}", inserted, filename);
        insert_count += inserted;
    }

    // Indexes are dropped along with their tables
    tx.execute_batch(&Sql000002CtaIndexes::up_sql())?;
    check_foreign_keys(&tx)?;
    tx.commit()?;

    Ok(insert_count)
}
