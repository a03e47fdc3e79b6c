#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("{0}")]
    Prepare(String),

    #[error("{0}")]
    Query(#[from] rusqlite::Error),

    #[error("{0}")]
    Migration(#[from] migration::MigrationError),

    #[error("No matching row")]
    NotFound,
}

impl From<sea_query::error::Error> for DbError {
    fn from(e: sea_query::error::Error) -> Self {
        DbError::Prepare(format!("{}", e))
    }
}

pub type DbResult<T> = Result<T, DbError>;
