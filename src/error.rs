use crate::{config::ConfigError, db::error::DbError, import::ImportError};

#[derive(thiserror::Error, Debug)]
pub enum CtaError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),
}

impl From<CtaError> for std::io::Error {
    fn from(e: CtaError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, e)
    }
}

pub type CtaResult<T> = Result<T, CtaError>;
