use crate::db::error::DbError;

/// What went wrong underneath a failed reporting operation.
/// Only ever seen through the message of a [`ReportError`].
#[derive(thiserror::Error, Debug)]
pub enum Cause {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("N must be positive, got {0}")]
    NonPositiveCount(i64),

    #[error("no ridership days recorded for station '{0}'")]
    NoRidershipDays(String),

    #[error("no ridership recorded for any station")]
    NoRidership,

    #[error("no stop named '{stop}' at station {station_id}")]
    UnknownStop { stop: String, station_id: i64 },
}

/// The single failure surfaced by the reporting service, carrying the
/// underlying message
#[derive(thiserror::Error, Debug)]
#[error("Error in {operation}: '{source}'")]
pub struct ReportError {
    pub operation: &'static str,
    pub source: Cause,
}

pub type ReportResult<T> = Result<T, ReportError>;

pub(crate) trait FailedIn<T> {
    /// Wraps any failure as a [`ReportError`] for the named operation
    fn failed_in(self, operation: &'static str) -> ReportResult<T>;
}

impl<T, E> FailedIn<T> for Result<T, E>
where
    E: Into<Cause>,
{
    fn failed_in(self, operation: &'static str) -> ReportResult<T> {
        self.map_err(|e| {
            let error = ReportError {
                operation,
                source: e.into(),
            };
            log::debug!("{}", error);
            error
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_message_carries_cause() {
        let result: Result<(), DbError> = Err(DbError::NotFound);
        let error = result.failed_in("station_id").unwrap_err();

        assert_eq!(error.to_string(), "Error in station_id: 'No matching row'");
        assert!(std::error::Error::source(&error).is_some());
    }
}
