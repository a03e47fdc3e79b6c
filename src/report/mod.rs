//! The reporting service: named operations over the CTA store.
//!
//! Each operation builds one parameterized statement, runs it on a fresh
//! connection and converts the result. Any failure comes back as a
//! [`ReportError`] naming the operation.

pub mod error;
mod ridership;
mod stations;
mod stops;

use crate::{config::StoreConfig, db::store::Store};

pub use error::ReportError;

pub struct ReportingService {
    store: Store,
}

impl ReportingService {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_store(Store::new(config))
    }

    pub fn with_store(store: Store) -> Self {
        Self { store }
    }

    /// Opens and closes a connection to the store, e.g. at startup
    pub fn test_connection(&self) -> bool {
        self.store.test_connection()
    }
}
