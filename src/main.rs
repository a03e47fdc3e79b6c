extern crate derive_builder;

mod config;
mod db;
mod entities;
mod error;
mod import;
mod report;
mod shell;

#[cfg(test)]
mod test_utils;

use std::{env, io, path::PathBuf};

use config::StoreConfig;
use db::store::Store;
use error::CtaResult;
use report::ReportingService;
use shell::{terminal, Shell};

/// Migrates the store and imports CSV data when `CTA_IMPORT_DIR` is set
fn prepare_store(store: &Store) -> CtaResult<()> {
    log::info!("Migrating database");
    store.migrate()?;

    if let Ok(dir) = env::var("CTA_IMPORT_DIR") {
        let dir = PathBuf::from(dir);
        log::info!("Importing CSV files from {:?}", dir);
        let records = import::import_dir(store, &dir)?;
        log::info!("Imported {} records", records);
    }

    Ok(())
}

fn main() -> io::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::try_init().ok();

    log::debug!("Debug logging enabled");

    dotenvy::from_filename(".env").ok();

    let config = StoreConfig::from_env().map_err(error::CtaError::from)?;
    prepare_store(&Store::new(config.clone()))?;

    let service = ReportingService::new(config);
    if !service.test_connection() {
        log::warn!("Store is not reachable, every report will fail");
    }

    let mut shell = Shell::new(service);
    terminal::run(&mut shell, io::stdin().lock(), &mut io::stdout())
}
