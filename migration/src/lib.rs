pub mod raw;

use rusqlite::Connection;

use crate::raw::*;

#[derive(thiserror::Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Down migration not implemented for {0}")]
    Irreversible(String),
}

pub type MigrationResult<T> = Result<T, MigrationError>;

pub struct Migrator;

sql_up_down!("000001_cta_tables");
sql_up!("000002_cta_indexes");

impl Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Sql000001CtaTables::boxed(),
            Sql000002CtaIndexes::boxed(),
        ]
    }

    /// Schema version recorded in the database file
    pub fn version(db: &Connection) -> MigrationResult<usize> {
        let version: i64 = db.pragma_query_value(None, "user_version", |r| r.get(0))?;
        Ok(version as usize)
    }

    /// Applies every migration newer than the recorded version, in one transaction.
    /// Returns the number of migrations applied.
    pub fn up(db: &mut Connection) -> MigrationResult<usize> {
        let current = Self::version(db)?;
        let migrations = Self::migrations();

        let tx = db.transaction()?;
        let mut applied = 0;
        for migration in migrations.iter().skip(current) {
            log::info!("Applying migration {}", migration.name());
            migration.up(&tx)?;
            applied += 1;
        }
        tx.pragma_update(None, "user_version", (current + applied) as i64)?;
        tx.commit()?;

        Ok(applied)
    }

    /// Reverts the newest `steps` migrations
    pub fn down(db: &mut Connection, steps: usize) -> MigrationResult<usize> {
        let current = Self::version(db)?;
        let migrations = Self::migrations();

        let tx = db.transaction()?;
        let mut reverted = 0;
        for migration in migrations.iter().take(current).rev().take(steps) {
            log::info!("Reverting migration {}", migration.name());
            migration.down(&tx)?;
            reverted += 1;
        }
        tx.pragma_update(None, "user_version", (current - reverted) as i64)?;
        tx.commit()?;

        Ok(reverted)
    }
}
