use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use rusqlite::params;
use tempfile::TempDir;

use crate::{config::StoreConfig, db::store::Store, report::ReportingService};

pub fn init() {
    dotenvy::from_filename(".dev.vars").ok();
    env_logger::try_init().ok();
}

pub fn store_at(path: PathBuf, create_if_missing: bool) -> Store {
    init();

    let config = StoreConfig::builder()
        .path(path)
        .create_if_missing(create_if_missing)
        .build()
        .unwrap();
    Store::new(config)
}

pub fn service_at(path: PathBuf) -> ReportingService {
    ReportingService::with_store(store_at(path, false))
}

/// A migrated store in its own temporary directory
pub struct Fixture {
    pub dir: TempDir,
    pub store: Store,
    pub service: ReportingService,
}

/// Migrated store with no rows
pub fn empty_fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = store_at(dir.path().join("cta.db"), true);
    store.migrate().unwrap();

    Fixture {
        service: ReportingService::with_store(store.clone()),
        store,
        dir,
    }
}

// (station id, days, riders per day)
const RIDERSHIP: [(i64, i64, i64); 4] = [(1, 300, 400), (2, 100, 1_000), (3, 10, 500), (5, 20, 100)];

/// Migrated store seeded with a small slice of the CTA network:
///
/// | station | days | riders/day | total |
/// |---|---|---|---|
/// | 1 Clark/Lake | 300 | 400 | 120,000 |
/// | 2 Jackson | 100 | 1,000 | 100,000 |
/// | 3 O'Hare | 10 | 500 | 5,000 |
/// | 4 Quincy/Wells | 0 | | 0 |
/// | 5 UIC-Halsted | 20 | 100 | 2,000 |
///
/// Every sixth day is a Saturday and the one after a Sunday/holiday, so
/// Clark/Lake splits into 80,000 weekday, 20,000 Saturday and 20,000
/// Sunday/holiday riders.
pub fn fixture() -> Fixture {
    let fixture = empty_fixture();

    let mut db = fixture.store.connect().unwrap();
    let tx = db.transaction().unwrap();

    for (id, name) in [
        (1, "Clark/Lake"),
        (2, "Jackson"),
        (3, "O'Hare"),
        (4, "Quincy/Wells"),
        (5, "UIC-Halsted"),
    ] {
        tx.execute("INSERT INTO Stations VALUES (?1, ?2)", params![id, name])
            .unwrap();
    }

    for (id, color) in [
        (1, "Blue"),
        (2, "Brown"),
        (3, "Green"),
        (4, "Orange"),
        (5, "Pink"),
        (6, "Purple"),
    ] {
        tx.execute("INSERT INTO Lines VALUES (?1, ?2)", params![id, color])
            .unwrap();
    }

    let stops: [(i64, &str, i64, &str, bool, f64, f64, &[i64]); 6] = [
        (10, "Clark/Lake (Inner Loop)", 1, "N", true, 41.885737, -87.630886, &[2, 3, 4, 5, 6]),
        (11, "Clark/Lake (Outer Loop)", 1, "S", false, 41.885737, -87.630886, &[2, 3, 4, 5, 6]),
        (12, "Clark/Lake (Blue Line)", 1, "E", true, 41.885737, -87.630886, &[1]),
        (20, "Jackson (Blue Line)", 2, "S", true, 41.878183, -87.629296, &[1]),
        (30, "O'Hare (Forest Park-bound)", 3, "E", true, 41.97766526, -87.90422307, &[1]),
        (50, "UIC-Halsted (Forest Park-bound)", 5, "W", false, 41.875474, -87.649707, &[1]),
    ];
    for (id, name, station_id, direction, ada, lat, lon, lines) in stops {
        tx.execute(
            "INSERT INTO Stops VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, name, station_id, direction, ada, lat, lon],
        )
        .unwrap();
        for line in lines {
            tx.execute("INSERT INTO StopDetails VALUES (?1, ?2)", params![id, line])
                .unwrap();
        }
    }

    let first_day = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
    for (station_id, days, riders) in RIDERSHIP {
        for day in 0..days {
            let date = first_day + Days::new(day as u64);
            let day_type = match day % 6 {
                4 => "A",
                5 => "U",
                _ => "W",
            };
            tx.execute(
                "INSERT INTO Riderships VALUES (?1, ?2, ?3, ?4)",
                params![station_id, date.format("%Y-%m-%d").to_string(), day_type, riders],
            )
            .unwrap();
        }
    }

    tx.commit().unwrap();
    fixture
}
