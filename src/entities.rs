use rusqlite::Row;

pub type StationId = i64;
pub type StopId = i64;

/// A station complex, e.g. "Clark/Lake"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Station {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}

/// Station along with its summed ridership, as ranked by the top-N report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedStation {
    pub station: Station,
    pub total_riders: i64,
}

impl RankedStation {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(RankedStation {
            station: Station::from_row(row)?,
            total_riders: row.get(2)?,
        })
    }
}

/// A directional platform within a station
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub station_id: StationId,
    pub direction: String,
    pub ada: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl Stop {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Stop {
            id: row.get(0)?,
            name: row.get(1)?,
            station_id: row.get(2)?,
            direction: row.get(3)?,
            ada: row.get(4)?,
            latitude: row.get(5)?,
            longitude: row.get(6)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Coordinates {
            latitude: row.get(0)?,
            longitude: row.get(1)?,
        })
    }
}

/// Classification of a ridership record, stored as a one letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Weekday,
    Saturday,
    SundayHoliday,
}

impl DayType {
    pub fn code(&self) -> &'static str {
        match self {
            DayType::Weekday => "W",
            DayType::Saturday => "A",
            DayType::SundayHoliday => "U",
        }
    }
}

/// Ridership of one station split by day type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RidershipBreakdown {
    pub weekday: i64,
    pub saturday: i64,
    pub sunday_holiday: i64,
}

impl RidershipBreakdown {
    #[allow(dead_code)]
    pub fn total(&self) -> i64 {
        self.weekday + self.saturday + self.sunday_holiday
    }
}
