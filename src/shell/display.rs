use std::fmt;

use itertools::Itertools;

use crate::entities::Coordinates;

/// Fields shown for the selected station
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationFields {
    pub stops: Vec<String>,
    pub station_id: String,
    pub total_ridership: String,
    pub avg_daily_ridership: String,
    pub percent_ridership: String,
    pub weekday: String,
    pub saturday: String,
    pub sunday_holiday: String,
}

/// Fields shown for the selected stop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopFields {
    pub lines: Vec<String>,
    pub accessible: String,
    pub direction: String,
    pub location: String,
}

/// Everything the shell currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screen {
    pub stations: Vec<String>,
    pub station: StationFields,
    pub stop: StopFields,
}

impl Screen {
    pub fn clear_stop(&mut self) {
        self.stop = StopFields::default();
    }

    /// Clears the station fields and everything below them.
    /// The station list itself is only cleared when asked to.
    pub fn clear_station(&mut self, clear_stations: bool) {
        self.clear_stop();
        self.station = StationFields::default();

        if clear_stations {
            self.stations.clear();
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stations: {}", self.stations.len())?;
        for name in &self.stations {
            writeln!(f, "  {}", name)?;
        }

        let station = &self.station;
        if !station.station_id.is_empty() {
            writeln!(f, "Station ID:            {}", station.station_id)?;
            writeln!(f, "Total ridership:       {}", station.total_ridership)?;
            writeln!(f, "Avg daily ridership:   {}", station.avg_daily_ridership)?;
            writeln!(f, "% ridership:           {}", station.percent_ridership)?;
            writeln!(f, "Weekday:               {}", station.weekday)?;
            writeln!(f, "Saturday:              {}", station.saturday)?;
            writeln!(f, "Sunday/Holiday:        {}", station.sunday_holiday)?;
            writeln!(f, "Stops: {}", station.stops.len())?;
            for name in &station.stops {
                writeln!(f, "  {}", name)?;
            }
        }

        // location is always filled for a selected stop
        let stop = &self.stop;
        if !stop.location.is_empty() {
            writeln!(f, "Handicap accessible:   {}", stop.accessible)?;
            writeln!(f, "Direction of travel:   {}", stop.direction)?;
            writeln!(f, "Location:              {}", stop.location)?;
            writeln!(f, "Lines:                 {}", stop.lines.iter().join(", "))?;
        }

        Ok(())
    }
}

/// Formats a count with thousands separators, e.g. `120,000`
pub fn count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk))
        .join(",");

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn daily(value: i64) -> String {
    format!("{}/day", count(value))
}

pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn yes_no(value: bool) -> String {
    let answer = if value { "Yes" } else { "No" };
    answer.to_string()
}

pub fn location(coordinates: &Coordinates) -> String {
    format!("{:.4}, {:.4}", coordinates.latitude, coordinates.longitude)
}
