//! Interactive state over the reporting service.
//!
//! The shell moves between no selection, a selected station and a selected
//! stop. Every transition first clears the fields that depend on it and only
//! fills them in once all of the backing queries have succeeded.

pub mod display;
pub mod terminal;

use crate::{
    entities::StationId,
    report::{ReportError, ReportingService},
};

use self::display::{Screen, StationFields, StopFields};

/// Number of stations listed by the top stations event
pub const TOP_STATIONS: i64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error("No station selected")]
    NoStation,

    #[error("No stop selected")]
    NoStop,

    #[error("'{0}' is not in the list")]
    NotListed(String),

    #[error(transparent)]
    Report(#[from] ReportError),
}

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStation {
    pub id: StationId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Station(SelectedStation),
    Stop {
        station: SelectedStation,
        stop: String,
    },
}

impl Selection {
    pub fn station(&self) -> Option<&SelectedStation> {
        match self {
            Selection::None => None,
            Selection::Station(station) | Selection::Stop { station, .. } => Some(station),
        }
    }
}

pub struct Shell {
    service: ReportingService,
    selection: Selection,
    screen: Screen,
}

impl Shell {
    pub fn new(service: ReportingService) -> Self {
        Self {
            service,
            selection: Selection::None,
            screen: Screen::default(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Lists every station by name
    pub fn load_stations(&mut self) -> ShellResult<()> {
        self.reset();
        let stations = self.service.stations()?;
        self.screen.stations = stations.into_iter().map(|s| s.name).collect();
        Ok(())
    }

    /// Lists the busiest stations, busiest first
    pub fn load_top_stations(&mut self, n: i64) -> ShellResult<()> {
        self.reset();
        let ranked = self.service.top_stations(n)?;
        self.screen.stations = ranked.into_iter().map(|r| r.station.name).collect();
        Ok(())
    }

    /// Lists the stations whose name contains the phrase
    pub fn find_stations(&mut self, phrase: &str) -> ShellResult<()> {
        self.reset();
        let stations = self.service.stations_matching(phrase)?;
        self.screen.stations = stations.into_iter().map(|s| s.name).collect();
        Ok(())
    }

    /// Selects a listed station and shows its stops and ridership
    pub fn select_station(&mut self, name: &str) -> ShellResult<()> {
        self.screen.clear_station(false);
        self.selection = Selection::None;

        if !self.screen.stations.iter().any(|s| s == name) {
            return Err(ShellError::NotListed(name.to_string()));
        }

        let (station, fields) = self.station_fields(name)?;
        self.screen.station = fields;
        self.selection = Selection::Station(station);
        Ok(())
    }

    /// Selects one of the stops of the selected station and shows its details
    pub fn select_stop(&mut self, name: &str) -> ShellResult<()> {
        self.screen.clear_stop();
        let station = self.selection.station().cloned().ok_or(ShellError::NoStation)?;
        self.selection = Selection::Station(station.clone());

        if !self.screen.station.stops.iter().any(|s| s == name) {
            return Err(ShellError::NotListed(name.to_string()));
        }

        self.screen.stop = self.stop_fields(name, station.id)?;
        self.selection = Selection::Stop {
            station,
            stop: name.to_string(),
        };
        Ok(())
    }

    /// Flips the accessibility of the selected stop and shows the stored value
    pub fn toggle_accessibility(&mut self) -> ShellResult<()> {
        let (station, stop) = match &self.selection {
            Selection::Stop { station, stop } => (station.clone(), stop.clone()),
            _ => return Err(ShellError::NoStop),
        };

        self.screen.stop.accessible.clear();
        let result = self
            .service
            .toggle_accessibility(&stop, station.id)
            .and_then(|()| self.service.is_ada(&stop, station.id));

        match result {
            Ok(ada) => {
                self.screen.stop.accessible = display::yes_no(ada);
                Ok(())
            }
            Err(e) => {
                self.screen.clear_stop();
                self.selection = Selection::Station(station);
                Err(e.into())
            }
        }
    }

    fn reset(&mut self) {
        self.screen.clear_station(true);
        self.selection = Selection::None;
    }

    fn station_fields(&self, name: &str) -> ShellResult<(SelectedStation, StationFields)> {
        let service = &self.service;

        let id = service.station_id(name)?;
        let stops = service.stops(id)?;
        let total = service.total_ridership_for(name)?;
        let average = service.average_daily_ridership(name)?;
        let percent = service.percent_of_overall(name)?;
        let breakdown = service.ridership_breakdown(name)?;

        let fields = StationFields {
            stops: stops.into_iter().map(|s| s.name).collect(),
            station_id: id.to_string(),
            total_ridership: display::count(total),
            avg_daily_ridership: display::daily(average),
            percent_ridership: display::percent(percent),
            weekday: display::count(breakdown.weekday),
            saturday: display::count(breakdown.saturday),
            sunday_holiday: display::count(breakdown.sunday_holiday),
        };

        let station = SelectedStation {
            id,
            name: name.to_string(),
        };
        Ok((station, fields))
    }

    fn stop_fields(&self, name: &str, station_id: StationId) -> ShellResult<StopFields> {
        let service = &self.service;

        Ok(StopFields {
            lines: service.lines_at(name, station_id)?,
            accessible: display::yes_no(service.is_ada(name, station_id)?),
            direction: service.direction(name, station_id)?,
            location: display::location(&service.coordinates(name, station_id)?),
        })
    }
}
