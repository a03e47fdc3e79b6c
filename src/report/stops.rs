use sea_query::{Cond, Order, Query, SelectStatement};

use crate::{
    db::{
        schema::{Lines, StopDetails, Stops},
        util::col,
    },
    entities::{Coordinates, StationId, Stop},
};

use super::{
    error::{Cause, FailedIn, ReportResult},
    ReportingService,
};

/// Stops are addressed by name within their station
fn stop_named(stop_name: &str, station_id: StationId) -> Cond {
    Cond::all()
        .add(col((Stops::Table, Stops::Name)).eq(stop_name))
        .add(col((Stops::Table, Stops::StationId)).eq(station_id))
}

fn select_stop_column(column: Stops, stop_name: &str, station_id: StationId) -> SelectStatement {
    Query::select()
        .column((Stops::Table, column))
        .from(Stops::Table)
        .cond_where(stop_named(stop_name, station_id))
        .to_owned()
}

impl ReportingService {
    /// Stops of a station, ordered by name
    pub fn stops(&self, station_id: StationId) -> ReportResult<Vec<Stop>> {
        let query = Query::select()
            .columns([
                Stops::StopId,
                Stops::Name,
                Stops::StationId,
                Stops::Direction,
                Stops::Ada,
                Stops::Latitude,
                Stops::Longitude,
            ])
            .from(Stops::Table)
            .and_where(col(Stops::StationId).eq(station_id))
            .order_by(Stops::Name, Order::Asc)
            .to_owned();

        self.store.query_rows(&query, Stop::from_row).failed_in("stops")
    }

    /// Colors of the lines serving a stop, ordered by color
    pub fn lines_at(&self, stop_name: &str, station_id: StationId) -> ReportResult<Vec<String>> {
        let query = Query::select()
            .column((Lines::Table, Lines::Color))
            .from(Stops::Table)
            .inner_join(
                StopDetails::Table,
                col((Stops::Table, Stops::StopId)).equals((StopDetails::Table, StopDetails::StopId)),
            )
            .inner_join(
                Lines::Table,
                col((StopDetails::Table, StopDetails::LineId)).equals((Lines::Table, Lines::LineId)),
            )
            .cond_where(stop_named(stop_name, station_id))
            .order_by((Lines::Table, Lines::Color), Order::Asc)
            .to_owned();

        self.store
            .query_rows(&query, |r| r.get(0))
            .failed_in("lines_at")
    }

    /// Whether a stop is wheelchair accessible
    pub fn is_ada(&self, stop_name: &str, station_id: StationId) -> ReportResult<bool> {
        let query = select_stop_column(Stops::Ada, stop_name, station_id);

        self.store.query_scalar(&query).failed_in("is_ada")
    }

    pub fn direction(&self, stop_name: &str, station_id: StationId) -> ReportResult<String> {
        let query = select_stop_column(Stops::Direction, stop_name, station_id);

        self.store.query_scalar(&query).failed_in("direction")
    }

    pub fn coordinates(
        &self,
        stop_name: &str,
        station_id: StationId,
    ) -> ReportResult<Coordinates> {
        let query = Query::select()
            .columns([Stops::Latitude, Stops::Longitude])
            .from(Stops::Table)
            .cond_where(stop_named(stop_name, station_id))
            .to_owned();

        self.store
            .query_row(&query, Coordinates::from_row)
            .failed_in("coordinates")
    }

    /// Writes the ADA flag of a stop
    pub fn set_accessibility(
        &self,
        stop_name: &str,
        station_id: StationId,
        ada: bool,
    ) -> ReportResult<()> {
        let update = Query::update()
            .table(Stops::Table)
            .value(Stops::Ada, ada)
            .cond_where(stop_named(stop_name, station_id))
            .to_owned();

        let changed = self.store.execute(&update).failed_in("set_accessibility")?;
        if changed == 0 {
            return Err(Cause::UnknownStop {
                stop: stop_name.to_string(),
                station_id,
            })
            .failed_in("set_accessibility");
        }
        Ok(())
    }

    /// Flips the ADA flag of a stop. Read it back with [`Self::is_ada`].
    pub fn toggle_accessibility(&self, stop_name: &str, station_id: StationId) -> ReportResult<()> {
        let ada = self.is_ada(stop_name, station_id)?;
        self.set_accessibility(stop_name, station_id, !ada)
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils;

    use super::*;

    const INNER_LOOP: &str = "Clark/Lake (Inner Loop)";

    #[test]
    fn test_stops_ordered_by_name() {
        let fixture = test_utils::fixture();

        let stops = fixture.service.stops(1).unwrap();
        let names: Vec<_> = stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Clark/Lake (Blue Line)",
                "Clark/Lake (Inner Loop)",
                "Clark/Lake (Outer Loop)"
            ]
        );
        assert!(stops.iter().all(|s| s.station_id == 1));

        let inner = &stops[1];
        assert_eq!(inner.id, 10);
        assert_eq!(inner.direction, "N");
        assert!(inner.ada);

        assert!(fixture.service.stops(4).unwrap().is_empty());
    }

    #[test]
    fn test_lines_at() {
        let fixture = test_utils::fixture();

        assert_eq!(
            fixture.service.lines_at(INNER_LOOP, 1).unwrap(),
            ["Brown", "Green", "Orange", "Pink", "Purple"]
        );
        assert_eq!(
            fixture.service.lines_at("Clark/Lake (Blue Line)", 1).unwrap(),
            ["Blue"]
        );
        // same name, other station
        assert!(fixture.service.lines_at(INNER_LOOP, 2).unwrap().is_empty());
    }

    #[test]
    fn test_stop_details() {
        let fixture = test_utils::fixture();
        let service = &fixture.service;

        assert!(service.is_ada(INNER_LOOP, 1).unwrap());
        assert!(!service.is_ada("Clark/Lake (Outer Loop)", 1).unwrap());
        assert_eq!(service.direction("Clark/Lake (Outer Loop)", 1).unwrap(), "S");

        let coordinates = service.coordinates(INNER_LOOP, 1).unwrap();
        assert_eq!(coordinates.latitude, 41.885737);
        assert_eq!(coordinates.longitude, -87.630886);
    }

    #[test]
    fn test_unknown_stop() {
        let fixture = test_utils::fixture();
        let service = &fixture.service;

        assert_eq!(service.is_ada("Nowhere", 1).unwrap_err().operation, "is_ada");
        assert_eq!(service.direction(INNER_LOOP, 2).unwrap_err().operation, "direction");
        assert_eq!(service.coordinates("Nowhere", 1).unwrap_err().operation, "coordinates");

        let error = service.set_accessibility("Nowhere", 1, true).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Error in set_accessibility: 'no stop named 'Nowhere' at station 1'"
        );
    }

    #[test]
    fn test_toggle_accessibility_twice_restores() {
        let fixture = test_utils::fixture();
        let service = &fixture.service;

        for stop in ["Clark/Lake (Inner Loop)", "Clark/Lake (Outer Loop)"] {
            let original = service.is_ada(stop, 1).unwrap();

            service.toggle_accessibility(stop, 1).unwrap();
            assert_eq!(service.is_ada(stop, 1).unwrap(), !original);

            service.toggle_accessibility(stop, 1).unwrap();
            assert_eq!(service.is_ada(stop, 1).unwrap(), original);
        }
    }

    #[test]
    fn test_set_accessibility_only_touches_one_stop() {
        let fixture = test_utils::fixture();
        let service = &fixture.service;

        service.set_accessibility("Clark/Lake (Outer Loop)", 1, true).unwrap();

        let stops = service.stops(1).unwrap();
        assert!(stops.iter().all(|s| s.ada));
        assert!(service.is_ada("Jackson (Blue Line)", 2).unwrap());
    }
}
