use sea_query::{Func, Query, SelectStatement};

use crate::{
    db::{
        schema::{Riderships, Stations},
        util::{col, sum_or_zero},
    },
    entities::{DayType, RidershipBreakdown},
};

use super::{
    error::{Cause, FailedIn, ReportResult},
    ReportingService,
};

/// Riderships joined to their station, restricted to the named station
fn riderships_of(station_name: &str) -> SelectStatement {
    Query::select()
        .from(Riderships::Table)
        .inner_join(
            Stations::Table,
            col((Riderships::Table, Riderships::StationId))
                .equals((Stations::Table, Stations::StationId)),
        )
        .and_where(col((Stations::Table, Stations::Name)).eq(station_name))
        .to_owned()
}

impl ReportingService {
    /// Riders over all stations and all days
    pub fn total_ridership(&self) -> ReportResult<i64> {
        let query = Query::select()
            .expr(sum_or_zero(col(Riderships::DailyTotal)))
            .from(Riderships::Table)
            .to_owned();

        self.store
            .query_scalar(&query)
            .failed_in("total_ridership")
    }

    /// Riders at the named station over all days, zero for an unknown station
    pub fn total_ridership_for(&self, station_name: &str) -> ReportResult<i64> {
        let query = riderships_of(station_name)
            .expr(sum_or_zero(col((Riderships::Table, Riderships::DailyTotal))))
            .to_owned();

        self.store
            .query_scalar(&query)
            .failed_in("total_ridership_for")
    }

    /// Number of days with ridership recorded for the named station
    pub fn day_count(&self, station_name: &str) -> ReportResult<i64> {
        let query = riderships_of(station_name)
            .expr(Func::count(col((Riderships::Table, Riderships::Date))))
            .to_owned();

        self.store.query_scalar(&query).failed_in("day_count")
    }

    pub fn ridership_by_day_type(
        &self,
        station_name: &str,
        day_type: DayType,
    ) -> ReportResult<i64> {
        let query = riderships_of(station_name)
            .expr(sum_or_zero(col((Riderships::Table, Riderships::DailyTotal))))
            .and_where(col((Riderships::Table, Riderships::TypeOfDay)).eq(day_type.code()))
            .to_owned();

        self.store
            .query_scalar(&query)
            .failed_in("ridership_by_day_type")
    }

    /// Weekday, Saturday and Sunday/holiday ridership of the named station
    pub fn ridership_breakdown(&self, station_name: &str) -> ReportResult<RidershipBreakdown> {
        Ok(RidershipBreakdown {
            weekday: self.ridership_by_day_type(station_name, DayType::Weekday)?,
            saturday: self.ridership_by_day_type(station_name, DayType::Saturday)?,
            sunday_holiday: self.ridership_by_day_type(station_name, DayType::SundayHoliday)?,
        })
    }

    /// Total ridership divided by the number of recorded days, rounded down.
    /// A station without recorded days has no average and is an error.
    pub fn average_daily_ridership(&self, station_name: &str) -> ReportResult<i64> {
        let total = self.total_ridership_for(station_name)?;
        let days = self.day_count(station_name)?;

        if days == 0 {
            return Err(Cause::NoRidershipDays(station_name.to_string()))
                .failed_in("average_daily_ridership");
        }
        Ok(total / days)
    }

    /// Share of all ridership taken by the named station, as a percentage
    pub fn percent_of_overall(&self, station_name: &str) -> ReportResult<f64> {
        let total = self.total_ridership_for(station_name)?;
        let overall = self.total_ridership()?;

        if overall == 0 {
            return Err(Cause::NoRidership).failed_in("percent_of_overall");
        }
        Ok(total as f64 / overall as f64 * 100.0)
    }
}

#[cfg(test)]
mod test {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_total_ridership() {
        let fixture = test_utils::fixture();

        assert_eq!(fixture.service.total_ridership().unwrap(), 227_000);
        assert_eq!(
            fixture.service.total_ridership_for("Clark/Lake").unwrap(),
            120_000
        );
        assert_eq!(fixture.service.total_ridership_for("O'Hare").unwrap(), 5_000);
        assert_eq!(fixture.service.total_ridership_for("Quincy/Wells").unwrap(), 0);
        assert_eq!(fixture.service.total_ridership_for("Nowhere").unwrap(), 0);
    }

    #[test]
    fn test_day_count() {
        let fixture = test_utils::fixture();

        assert_eq!(fixture.service.day_count("Clark/Lake").unwrap(), 300);
        assert_eq!(fixture.service.day_count("Jackson").unwrap(), 100);
        assert_eq!(fixture.service.day_count("Quincy/Wells").unwrap(), 0);
    }

    #[test]
    fn test_average_daily_ridership() {
        let fixture = test_utils::fixture();

        assert_eq!(
            fixture.service.average_daily_ridership("Clark/Lake").unwrap(),
            400
        );
        assert_eq!(
            fixture.service.average_daily_ridership("Jackson").unwrap(),
            1_000
        );
    }

    #[test]
    fn test_average_without_days_is_an_error() {
        let fixture = test_utils::fixture();

        let error = fixture
            .service
            .average_daily_ridership("Quincy/Wells")
            .unwrap_err();
        assert_eq!(error.operation, "average_daily_ridership");
        assert!(matches!(error.source, Cause::NoRidershipDays(ref name) if name == "Quincy/Wells"));
    }

    #[test]
    fn test_percent_of_overall() {
        let fixture = test_utils::fixture();

        let percent = fixture.service.percent_of_overall("Clark/Lake").unwrap();
        assert!((percent - 52.863).abs() < 0.001, "{}", percent);
        assert_eq!(fixture.service.percent_of_overall("Quincy/Wells").unwrap(), 0.0);
    }

    #[test]
    fn test_percent_without_any_ridership_is_an_error() {
        let fixture = test_utils::empty_fixture();

        let error = fixture.service.percent_of_overall("Clark/Lake").unwrap_err();
        assert!(matches!(error.source, Cause::NoRidership));
    }

    #[test]
    fn test_ridership_by_day_type() {
        let fixture = test_utils::fixture();

        let service = &fixture.service;
        assert_eq!(service.ridership_by_day_type("Clark/Lake", DayType::Weekday).unwrap(), 80_000);
        assert_eq!(service.ridership_by_day_type("Clark/Lake", DayType::Saturday).unwrap(), 20_000);
        assert_eq!(
            service.ridership_by_day_type("Clark/Lake", DayType::SundayHoliday).unwrap(),
            20_000
        );
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let fixture = test_utils::fixture();

        for station in fixture.service.stations().unwrap() {
            let breakdown = fixture.service.ridership_breakdown(&station.name).unwrap();
            let total = fixture.service.total_ridership_for(&station.name).unwrap();
            assert_eq!(breakdown.total(), total, "{}", station.name);
        }
    }

    #[test]
    fn test_failure_is_reported_for_operation() {
        let fixture = test_utils::fixture();
        let service = test_utils::service_at(fixture.dir.path().join("missing.db"));

        let error = service.total_ridership().unwrap_err();
        assert_eq!(error.operation, "total_ridership");
        assert!(error.to_string().starts_with("Error in total_ridership: '"));
    }
}
