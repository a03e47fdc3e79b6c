use sea_query::{Alias, Expr, Func, LikeExpr, Order, Query};

use crate::{
    db::{
        schema::{Riderships, Stations},
        util::col,
    },
    entities::{RankedStation, Station, StationId},
};

use super::{
    error::{Cause, FailedIn, ReportResult},
    ReportingService,
};

impl ReportingService {
    /// All stations, ordered by name
    pub fn stations(&self) -> ReportResult<Vec<Station>> {
        let query = Query::select()
            .columns([Stations::StationId, Stations::Name])
            .from(Stations::Table)
            .order_by(Stations::Name, Order::Asc)
            .to_owned();

        self.store
            .query_rows(&query, Station::from_row)
            .failed_in("stations")
    }

    /// The `n` stations with the most riders, busiest first
    pub fn top_stations(&self, n: i64) -> ReportResult<Vec<RankedStation>> {
        if n < 1 {
            return Err(Cause::NonPositiveCount(n)).failed_in("top_stations");
        }

        let total_riders = Alias::new("TotalRiders");

        let query = Query::select()
            .column((Stations::Table, Stations::StationId))
            .column((Stations::Table, Stations::Name))
            .expr_as(
                Func::sum(col((Riderships::Table, Riderships::DailyTotal))),
                total_riders.clone(),
            )
            .from(Riderships::Table)
            .inner_join(
                Stations::Table,
                col((Riderships::Table, Riderships::StationId))
                    .equals((Stations::Table, Stations::StationId)),
            )
            .group_by_columns([
                (Stations::Table, Stations::StationId),
                (Stations::Table, Stations::Name),
            ])
            .order_by(total_riders, Order::Desc)
            .order_by((Stations::Table, Stations::Name), Order::Asc)
            .limit(n as u64)
            .to_owned();

        self.store
            .query_rows(&query, RankedStation::from_row)
            .failed_in("top_stations")
    }

    /// Looks a station up by its exact name
    #[allow(dead_code)]
    pub fn station_by_name(&self, name: &str) -> ReportResult<Station> {
        let query = Query::select()
            .columns([Stations::StationId, Stations::Name])
            .from(Stations::Table)
            .and_where(col(Stations::Name).eq(name))
            .to_owned();

        self.store
            .query_row(&query, Station::from_row)
            .failed_in("station_by_name")
    }

    pub fn station_id(&self, name: &str) -> ReportResult<StationId> {
        let query = Query::select()
            .column(Stations::StationId)
            .from(Stations::Table)
            .and_where(col(Stations::Name).eq(name))
            .to_owned();

        self.store.query_scalar(&query).failed_in("station_id")
    }

    /// Stations whose name contains `phrase`, ordered by name.
    /// The phrase is matched literally, wildcard characters included.
    pub fn stations_matching(&self, phrase: &str) -> ReportResult<Vec<Station>> {
        let pattern = format!("%{}%", escape_like(phrase));

        let query = Query::select()
            .columns([Stations::StationId, Stations::Name])
            .from(Stations::Table)
            .and_where(Expr::col(Stations::Name).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)))
            .order_by(Stations::Name, Order::Asc)
            .to_owned();

        self.store
            .query_rows(&query, Station::from_row)
            .failed_in("stations_matching")
    }
}

const LIKE_ESCAPE: char = '!';

fn escape_like(phrase: &str) -> String {
    let mut escaped = String::with_capacity(phrase.len());
    for c in phrase.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
