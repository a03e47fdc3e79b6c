//! Table and column identifiers of the CTA store, as created by the
//! `000001_cta_tables` migration.

use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
#[iden = "Stations"]
pub enum Stations {
    Table,
    #[iden = "StationID"]
    StationId,
    #[iden = "Name"]
    Name,
}

#[derive(Iden, Clone, Copy)]
#[iden = "Stops"]
pub enum Stops {
    Table,
    #[iden = "StopID"]
    StopId,
    #[iden = "Name"]
    Name,
    #[iden = "StationID"]
    StationId,
    #[iden = "Direction"]
    Direction,
    #[iden = "ADA"]
    Ada,
    #[iden = "Latitude"]
    Latitude,
    #[iden = "Longitude"]
    Longitude,
}

#[derive(Iden, Clone, Copy)]
#[iden = "Riderships"]
pub enum Riderships {
    Table,
    #[iden = "StationID"]
    StationId,
    #[iden = "Date"]
    Date,
    #[iden = "TypeOfDay"]
    TypeOfDay,
    #[iden = "DailyTotal"]
    DailyTotal,
}

#[derive(Iden, Clone, Copy)]
#[iden = "Lines"]
pub enum Lines {
    Table,
    #[iden = "LineID"]
    LineId,
    #[iden = "Color"]
    Color,
}

#[derive(Iden, Clone, Copy)]
#[iden = "StopDetails"]
pub enum StopDetails {
    Table,
    #[iden = "StopID"]
    StopId,
    #[iden = "LineID"]
    LineId,
}
