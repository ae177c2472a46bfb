//! Domain layer for the weather bot
//!
//! Contains the location parser, measurement units, request-log entity,
//! callback actions, and domain errors. This layer performs no I/O.

pub mod actions;
pub mod entities;
pub mod errors;
pub mod value_objects;
pub mod weather;

pub use actions::{ActionKind, WeatherAction};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
pub use weather::{
    AirQuality, AqiBand, AstronomyData, CurrentConditions, DailyForecastEntry, HistoricalDay,
    HourlyForecastEntry, LocationMatch, Pollutants, WeatherAlert,
};
