//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod location_query;
mod units;
mod user_id;
mod weather_data_type;

pub use geo_location::{GeoLocation, validate_coordinates};
pub use location_query::{LocationKind, LocationQuery};
pub use units::{TemperatureUnit, UnitPreferences, WindUnit};
pub use user_id::UserId;
pub use weather_data_type::WeatherDataType;
