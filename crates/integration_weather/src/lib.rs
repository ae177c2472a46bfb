//! WeatherAPI.com integration
//!
//! Client for the WeatherAPI.com REST API (<https://www.weatherapi.com>).
//! Fetches current conditions, forecasts, air quality, alerts, astronomy,
//! location search and history, and normalizes every response into the
//! canonical payloads defined in `domain::weather`.

pub mod api;
pub mod client;
mod error;
pub mod normalize;

pub use client::{WeatherApiClient, WeatherClient, WeatherConfig};
pub use error::WeatherError;
