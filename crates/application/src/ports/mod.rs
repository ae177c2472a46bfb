//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod preference_port;
mod request_log_port;
mod text_lookup_port;
mod weather_cache_port;
mod weather_port;

#[cfg(test)]
pub use preference_port::MockPreferencePort;
pub use preference_port::{FavoriteLocation, PreferencePort};
#[cfg(test)]
pub use request_log_port::MockRequestLogPort;
pub use request_log_port::{
    AnalyticsSummary, LanguageCount, LocationCount, RequestLogPort, UserStats,
};
#[cfg(test)]
pub use text_lookup_port::MockTextLookupPort;
pub use text_lookup_port::TextLookupPort;
#[cfg(test)]
pub use weather_cache_port::MockWeatherCachePort;
pub use weather_cache_port::{CacheKey, EvictionReport, WeatherCachePort, WeatherCachePortExt};
#[cfg(test)]
pub use weather_port::MockWeatherPort;
pub use weather_port::WeatherPort;
