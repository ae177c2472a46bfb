//! Application services - Use case implementations

mod action_handler;
mod report_renderer;
pub mod weather_formatter;
mod weather_service;

pub use action_handler::ActionHandler;
pub use report_renderer::ReportRenderer;
pub use weather_service::{
    DEFAULT_CACHE_TTL, DEFAULT_HISTORY_TTL, FullReport, WeatherService, WeatherServiceConfig,
};
