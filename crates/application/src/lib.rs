//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions, the request orchestrator, and the
//! localized rendering of weather payloads. Orchestrates domain objects and
//! infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
