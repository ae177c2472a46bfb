//! Domain entities - Objects with identity and lifecycle

mod request_log;

pub use request_log::RequestLogRecord;
