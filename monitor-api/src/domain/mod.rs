pub mod budget;
mod error;
pub mod lifecycle;
pub mod models;
pub mod ports;
pub mod schedule;
pub mod services;
pub mod status;
pub mod store;
pub mod timeline;

pub use error::MonitoringError;
