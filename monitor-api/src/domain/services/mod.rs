mod monitoring;

pub use monitoring::MonitoringServiceImpl;
