use std::sync::Arc;

use crate::domain::ports::inbound::MonitoringService;

#[derive(Clone)]
pub struct AppState {
    pub app_url: String,
    pub monitoring: Arc<dyn MonitoringService>,
}

impl AppState {
    pub fn new(app_url: impl Into<String>, monitoring: Arc<dyn MonitoringService>) -> Self {
        Self {
            app_url: app_url.into(),
            monitoring,
        }
    }
}
