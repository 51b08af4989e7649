//! Composition root: the only place that knows about concrete outbound adapters.

use std::{sync::Arc, time::Duration};

use portal_client::{PortalClient, PortalFetchError};

use crate::{
    adapters::outbound::portal::PortalAdapter,
    config::Settings,
    domain::{ports::inbound::MonitoringService, services::MonitoringServiceImpl},
};

/// Builds the monitoring service backed by the grants portal.
pub fn portal_monitoring_service(
    settings: &Settings,
) -> Result<Arc<dyn MonitoringService>, PortalFetchError> {
    let client = PortalClient::new(
        settings.portal.base_url.clone(),
        Duration::from_secs(settings.portal.timeout_secs),
    )?;
    let adapter = PortalAdapter::new(client);
    let rules = settings.monitoring.status_rules();

    Ok(Arc::new(MonitoringServiceImpl::new(Arc::new(adapter), rules)))
}
