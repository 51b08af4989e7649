use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt::time::LocalTime, layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app_state;
mod config;
mod domain;
mod factory;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "monitor_api=debug,portal_client=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime::rfc_3339()))
        .init();

    let settings = config::read_config().context("Failed to read configuration")?;

    let monitoring = factory::portal_monitoring_service(&settings)
        .context("Failed to create the grants portal client")?;
    let app_state = app_state::AppState::new(settings.application.app_url.clone(), monitoring);
    let app = router::create(app_state);

    let addr = format!("{}:{}", settings.application.host, settings.application.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(
        "Listening on {} (portal: {})",
        listener.local_addr()?,
        settings.portal.base_url
    );

    axum::serve(listener, app).await?;
    Ok(())
}
