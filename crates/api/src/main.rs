use std::sync::Arc;

use anyhow::Context;

use debtview_api::app::{AppServices, build_app};
use debtview_api::sweep::spawn_overdue_sweep;
use debtview_infra::{AppConfig, build_stores};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    debtview_observability::init(config.log_format);

    let stores = build_stores(&config)?;
    tracing::info!(
        invoices = stores.invoices.len(),
        energy_records = stores.energy.len(),
        "stores ready"
    );
    let services = Arc::new(AppServices::from_stores(stores));

    let _sweep = config
        .overdue_sweep_interval
        .map(|interval| spawn_overdue_sweep(services.clone(), interval));

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
