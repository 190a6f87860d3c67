//! One-shot setup: creates the dashboard group and the audit dashboard.
//!
//! There is no existence check, so re-running creates duplicates. Any
//! failure exits with status 1; a group created before a failed dashboard
//! creation is left in place.

use oci_audit::application::provisioner::{DashboardProvisioner, DashboardScope};
use oci_audit::config::Config;
use oci_audit::infrastructure::oci::auth::ResourcePrincipal;
use oci_audit::infrastructure::oci::dashboard::OciDashboardClient;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let auth = ResourcePrincipal::from_env()?;
    info!("Tenancy: {}, Region: {}", auth.tenancy_id, auth.region);

    let scope = DashboardScope {
        tenancy_id: auth.tenancy_id.clone(),
        region: auth.region.clone(),
        namespace: config.namespace.clone(),
        resource_group: config.resource_group.clone(),
    };

    let dashboards = Arc::new(OciDashboardClient::new(
        auth,
        config.dashboard_endpoint.clone(),
    ));
    let created = DashboardProvisioner::new(dashboards).provision(&scope).await?;

    info!(
        "Provisioning complete: group {}, dashboard {}",
        created.group_id, created.dashboard_id
    );
    Ok(())
}
