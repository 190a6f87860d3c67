//! Audit entry point: scans the tenancy, aggregates IAM usage and
//! publishes the metrics.
//!
//! Built to run as a managed function: the outcome is reported as a
//! `Success` / `Failed: ...` string on stdout rather than an exit code.

use oci_audit::application::audit::AuditRunner;
use oci_audit::config::Config;
use oci_audit::infrastructure::oci::auth::ResourcePrincipal;
use oci_audit::infrastructure::oci::identity::OciIdentityClient;
use oci_audit::infrastructure::oci::identity_domains::OciIdentityDomainsClient;
use oci_audit::infrastructure::oci::monitoring::OciMonitoringClient;
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

    info!("Function invoked");
    let status = match build_runner() {
        Ok(runner) => {
            let status = runner.handle().await;
            if status == "Success" {
                info!("Function completed successfully");
            }
            status
        }
        Err(e) => {
            error!("{e:#}");
            format!("Failed: {e:#}")
        }
    };
    println!("{status}");
}

fn build_runner() -> anyhow::Result<AuditRunner> {
    let config = Config::from_env()?;

    info!("Loading OCI clients");
    let auth = ResourcePrincipal::from_env()?;
    info!("Tenancy: {}, Region: {}", auth.tenancy_id, auth.region);

    let identity = Arc::new(OciIdentityClient::new(
        auth.clone(),
        config.identity_endpoint.clone(),
    ));
    let dynamic_groups = Arc::new(OciIdentityDomainsClient::new(auth.clone()));
    let monitoring = Arc::new(OciMonitoringClient::new(
        auth.clone(),
        config.telemetry_endpoint.clone(),
    ));

    let tenancy_id = auth.tenancy_id.clone();
    let region = auth.region.clone();
    Ok(AuditRunner::new(
        identity,
        dynamic_groups,
        monitoring,
        config,
        tenancy_id,
        region,
    ))
}
