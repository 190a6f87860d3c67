//! The audit run: enumerate the tenancy, aggregate usage, publish
//! metrics.
//!
//! Failure handling is two-tier. Listing domains for a compartment or
//! counting a domain's dynamic groups may fail without aborting the run;
//! those resources contribute zero and the run still reports best-effort
//! totals. Everything else (policy listing, compartment enumeration, a
//! batch publish failure) propagates and fails the run.

use crate::application::aggregator::UsageReport;
use crate::application::metrics::MetricStreamBuilder;
use crate::application::publisher::MetricPublisher;
use crate::config::Config;
use crate::domain::ports::{DynamicGroupService, IdentityService, MonitoringService};
use crate::domain::types::Compartment;
use anyhow::{Context, Result};
use chrono::{Timelike, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct AuditRunner {
    identity: Arc<dyn IdentityService>,
    dynamic_groups: Arc<dyn DynamicGroupService>,
    monitoring: Arc<dyn MonitoringService>,
    config: Config,
    tenancy_id: String,
    region: String,
}

impl AuditRunner {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        dynamic_groups: Arc<dyn DynamicGroupService>,
        monitoring: Arc<dyn MonitoringService>,
        config: Config,
        tenancy_id: String,
        region: String,
    ) -> Self {
        Self {
            identity,
            dynamic_groups,
            monitoring,
            config,
            tenancy_id,
            region,
        }
    }

    /// Managed-function style entry: the outcome is reported as a string,
    /// never as an error.
    pub async fn handle(&self) -> String {
        match self.run().await {
            Ok(()) => "Success".to_string(),
            Err(e) => {
                error!("{e:#}");
                format!("Failed: {e:#}")
            }
        }
    }

    /// One full audit: scan, aggregate, log a summary, publish.
    pub async fn run(&self) -> Result<()> {
        info!("Listing compartments");
        let compartments = self.scan_set().await?;
        info!("Found {} compartments", compartments.len());

        let report = self.scan(&compartments).await?;

        let now = Utc::now();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        let builder = MetricStreamBuilder::new(
            &self.tenancy_id,
            &self.config.namespace,
            &self.config.resource_group,
            timestamp,
        );
        let streams = builder.build(&report, &self.config.limits);

        self.log_summary(&report, timestamp);

        info!("--- Pushing metrics to OCI Monitoring ---");
        let publisher = MetricPublisher::new(self.monitoring.clone(), self.config.batch_size);
        publisher.publish(&streams).await
    }

    /// The subtree listing plus the root compartment, which the listing
    /// omits.
    async fn scan_set(&self) -> Result<Vec<Compartment>> {
        let mut compartments = self
            .identity
            .list_compartments(&self.tenancy_id)
            .await
            .context("Failed to list compartments")?;
        let root = self
            .identity
            .get_compartment(&self.tenancy_id)
            .await
            .context("Failed to fetch the root compartment")?;
        compartments.push(root);
        Ok(compartments)
    }

    async fn scan(&self, compartments: &[Compartment]) -> Result<UsageReport> {
        let mut report = UsageReport::default();

        for comp in compartments {
            if !comp.is_active() {
                debug!(
                    "Skipping compartment {} in state {:?}",
                    comp.name, comp.lifecycle_state
                );
                continue;
            }

            info!("Scanning compartment {} ({})", comp.name, comp.id);

            let policies = self
                .identity
                .list_policies(&comp.id)
                .await
                .with_context(|| format!("Failed to list policies in compartment {}", comp.name))?;
            let statements: u64 = policies.iter().map(|p| p.statements.len() as u64).sum();
            report.policy_counts.add(&comp.name, policies.len() as u64);
            report.statement_counts.add(&comp.name, statements);

            match self.identity.list_domains(&comp.id).await {
                Ok(domains) => {
                    debug!("Found {} domains in compartment {}", domains.len(), comp.name);
                    for domain in domains {
                        let count = match self
                            .dynamic_groups
                            .count_dynamic_groups(&domain.url)
                            .await
                        {
                            Ok(count) => count,
                            Err(e) => {
                                warn!(
                                    "Could not fetch dynamic groups for {}: {e:#}",
                                    domain.url
                                );
                                0
                            }
                        };
                        info!(
                            "Domain {} ({}): {} dynamic groups",
                            domain.display_name, domain.url, count
                        );
                        report.dynamic_group_counts.add(&domain.display_name, count);
                    }
                }
                Err(e) => {
                    warn!(
                        "Could not fetch domains for compartment {}: {e:#}",
                        comp.name
                    );
                }
            }
        }

        Ok(report)
    }

    fn log_summary(&self, report: &UsageReport, timestamp: chrono::DateTime<Utc>) {
        let limits = &self.config.limits;
        info!("=== Summary (UTC) ===");
        info!("Timestamp: {}", timestamp.to_rfc3339());
        info!("Region:    {}", self.region);
        info!("Namespace: {}", self.config.namespace);
        info!("Resource Group: {}", self.config.resource_group);
        info!(
            "Total policies:   {} (limit {})",
            report.total_policies(),
            limits.policies
        );
        info!(
            "Total statements: {} (limit {})",
            report.total_statements(),
            limits.statements
        );
        info!(
            "Total dynamic groups: {} (limit {})",
            report.total_dynamic_groups(),
            limits.dynamic_groups
        );

        info!("Top 10 by policies:");
        for (name, count) in report.top_policies() {
            info!("  {name}: {count}");
        }
        info!("Top 10 by statements:");
        for (name, count) in report.top_statements() {
            info!("  {name}: {count}");
        }
    }
}
