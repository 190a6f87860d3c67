//! Service traits implemented by the OCI infrastructure clients.
//!
//! Application code only sees these seams, which is what lets the audit
//! and provisioning flows run against the in-memory mocks in tests.

use crate::domain::dashboard::{CreateDashboardDetails, CreateDashboardGroupDetails};
use crate::domain::types::{Compartment, IdentityDomain, MetricStream, Policy};
use anyhow::Result;
use async_trait::async_trait;

/// Tenancy-level identity reads.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Every compartment in the tenancy subtree, fully paged. The root
    /// compartment is not part of the subtree listing and must be fetched
    /// separately via [`get_compartment`](Self::get_compartment).
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>>;

    async fn get_compartment(&self, compartment_id: &str) -> Result<Compartment>;

    async fn list_policies(&self, compartment_id: &str) -> Result<Vec<Policy>>;

    async fn list_domains(&self, compartment_id: &str) -> Result<Vec<IdentityDomain>>;
}

/// Reads against a single identity domain's own endpoint.
#[async_trait]
pub trait DynamicGroupService: Send + Sync {
    /// Total number of dynamic resource groups in the domain behind
    /// `domain_url`.
    async fn count_dynamic_groups(&self, domain_url: &str) -> Result<u64>;
}

/// Metric ingestion.
#[async_trait]
pub trait MonitoringService: Send + Sync {
    /// Submit one batch of metric streams. Batching policy lives in the
    /// caller; this is exactly one remote write.
    async fn post_metric_data(&self, batch: &[MetricStream]) -> Result<()>;
}

/// Dashboard service writes, both returning the OCID of the created
/// resource.
#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn create_dashboard_group(
        &self,
        details: &CreateDashboardGroupDetails,
    ) -> Result<String>;

    async fn create_dashboard(&self, details: &CreateDashboardDetails) -> Result<String>;
}
