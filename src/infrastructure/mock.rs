//! In-memory service doubles used by the integration tests.

use crate::domain::dashboard::{CreateDashboardDetails, CreateDashboardGroupDetails};
use crate::domain::ports::{
    DashboardService, DynamicGroupService, IdentityService, MonitoringService,
};
use crate::domain::types::{Compartment, IdentityDomain, LifecycleState, MetricStream, Policy};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A fixture tenancy: a root compartment, a subtree of compartments with
/// policies and domains, and per-compartment failure switches.
pub struct MockIdentityService {
    pub root: Compartment,
    pub compartments: Vec<Compartment>,
    pub policies: HashMap<String, Vec<Policy>>,
    pub domains: HashMap<String, Vec<IdentityDomain>>,
    pub fail_policy_listing: HashSet<String>,
    pub fail_domain_listing: HashSet<String>,
}

impl MockIdentityService {
    pub fn new(tenancy_id: &str, root_name: &str) -> Self {
        Self {
            root: Compartment {
                id: tenancy_id.to_string(),
                name: root_name.to_string(),
                lifecycle_state: LifecycleState::Active,
            },
            compartments: Vec::new(),
            policies: HashMap::new(),
            domains: HashMap::new(),
            fail_policy_listing: HashSet::new(),
            fail_domain_listing: HashSet::new(),
        }
    }

    pub fn add_compartment(&mut self, id: &str, name: &str, state: LifecycleState) {
        self.compartments.push(Compartment {
            id: id.to_string(),
            name: name.to_string(),
            lifecycle_state: state,
        });
    }

    pub fn add_policy(&mut self, compartment_id: &str, name: &str, statements: &[&str]) {
        let entry = self.policies.entry(compartment_id.to_string()).or_default();
        entry.push(Policy {
            id: format!("ocid1.policy.oc1..{}-{}", compartment_id, entry.len()),
            name: name.to_string(),
            compartment_id: compartment_id.to_string(),
            statements: statements.iter().map(|s| s.to_string()).collect(),
        });
    }

    pub fn add_domain(&mut self, compartment_id: &str, display_name: &str, url: &str) {
        let entry = self.domains.entry(compartment_id.to_string()).or_default();
        entry.push(IdentityDomain {
            id: format!("ocid1.domain.oc1..{}-{}", compartment_id, entry.len()),
            display_name: display_name.to_string(),
            url: url.to_string(),
        });
    }
}

#[async_trait]
impl IdentityService for MockIdentityService {
    async fn list_compartments(&self, _tenancy_id: &str) -> Result<Vec<Compartment>> {
        Ok(self.compartments.clone())
    }

    async fn get_compartment(&self, compartment_id: &str) -> Result<Compartment> {
        if compartment_id == self.root.id {
            return Ok(self.root.clone());
        }
        self.compartments
            .iter()
            .find(|c| c.id == compartment_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No such compartment: {compartment_id}"))
    }

    async fn list_policies(&self, compartment_id: &str) -> Result<Vec<Policy>> {
        if self.fail_policy_listing.contains(compartment_id) {
            anyhow::bail!("simulated policy listing outage for {compartment_id}");
        }
        Ok(self.policies.get(compartment_id).cloned().unwrap_or_default())
    }

    async fn list_domains(&self, compartment_id: &str) -> Result<Vec<IdentityDomain>> {
        if self.fail_domain_listing.contains(compartment_id) {
            anyhow::bail!("simulated domain listing outage for {compartment_id}");
        }
        Ok(self.domains.get(compartment_id).cloned().unwrap_or_default())
    }
}

/// Dynamic-group counts keyed by domain url, with per-url failure
/// switches.
#[derive(Default)]
pub struct MockDynamicGroupService {
    pub counts: HashMap<String, u64>,
    pub fail_for: HashSet<String>,
}

impl MockDynamicGroupService {
    pub fn with_counts(counts: &[(&str, u64)]) -> Self {
        Self {
            counts: counts
                .iter()
                .map(|(url, count)| (url.to_string(), *count))
                .collect(),
            fail_for: HashSet::new(),
        }
    }
}

#[async_trait]
impl DynamicGroupService for MockDynamicGroupService {
    async fn count_dynamic_groups(&self, domain_url: &str) -> Result<u64> {
        if self.fail_for.contains(domain_url) {
            anyhow::bail!("simulated identity-domains outage for {domain_url}");
        }
        Ok(self.counts.get(domain_url).copied().unwrap_or(0))
    }
}

/// Records every submitted batch; can be told to fail on a given batch
/// number (1-based).
#[derive(Default)]
pub struct MockMonitoringService {
    batches: Mutex<Vec<Vec<MetricStream>>>,
    pub fail_on_batch: Option<usize>,
}

impl MockMonitoringService {
    pub fn failing_on_batch(batch_no: usize) -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail_on_batch: Some(batch_no),
        }
    }

    pub fn batches(&self) -> Vec<Vec<MetricStream>> {
        self.batches.lock().expect("mock lock poisoned").clone()
    }

    /// All accepted streams, flattened in submission order.
    pub fn published(&self) -> Vec<MetricStream> {
        self.batches().into_iter().flatten().collect()
    }
}

#[async_trait]
impl MonitoringService for MockMonitoringService {
    async fn post_metric_data(&self, batch: &[MetricStream]) -> Result<()> {
        let mut batches = self.batches.lock().expect("mock lock poisoned");
        if self.fail_on_batch == Some(batches.len() + 1) {
            anyhow::bail!("simulated ingestion failure on batch {}", batches.len() + 1);
        }
        batches.push(batch.to_vec());
        Ok(())
    }
}

/// Records created groups and dashboards and hands out mock OCIDs.
#[derive(Default)]
pub struct MockDashboardService {
    groups: Mutex<Vec<CreateDashboardGroupDetails>>,
    dashboards: Mutex<Vec<CreateDashboardDetails>>,
    pub fail_group_creation: bool,
    pub fail_dashboard_creation: bool,
}

impl MockDashboardService {
    pub fn failing_group_creation() -> Self {
        Self {
            fail_group_creation: true,
            ..Self::default()
        }
    }

    pub fn failing_dashboard_creation() -> Self {
        Self {
            fail_dashboard_creation: true,
            ..Self::default()
        }
    }

    pub fn groups(&self) -> Vec<CreateDashboardGroupDetails> {
        self.groups.lock().expect("mock lock poisoned").clone()
    }

    pub fn dashboards(&self) -> Vec<CreateDashboardDetails> {
        self.dashboards.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl DashboardService for MockDashboardService {
    async fn create_dashboard_group(
        &self,
        details: &CreateDashboardGroupDetails,
    ) -> Result<String> {
        if self.fail_group_creation {
            anyhow::bail!("simulated dashboard group creation failure");
        }
        let mut groups = self.groups.lock().expect("mock lock poisoned");
        groups.push(details.clone());
        Ok(format!("ocid1.dashboardgroup.oc1..mock-{}", groups.len()))
    }

    async fn create_dashboard(&self, details: &CreateDashboardDetails) -> Result<String> {
        if self.fail_dashboard_creation {
            anyhow::bail!("simulated dashboard creation failure");
        }
        let mut dashboards = self.dashboards.lock().expect("mock lock poisoned");
        dashboards.push(details.clone());
        Ok(format!("ocid1.dashboard.oc1..mock-{}", dashboards.len()))
    }
}
