//! Identity resources and monitoring wire types.
//!
//! Everything here is transient: resources are fetched fresh on every run
//! and metric streams are rebuilt from scratch, so no type carries any
//! cross-run state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compartment lifecycle states as reported by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Creating,
    Active,
    Inactive,
    Deleting,
    Deleted,
}

impl LifecycleState {
    fn active() -> Self {
        LifecycleState::Active
    }
}

/// An OCI compartment. Only ACTIVE compartments are scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compartment {
    pub id: String,
    pub name: String,
    // Some realms omit the state on the root compartment payload.
    #[serde(default = "LifecycleState::active")]
    pub lifecycle_state: LifecycleState,
}

impl Compartment {
    pub fn is_active(&self) -> bool {
        self.lifecycle_state == LifecycleState::Active
    }
}

/// An IAM policy. Only the statement count survives aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub compartment_id: String,
    #[serde(default)]
    pub statements: Vec<String>,
}

/// An identity domain; `url` is the domain-scoped endpoint its dynamic
/// resource groups are counted through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDomain {
    pub id: String,
    pub display_name: String,
    pub url: String,
}

/// A single timestamped observation within a metric stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// One metric stream in the shape the monitoring ingestion endpoint
/// accepts: a named, dimensioned series of datapoints scoped to a
/// compartment, namespace and resource group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricStream {
    pub compartment_id: String,
    pub namespace: String,
    pub resource_group: String,
    pub name: String,
    pub dimensions: BTreeMap<String, String>,
    pub datapoints: Vec<Datapoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_state_wire_names() {
        let state: LifecycleState = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(state, LifecycleState::Active);
        let state: LifecycleState = serde_json::from_str("\"DELETED\"").unwrap();
        assert_eq!(state, LifecycleState::Deleted);
    }

    #[test]
    fn test_compartment_defaults_to_active_when_state_missing() {
        let comp: Compartment = serde_json::from_str(
            r#"{"id": "ocid1.tenancy.oc1..root", "name": "acme (root)"}"#,
        )
        .unwrap();
        assert!(comp.is_active());
    }

    #[test]
    fn test_metric_stream_serializes_camel_case() {
        let stream = MetricStream {
            compartment_id: "ocid1.tenancy.oc1..aaa".to_string(),
            namespace: "custom_metrics".to_string(),
            resource_group: "Policy_DG_audit".to_string(),
            name: "oci_policies_total".to_string(),
            dimensions: BTreeMap::from([("type".to_string(), "current".to_string())]),
            datapoints: vec![],
        };

        let json = serde_json::to_value(&stream).unwrap();
        assert_eq!(json["compartmentId"], "ocid1.tenancy.oc1..aaa");
        assert_eq!(json["resourceGroup"], "Policy_DG_audit");
        assert_eq!(json["dimensions"]["type"], "current");
    }
}
