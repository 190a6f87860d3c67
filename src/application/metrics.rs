//! Builds the metric streams an audit run publishes.

use crate::application::aggregator::UsageReport;
use crate::config::ServiceLimits;
use crate::domain::types::{Datapoint, MetricStream};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub const METRIC_DG_PER_DOMAIN: &str = "oci_dg_metrics";
pub const METRIC_POLICIES_PER_COMPARTMENT: &str = "oci_policies_metrics";
pub const METRIC_STATEMENTS_PER_COMPARTMENT: &str = "oci_statements_metrics";
pub const METRIC_POLICIES_TOTAL: &str = "oci_policies_total";
pub const METRIC_STATEMENTS_TOTAL: &str = "oci_statements_total";
pub const METRIC_DG_TOTAL: &str = "oci_dg_total";
pub const METRIC_POLICIES_TOP10: &str = "oci_policies_top10";
pub const METRIC_STATEMENTS_TOP10: &str = "oci_statements_top10";

pub const DIMENSION_COMPARTMENT: &str = "Compartment";
pub const DIMENSION_DOMAIN: &str = "Domain";
pub const DIMENSION_TYPE: &str = "type";

/// Stamps every stream of one run with the same compartment, namespace,
/// resource group and timestamp.
pub struct MetricStreamBuilder {
    tenancy_id: String,
    namespace: String,
    resource_group: String,
    timestamp: DateTime<Utc>,
}

impl MetricStreamBuilder {
    pub fn new(
        tenancy_id: &str,
        namespace: &str,
        resource_group: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            tenancy_id: tenancy_id.to_string(),
            namespace: namespace.to_string(),
            resource_group: resource_group.to_string(),
            timestamp,
        }
    }

    fn stream(&self, name: &str, dimension: (&str, &str), value: u64) -> MetricStream {
        MetricStream {
            compartment_id: self.tenancy_id.clone(),
            namespace: self.namespace.clone(),
            resource_group: self.resource_group.clone(),
            name: name.to_string(),
            dimensions: BTreeMap::from([(dimension.0.to_string(), dimension.1.to_string())]),
            datapoints: vec![Datapoint {
                timestamp: self.timestamp,
                value: value as f64,
            }],
        }
    }

    /// All streams for one run, in a fixed order: per-domain dynamic
    /// groups, per-compartment policies and statements, the three
    /// current/limit totals, then both top-10 rankings.
    pub fn build(&self, report: &UsageReport, limits: &ServiceLimits) -> Vec<MetricStream> {
        let mut streams = Vec::new();

        for (domain, count) in report.dynamic_group_counts.iter() {
            streams.push(self.stream(METRIC_DG_PER_DOMAIN, (DIMENSION_DOMAIN, domain), count));
        }
        for (compartment, count) in report.policy_counts.iter() {
            streams.push(self.stream(
                METRIC_POLICIES_PER_COMPARTMENT,
                (DIMENSION_COMPARTMENT, compartment),
                count,
            ));
        }
        for (compartment, count) in report.statement_counts.iter() {
            streams.push(self.stream(
                METRIC_STATEMENTS_PER_COMPARTMENT,
                (DIMENSION_COMPARTMENT, compartment),
                count,
            ));
        }

        let totals = [
            (METRIC_POLICIES_TOTAL, report.total_policies(), limits.policies),
            (
                METRIC_STATEMENTS_TOTAL,
                report.total_statements(),
                limits.statements,
            ),
            (
                METRIC_DG_TOTAL,
                report.total_dynamic_groups(),
                limits.dynamic_groups,
            ),
        ];
        for (name, current, limit) in totals {
            streams.push(self.stream(name, (DIMENSION_TYPE, "current"), current));
            streams.push(self.stream(name, (DIMENSION_TYPE, "limit"), limit));
        }

        for (compartment, count) in report.top_policies() {
            streams.push(self.stream(
                METRIC_POLICIES_TOP10,
                (DIMENSION_COMPARTMENT, compartment.as_str()),
                count,
            ));
        }
        for (compartment, count) in report.top_statements() {
            streams.push(self.stream(
                METRIC_STATEMENTS_TOP10,
                (DIMENSION_COMPARTMENT, compartment.as_str()),
                count,
            ));
        }

        streams
    }
}
