//! One-shot dashboard provisioning.
//!
//! Creates the dashboard group, then the dashboard with its fixed
//! eight-widget catalog. There is no existence check (re-running creates
//! duplicates) and no rollback: a group left behind by a failed dashboard
//! creation stays.

use crate::domain::dashboard::{
    ChartType, CreateDashboardDetails, CreateDashboardGroupDetails, VariableValue, Widget,
    WidgetApi, WidgetData, WidgetLayout,
};
use crate::domain::errors::ProvisionError;
use crate::domain::ports::DashboardService;
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub const DASHBOARD_GROUP_NAME: &str = "IAM_Policy_DG_Group";
pub const DASHBOARD_NAME: &str = "OCI_IAM_Policy_DG_Dashboard";
const SCHEMA_VERSION: &str = "V1";

struct WidgetSpec {
    title: &'static str,
    query: &'static str,
    chart: ChartType,
    top: u32,
    left: u32,
}

/// The widget catalog: title, monitoring query, chart type and grid
/// position. Two widgets per row, rows 6 grid units apart.
const WIDGETS: [WidgetSpec; 8] = [
    WidgetSpec {
        title: "OCI IAM Policy - Current vs Limit",
        query: "oci_policies_total[${interval}].sum()",
        chart: ChartType::GroupBar,
        top: 0,
        left: 0,
    },
    WidgetSpec {
        title: "OCI IAM Policy Statement - Current vs Limit",
        query: "oci_statements_total[${interval}].sum()",
        chart: ChartType::GroupBar,
        top: 0,
        left: 9,
    },
    WidgetSpec {
        title: "Dynamic Group - Per Domain",
        query: "oci_dg_metrics[${interval}].max()",
        chart: ChartType::Bar,
        top: 6,
        left: 0,
    },
    WidgetSpec {
        title: "Dynamic Group - Total",
        query: "oci_dg_total[${interval}].sum()",
        chart: ChartType::GroupBar,
        top: 6,
        left: 9,
    },
    WidgetSpec {
        title: "OCI IAM Policy Statement - Top 10 Compartment",
        query: "oci_statements_top10[${interval}].sum()",
        chart: ChartType::GroupBar,
        top: 12,
        left: 0,
    },
    WidgetSpec {
        title: "OCI IAM Policy - Top 10 Compartment",
        query: "oci_policies_top10[${interval}].sum()",
        chart: ChartType::GroupBar,
        top: 12,
        left: 9,
    },
    WidgetSpec {
        title: "OCI IAM Policy - Per Compartment",
        query: "oci_policies_metrics[${interval}].sum()",
        chart: ChartType::Bar,
        top: 18,
        left: 0,
    },
    WidgetSpec {
        title: "OCI IAM Policy Statement - Per Compartment",
        query: "oci_statements_metrics[${interval}].sum()",
        chart: ChartType::Bar,
        top: 18,
        left: 9,
    },
];

/// Scope facts every widget's monitoring binding needs.
#[derive(Debug, Clone)]
pub struct DashboardScope {
    pub tenancy_id: String,
    pub region: String,
    pub namespace: String,
    pub resource_group: String,
}

/// Builds the eight dashboard widgets bound to `scope`.
pub fn widget_catalog(scope: &DashboardScope) -> Vec<Widget> {
    WIDGETS
        .iter()
        .map(|spec| Widget {
            id: format!("Monitoring_{}", Uuid::new_v4()),
            title: spec.title.to_string(),
            widget_type: spec.chart,
            description: String::new(),
            layout: WidgetLayout {
                width: 9,
                height: 6,
                top: spec.top,
                left: spec.left,
                min_h: 6,
                min_w: 9,
            },
            data: WidgetData {
                data_source: "Monitoring".to_string(),
                api: WidgetApi {
                    api_type: "urlTemplate".to_string(),
                    template_id: "monitoring".to_string(),
                    variables: vec![BTreeMap::from([
                        (
                            "compartmentId".to_string(),
                            VariableValue {
                                value: scope.tenancy_id.clone(),
                            },
                        ),
                        (
                            "namespace".to_string(),
                            VariableValue {
                                value: scope.namespace.clone(),
                            },
                        ),
                        (
                            "resourceGroup".to_string(),
                            VariableValue {
                                value: scope.resource_group.clone(),
                            },
                        ),
                        (
                            "query".to_string(),
                            VariableValue {
                                value: spec.query.to_string(),
                            },
                        ),
                        (
                            "regionId".to_string(),
                            VariableValue {
                                value: scope.region.clone(),
                            },
                        ),
                    ])],
                },
            },
        })
        .collect()
}

/// Ids of the resources a successful provisioning created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedDashboard {
    pub group_id: String,
    pub dashboard_id: String,
}

pub struct DashboardProvisioner {
    dashboards: Arc<dyn DashboardService>,
}

impl DashboardProvisioner {
    pub fn new(dashboards: Arc<dyn DashboardService>) -> Self {
        Self { dashboards }
    }

    pub async fn provision(&self, scope: &DashboardScope) -> Result<ProvisionedDashboard> {
        info!("Creating dashboard group {DASHBOARD_GROUP_NAME}");
        let group_id = self
            .dashboards
            .create_dashboard_group(&CreateDashboardGroupDetails {
                display_name: DASHBOARD_GROUP_NAME.to_string(),
                description: "Dashboard group for IAM Policy and Dynamic Group monitoring"
                    .to_string(),
                compartment_id: scope.tenancy_id.clone(),
            })
            .await
            .map_err(|e| ProvisionError::GroupCreation {
                reason: format!("{e:#}"),
            })?;
        info!("Dashboard group created: {group_id}");

        info!("Creating dashboard {DASHBOARD_NAME} in group {group_id}");
        let dashboard_id = self
            .dashboards
            .create_dashboard(&CreateDashboardDetails {
                display_name: DASHBOARD_NAME.to_string(),
                description: "OCI IAM Policy and Dynamic Group dashboard".to_string(),
                dashboard_group_id: group_id.clone(),
                schema_version: SCHEMA_VERSION.to_string(),
                widgets: widget_catalog(scope),
            })
            .await
            .map_err(|e| ProvisionError::DashboardCreation {
                reason: format!("{e:#}"),
            })?;
        info!("Dashboard created: {dashboard_id}");

        Ok(ProvisionedDashboard {
            group_id,
            dashboard_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> DashboardScope {
        DashboardScope {
            tenancy_id: "ocid1.tenancy.oc1..aaa".to_string(),
            region: "us-ashburn-1".to_string(),
            namespace: "custom_metrics".to_string(),
            resource_group: "Policy_DG_audit".to_string(),
        }
    }

    #[test]
    fn test_catalog_has_eight_widgets_with_unique_ids() {
        let widgets = widget_catalog(&scope());
        assert_eq!(widgets.len(), 8);

        let mut ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert!(widgets.iter().all(|w| w.id.starts_with("Monitoring_")));
    }

    #[test]
    fn test_catalog_grid_uses_two_columns() {
        let widgets = widget_catalog(&scope());
        for widget in &widgets {
            assert!(widget.layout.left == 0 || widget.layout.left == 9);
            assert_eq!(widget.layout.width, 9);
            assert_eq!(widget.layout.height, 6);
            assert_eq!(widget.layout.min_w, 9);
            assert_eq!(widget.layout.min_h, 6);
        }
    }

    #[test]
    fn test_catalog_binds_every_widget_to_the_scope() {
        let widgets = widget_catalog(&scope());
        for widget in &widgets {
            let vars = &widget.data.api.variables[0];
            assert_eq!(vars["compartmentId"].value, "ocid1.tenancy.oc1..aaa");
            assert_eq!(vars["namespace"].value, "custom_metrics");
            assert_eq!(vars["resourceGroup"].value, "Policy_DG_audit");
            assert_eq!(vars["regionId"].value, "us-ashburn-1");
            assert!(vars["query"].value.contains("${interval}"));
        }
    }

    #[test]
    fn test_totals_widgets_are_grouped_bars() {
        let widgets = widget_catalog(&scope());
        let totals = widgets
            .iter()
            .find(|w| w.title == "OCI IAM Policy - Current vs Limit")
            .unwrap();
        assert_eq!(totals.widget_type, ChartType::GroupBar);

        let per_compartment = widgets
            .iter()
            .find(|w| w.title == "OCI IAM Policy - Per Compartment")
            .unwrap();
        assert_eq!(per_compartment.widget_type, ChartType::Bar);
    }
}
