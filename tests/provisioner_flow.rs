//! Dashboard provisioning against the mock dashboard service.

use oci_audit::application::provisioner::{
    DASHBOARD_GROUP_NAME, DASHBOARD_NAME, DashboardProvisioner, DashboardScope,
};
use oci_audit::infrastructure::mock::MockDashboardService;
use std::sync::Arc;

fn scope() -> DashboardScope {
    DashboardScope {
        tenancy_id: "ocid1.tenancy.oc1..testtenancy".to_string(),
        region: "us-ashburn-1".to_string(),
        namespace: "custom_metrics".to_string(),
        resource_group: "Policy_DG_audit".to_string(),
    }
}

#[tokio::test]
async fn test_provision_creates_group_then_dashboard_in_that_group() {
    let service = Arc::new(MockDashboardService::default());
    let created = DashboardProvisioner::new(service.clone())
        .provision(&scope())
        .await
        .unwrap();

    let groups = service.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].display_name, DASHBOARD_GROUP_NAME);
    assert_eq!(groups[0].compartment_id, "ocid1.tenancy.oc1..testtenancy");

    let dashboards = service.dashboards();
    assert_eq!(dashboards.len(), 1);
    assert_eq!(dashboards[0].display_name, DASHBOARD_NAME);
    assert_eq!(dashboards[0].schema_version, "V1");
    assert_eq!(dashboards[0].dashboard_group_id, created.group_id);
    assert_eq!(dashboards[0].widgets.len(), 8);
}

#[tokio::test]
async fn test_group_creation_failure_aborts_before_the_dashboard() {
    let service = Arc::new(MockDashboardService::failing_group_creation());

    let result = DashboardProvisioner::new(service.clone())
        .provision(&scope())
        .await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("dashboard group"));
    assert!(service.dashboards().is_empty());
}

#[tokio::test]
async fn test_dashboard_creation_failure_leaves_the_group_in_place() {
    let service = Arc::new(MockDashboardService::failing_dashboard_creation());

    let result = DashboardProvisioner::new(service.clone())
        .provision(&scope())
        .await;

    assert!(result.is_err());
    // no rollback: the group created before the failure survives
    assert_eq!(service.groups().len(), 1);
    assert!(service.dashboards().is_empty());
}

#[tokio::test]
async fn test_rerunning_provision_creates_duplicates() {
    let service = Arc::new(MockDashboardService::default());
    let provisioner = DashboardProvisioner::new(service.clone());

    provisioner.provision(&scope()).await.unwrap();
    provisioner.provision(&scope()).await.unwrap();

    assert_eq!(service.groups().len(), 2);
    assert_eq!(service.dashboards().len(), 2);
}
