//! Batching properties of the metric publisher.

use chrono::{TimeZone, Utc};
use oci_audit::application::publisher::MetricPublisher;
use oci_audit::domain::types::{Datapoint, MetricStream};
use oci_audit::infrastructure::mock::MockMonitoringService;
use std::collections::BTreeMap;
use std::sync::Arc;

fn streams(n: usize) -> Vec<MetricStream> {
    let ts = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| MetricStream {
            compartment_id: "ocid1.tenancy.oc1..aaa".to_string(),
            namespace: "custom_metrics".to_string(),
            resource_group: "Policy_DG_audit".to_string(),
            name: format!("stream_{i}"),
            dimensions: BTreeMap::new(),
            datapoints: vec![Datapoint {
                timestamp: ts,
                value: i as f64,
            }],
        })
        .collect()
}

#[tokio::test]
async fn test_publish_splits_into_ceil_n_over_b_batches_in_order() {
    let monitoring = Arc::new(MockMonitoringService::default());
    let publisher = MetricPublisher::new(monitoring.clone(), 3);

    publisher.publish(&streams(7)).await.unwrap();

    let batches = monitoring.batches();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].len(), 3);
    assert_eq!(batches[1].len(), 3);
    assert_eq!(batches[2].len(), 1);

    let names: Vec<String> = monitoring
        .published()
        .into_iter()
        .map(|s| s.name)
        .collect();
    let expected: Vec<String> = (0..7).map(|i| format!("stream_{i}")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_publish_single_batch_when_batch_size_covers_all_streams() {
    let monitoring = Arc::new(MockMonitoringService::default());
    let publisher = MetricPublisher::new(monitoring.clone(), 50);

    publisher.publish(&streams(20)).await.unwrap();

    let batches = monitoring.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 20);
}

#[tokio::test]
async fn test_publish_empty_list_performs_zero_submissions() {
    let monitoring = Arc::new(MockMonitoringService::default());
    let publisher = MetricPublisher::new(monitoring.clone(), 50);

    publisher.publish(&[]).await.unwrap();

    assert!(monitoring.batches().is_empty());
}

#[tokio::test]
async fn test_failed_batch_aborts_remaining_submissions() {
    let monitoring = Arc::new(MockMonitoringService::failing_on_batch(2));
    let publisher = MetricPublisher::new(monitoring.clone(), 3);

    let result = publisher.publish(&streams(9)).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("batch 2"));
    // only the first batch landed; nothing after the failure was sent
    assert_eq!(monitoring.batches().len(), 1);
    assert_eq!(monitoring.published().len(), 3);
}
