//! Batched submission of metric streams to the monitoring service.

use crate::domain::ports::MonitoringService;
use crate::domain::types::MetricStream;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub struct MetricPublisher {
    monitoring: Arc<dyn MonitoringService>,
    batch_size: usize,
}

impl MetricPublisher {
    pub fn new(monitoring: Arc<dyn MonitoringService>, batch_size: usize) -> Self {
        Self {
            monitoring,
            batch_size: batch_size.max(1),
        }
    }

    /// Submits `streams` in fixed-size batches, sequentially and in list
    /// order; the last batch may be smaller. A failed batch aborts the
    /// remaining submissions and propagates.
    pub async fn publish(&self, streams: &[MetricStream]) -> Result<()> {
        if streams.is_empty() {
            info!("No metrics to push.");
            return Ok(());
        }

        info!(
            "Pushing {} metrics in batches of {}",
            streams.len(),
            self.batch_size
        );
        for (i, batch) in streams.chunks(self.batch_size).enumerate() {
            self.monitoring
                .post_metric_data(batch)
                .await
                .with_context(|| format!("Failed to push metric batch {}", i + 1))?;
            info!("Pushed batch {}, size={}", i + 1, batch.len());
        }
        info!("All metrics pushed successfully.");
        Ok(())
    }
}
