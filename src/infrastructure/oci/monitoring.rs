//! Monitoring ingestion client.

use crate::domain::errors::ApiError;
use crate::domain::ports::MonitoringService;
use crate::domain::types::MetricStream;
use crate::infrastructure::core::http::build_http_client;
use crate::infrastructure::oci::auth::ResourcePrincipal;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::warn;

const SERVICE: &str = "monitoring";

pub struct OciMonitoringClient {
    client: ClientWithMiddleware,
    endpoint: String,
    auth: ResourcePrincipal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostMetricDataDetails<'a> {
    metric_data: &'a [MetricStream],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostMetricDataResponse {
    #[serde(default)]
    failed_metrics_count: u64,
}

impl OciMonitoringClient {
    pub fn new(auth: ResourcePrincipal, endpoint_override: Option<String>) -> Self {
        let endpoint = endpoint_override.unwrap_or_else(|| auth.telemetry_ingestion_endpoint());
        Self {
            client: build_http_client(),
            endpoint,
            auth,
        }
    }
}

#[async_trait]
impl MonitoringService for OciMonitoringClient {
    async fn post_metric_data(&self, batch: &[MetricStream]) -> Result<()> {
        let url = format!("{}/20180401/metrics", self.endpoint);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth.authorization())
            .json(&PostMetricDataDetails { metric_data: batch })
            .send()
            .await
            .context("Monitoring ingestion request failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed {
                service: SERVICE,
                status,
                body,
            }
            .into());
        }

        let outcome: PostMetricDataResponse = response.json().await.map_err(|e| {
            ApiError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            }
        })?;
        if outcome.failed_metrics_count > 0 {
            warn!(
                "Ingestion accepted the batch but rejected {} metrics",
                outcome.failed_metrics_count
            );
        }

        Ok(())
    }
}
