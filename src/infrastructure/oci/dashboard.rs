//! Dashboard service client: dashboard groups and dashboards.

use crate::domain::dashboard::{CreateDashboardDetails, CreateDashboardGroupDetails};
use crate::domain::errors::ApiError;
use crate::domain::ports::DashboardService;
use crate::infrastructure::core::http::build_http_client;
use crate::infrastructure::oci::auth::ResourcePrincipal;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

const SERVICE: &str = "dashboard";
const API_VERSION: &str = "20210731";

pub struct OciDashboardClient {
    client: ClientWithMiddleware,
    endpoint: String,
    auth: ResourcePrincipal,
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

impl OciDashboardClient {
    pub fn new(auth: ResourcePrincipal, endpoint_override: Option<String>) -> Self {
        let endpoint = endpoint_override.unwrap_or_else(|| auth.dashboard_endpoint());
        Self {
            client: build_http_client(),
            endpoint,
            auth,
        }
    }

    async fn create<B: Serialize + Sync>(&self, resource: &str, body: &B) -> Result<String> {
        let url = format!("{}/{API_VERSION}/{resource}", self.endpoint);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth.authorization())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Dashboard request to create {resource} failed"))?;

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

        let created: CreatedResource = response.json().await.map_err(|e| {
            ApiError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            }
        })?;
        Ok(created.id)
    }
}

#[async_trait]
impl DashboardService for OciDashboardClient {
    async fn create_dashboard_group(
        &self,
        details: &CreateDashboardGroupDetails,
    ) -> Result<String> {
        self.create("dashboardGroups", details).await
    }

    async fn create_dashboard(&self, details: &CreateDashboardDetails) -> Result<String> {
        self.create("dashboards", details).await
    }
}
