//! Identity service REST client: compartments, policies and identity
//! domains.

use crate::domain::errors::ApiError;
use crate::domain::ports::IdentityService;
use crate::domain::types::{Compartment, IdentityDomain, Policy};
use crate::infrastructure::core::http::{build_http_client, url_with_query};
use crate::infrastructure::oci::auth::ResourcePrincipal;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use tracing::debug;

const SERVICE: &str = "identity";
const API_VERSION: &str = "20160918";
const PAGE_HEADER: &str = "opc-next-page";

pub struct OciIdentityClient {
    client: ClientWithMiddleware,
    endpoint: String,
    auth: ResourcePrincipal,
}

impl OciIdentityClient {
    pub fn new(auth: ResourcePrincipal, endpoint_override: Option<String>) -> Self {
        let endpoint = endpoint_override.unwrap_or_else(|| auth.identity_endpoint());
        Self {
            client: build_http_client(),
            endpoint,
            auth,
        }
    }

    /// GETs a collection resource, following `opc-next-page` until the
    /// listing is exhausted. Callers always see the full list.
    async fn get_all<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let base = format!("{}/{API_VERSION}/{resource}", self.endpoint);
        let mut items = Vec::new();
        let mut page: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = params.to_vec();
            if let Some(token) = page.as_deref() {
                query.push(("page", token));
            }
            let url = url_with_query(&base, &query)?;
            debug!("GET {url}");

            let response = self
                .client
                .get(&url)
                .header(AUTHORIZATION, self.auth.authorization())
                .send()
                .await
                .with_context(|| format!("Identity request for {resource} failed"))?;

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

            page = response
                .headers()
                .get(PAGE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let mut batch: Vec<T> = response.json().await.map_err(|e| {
                ApiError::MalformedResponse {
                    service: SERVICE,
                    reason: e.to_string(),
                }
            })?;
            items.append(&mut batch);

            if page.is_none() {
                break;
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl IdentityService for OciIdentityClient {
    async fn list_compartments(&self, tenancy_id: &str) -> Result<Vec<Compartment>> {
        self.get_all(
            "compartments",
            &[
                ("compartmentId", tenancy_id),
                ("compartmentIdInSubtree", "true"),
                ("accessLevel", "ANY"),
            ],
        )
        .await
    }

    async fn get_compartment(&self, compartment_id: &str) -> Result<Compartment> {
        let url = format!("{}/{API_VERSION}/compartments/{compartment_id}", self.endpoint);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth.authorization())
            .send()
            .await
            .context("Identity request for a compartment failed")?;

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

        response.json().await.map_err(|e| {
            ApiError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn list_policies(&self, compartment_id: &str) -> Result<Vec<Policy>> {
        self.get_all("policies", &[("compartmentId", compartment_id)])
            .await
    }

    async fn list_domains(&self, compartment_id: &str) -> Result<Vec<IdentityDomain>> {
        self.get_all("domains", &[("compartmentId", compartment_id)])
            .await
    }
}
