//! Domain-scoped identity client used to count dynamic resource groups.

use crate::domain::errors::ApiError;
use crate::domain::ports::DynamicGroupService;
use crate::infrastructure::core::http::{build_http_client, url_with_query};
use crate::infrastructure::oci::auth::ResourcePrincipal;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::debug;

const SERVICE: &str = "identity-domains";

pub struct OciIdentityDomainsClient {
    client: ClientWithMiddleware,
    auth: ResourcePrincipal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DynamicGroupListing {
    total_results: u64,
}

impl OciIdentityDomainsClient {
    pub fn new(auth: ResourcePrincipal) -> Self {
        Self {
            client: build_http_client(),
            auth,
        }
    }
}

#[async_trait]
impl DynamicGroupService for OciIdentityDomainsClient {
    async fn count_dynamic_groups(&self, domain_url: &str) -> Result<u64> {
        // count=0 asks the collection for its total without member
        // payloads
        let base = format!(
            "{}/admin/v1/DynamicResourceGroups",
            domain_url.trim_end_matches('/')
        );
        let url = url_with_query(&base, &[("count", "0")])?;

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth.authorization())
            .send()
            .await
            .with_context(|| format!("Dynamic group listing for {domain_url} failed"))?;

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

        let listing: DynamicGroupListing = response.json().await.map_err(|e| {
            ApiError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            }
        })?;
        debug!("Domain {} has {} dynamic groups", domain_url, listing.total_results);

        Ok(listing.total_results)
    }
}
