//! Shared HTTP client plumbing for the OCI service clients.

use anyhow::Result;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

/// Builds the HTTP client every OCI service client shares.
///
/// Transient failures are retried by the middleware (exponential backoff,
/// at most 3 attempts). Nothing above this layer retries.
pub fn build_http_client() -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

    let client = Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new());

    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

/// Appends query parameters to `base`. The middleware request builder has
/// no `.query()`, so the URL is assembled up front.
pub fn url_with_query(base: &str, params: &[(&str, &str)]) -> Result<String> {
    let mut url = Url::parse(base)?;
    for (key, value) in params {
        url.query_pairs_mut().append_pair(key, value);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_with_query_appends_pairs() {
        let url = url_with_query(
            "https://identity.us-ashburn-1.oci.oraclecloud.com/20160918/compartments",
            &[("compartmentId", "ocid1.tenancy.oc1..aaa"), ("accessLevel", "ANY")],
        )
        .unwrap();

        assert!(url.contains("compartmentId=ocid1.tenancy.oc1..aaa"));
        assert!(url.contains("accessLevel=ANY"));
    }

    #[test]
    fn test_url_with_query_encodes_values() {
        let url = url_with_query("https://example.com/path", &[("q", "a b&c")]).unwrap();
        assert!(url.contains("q=a+b%26c"));
    }

    #[test]
    fn test_url_with_query_rejects_relative_urls() {
        assert!(url_with_query("/20160918/policies", &[]).is_err());
    }
}
