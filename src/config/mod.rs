//! Environment-derived configuration.
//!
//! The audit has no config file and no CLI flags; everything comes from
//! environment variables (with a `.env` file loaded by the binaries),
//! read once at startup.

use anyhow::{Context, Result};
use std::env;

/// Tenancy-wide service limits the published metrics are compared
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLimits {
    pub policies: u64,
    pub statements: u64,
    pub dynamic_groups: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Metric namespace, `NAMESPACE` (default `custom_metrics`).
    pub namespace: String,
    /// Metric resource group, `RESOURCE_GROUP` (default `Policy_DG_audit`).
    pub resource_group: String,
    /// `POLICY_LIMIT` / `STATEMENT_LIMIT` / `DG_LIMIT`.
    pub limits: ServiceLimits,
    /// Streams per ingestion call, `BATCH_SIZE` (default 50, minimum 1).
    pub batch_size: usize,
    /// Optional endpoint overrides; the region-derived URLs are used when
    /// unset.
    pub identity_endpoint: Option<String>,
    pub telemetry_endpoint: Option<String>,
    pub dashboard_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let namespace = env::var("NAMESPACE").unwrap_or_else(|_| "custom_metrics".to_string());
        let resource_group =
            env::var("RESOURCE_GROUP").unwrap_or_else(|_| "Policy_DG_audit".to_string());

        let limits = ServiceLimits {
            policies: parse_env("POLICY_LIMIT", 300)?,
            statements: parse_env("STATEMENT_LIMIT", 3000)?,
            dynamic_groups: parse_env("DG_LIMIT", 100)?,
        };

        let batch_size: usize = parse_env("BATCH_SIZE", 50)?;
        if batch_size == 0 {
            anyhow::bail!("BATCH_SIZE must be at least 1");
        }

        Ok(Self {
            namespace,
            resource_group,
            limits,
            batch_size,
            identity_endpoint: env::var("IDENTITY_ENDPOINT").ok(),
            telemetry_endpoint: env::var("TELEMETRY_ENDPOINT").ok(),
            dashboard_endpoint: env::var("DASHBOARD_ENDPOINT").ok(),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_defaults() {
        let config = Config::from_env().expect("Should parse with defaults");
        assert_eq!(config.namespace, "custom_metrics");
        assert_eq!(config.resource_group, "Policy_DG_audit");
        assert_eq!(config.batch_size, 50);
        assert_eq!(
            config.limits,
            ServiceLimits {
                policies: 300,
                statements: 3000,
                dynamic_groups: 100,
            }
        );
    }

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u64 = parse_env("OCI_AUDIT_TEST_UNSET_LIMIT", 42).unwrap();
        assert_eq!(value, 42);
    }
}
