//! Resource-principal auth material read from the function environment.

use crate::domain::errors::AuthError;
use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use std::env;

/// Credentials and placement facts every OCI call needs: the session
/// token, the tenancy OCID and the region.
#[derive(Debug, Clone)]
pub struct ResourcePrincipal {
    token: String,
    pub tenancy_id: String,
    pub region: String,
}

#[derive(Debug, Deserialize)]
struct SessionClaims {
    res_tenant: Option<String>,
    tenant: Option<String>,
}

impl ResourcePrincipal {
    /// Reads `OCI_RESOURCE_PRINCIPAL_RPST` and
    /// `OCI_RESOURCE_PRINCIPAL_REGION`. The tenancy OCID comes from the
    /// token's tenant claim unless `TENANCY_OCID` overrides it.
    pub fn from_env() -> Result<Self> {
        let token = env::var("OCI_RESOURCE_PRINCIPAL_RPST")
            .map_err(|_| AuthError::MissingEnv("OCI_RESOURCE_PRINCIPAL_RPST"))?;
        let region = env::var("OCI_RESOURCE_PRINCIPAL_REGION")
            .map_err(|_| AuthError::MissingEnv("OCI_RESOURCE_PRINCIPAL_REGION"))?;
        let tenancy_id = match env::var("TENANCY_OCID") {
            Ok(id) => id,
            Err(_) => tenancy_from_token(&token)?,
        };

        Ok(Self {
            token,
            tenancy_id,
            region,
        })
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn identity_endpoint(&self) -> String {
        format!("https://identity.{}.oci.oraclecloud.com", self.region)
    }

    pub fn telemetry_ingestion_endpoint(&self) -> String {
        format!("https://telemetry-ingestion.{}.oraclecloud.com", self.region)
    }

    pub fn dashboard_endpoint(&self) -> String {
        format!("https://dashboard.{}.oci.oraclecloud.com", self.region)
    }
}

/// The session token is a JWT whose payload carries the tenancy OCID.
fn tenancy_from_token(token: &str) -> Result<String, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::MalformedToken("not a JWT".to_string()))?;
    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;
    let claims: SessionClaims =
        serde_json::from_slice(&raw).map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    claims
        .res_tenant
        .or(claims.tenant)
        .ok_or_else(|| AuthError::MalformedToken("missing tenancy claim".to_string()))
}
