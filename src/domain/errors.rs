use thiserror::Error;

/// Errors surfaced by the OCI REST clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{service} request failed with HTTP {status}: {body}")]
    RequestFailed {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },
}

/// Errors in the resource-principal auth material.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Malformed resource principal token: {0}")]
    MalformedToken(String),
}

/// Errors raised while provisioning the dashboard. The two variants keep
/// the failed step visible: a group left behind by a failed dashboard
/// creation is not rolled back.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Failed to create dashboard group: {reason}")]
    GroupCreation { reason: String },

    #[error("Failed to create dashboard: {reason}")]
    DashboardCreation { reason: String },
}
