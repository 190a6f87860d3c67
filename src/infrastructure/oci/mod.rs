pub mod auth;
pub mod dashboard;
pub mod identity;
pub mod identity_domains;
pub mod monitoring;
