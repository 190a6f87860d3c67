pub mod dashboard;
pub mod errors;
pub mod ports;
pub mod types;
