pub mod aggregator;
pub mod audit;
pub mod metrics;
pub mod provisioner;
pub mod publisher;
