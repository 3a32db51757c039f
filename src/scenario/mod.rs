//! Scenario & metrics aggregator

pub mod dashboard;
pub mod manager;
pub mod metrics;

pub use dashboard::*;
pub use manager::*;
pub use metrics::*;
