pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod generator;
pub mod planner;
pub mod scenario;
pub mod schedule;
pub mod store;
pub mod telemetry;
pub mod validation;
