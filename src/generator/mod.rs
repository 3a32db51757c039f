//! Timetable generation boundary.
//!
//! Generation is an opaque asynchronous service that returns a metrics
//! snapshot. It never writes to the store; a caller that wants the generated
//! plan persisted does so explicitly.

pub mod simulated;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::Metrics;

pub use simulated::SimulatedGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    #[serde(flatten)]
    pub metrics: Metrics,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("generation failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait TimetableGenerator: Send + Sync {
    async fn generate(&self) -> Result<MetricsSnapshot>;
}

/// Runs a generator with a bounded wait
#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn TimetableGenerator>,
    timeout: Duration,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn TimetableGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn request(&self) -> Result<MetricsSnapshot, GenerationError> {
        info!(timeout_ms = self.timeout.as_millis() as u64, "generation requested");
        let snapshot = match tokio::time::timeout(self.timeout, self.generator.generate()).await {
            Err(_) => {
                warn!("generation timed out");
                return Err(GenerationError::Timeout(self.timeout));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "generation failed");
                return Err(GenerationError::Failed(e.to_string()));
            }
            Ok(Ok(snapshot)) => snapshot,
        };

        snapshot
            .metrics
            .check()
            .map_err(|e| GenerationError::Failed(e.to_string()))?;
        info!(
            conflicts = snapshot.metrics.conflicts,
            satisfaction = snapshot.metrics.student_satisfaction,
            balance = snapshot.metrics.faculty_balance,
            utilization = snapshot.metrics.room_utilization,
            "generation finished"
        );
        Ok(snapshot)
    }
}
