use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use super::{MetricsSnapshot, TimetableGenerator};
use crate::domain::Metrics;

/// Placeholder generator: waits, then reports plausible random metrics.
/// Produces no entries.
#[derive(Debug, Clone)]
pub struct SimulatedGenerator {
    delay: Duration,
}

impl SimulatedGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn sample() -> Metrics {
        let mut rng = rand::thread_rng();
        Metrics {
            conflicts: rng.gen_range(0..=2),
            student_satisfaction: rng.gen_range(88..=99),
            faculty_balance: rng.gen_range(80..=99),
            room_utilization: rng.gen_range(75..=94),
        }
    }
}

#[async_trait]
impl TimetableGenerator for SimulatedGenerator {
    async fn generate(&self) -> Result<MetricsSnapshot> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        Ok(MetricsSnapshot {
            metrics: Self::sample(),
            timestamp: Utc::now(),
        })
    }
}
