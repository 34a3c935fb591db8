//! Simulated payment gateway: a timed delay followed by a
//! fixed-probability decline. No money moves anywhere.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Course;
use crate::sim::Clock;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment declined")]
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub amount: f64,
    pub paid_at: DateTime<Utc>,
}

pub struct PaymentGateway {
    clock: Arc<dyn Clock>,
    failure_rate: f64,
    latency: Duration,
    rng: Mutex<StdRng>,
}

impl PaymentGateway {
    pub fn new(clock: Arc<dyn Clock>, failure_rate: f64, latency: Duration) -> Self {
        Self::with_rng(clock, failure_rate, latency, StdRng::from_os_rng())
    }

    /// Deterministic gateway for tests.
    pub fn seeded(clock: Arc<dyn Clock>, failure_rate: f64, latency: Duration, seed: u64) -> Self {
        Self::with_rng(clock, failure_rate, latency, StdRng::seed_from_u64(seed))
    }

    fn with_rng(clock: Arc<dyn Clock>, failure_rate: f64, latency: Duration, rng: StdRng) -> Self {
        Self {
            clock,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            latency,
            rng: Mutex::new(rng),
        }
    }

    /// Charge for a course. Free courses succeed immediately; paid ones
    /// wait out the simulated latency and then decline with the
    /// configured probability.
    pub async fn charge(&self, user_id: &str, course: &Course) -> Result<PaymentReceipt, PaymentError> {
        if !course.is_free() {
            tokio::time::sleep(self.latency).await;

            let declined = self.rng.lock().random_bool(self.failure_rate);
            if declined {
                tracing::warn!(user_id, course_id = %course.id, "simulated payment declined");
                return Err(PaymentError::Declined);
            }
        }

        let receipt = PaymentReceipt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            course_id: course.id.clone(),
            amount: course.price,
            paid_at: self.clock.now(),
        };
        tracing::info!(user_id, course_id = %course.id, amount = course.price, "simulated payment accepted");
        Ok(receipt)
    }
}
