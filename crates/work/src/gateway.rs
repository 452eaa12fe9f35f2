//! Payment processing.

use std::time::Duration;
use async_trait::async_trait;
use fynkr_core::{Payment, PaymentMethod, Time};
use tracing::info;
use crate::Result;

/// Outcome of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Method the client paid with
    pub method: PaymentMethod,
    /// When the processor confirmed the charge
    pub settled_at: Time,
    /// Processor reference
    pub reference: String,
}

/// Something that can charge an invoice.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `payment` through `method`.
    async fn process(&self, payment: &Payment, method: PaymentMethod) -> Result<Settlement>;
}

/// Stand-in processor that always succeeds after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    /// Processing time used when none is configured.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

    /// Create a gateway with a custom processing time.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process(&self, payment: &Payment, method: PaymentMethod) -> Result<Settlement> {
        info!(payment_id = %payment.id, amount = %payment.amount, %method, "processing payment");
        tokio::time::sleep(self.delay).await;
        Ok(Settlement {
            method,
            settled_at: chrono::Utc::now(),
            reference: format!("{}_{}", method, ulid::Ulid::new().to_string().to_lowercase()),
        })
    }
}
