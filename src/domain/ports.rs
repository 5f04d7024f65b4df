use super::charge::{Amount, Charge, ChargeId, ChargeStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

/// Owns every charge known to the system.
///
/// Implementations must apply a status change and its `finalized_at` together,
/// so readers never observe one without the other.
#[async_trait]
pub trait ChargeStore: Send + Sync {
    /// Returns the charge with the given id, or `None` when it is unknown.
    async fn get(&self, id: ChargeId) -> Result<Option<Charge>>;
    /// Inserts a new charge. Fails with `DuplicateCharge` if the id is taken.
    async fn add(&self, charge: Charge) -> Result<()>;
    /// Replaces the whole collection. Rejects input with repeated ids.
    async fn replace_all(&self, charges: Vec<Charge>) -> Result<()>;
    /// All charges in insertion order.
    async fn all(&self) -> Result<Vec<Charge>>;
    /// Pending charges requested strictly before `now - threshold`, in insertion order.
    async fn list_overdue(&self, now: DateTime<Utc>, threshold: TimeDelta) -> Result<Vec<Charge>>;
    /// The next unused identifier.
    async fn next_id(&self) -> Result<ChargeId>;
    /// Moves a charge from `from` to `to` if it is still in `from`.
    ///
    /// Returns the updated charge, or `None` when the stored status no longer
    /// matches `from`.
    async fn transition(
        &self,
        id: ChargeId,
        from: ChargeStatus,
        to: ChargeStatus,
        finalized_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Charge>>;
}

/// Decides whether an amount can be captured from a card.
#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    async fn authorize(&self, amount: Amount, card_number: &str) -> bool;
}

/// Delivers a message to a rider.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, destination: &str, subject: &str, body: &str) -> Result<()>;
}

pub type ChargeStoreBox = Box<dyn ChargeStore>;
pub type AuthorizerRef = Arc<dyn PaymentAuthorizer>;
pub type NotifierRef = Arc<dyn Notifier>;
