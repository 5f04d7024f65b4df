use crate::domain::charge::{Charge, ChargeId, ChargeStatus};
use crate::domain::ports::ChargeStore;
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Charges {
    // Insertion order is the order overdue scans report in.
    entries: Vec<Charge>,
    index: HashMap<ChargeId, usize>,
}

impl Charges {
    fn from_vec(entries: Vec<Charge>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, charge) in entries.iter().enumerate() {
            if index.insert(charge.id(), position).is_some() {
                return Err(BillingError::DuplicateCharge(charge.id()));
            }
        }
        Ok(Self { entries, index })
    }
}

/// A thread-safe in-memory charge store.
///
/// Uses `Arc<RwLock<..>>` so clones share the same collection. Every mutation
/// happens under a single write guard.
#[derive(Default, Clone)]
pub struct InMemoryChargeStore {
    charges: Arc<RwLock<Charges>>,
}

impl InMemoryChargeStore {
    /// Creates a new, empty in-memory charge store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChargeStore for InMemoryChargeStore {
    async fn get(&self, id: ChargeId) -> Result<Option<Charge>> {
        let charges = self.charges.read().await;
        Ok(charges
            .index
            .get(&id)
            .map(|&position| charges.entries[position].clone()))
    }

    async fn add(&self, charge: Charge) -> Result<()> {
        let mut charges = self.charges.write().await;
        if charges.index.contains_key(&charge.id()) {
            return Err(BillingError::DuplicateCharge(charge.id()));
        }
        let position = charges.entries.len();
        charges.index.insert(charge.id(), position);
        charges.entries.push(charge);
        Ok(())
    }

    async fn replace_all(&self, charges: Vec<Charge>) -> Result<()> {
        let replacement = Charges::from_vec(charges)?;
        *self.charges.write().await = replacement;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Charge>> {
        Ok(self.charges.read().await.entries.clone())
    }

    async fn list_overdue(&self, now: DateTime<Utc>, threshold: TimeDelta) -> Result<Vec<Charge>> {
        // A cutoff before the earliest representable time leaves nothing overdue.
        let Some(cutoff) = now.checked_sub_signed(threshold) else {
            return Ok(Vec::new());
        };
        let charges = self.charges.read().await;
        Ok(charges
            .entries
            .iter()
            .filter(|c| c.is_pending() && c.requested_at < cutoff)
            .cloned()
            .collect())
    }

    async fn next_id(&self) -> Result<ChargeId> {
        let charges = self.charges.read().await;
        let max = charges.index.keys().map(|id| id.0).max().unwrap_or(0);
        max.checked_add(1).map(ChargeId).ok_or_else(|| {
            BillingError::ValidationError("charge id space exhausted".to_string())
        })
    }

    async fn transition(
        &self,
        id: ChargeId,
        from: ChargeStatus,
        to: ChargeStatus,
        finalized_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Charge>> {
        if !from.can_transition_to(to) {
            return Err(BillingError::InvalidTransition { id, from, to });
        }

        let mut charges = self.charges.write().await;
        let position = *charges.index.get(&id).ok_or(BillingError::NotFound(id))?;
        let charge = &mut charges.entries[position];
        if charge.status != from {
            return Ok(None);
        }

        charge.status = to;
        if let Some(at) = finalized_at {
            charge.finalized_at = Some(charge.finalize_time(at));
        }
        Ok(Some(charge.clone()))
    }
}
