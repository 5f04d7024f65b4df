//! CSV import and export of charges.
//!
//! Columns: `id, rider, requested_at, amount, card, status, finalized_at`.
//! `status` and `finalized_at` may be left blank for new charges.

pub mod charge_reader;
pub mod charge_writer;

use crate::domain::charge::{Amount, Charge, ChargeId, ChargeStatus, RiderId};
use crate::error::BillingError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct ChargeRecord {
    id: ChargeId,
    rider: RiderId,
    requested_at: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    card: String,
    status: Option<ChargeStatus>,
    finalized_at: Option<DateTime<Utc>>,
}

impl TryFrom<ChargeRecord> for Charge {
    type Error = BillingError;

    fn try_from(record: ChargeRecord) -> Result<Self, Self::Error> {
        if let Some(finalized_at) = record.finalized_at
            && finalized_at < record.requested_at
        {
            return Err(BillingError::ValidationError(format!(
                "Charge {} finalized before it was requested",
                record.id
            )));
        }
        let mut charge = Charge::new(
            record.id,
            record.rider,
            record.requested_at,
            Amount::new(record.amount)?,
            record.card,
        );
        charge.status = record.status.unwrap_or_default();
        charge.finalized_at = record.finalized_at;
        Ok(charge)
    }
}

impl From<&Charge> for ChargeRecord {
    fn from(charge: &Charge) -> Self {
        Self {
            id: charge.id(),
            rider: charge.rider,
            requested_at: charge.requested_at,
            amount: charge.amount.value(),
            card: charge.card.clone(),
            status: Some(charge.status),
            finalized_at: charge.finalized_at,
        }
    }
}
