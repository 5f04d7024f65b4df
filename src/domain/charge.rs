use crate::error::BillingError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a charge, assigned at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeId(pub u32);

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the rider (ciclista) responsible for a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(pub u32);

impl fmt::Display for RiderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative monetary amount owed by a rider.
///
/// Wraps `rust_decimal::Decimal` so the scale of the original value survives
/// formatting: `50.0` is rendered as `50.0`, not `50`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, BillingError> {
        if value < Decimal::ZERO {
            Err(BillingError::ValidationError(
                "Amount must not be negative".to_string(),
            ))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = BillingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Lifecycle of a charge.
///
/// The serialized and displayed forms are the literals used by the rest of the
/// bike-rental system; inside the crate the status is always compared as an enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChargeStatus {
    #[default]
    #[serde(rename = "PENDENTE")]
    Pending,
    #[serde(rename = "Aguardando pagamento")]
    AwaitingPayment,
    #[serde(rename = "PAGA")]
    Paid,
    #[serde(rename = "CANCELADA")]
    Cancelled,
}

impl ChargeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeStatus::Pending => "PENDENTE",
            ChargeStatus::AwaitingPayment => "Aguardando pagamento",
            ChargeStatus::Paid => "PAGA",
            ChargeStatus::Cancelled => "CANCELADA",
        }
    }

    /// Returns whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: ChargeStatus) -> bool {
        matches!(
            (self, next),
            (ChargeStatus::Pending, ChargeStatus::AwaitingPayment)
                | (ChargeStatus::Pending, ChargeStatus::Cancelled)
                | (ChargeStatus::AwaitingPayment, ChargeStatus::Paid)
        )
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money owed by a rider for a late bicycle return.
///
/// Charges are never deleted. They only move forward through `ChargeStatus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    id: ChargeId,
    pub rider: RiderId,
    /// When the overdue condition began.
    pub requested_at: DateTime<Utc>,
    pub amount: Amount,
    /// Payment instrument used for authorization attempts.
    pub card: String,
    #[serde(default)]
    pub status: ChargeStatus,
    /// Set once the charge is resolved; never earlier than `requested_at`.
    #[serde(default)]
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Charge {
    pub fn new(
        id: ChargeId,
        rider: RiderId,
        requested_at: DateTime<Utc>,
        amount: Amount,
        card: impl Into<String>,
    ) -> Self {
        Self {
            id,
            rider,
            requested_at,
            amount,
            card: card.into(),
            status: ChargeStatus::Pending,
            finalized_at: None,
        }
    }

    pub fn id(&self) -> ChargeId {
        self.id
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChargeStatus::Pending
    }

    /// Clamps a resolution time so it never precedes the request time.
    pub fn finalize_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.max(self.requested_at)
    }
}
