use crate::domain::card;
use crate::domain::charge::Amount;
use crate::domain::ports::PaymentAuthorizer;
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

/// Stand-in for the card network.
///
/// Approves any card number that is well formed (digits and spaces), which
/// includes every number passing the Luhn check. An optional limit rejects
/// amounts above it.
#[derive(Debug, Default, Clone)]
pub struct SimulatedAuthorizer {
    max_amount: Option<Decimal>,
}

impl SimulatedAuthorizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_amount(max_amount: Decimal) -> Self {
        Self {
            max_amount: Some(max_amount),
        }
    }
}

#[async_trait]
impl PaymentAuthorizer for SimulatedAuthorizer {
    async fn authorize(&self, amount: Amount, card_number: &str) -> bool {
        if let Some(max) = self.max_amount
            && amount.value() > max
        {
            debug!(%amount, %max, "amount above authorization limit");
            return false;
        }
        card::is_well_formed(card_number)
    }
}
