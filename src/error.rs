use crate::domain::charge::{ChargeId, ChargeStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    /// Raised only on the stateful charge path; callers match on it explicitly.
    #[error("Payment not authorized")]
    PaymentNotAuthorized,
    #[error("Charge {0} not found")]
    NotFound(ChargeId),
    #[error("Charge {0} already exists")]
    DuplicateCharge(ChargeId),
    #[error("Charge {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: ChargeId,
        from: ChargeStatus,
        to: ChargeStatus,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Notification error: {0}")]
    Notification(String),
    #[error("Processing queue is closed")]
    QueueClosed,
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
