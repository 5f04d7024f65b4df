use chrono::TimeDelta;
use rust_decimal::Decimal;
use std::time::Duration;

/// Charges pending longer than this many hours are overdue.
pub const DEFAULT_OVERDUE_HOURS: u32 = 12;

/// Tunables for `ChargeProcessor` and `ChargeWorker`.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Age after which a pending charge counts as overdue (strictly greater).
    pub overdue_threshold: TimeDelta,
    /// Charges above this amount are refused on the execution path.
    pub max_charge_amount: Option<Decimal>,
    /// Upper bound on a single authorizer call; expiry counts as a denial.
    pub authorization_timeout: Duration,
    /// Period of the worker's overdue scan.
    pub scan_interval: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            overdue_threshold: TimeDelta::hours(i64::from(DEFAULT_OVERDUE_HOURS)),
            max_charge_amount: None,
            authorization_timeout: Duration::from_secs(5),
            scan_interval: Duration::from_secs(60 * 60),
        }
    }
}
