#![allow(dead_code)]

use async_trait::async_trait;
use bikeshare_billing::domain::charge::{Amount, Charge, ChargeId, RiderId};
use bikeshare_billing::domain::ports::{Notifier, PaymentAuthorizer};
use bikeshare_billing::error::Result;
use chrono::{TimeDelta, Utc};
use mockall::mock;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;

mock! {
    pub Notifier {}

    #[async_trait]
    impl Notifier for Notifier {
        async fn send_message(&self, destination: &str, subject: &str, body: &str) -> Result<()>;
    }
}

mock! {
    pub Authorizer {}

    #[async_trait]
    impl PaymentAuthorizer for Authorizer {
        async fn authorize(&self, amount: Amount, card_number: &str) -> bool;
    }
}

/// A pending charge requested `hours_ago` hours before now.
pub fn charge(id: u32, rider: u32, hours_ago: i64, amount: Decimal, card: &str) -> Charge {
    Charge::new(
        ChargeId(id),
        RiderId(rider),
        Utc::now() - TimeDelta::hours(hours_ago),
        Amount::new(amount).unwrap(),
        card,
    )
}

pub fn write_charges_csv(path: &Path, rows: &[[&str; 7]]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "id,rider,requested_at,amount,card,status,finalized_at")?;
    for row in rows {
        writeln!(file, "{}", row.join(","))?;
    }
    Ok(())
}
