use super::ChargeRecord;
use crate::domain::charge::Charge;
use crate::error::{BillingError, Result};
use std::io::Read;

/// Reads charges from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Charge>`.
/// It trims whitespace around fields, so card numbers keep their inner spaces.
pub struct ChargeReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ChargeReader<R> {
    /// Creates a new `ChargeReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads, deserializes and validates charges.
    pub fn charges(self) -> impl Iterator<Item = Result<Charge>> {
        self.reader.into_deserialize::<ChargeRecord>().map(|result| {
            result
                .map_err(BillingError::from)
                .and_then(Charge::try_from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charge::{ChargeId, ChargeStatus, RiderId};
    use rust_decimal_macros::dec;

    const HEADER: &str = "id, rider, requested_at, amount, card, status, finalized_at";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\n\
             1, 3, 2026-10-18T09:30:00Z, 50.0, 4111 1111 1111 1111, , \n\
             2, 4, 2026-10-18T10:00:00Z, 7.5, 1234566789, Aguardando pagamento, 2026-10-18T11:00:00Z"
        );
        let reader = ChargeReader::new(data.as_bytes());
        let results: Vec<Result<Charge>> = reader.charges().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.id(), ChargeId(1));
        assert_eq!(first.rider, RiderId(3));
        assert_eq!(first.card, "4111 1111 1111 1111");
        assert_eq!(first.amount.to_string(), "50.0");
        assert_eq!(first.status, ChargeStatus::Pending);
        assert!(first.finalized_at.is_none());

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.status, ChargeStatus::AwaitingPayment);
        assert_eq!(second.amount.value(), dec!(7.5));
        assert!(second.finalized_at.is_some());
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!(
            "{HEADER}\n\
             x, 3, 2026-10-18T09:30:00Z, 50.0, 4111111111111111, , \n\
             2, 3, 2026-10-18T09:30:00Z, -1.0, 4111111111111111, , \n\
             3, 3, 2026-10-18T09:30:00Z, 1.0, 4111111111111111, PENDENTE, 2026-10-17T09:30:00Z\n\
             4, 3, 2026-10-18T09:30:00Z, 1.0, 4111111111111111, PENDENTE, "
        );
        let reader = ChargeReader::new(data.as_bytes());
        let results: Vec<Result<Charge>> = reader.charges().collect();

        assert!(results[0].is_err());
        assert!(matches!(results[1], Err(BillingError::ValidationError(_))));
        assert!(matches!(results[2], Err(BillingError::ValidationError(_))));
        assert!(results[3].is_ok());
    }
}
