use super::ChargeRecord;
use crate::domain::charge::Charge;
use crate::error::Result;
use std::io::Write;

/// Writes charges as CSV, in the same layout `ChargeReader` accepts.
pub struct ChargeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ChargeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_charges<'a>(&mut self, charges: impl IntoIterator<Item = &'a Charge>) -> Result<()> {
        for charge in charges {
            self.writer.serialize(ChargeRecord::from(charge))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
