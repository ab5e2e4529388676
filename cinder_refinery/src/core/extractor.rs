use crate::api::map::Mapper;
use crate::framework::errors::{CinderRefineryError, Result};
use cinder_deposit::core::table::{Cell, Record};

/// Emits `(group_key, measure)` for a record.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyExtractor;

impl Mapper<Record, String, f64> for KeyExtractor {
    fn map(&self, record: &Record) -> Result<(String, f64)> {
        let key = record.group_key.as_ref().ok_or_else(|| {
            CinderRefineryError::MalformedRecord("group key is absent".to_string())
        })?;
        Ok((key.clone(), measure_of(&record.measure)?))
    }
}

/// The finite measure held by `cell`.
pub(crate) fn measure_of(cell: &Cell) -> Result<f64> {
    match cell {
        Cell::Number(number) if number.is_finite() => Ok(*number),
        Cell::Number(number) => Err(CinderRefineryError::MalformedRecord(format!(
            "measure is not finite: {}",
            number
        ))),
        Cell::Text(text) => Err(CinderRefineryError::MalformedRecord(format!(
            "measure is not numeric: '{}'",
            text
        ))),
        Cell::Missing => Err(CinderRefineryError::MalformedRecord(
            "measure is missing".to_string(),
        )),
    }
}
