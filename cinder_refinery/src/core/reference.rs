use crate::api::grouped::GroupedResult;
use crate::core::extractor::measure_of;
use crate::framework::errors::{CinderRefineryError, Result};
use cinder_deposit::core::table::Table;
use std::collections::HashMap;

/// Single-threaded grouped mean computed straight off the table, used to
/// cross-check the map/reduce result.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceAggregator;

impl ReferenceAggregator {
    pub fn aggregate(&self, table: &Table) -> Result<GroupedResult> {
        let mut totals: HashMap<&str, (f64, u64)> = HashMap::new();

        for (row, record) in table.records().iter().enumerate() {
            let key = record.group_key.as_deref().ok_or_else(|| {
                CinderRefineryError::MalformedRecord(format!("row {}: group key is absent", row))
            })?;
            let measure = measure_of(&record.measure).map_err(|err| match err {
                CinderRefineryError::MalformedRecord(msg) => {
                    CinderRefineryError::MalformedRecord(format!("row {}: {}", row, msg))
                }
                other => other,
            })?;

            let (sum, count) = totals.entry(key).or_insert((0.0, 0));
            *sum += measure;
            *count += 1;
        }

        Ok(totals
            .into_iter()
            .map(|(key, (sum, count))| (key.to_string(), sum / count as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_deposit::core::table::{Cell, Record};

    #[test]
    fn aggregate_multi_key() {
        let table = Table::from_records(
            "month",
            "number",
            vec![
                Record::new("Jan", 5.0),
                Record::new("Feb", 10.0),
                Record::new("Jan", 15.0),
            ],
        );

        let result = ReferenceAggregator.aggregate(&table).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("Jan"), Some(10.0));
        assert_eq!(result.get("Feb"), Some(10.0));
    }

    #[test]
    fn aggregate_empty_table() {
        let table = Table::new("month", "number");
        assert!(ReferenceAggregator.aggregate(&table).unwrap().is_empty());
    }

    #[test]
    fn aggregate_rejects_malformed_record() {
        let table = Table::from_records(
            "month",
            "number",
            vec![
                Record::new("Jan", 5.0),
                Record::with_measure(Some("Feb".to_string()), Cell::Missing),
            ],
        );

        let err = ReferenceAggregator.aggregate(&table).unwrap_err();
        assert_eq!(
            err,
            CinderRefineryError::MalformedRecord("row 1: measure is missing".to_string())
        );
    }
}
