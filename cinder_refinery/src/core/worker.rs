use crate::api::map::Mapper;
use crate::core::task::MapTask;
use crate::framework::errors::{CinderRefineryError, Result};
use cinder_deposit::core::table::{Record, Table};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// A pool member that applies the job's mapper to the rows of one task.
#[derive(Debug, Clone, Copy)]
pub struct Worker {
    pub cluster_number: usize,
}

impl Worker {
    pub fn new(cluster_number: usize) -> Self {
        Worker { cluster_number }
    }

    /// Maps every row of `task`.
    ///
    /// Returns `Ok(None)` when another worker of the same job has already
    /// failed; the first failing worker raises `cancelled` before returning
    /// its error.
    pub fn execute<M, K, V>(
        &self,
        task: &MapTask,
        table: &Table,
        mapper: &M,
        cancelled: &AtomicBool,
    ) -> Result<Option<Vec<(K, V)>>>
    where
        M: Mapper<Record, K, V> + ?Sized,
    {
        let records = &table.records()[task.rows.clone()];
        let mut pairs = Vec::with_capacity(records.len());

        for (offset, record) in records.iter().enumerate() {
            if cancelled.load(Ordering::Relaxed) {
                debug!(
                    "worker {} abandoned task {} after {} rows",
                    self.cluster_number, task.seq, offset
                );
                return Ok(None);
            }

            match mapper.map(record) {
                Ok(pair) => pairs.push(pair),
                Err(err) => {
                    cancelled.store(true, Ordering::Relaxed);
                    return Err(at_row(err, task.rows.start + offset));
                }
            }
        }

        debug!(
            "worker {} mapped {} rows for task {}",
            self.cluster_number,
            pairs.len(),
            task.seq
        );
        Ok(Some(pairs))
    }
}

fn at_row(err: CinderRefineryError, row: usize) -> CinderRefineryError {
    match err {
        CinderRefineryError::MalformedRecord(msg) => {
            CinderRefineryError::MalformedRecord(format!("row {}: {}", row, msg))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::KeyExtractor;
    use crate::core::task::shard;
    use cinder_deposit::core::table::Cell;
    use uuid::Uuid;

    fn table() -> Table {
        Table::from_records(
            "month",
            "number",
            vec![
                Record::new("Jan", 1.0),
                Record::new("Feb", 2.0),
                Record::with_measure(Some("Mar".to_string()), Cell::Text("x".to_string())),
            ],
        )
    }

    #[test]
    fn execute_maps_assigned_rows() {
        let tasks = shard(Uuid::new_v4(), 3, 2);
        let cancelled = AtomicBool::new(false);

        let pairs = Worker::new(0)
            .execute(&tasks[0], &table(), &KeyExtractor, &cancelled)
            .unwrap()
            .unwrap();
        assert_eq!(pairs, vec![("Jan".to_string(), 1.0), ("Feb".to_string(), 2.0)]);
    }

    #[test]
    fn execute_reports_row_and_raises_cancellation() {
        let tasks = shard(Uuid::new_v4(), 3, 2);
        let cancelled = AtomicBool::new(false);

        let err = Worker::new(1)
            .execute(&tasks[1], &table(), &KeyExtractor, &cancelled)
            .unwrap_err();
        assert_eq!(
            err,
            CinderRefineryError::MalformedRecord("row 2: measure is not numeric: 'x'".to_string())
        );
        assert!(cancelled.load(Ordering::Relaxed));
    }

    #[test]
    fn execute_stops_once_cancelled() {
        let tasks = shard(Uuid::new_v4(), 3, 1);
        let cancelled = AtomicBool::new(true);

        let outcome = Worker::new(0).execute(&tasks[0], &table(), &KeyExtractor, &cancelled);
        assert_eq!(outcome, Ok(None));
    }
}
