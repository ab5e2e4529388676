use crate::api::grouped::GroupedResult;
use crate::api::map::Mapper;
use crate::api::reduce::Reducer;
use crate::core::aggregator::reduce_with;
use crate::core::foreman::Foreman;
use crate::framework::errors::{CinderRefineryError, Result, Stage};
use cinder_deposit::core::table::{Record, Table};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// A Job represents the highest level of abstraction over the MapReduce framework
/// A Job has all necessary map and reduce information, that it uses to split into tasks
pub struct Job<M, R> {
    pub id: Uuid,
    pub mapper_function: Arc<M>,
    pub reducer_function: Arc<R>,
    pub num_workers: usize,
    pub status: JobStatus,
    pub start_time: Option<Instant>,
    pub end_time: Option<Instant>,
}

impl<M, R> Job<M, R>
where
    M: Mapper<Record, String, f64> + 'static,
    R: Reducer<f64, Output = f64> + 'static,
{
    pub fn new(mapper_function: M, reducer_function: R, num_workers: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            mapper_function: Arc::new(mapper_function),
            reducer_function: Arc::new(reducer_function),
            num_workers,
            status: JobStatus::Pending,
            start_time: None,
            end_time: None,
        }
    }

    /// Maps `table` across the worker pool and reduces the pairs into grouped means.
    pub async fn run(&mut self, table: Arc<Table>) -> Result<GroupedResult> {
        let span = tracing::info_span!("job", id = %self.id);
        self.status = JobStatus::InProgress;
        self.start_time = Some(Instant::now());

        let outcome = self.execute(table).instrument(span).await;

        self.end_time = Some(Instant::now());
        self.status = match &outcome {
            Ok(_) => JobStatus::Completed,
            Err(_) => JobStatus::Failed,
        };
        outcome
    }

    async fn execute(&self, table: Arc<Table>) -> Result<GroupedResult> {
        let foreman = Foreman::new(self.num_workers).map_err(|err| err.at_stage(Stage::Map))?;
        let pairs: Vec<(String, f64)> = foreman
            .dispatch(self.id, table, self.mapper_function.clone())
            .await
            .map_err(|err| err.at_stage(Stage::Map))?;

        let reducer = self.reducer_function.clone();
        let result = tokio::task::spawn_blocking(move || reduce_with(reducer.as_ref(), pairs))
            .await
            .map_err(|err| CinderRefineryError::from(err).at_stage(Stage::Reduce))?;

        info!("job {} produced {} groups", self.id, result.len());
        Ok(result)
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
