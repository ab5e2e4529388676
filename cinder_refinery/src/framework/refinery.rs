use crate::api::grouped::GroupedResult;
use crate::api::reduce::MeanReducer;
use crate::config::refinery_config::RefineryConfig;
use crate::core::extractor::KeyExtractor;
use crate::core::job::Job;
use crate::core::reference::ReferenceAggregator;
use crate::framework::errors::{CinderRefineryError, Result, Stage};
use cinder_deposit::config::deposit_config::DepositConfig;
use cinder_deposit::core::ingest::load_table;
use cinder_deposit::core::store::TableStore;
use cinder_deposit::core::table::Table;
use cinder_deposit::error::CinderDepositError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Everything one pipeline run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub rows: usize,
    pub mapreduce: GroupedResult,
    pub reference: GroupedResult,
    /// Declarative query rows, highest mean first.
    pub query: Vec<(String, f64)>,
    pub elapsed: Duration,
}

pub struct Refinery {
    pub config: RefineryConfig,
    worker_count: usize,
}

impl Refinery {
    pub fn new(config: RefineryConfig) -> Result<Self> {
        let worker_count = config.worker_count()?;
        Ok(Refinery {
            config,
            worker_count,
        })
    }

    pub fn with_workers(mut self, worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(CinderRefineryError::InvalidWorkerCount(worker_count));
        }
        self.worker_count = worker_count;
        self.config.number_of_workers = Some(worker_count);
        Ok(self)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Grouped mean of `table` through the map/reduce engine.
    pub async fn refine(&self, table: Arc<Table>) -> Result<GroupedResult> {
        if table.is_empty() {
            warn!("Table is empty, the grouped result will be empty.");
        }

        let mut job = Job::new(KeyExtractor, MeanReducer, self.worker_count);
        let result = job.run(table).await?;
        if let Some(elapsed) = job.elapsed() {
            info!(
                "job {} finished in {:?} on {} workers",
                job.id, elapsed, self.worker_count
            );
        }
        Ok(result)
    }

    /// Runs map/reduce and the reference aggregation over `table` and fails
    /// unless they agree.
    pub async fn assay(&self, table: Arc<Table>) -> Result<GroupedResult> {
        let mapreduce = self.refine(table.clone()).await?;
        let reference = ReferenceAggregator
            .aggregate(&table)
            .map_err(|err| err.at_stage(Stage::Reference))?;
        self.validate("reference aggregation", &mapreduce, &reference)?;
        Ok(mapreduce)
    }

    /// Load, persist, aggregate three ways and cross-validate.
    pub async fn run_pipeline(&self, deposit: &DepositConfig) -> Result<PipelineReport> {
        info!("=== Grouped mean pipeline started ===");
        let started = Instant::now();

        let table = load_table(
            &deposit.dataset_path,
            &deposit.column_mapping(),
            deposit.encoding().map_err(|err| at_stage(err, Stage::Load))?,
        )
        .map_err(|err| at_stage(err, Stage::Load))?;
        let table = Arc::new(table);

        let mut store =
            TableStore::open(&deposit.database_path).map_err(|err| at_stage(err, Stage::Persist))?;
        store
            .persist(&table, &deposit.database_table)
            .map_err(|err| at_stage(err, Stage::Persist))?;

        let mapreduce = self.refine(table.clone()).await?;

        let reference = ReferenceAggregator
            .aggregate(&table)
            .map_err(|err| err.at_stage(Stage::Reference))?;

        let query = store
            .average_by_group(
                &deposit.database_table,
                &table.group_column,
                &table.measure_column,
            )
            .map_err(|err| at_stage(err, Stage::Query))?;

        self.validate("reference aggregation", &mapreduce, &reference)?;
        self.validate(
            "declarative query",
            &mapreduce,
            &GroupedResult::from(query.clone()),
        )?;

        info!("=== Pipeline completed successfully ===");
        Ok(PipelineReport {
            rows: table.len(),
            mapreduce,
            reference,
            query,
            elapsed: started.elapsed(),
        })
    }

    pub(crate) fn validate(
        &self,
        strategy: &str,
        mapreduce: &GroupedResult,
        other: &GroupedResult,
    ) -> Result<()> {
        match mapreduce.difference(other, self.config.validation_tolerance) {
            None => {
                info!("map/reduce agrees with {}", strategy);
                Ok(())
            }
            Some(difference) => Err(CinderRefineryError::ValidationMismatch(format!(
                "map/reduce versus {}: {}",
                strategy, difference
            ))
            .at_stage(Stage::Validate)),
        }
    }
}

fn at_stage(err: CinderDepositError, stage: Stage) -> CinderRefineryError {
    CinderRefineryError::from(err).at_stage(stage)
}
