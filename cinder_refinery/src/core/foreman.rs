use crate::api::map::Mapper;
use crate::core::task::shard;
use crate::core::worker::Worker;
use crate::framework::errors::{CinderRefineryError, Result};
use cinder_deposit::core::table::{Record, Table};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Job Coordinator
///
/// The foreman shards a table into map tasks, hands one task to each worker of
/// a fixed-size pool and gathers the emitted pairs. Pairs come back in
/// completion order, not row order.
#[derive(Debug)]
pub struct Foreman {
    pub id: Uuid,
    pub worker_count: usize,
}

impl Foreman {
    pub fn new(worker_count: usize) -> Result<Self> {
        if worker_count == 0 {
            return Err(CinderRefineryError::InvalidWorkerCount(worker_count));
        }
        Ok(Foreman {
            id: Uuid::new_v4(),
            worker_count,
        })
    }

    /// Applies `mapper` to every record of `table` exactly once.
    ///
    /// The first mapper error fails the whole dispatch. Workers still running
    /// are told to stop and their output is discarded.
    pub async fn dispatch<M, K, V>(
        &self,
        job_id: Uuid,
        table: Arc<Table>,
        mapper: Arc<M>,
    ) -> Result<Vec<(K, V)>>
    where
        M: Mapper<Record, K, V> + ?Sized + 'static,
        K: Send + 'static,
        V: Send + 'static,
    {
        let tasks = shard(job_id, table.len(), self.worker_count);
        if tasks.is_empty() {
            debug!("job {} has no rows to map", job_id);
            return Ok(Vec::new());
        }
        info!(
            "Foreman {} dispatching {} rows to {} workers",
            self.id,
            table.len(),
            tasks.len()
        );

        let cancelled = Arc::new(AtomicBool::new(false));
        let mut workers = JoinSet::new();

        for (cluster_number, task) in tasks.into_iter().enumerate() {
            let table = table.clone();
            let mapper = mapper.clone();
            let cancelled = cancelled.clone();
            let worker = Worker::new(cluster_number);

            workers.spawn_blocking(move || {
                worker.execute(&task, &table, mapper.as_ref(), &cancelled)
            });
        }

        let mut pairs = Vec::with_capacity(table.len());
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(Some(mapped))) => pairs.extend(mapped),
                // abandoned because a sibling failed; its error is still pending
                Ok(Ok(None)) => {}
                Ok(Err(err)) => {
                    error!("Map task failed for job {}: {}", job_id, err);
                    workers.abort_all();
                    return Err(err);
                }
                Err(join_error) => {
                    error!("Worker panicked for job {}: {}", job_id, join_error);
                    cancelled.store(true, Ordering::Relaxed);
                    workers.abort_all();
                    return Err(CinderRefineryError::from(join_error));
                }
            }
        }

        debug!("job {} mapped {} pairs", job_id, pairs.len());
        Ok(pairs)
    }
}

/// Runs `mapper` over `table` on `worker_count` workers.
pub async fn dispatch<M, K, V>(
    table: Arc<Table>,
    mapper: Arc<M>,
    worker_count: usize,
) -> Result<Vec<(K, V)>>
where
    M: Mapper<Record, K, V> + ?Sized + 'static,
    K: Send + 'static,
    V: Send + 'static,
{
    Foreman::new(worker_count)?
        .dispatch(Uuid::new_v4(), table, mapper)
        .await
}
