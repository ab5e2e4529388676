use std::ops::Range;
use uuid::Uuid;

/// A contiguous slice of table rows assigned to one worker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTask {
    pub task_id: Uuid,
    pub job_id: Uuid, // overall job id for this task
    pub seq: usize,
    pub rows: Range<usize>,
}

impl MapTask {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shards `row_count` rows into at most `worker_count` non-empty tasks whose
/// sizes differ by at most one row. Every row lands in exactly one task.
pub fn shard(job_id: Uuid, row_count: usize, worker_count: usize) -> Vec<MapTask> {
    let shards = worker_count.min(row_count);
    if shards == 0 {
        return Vec::new();
    }

    let base = row_count / shards;
    let remainder = row_count % shards;

    let mut tasks = Vec::with_capacity(shards);
    let mut start = 0;
    for seq in 0..shards {
        let size = base + usize::from(seq < remainder);
        tasks.push(MapTask {
            task_id: Uuid::new_v4(),
            job_id,
            seq,
            rows: start..start + size,
        });
        start += size;
    }
    tasks
}
