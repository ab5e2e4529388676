use crate::framework::errors::Result;

/// Mapper is used to perform CPU-bound jobs, the entire dataset is already in memory.
///
/// Each call sees a single item and must not depend on any other state, so one
/// mapper value is shared by every worker of a job.
pub trait Mapper<Item, IntermediateKey, IntermediateValue>: Send + Sync {
    fn map(&self, item: &Item) -> Result<(IntermediateKey, IntermediateValue)>;
}

impl<Item, IntermediateKey, IntermediateValue, F> Mapper<Item, IntermediateKey, IntermediateValue>
    for F
where
    F: Fn(&Item) -> Result<(IntermediateKey, IntermediateValue)> + Send + Sync,
{
    fn map(&self, item: &Item) -> Result<(IntermediateKey, IntermediateValue)> {
        self(item)
    }
}
