/// A Reducer folds every value sharing a key into an accumulator and turns the
/// accumulator into the final value for that key.
///
/// `accumulate` and `merge` must be order-insensitive: the refinery feeds
/// values in whatever order the workers finish.
pub trait Reducer<IntermediateValue>: Send + Sync {
    type Accumulator: Default + Send;
    type Output;

    fn accumulate(&self, accumulator: &mut Self::Accumulator, value: IntermediateValue);

    fn merge(&self, accumulator: &mut Self::Accumulator, other: Self::Accumulator);

    fn finish(&self, accumulator: Self::Accumulator) -> Self::Output;
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MeanAccumulator {
    pub sum: f64,
    pub count: u64,
}

/// Arithmetic mean of every value for a key.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeanReducer;

impl Reducer<f64> for MeanReducer {
    type Accumulator = MeanAccumulator;
    type Output = f64;

    fn accumulate(&self, accumulator: &mut MeanAccumulator, value: f64) {
        accumulator.sum += value;
        accumulator.count += 1;
    }

    fn merge(&self, accumulator: &mut MeanAccumulator, other: MeanAccumulator) {
        accumulator.sum += other.sum;
        accumulator.count += other.count;
    }

    fn finish(&self, accumulator: MeanAccumulator) -> f64 {
        accumulator.sum / accumulator.count as f64
    }
}
