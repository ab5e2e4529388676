use crate::api::grouped::GroupedResult;
use crate::api::reduce::{MeanReducer, Reducer};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// Groups intermediate pairs by key and folds each group with a [`Reducer`].
///
/// An accumulator is created only when the first value of a key arrives, so
/// every finished group has seen at least one value.
pub struct Aggregator<'r, K, V, R: Reducer<V>> {
    reducer: &'r R,
    groups: HashMap<K, R::Accumulator>,
    _value: PhantomData<fn(V)>,
}

impl<'r, K, V, R> Aggregator<'r, K, V, R>
where
    K: Hash + Eq,
    R: Reducer<V>,
{
    pub fn new(reducer: &'r R) -> Self {
        Aggregator {
            reducer,
            groups: HashMap::new(),
            _value: PhantomData,
        }
    }

    pub fn absorb<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            let accumulator = self.groups.entry(key).or_default();
            self.reducer.accumulate(accumulator, value);
        }
    }

    /// Folds the partial groups of `other` into this aggregator.
    pub fn merge(&mut self, other: Aggregator<'r, K, V, R>) {
        for (key, partial) in other.groups {
            let accumulator = self.groups.entry(key).or_default();
            self.reducer.merge(accumulator, partial);
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn finish(self) -> HashMap<K, R::Output> {
        let reducer = self.reducer;
        self.groups
            .into_iter()
            .map(|(key, accumulator)| (key, reducer.finish(accumulator)))
            .collect()
    }
}

/// Mean per key of an unordered sequence of `(key, measure)` pairs.
pub fn reduce<I>(pairs: I) -> GroupedResult
where
    I: IntoIterator<Item = (String, f64)>,
{
    reduce_with(&MeanReducer, pairs)
}

pub fn reduce_with<R, I>(reducer: &R, pairs: I) -> GroupedResult
where
    R: Reducer<f64, Output = f64>,
    I: IntoIterator<Item = (String, f64)>,
{
    let mut aggregator = Aggregator::new(reducer);
    aggregator.absorb(pairs);
    GroupedResult::new(aggregator.finish())
}
