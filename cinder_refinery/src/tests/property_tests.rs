//! Property-based checks for the grouping reducer and the map/reduce engine.

use crate::api::grouped::GroupedResult;
use crate::api::reduce::MeanReducer;
use crate::config::refinery_config::RefineryConfig;
use crate::core::aggregator::{reduce, Aggregator};
use crate::core::reference::ReferenceAggregator;
use crate::framework::refinery::Refinery;
use cinder_deposit::core::table::{Record, Table};
use proptest::prelude::*;
use std::sync::Arc;

const TOLERANCE: f64 = 1e-9;

fn arb_pair() -> impl Strategy<Value = (String, f64)> {
    (
        prop::sample::select(vec!["Jan", "Feb", "Mar", "Apr", "May"]),
        -1.0e6..1.0e6f64,
    )
        .prop_map(|(key, measure)| (key.to_string(), measure))
}

fn arb_pairs() -> impl Strategy<Value = Vec<(String, f64)>> {
    prop::collection::vec(arb_pair(), 0..200)
}

proptest! {
    #[test]
    fn reduce_ignores_pair_order(
        (pairs, shuffled) in arb_pairs().prop_flat_map(|pairs| {
            let shuffled = Just(pairs.clone()).prop_shuffle();
            (Just(pairs), shuffled)
        })
    ) {
        let original = reduce(pairs);
        let reordered = reduce(shuffled);
        prop_assert!(
            original.approx_eq(&reordered, TOLERANCE),
            "{:?}",
            original.difference(&reordered, TOLERANCE)
        );
    }

    #[test]
    fn merged_partitions_equal_single_pass(pairs in arb_pairs(), split in 0usize..200) {
        let split = split.min(pairs.len());
        let reducer = MeanReducer;

        let mut left = Aggregator::new(&reducer);
        left.absorb(pairs[..split].to_vec());
        let mut right = Aggregator::new(&reducer);
        right.absorb(pairs[split..].to_vec());
        left.merge(right);
        let merged: GroupedResult = left.finish().into_iter().collect();

        prop_assert!(merged.approx_eq(&reduce(pairs), TOLERANCE));
    }

    #[test]
    fn reduce_keys_match_input_keys(pairs in arb_pairs()) {
        let mut keys: Vec<String> = pairs.iter().map(|(key, _)| key.clone()).collect();
        keys.sort();
        keys.dedup();

        let result = reduce(pairs);
        let mut result_keys: Vec<String> = result.iter().map(|(key, _)| key.to_string()).collect();
        result_keys.sort();
        prop_assert_eq!(result_keys, keys);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn mapreduce_equals_reference(pairs in arb_pairs(), workers in 1usize..9) {
        let records = pairs
            .iter()
            .map(|(key, measure)| Record::new(key.as_str(), *measure))
            .collect();
        let table = Arc::new(Table::from_records("month", "number", records));

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let refinery = Refinery::new(RefineryConfig::default())
            .and_then(|refinery| refinery.with_workers(workers))
            .unwrap();
        let mapreduce = runtime.block_on(refinery.refine(table.clone())).unwrap();
        let reference = ReferenceAggregator.aggregate(&table).unwrap();

        prop_assert!(
            mapreduce.approx_eq(&reference, TOLERANCE),
            "{:?}",
            mapreduce.difference(&reference, TOLERANCE)
        );
    }
}
