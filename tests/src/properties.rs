//! Property-based checks of the list and stream laws.

use proptest::prelude::*;
use weft::prelude::*;

fn resolve<T: Send + 'static>(value: DeferredValue<T>) -> T {
    value.materialize().unwrap()
}

proptest! {
    #[test]
    fn prop_append_grows_by_one(
        items in prop::collection::vec(any::<i32>(), 0..64),
        value in any::<i32>(),
    ) {
        let appended = resolve(list::append(items.clone(), value));
        prop_assert_eq!(appended.len(), items.len() + 1);
        prop_assert_eq!(appended.last(), Some(&value));
    }

    #[test]
    fn prop_reverse_is_involution(items in prop::collection::vec(any::<i32>(), 0..64)) {
        let twice = resolve(list::reverse(items.clone()).and_then(list::reverse));
        prop_assert_eq!(twice, items);
    }

    #[test]
    fn prop_take_and_drop_split_the_list(
        items in prop::collection::vec(any::<u8>(), 0..64),
        n in 0usize..80,
    ) {
        let taken = resolve(list::take(items.clone(), n));
        let dropped = resolve(list::drop(items.clone(), n));
        if n <= items.len() {
            prop_assert_eq!(taken.len() + dropped.len(), items.len());
        } else {
            prop_assert_eq!(&taken, &items);
            prop_assert!(dropped.is_empty());
        }
        prop_assert_eq!([taken, dropped].concat(), items);
    }

    #[test]
    fn prop_concatenate_with_empty_is_identity(
        items in prop::collection::vec(any::<i64>(), 0..64),
    ) {
        prop_assert_eq!(resolve(list::concatenate(items.clone(), Vec::new())), items.clone());
        prop_assert_eq!(resolve(list::concatenate(Vec::new(), items.clone())), items);
    }

    #[test]
    fn prop_take_while_then_drop_while_rebuilds(
        items in prop::collection::vec(0i32..10, 0..64),
        pivot in 0i32..10,
    ) {
        let head = resolve(list::take_while(items.clone(), move |v| *v < pivot));
        let tail = resolve(list::drop_while(items.clone(), move |v| *v < pivot));
        prop_assert_eq!([head, tail].concat(), items);
    }

    #[test]
    fn prop_negative_counts_are_rejected(n in i64::MIN..0) {
        let err = list::take(vec![1, 2, 3], n).materialize().unwrap_err();
        prop_assert!(err.is_invalid_argument());
        let err = StreamPipeline::just([1, 2, 3]).skip(n).count().materialize().unwrap_err();
        prop_assert!(err.is_invalid_argument());
    }
}

mod quickcheck_tests {
    use quickcheck_macros::quickcheck;
    use weft::prelude::*;

    #[quickcheck]
    fn qc_stream_take_agrees_with_list_take(data: Vec<i32>, n: u8) -> bool {
        let from_stream = StreamPipeline::from_vec(data.clone())
            .take(n)
            .collect_to_list()
            .materialize();
        from_stream == list::take(data, n).materialize()
    }

    #[quickcheck]
    fn qc_stream_skip_agrees_with_list_drop(data: Vec<i32>, n: u8) -> bool {
        let from_stream = StreamPipeline::from_vec(data.clone())
            .skip(n)
            .collect_to_list()
            .materialize();
        from_stream == list::drop(data, n).materialize()
    }

    #[quickcheck]
    fn qc_invert_agrees_with_reverse(data: Vec<u16>) -> bool {
        let from_stream = StreamPipeline::from_vec(data.clone())
            .invert()
            .collect_to_list()
            .materialize();
        from_stream == list::reverse(data).materialize()
    }

    #[quickcheck]
    fn qc_count_agrees_with_size(data: Vec<String>) -> bool {
        let counted = StreamPipeline::from_vec(data.clone()).count().materialize();
        counted == list::size(data).materialize()
    }

    #[quickcheck]
    fn qc_reduce_agrees_with_fold(data: Vec<i64>) -> bool {
        let add = |acc: i64, v: i64| acc.wrapping_add(v);
        StreamPipeline::from_vec(data.clone()).reduce(0, add).materialize()
            == list::fold(data, 0, add).materialize()
    }

    #[quickcheck]
    fn qc_last_scan_output_is_reduce(data: Vec<i32>) -> bool {
        let add = |acc: i32, v: i32| acc.wrapping_add(v);
        let pipeline = StreamPipeline::from_vec(data);
        let scanned = pipeline.scan(0, add).collect_to_list().materialize().unwrap();
        let reduced = pipeline.reduce(0, add).materialize().unwrap();
        scanned.last().copied().unwrap_or(0) == reduced
    }

    #[quickcheck]
    fn qc_remove_then_replace_is_noop(data: Vec<u8>, value: u8) -> bool {
        let pipeline = StreamPipeline::from_vec(data).remove(value);
        pipeline.replace(value, value.wrapping_add(1)).collect_to_list().materialize()
            == pipeline.collect_to_list().materialize()
    }
}
