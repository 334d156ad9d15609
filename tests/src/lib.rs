//! Integration tests for the Weft pipeline library.

#[cfg(test)]
mod properties;

/// End-to-end scenarios over the public facade.
#[cfg(test)]
mod integration_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use weft::prelude::*;

    fn original() -> Vec<i32> {
        vec![1, 2, 3, 4, 5]
    }

    fn collect<T: Clone + Send + Sync + 'static>(pipeline: &StreamPipeline<T>) -> Vec<T> {
        pipeline.collect_to_list().materialize().unwrap()
    }

    #[test]
    fn test_list_walkthrough() {
        assert_eq!(list::append(original(), 4).materialize(), Ok(vec![1, 2, 3, 4, 5, 4]));
        assert_eq!(list::prepend(original(), 1).materialize(), Ok(vec![1, 1, 2, 3, 4, 5]));
        assert_eq!(list::reverse(original()).materialize(), Ok(vec![5, 4, 3, 2, 1]));
        assert_eq!(list::drop(original(), 2).materialize(), Ok(vec![3, 4, 5]));
        assert_eq!(list::drop_while(original(), |v| *v < 3).materialize(), Ok(vec![3, 4, 5]));
        assert_eq!(list::take(original(), 3).materialize(), Ok(vec![1, 2, 3]));
        assert_eq!(list::take_while(original(), |v| *v <= 3).materialize(), Ok(vec![1, 2, 3]));
        assert_eq!(list::remove(original(), 3).materialize(), Ok(vec![1, 2, 4, 5]));
        assert_eq!(
            list::concatenate(vec![1, 2, 3], vec![4, 5, 6]).materialize(),
            Ok(vec![1, 2, 3, 4, 5, 6])
        );
        assert_eq!(list::replace(original(), 3, 22).materialize(), Ok(vec![1, 2, 22, 4, 5]));
        assert_eq!(list::size(original()).materialize(), Ok(5));
        assert_eq!(
            list::map(original(), |n| format!("Mapped: {n}")).materialize().unwrap()[0],
            "Mapped: 1"
        );
        assert_eq!(list::fold(original(), 0, |acc, n| acc + n).materialize(), Ok(15));
    }

    #[test]
    fn test_stream_walkthrough() {
        let flux1 = StreamPipeline::just([1, 2, 3]);
        let flux3 = StreamPipeline::just([1, 2, 3, 4, 5, 6]);
        let appended = StreamPipeline::just([7, 8, 9]).concat(&StreamPipeline::just([4, 3, 2]));

        assert_eq!(collect(&appended), vec![7, 8, 9, 4, 3, 2]);
        assert_eq!(collect(&flux3.skip(2)), vec![3, 4, 5, 6]);
        assert_eq!(collect(&flux3.filter(|n| n % 2 == 0)), vec![2, 4, 6]);
        assert_eq!(collect(&flux3.take(3)), vec![1, 2, 3]);
        assert_eq!(collect(&flux3.drop_while(|n| *n < 3)), vec![3, 4, 5, 6]);
        assert_eq!(collect(&flux3.take_while(|n| *n <= 3)), vec![1, 2, 3]);
        assert_eq!(collect(&flux3.filter(|n| n % 2 != 0)), vec![1, 3, 5]);
        assert_eq!(collect(&flux3.invert()), vec![6, 5, 4, 3, 2, 1]);
        assert_eq!(collect(&flux3.remove(3)), vec![1, 2, 4, 5, 6]);
        assert_eq!(collect(&flux3.replace(3, 10)), vec![1, 2, 10, 4, 5, 6]);
        assert_eq!(flux3.count().materialize(), Ok(6));
        assert_eq!(collect(&flux1.map(|x| x * 2)), vec![2, 4, 6]);
        assert_eq!(flux1.reduce(0, |acc, v| acc + v).materialize(), Ok(6));
        assert_eq!(collect(&flux1.scan(1, |acc, v| acc * v)), vec![1, 2, 6]);
    }

    #[test]
    fn test_nothing_runs_until_materialized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let mapped = list::map(original(), move |n| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            n * 2
        });
        let calls_clone = calls.clone();
        let pipeline = StreamPipeline::just([1, 2, 3]).inspect(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        let count = pipeline.count();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(mapped.materialize(), Ok(vec![2, 4, 6, 8, 10]));
        assert_eq!(count.materialize(), Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_deferred_value_resolves_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let mut deferred = DeferredValue::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            "done"
        });

        assert_eq!(deferred.evaluate(), DeferredState::Resolved);
        assert_eq!(deferred.evaluate(), DeferredState::Resolved);
        assert_eq!(deferred.materialize(), Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stage_failure_is_attributed() {
        let err = StreamPipeline::just([1, 2, 3])
            .map(|n| if n == 3 { panic!("bad element") } else { n })
            .collect_to_list()
            .materialize()
            .unwrap_err();
        assert!(err.is_evaluation_failure());
        assert_eq!(err.operation(), "collect_to_list");

        let err = list::drop(original(), -1).materialize().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.operation(), "drop");
    }

    #[test]
    fn test_empty_inputs() {
        let empty: Vec<i32> = Vec::new();
        assert_eq!(list::reverse(empty.clone()).materialize(), Ok(vec![]));
        assert_eq!(list::take(empty.clone(), 3).materialize(), Ok(vec![]));
        assert_eq!(list::fold(empty, 7, |acc, n| acc + n).materialize(), Ok(7));

        let pipeline = StreamPipeline::<i32>::empty();
        assert_eq!(pipeline.count().materialize(), Ok(0));
        assert_eq!(pipeline.reduce(7, |acc, n| acc + n).materialize(), Ok(7));
        assert_eq!(collect(&pipeline.scan(1, |acc, n| acc * n)), Vec::<i32>::new());
    }
}
