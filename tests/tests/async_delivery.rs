//! Awaiting deferred values and streaming pipelines through `futures`.

use futures::executor::block_on;
use futures::StreamExt;
use weft::prelude::*;

#[test]
fn test_await_list_and_stream_terminals() {
    let result = block_on(async {
        let folded = list::fold(vec![1, 2, 3, 4, 5], 0, |acc, n| acc + n).await?;
        let counted = StreamPipeline::just([1, 2, 3, 4, 5, 6]).count().await?;
        Ok::<_, PipelineError>((folded, counted))
    });
    assert_eq!(result, Ok((15, 6)));
}

#[test]
fn test_await_failure() {
    let result = block_on(list::take(vec![1, 2, 3], -1));
    assert!(result.unwrap_err().is_invalid_argument());
}

#[test]
fn test_stream_delivers_elements_in_order() {
    let pipeline = StreamPipeline::just([7, 8, 9]).concat(&StreamPipeline::just([4, 3, 2]));
    let items: Vec<i32> = block_on(
        pipeline
            .into_stream()
            .map(|item| item.unwrap())
            .collect(),
    );
    assert_eq!(items, vec![7, 8, 9, 4, 3, 2]);
}

#[test]
fn test_stream_stops_at_first_failure() {
    #[derive(Debug)]
    struct Rejected;

    impl std::fmt::Display for Rejected {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("rejected")
        }
    }

    impl std::error::Error for Rejected {}

    let pipeline = StreamPipeline::just([1, 2, 3, 4])
        .try_map(|n| if n == 2 { Err(Rejected) } else { Ok(n) });
    let items: Vec<_> = block_on(pipeline.into_stream().collect());
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], Ok(1));
    assert_eq!(items[1], Err(PipelineError::evaluation_failure("map", "rejected")));
}
