//! Shared fixtures for the Weft benchmarks.

use weft::StreamPipeline;

/// Input sizes exercised by every benchmark group.
pub const SIZES: [usize; 3] = [100, 10_000, 100_000];

/// `0..len` as a list.
#[must_use]
pub fn sample(len: usize) -> Vec<u64> {
    (0..len as u64).collect()
}

/// A filter/map/take chain over `0..len`, the shape most callers build.
#[must_use]
pub fn typical_chain(len: usize) -> StreamPipeline<u64> {
    StreamPipeline::from_vec(sample(len))
        .filter(|n| n % 3 != 0)
        .map(|n| n * 2)
        .take(len / 2)
}
