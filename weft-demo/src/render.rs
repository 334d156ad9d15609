//! Text rendering of materialized results.

use std::fmt::Display;

/// Join elements with `", "`, the way stream results are printed.
pub fn render<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
