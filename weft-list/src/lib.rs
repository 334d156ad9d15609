//! Deferred list transformations.
//!
//! Every function here takes ownership of its input list and returns a
//! [`DeferredValue`] describing the transformation. The work happens when the
//! value is materialized, never at call time:
//!
//! ```rust
//! use weft_list::{append, fold};
//!
//! let appended = append(vec![1, 2, 3, 4, 5], 4);
//! assert_eq!(appended.materialize(), Ok(vec![1, 2, 3, 4, 5, 4]));
//!
//! let sum = fold(vec![1, 2, 3, 4, 5], 0, |acc, x| acc + x);
//! assert_eq!(sum.materialize(), Ok(15));
//! ```
//!
//! Functions taking a predicate or mapper also come in `try_` flavours whose
//! closures return a `Result`; the first error aborts the computation and is
//! reported as [`PipelineError::EvaluationFailure`]. Counts accept any integer
//! type and a negative count fails with [`PipelineError::InvalidArgument`].

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::convert::Infallible;
use std::fmt;
use weft_core::{checked_count, DeferredValue, PipelineError};

#[inline]
fn trace_op(operation: &'static str, len: usize) {
    tracing::trace!(operation, len, "applying list operation");
}

/// Add `value` at the end of `list`.
pub fn append<T>(list: Vec<T>, value: T) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("append", list.len());
        let mut list = list;
        list.push(value);
        list
    })
    .named("append")
}

/// Add `value` at the front of `list`.
pub fn prepend<T>(list: Vec<T>, value: T) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("prepend", list.len());
        let mut prepended = Vec::with_capacity(list.len() + 1);
        prepended.push(value);
        prepended.extend(list);
        prepended
    })
    .named("prepend")
}

/// Invert the order of `list`.
pub fn reverse<T>(list: Vec<T>) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("reverse", list.len());
        let mut list = list;
        list.reverse();
        list
    })
    .named("reverse")
}

/// Remove the first `min(count, len)` elements.
pub fn drop<T, N>(list: Vec<T>, count: N) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
    N: TryInto<usize> + Copy + fmt::Display,
{
    let count = checked_count("drop", count);
    DeferredValue::try_new(move || {
        let count = count?;
        trace_op("drop", list.len());
        let mut list = list;
        let dropped = count.min(list.len());
        list.drain(..dropped);
        Ok(list)
    })
    .named("drop")
}

/// Remove the longest prefix whose elements satisfy `predicate`.
pub fn drop_while<T, P>(list: Vec<T>, mut predicate: P) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
{
    try_drop_while(list, move |item| Ok::<_, Infallible>(predicate(item)))
}

/// Fallible [`drop_while`].
pub fn try_drop_while<T, P, E>(list: Vec<T>, mut predicate: P) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
    P: FnMut(&T) -> Result<bool, E> + Send + 'static,
    E: std::error::Error,
{
    DeferredValue::try_new(move || {
        trace_op("drop_while", list.len());
        let split = prefix_len(&list, &mut predicate, "drop_while")?;
        let mut list = list;
        list.drain(..split);
        Ok(list)
    })
    .named("drop_while")
}

/// Keep the first `min(count, len)` elements.
pub fn take<T, N>(list: Vec<T>, count: N) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
    N: TryInto<usize> + Copy + fmt::Display,
{
    let count = checked_count("take", count);
    DeferredValue::try_new(move || {
        let count = count?;
        trace_op("take", list.len());
        let mut list = list;
        list.truncate(count);
        Ok(list)
    })
    .named("take")
}

/// Keep the longest prefix whose elements satisfy `predicate`.
pub fn take_while<T, P>(list: Vec<T>, mut predicate: P) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
    P: FnMut(&T) -> bool + Send + 'static,
{
    try_take_while(list, move |item| Ok::<_, Infallible>(predicate(item)))
}

/// Fallible [`take_while`].
pub fn try_take_while<T, P, E>(list: Vec<T>, mut predicate: P) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
    P: FnMut(&T) -> Result<bool, E> + Send + 'static,
    E: std::error::Error,
{
    DeferredValue::try_new(move || {
        trace_op("take_while", list.len());
        let split = prefix_len(&list, &mut predicate, "take_while")?;
        let mut list = list;
        list.truncate(split);
        Ok(list)
    })
    .named("take_while")
}

/// Remove every element equal to `value`.
pub fn remove<T>(list: Vec<T>, value: T) -> DeferredValue<Vec<T>>
where
    T: PartialEq + Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("remove", list.len());
        let mut list = list;
        list.retain(|item| *item != value);
        list
    })
    .named("remove")
}

/// Elements of `first` followed by elements of `second`.
pub fn concatenate<T>(first: Vec<T>, second: Vec<T>) -> DeferredValue<Vec<T>>
where
    T: Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("concatenate", first.len() + second.len());
        let mut joined = first;
        joined.extend(second);
        joined
    })
    .named("concatenate")
}

/// Replace every occurrence of `old` with `new`, keeping positions.
pub fn replace<T>(list: Vec<T>, old: T, new: T) -> DeferredValue<Vec<T>>
where
    T: PartialEq + Clone + Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("replace", list.len());
        let mut list = list;
        for item in list.iter_mut().filter(|item| **item == old) {
            *item = new.clone();
        }
        list
    })
    .named("replace")
}

/// Number of elements in `list`.
pub fn size<T>(list: Vec<T>) -> DeferredValue<usize>
where
    T: Send + 'static,
{
    DeferredValue::new(move || {
        trace_op("size", list.len());
        list.len()
    })
    .named("size")
}

/// Apply `mapper` to every element, in order.
pub fn map<T, R, F>(list: Vec<T>, mut mapper: F) -> DeferredValue<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnMut(T) -> R + Send + 'static,
{
    try_map(list, move |item| Ok::<_, Infallible>(mapper(item)))
}

/// Fallible [`map`].
pub fn try_map<T, R, F, E>(list: Vec<T>, mut mapper: F) -> DeferredValue<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnMut(T) -> Result<R, E> + Send + 'static,
    E: std::error::Error,
{
    DeferredValue::try_new(move || {
        trace_op("map", list.len());
        list.into_iter()
            .map(|item| mapper(item).map_err(|err| PipelineError::from_source("map", &err)))
            .collect()
    })
    .named("map")
}

/// Left fold starting from `initial`.
pub fn fold<T, R, F>(list: Vec<T>, initial: R, mut folder: F) -> DeferredValue<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnMut(R, T) -> R + Send + 'static,
{
    try_fold(list, initial, move |acc, item| Ok::<_, Infallible>(folder(acc, item)))
}

/// Fallible [`fold`].
pub fn try_fold<T, R, F, E>(list: Vec<T>, initial: R, mut folder: F) -> DeferredValue<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: FnMut(R, T) -> Result<R, E> + Send + 'static,
    E: std::error::Error,
{
    DeferredValue::try_new(move || {
        trace_op("fold", list.len());
        list.into_iter().try_fold(initial, |acc, item| {
            folder(acc, item).map_err(|err| PipelineError::from_source("fold", &err))
        })
    })
    .named("fold")
}

fn prefix_len<T, P, E>(
    list: &[T],
    predicate: &mut P,
    operation: &'static str,
) -> Result<usize, PipelineError>
where
    P: FnMut(&T) -> Result<bool, E>,
    E: std::error::Error,
{
    for (index, item) in list.iter().enumerate() {
        let keep = predicate(item).map_err(|err| PipelineError::from_source(operation, &err))?;
        if !keep {
            return Ok(index);
        }
    }
    Ok(list.len())
}
