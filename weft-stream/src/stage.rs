//! Stage tags and the element-level iterator adapters behind them.
//!
//! Every adapter here works over items of type `PipelineResult<T>`. An `Err`
//! coming from upstream is always forwarded, never skipped or counted as an
//! element, so a failure raised early in the chain reaches the terminal
//! operation no matter which stages follow it.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;
use weft_core::PipelineResult;

/// Tag identifying one stage in a pipeline's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Elementwise transform
    Map,
    /// Predicate-based retention
    Filter,
    /// Stop after a number of elements
    Take,
    /// Discard a number of leading elements
    Skip,
    /// Discard the longest prefix matching a predicate
    DropWhile,
    /// Keep the longest prefix matching a predicate
    TakeWhile,
    /// Append another pipeline
    Concat,
    /// Running accumulation
    Scan,
    /// Full buffering then reversed re-emission
    Invert,
    /// Equality-based exclusion
    Remove,
    /// Equality-based substitution
    Replace,
    /// Observation without modification
    Inspect,
}

impl StageKind {
    /// Stable lowercase name used in logs and error attribution.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Filter => "filter",
            Self::Take => "take",
            Self::Skip => "skip",
            Self::DropWhile => "drop_while",
            Self::TakeWhile => "take_while",
            Self::Concat => "concat",
            Self::Scan => "scan",
            Self::Invert => "invert",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Inspect => "inspect",
        }
    }

    /// Whether the stage must see the whole upstream before emitting.
    #[must_use]
    pub const fn buffers(self) -> bool {
        matches!(self, Self::Invert)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterator over a shared in-memory source, cloning elements out.
pub struct SourceIter<T> {
    items: Arc<[T]>,
    position: usize,
}

impl<T> SourceIter<T> {
    /// Start at the first element of `items`.
    #[inline]
    pub fn new(items: Arc<[T]>) -> Self {
        SourceIter { items, position: 0 }
    }
}

impl<T: Clone> Iterator for SourceIter<T> {
    type Item = PipelineResult<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.get(self.position)?.clone();
        self.position += 1;
        Some(Ok(item))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for SourceIter<T> {}

impl<T: Clone> FusedIterator for SourceIter<T> {}

/// Discards the first `n` successful elements.
pub struct Skip<I> {
    iter: I,
    remaining: usize,
}

impl<I> Skip<I> {
    /// Skip `n` elements of `iter`.
    #[inline]
    pub fn new(iter: I, n: usize) -> Self {
        Skip { iter, remaining: n }
    }
}

impl<I, T> Iterator for Skip<I>
where
    I: Iterator<Item = PipelineResult<T>>,
{
    type Item = PipelineResult<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            match self.iter.next()? {
                Ok(_) => self.remaining -= 1,
                Err(err) => {
                    self.remaining = 0;
                    return Some(Err(err));
                }
            }
        }
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        // An upstream error cancels the rest of the skip.
        if self.remaining == 0 {
            self.iter.size_hint()
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}

/// Discards the longest prefix whose elements satisfy the predicate.
pub struct DropWhile<I, P> {
    iter: I,
    predicate: P,
    done: bool,
}

impl<I, P> DropWhile<I, P> {
    /// Wrap `iter`, testing elements with `predicate`.
    #[inline]
    pub fn new<T>(iter: I, predicate: P) -> Self
    where
        I: Iterator<Item = PipelineResult<T>>,
        P: FnMut(&T) -> PipelineResult<bool>,
    {
        DropWhile {
            iter,
            predicate,
            done: false,
        }
    }
}

impl<I, P, T> Iterator for DropWhile<I, P>
where
    I: Iterator<Item = PipelineResult<T>>,
    P: FnMut(&T) -> PipelineResult<bool>,
{
    type Item = PipelineResult<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return self.iter.next();
        }
        loop {
            let item = match self.iter.next()? {
                Ok(item) => item,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            match (self.predicate)(&item) {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return Some(Ok(item));
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.iter.size_hint();
        if self.done {
            (lower, upper)
        } else {
            (0, upper)
        }
    }
}

/// Yields elements while the predicate holds, then stops for good.
pub struct TakeWhile<I, P> {
    iter: I,
    predicate: P,
    done: bool,
}

impl<I, P> TakeWhile<I, P> {
    /// Wrap `iter`, testing elements with `predicate`.
    #[inline]
    pub fn new<T>(iter: I, predicate: P) -> Self
    where
        I: Iterator<Item = PipelineResult<T>>,
        P: FnMut(&T) -> PipelineResult<bool>,
    {
        TakeWhile {
            iter,
            predicate,
            done: false,
        }
    }
}

impl<I, P, T> Iterator for TakeWhile<I, P>
where
    I: Iterator<Item = PipelineResult<T>>,
    P: FnMut(&T) -> PipelineResult<bool>,
{
    type Item = PipelineResult<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.iter.next()? {
            Ok(item) => item,
            Err(err) => {
                self.done = true;
                return Some(Err(err));
            }
        };
        match (self.predicate)(&item) {
            Ok(true) => Some(Ok(item)),
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}

impl<I, P, T> FusedIterator for TakeWhile<I, P>
where
    I: Iterator<Item = PipelineResult<T>>,
    P: FnMut(&T) -> PipelineResult<bool>,
{
}

/// Emits the running accumulation, one output per input.
///
/// Similar to fold but yields intermediate results. The seed itself is not
/// emitted: the first output is `f(seed, first)`.
pub struct Scan<I, A, F> {
    iter: I,
    state: Option<A>,
    f: F,
}

impl<I, A, F> Scan<I, A, F> {
    /// Accumulate `iter` into `initial` with `f`.
    #[inline]
    pub fn new<T>(iter: I, initial: A, f: F) -> Self
    where
        I: Iterator<Item = PipelineResult<T>>,
        F: FnMut(A, T) -> PipelineResult<A>,
    {
        Scan {
            iter,
            state: Some(initial),
            f,
        }
    }
}

impl<I, A, F, T> Iterator for Scan<I, A, F>
where
    I: Iterator<Item = PipelineResult<T>>,
    A: Clone,
    F: FnMut(A, T) -> PipelineResult<A>,
{
    type Item = PipelineResult<A>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_none() {
            return None;
        }
        let item = self.iter.next()?;
        let acc = self.state.take()?;
        match item.and_then(|item| (self.f)(acc, item)) {
            Ok(next) => {
                self.state = Some(next.clone());
                Some(Ok(next))
            }
            // The accumulator is gone, so the scan ends after reporting.
            Err(err) => Some(Err(err)),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_none() {
            (0, Some(0))
        } else {
            (0, self.iter.size_hint().1)
        }
    }
}
