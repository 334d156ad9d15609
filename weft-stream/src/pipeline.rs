//! The lazily evaluated ordered stream pipeline.

use crate::stage::{DropWhile, Scan, Skip, SourceIter, StageKind, TakeWhile};
use std::convert::Infallible;
use std::fmt;
use std::iter::{self, FusedIterator};
use std::sync::{Arc, Mutex, OnceLock};
use weft_core::{checked_count, DeferredValue, PipelineError, PipelineResult};

type BoxIter<T> = Box<dyn Iterator<Item = PipelineResult<T>> + Send>;
type Factory<T> = Arc<dyn Fn() -> BoxIter<T> + Send + Sync>;

/// A lazily evaluated, ordered sequence of elements.
///
/// # Behavior Guarantees
/// - Builders take `&self` and return a new pipeline; the receiver and its
///   source are shared, never mutated
/// - No element flows until a terminal operation is materialized
/// - Each materialization pulls elements one at a time, in source order,
///   through the whole stage chain
/// - A pipeline can be materialized any number of times
///
/// ```rust
/// use weft_stream::StreamPipeline;
///
/// let numbers = StreamPipeline::from_vec(vec![1, 2, 3, 4, 5, 6]);
/// let evens = numbers.filter(|n| n % 2 == 0).map(|n| n * 10);
///
/// assert_eq!(evens.collect_to_list().materialize(), Ok(vec![20, 40, 60]));
/// assert_eq!(numbers.count().materialize(), Ok(6));
/// ```
pub struct StreamPipeline<T> {
    factory: Factory<T>,
    stages: Arc<[StageKind]>,
}

impl<T> Clone for StreamPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            stages: self.stages.clone(),
        }
    }
}

impl<T> fmt::Debug for StreamPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamPipeline")
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

impl<T> StreamPipeline<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A pipeline over an in-memory sequence.
    pub fn from_vec(items: Vec<T>) -> Self {
        let items: Arc<[T]> = items.into();
        Self::from_factory(move || Box::new(SourceIter::new(items.clone())))
    }

    /// A pipeline over the given literal elements.
    pub fn just<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_vec(items.into_iter().collect())
    }

    /// A pipeline with no elements.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Re-stream the list produced by a deferred value.
    ///
    /// The deferred value is evaluated on the first materialization and its
    /// outcome is shared by every later one.
    pub fn from_deferred(value: DeferredValue<Vec<T>>) -> Self {
        let pending = Mutex::new(Some(value));
        let settled: OnceLock<PipelineResult<Arc<[T]>>> = OnceLock::new();
        let shared = Arc::new((pending, settled));
        Self::from_factory(move || {
            let (pending, settled) = &*shared;
            let outcome = settled.get_or_init(|| settle_deferred(pending));
            match outcome {
                Ok(items) => Box::new(SourceIter::new(items.clone())),
                Err(err) => Box::new(iter::once(Err(err.clone()))),
            }
        })
    }
}

impl<T> StreamPipeline<T>
where
    T: Send + 'static,
{
    /// A pipeline whose source is produced afresh by `source` on every
    /// materialization. The source may be unbounded as long as a later stage
    /// such as [`take`](Self::take) bounds it.
    pub fn from_fn<F, I>(source: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::from_factory(move || Box::new(source().into_iter().map(Ok)))
    }

    fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> BoxIter<T> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            stages: Vec::<StageKind>::new().into(),
        }
    }

    fn derive<U, B>(&self, kind: StageKind, build: B) -> StreamPipeline<U>
    where
        B: Fn(BoxIter<T>) -> BoxIter<U> + Send + Sync + 'static,
    {
        let upstream = self.factory.clone();
        let mut stages = self.stages.to_vec();
        stages.push(kind);
        StreamPipeline {
            factory: Arc::new(move || build(upstream())),
            stages: stages.into(),
        }
    }

    fn poisoned(&self, kind: StageKind, error: PipelineError) -> Self {
        self.derive(kind, move |_| Box::new(iter::once(Err(error.clone()))))
    }

    /// Stage tags in the order they were chained.
    #[must_use]
    pub fn stages(&self) -> &[StageKind] {
        &self.stages
    }

    /// Human readable stage chain, e.g. `source -> map -> take`.
    #[must_use]
    pub fn describe(&self) -> String {
        iter::once("source")
            .chain(self.stages.iter().map(|stage| stage.name()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Transform each element.
    pub fn map<U, F>(&self, mapper: F) -> StreamPipeline<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.map_stage(StageKind::Map, move |item| Ok::<_, Infallible>(mapper(item)))
    }

    /// Transform each element with a function that may fail.
    pub fn try_map<U, F, E>(&self, mapper: F) -> StreamPipeline<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
        E: std::error::Error,
    {
        self.map_stage(StageKind::Map, mapper)
    }

    /// Keep elements satisfying `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_stage(StageKind::Filter, move |item| Ok::<_, Infallible>(predicate(item)))
    }

    /// Keep elements satisfying a predicate that may fail.
    pub fn try_filter<P, E>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
        E: std::error::Error,
    {
        self.filter_stage(StageKind::Filter, predicate)
    }

    /// Observe each element without changing it.
    pub fn inspect<F>(&self, observer: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.map_stage(StageKind::Inspect, move |item| {
            observer(&item);
            Ok::<_, Infallible>(item)
        })
    }

    /// Stop after `count` elements. A shorter stream simply ends early.
    pub fn take<N>(&self, count: N) -> Self
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        match checked_count(StageKind::Take.name(), count) {
            Ok(count) => {
                self.derive(StageKind::Take, move |upstream| Box::new(upstream.take(count)))
            }
            Err(err) => self.poisoned(StageKind::Take, err),
        }
    }

    /// Discard the first `count` elements. A shorter stream becomes empty.
    pub fn skip<N>(&self, count: N) -> Self
    where
        N: TryInto<usize> + Copy + fmt::Display,
    {
        match checked_count(StageKind::Skip.name(), count) {
            Ok(count) => {
                self.derive(StageKind::Skip, move |upstream| Box::new(Skip::new(upstream, count)))
            }
            Err(err) => self.poisoned(StageKind::Skip, err),
        }
    }

    /// Discard the longest prefix satisfying `predicate`.
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.derive(StageKind::DropWhile, move |upstream| {
            let predicate = predicate.clone();
            Box::new(DropWhile::new(upstream, move |item: &T| Ok((*predicate)(item))))
        })
    }

    /// Keep the longest prefix satisfying `predicate`.
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.derive(StageKind::TakeWhile, move |upstream| {
            let predicate = predicate.clone();
            Box::new(TakeWhile::new(upstream, move |item: &T| Ok((*predicate)(item))))
        })
    }

    /// Emit all of this pipeline's elements, then all of `other`'s.
    ///
    /// `other` is not touched until this pipeline is exhausted.
    #[must_use]
    pub fn concat(&self, other: &StreamPipeline<T>) -> Self {
        let tail = other.factory.clone();
        self.derive(StageKind::Concat, move |upstream| {
            let tail = tail.clone();
            Box::new(upstream.chain(iter::once_with(move || tail()).flatten()))
        })
    }

    /// Emit the running accumulation of `folder`, starting from `initial`.
    ///
    /// The first element emitted is `folder(initial, first)`; the seed itself
    /// is not emitted.
    pub fn scan<A, F>(&self, initial: A, folder: F) -> StreamPipeline<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, T) -> A + Send + Sync + 'static,
    {
        self.try_scan(initial, move |acc, item| Ok::<_, Infallible>(folder(acc, item)))
    }

    /// [`scan`](Self::scan) with a folder that may fail.
    pub fn try_scan<A, F, E>(&self, initial: A, folder: F) -> StreamPipeline<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, T) -> Result<A, E> + Send + Sync + 'static,
        E: std::error::Error,
    {
        let folder = Arc::new(folder);
        self.derive(StageKind::Scan, move |upstream| {
            let folder = folder.clone();
            Box::new(Scan::new(upstream, initial.clone(), move |acc, item| {
                (*folder)(acc, item)
                    .map_err(|err| PipelineError::from_source(StageKind::Scan.name(), &err))
            }))
        })
    }

    /// Buffer the whole stream and re-emit it in reverse order.
    ///
    /// Requires a finite upstream.
    #[must_use]
    pub fn invert(&self) -> Self {
        self.derive(StageKind::Invert, |upstream| {
            let buffered: PipelineResult<Vec<T>> = upstream.collect();
            match buffered {
                Ok(items) => Box::new(items.into_iter().rev().map(Ok)),
                Err(err) => Box::new(iter::once(Err(err))),
            }
        })
    }

    fn map_stage<U, F, E>(&self, kind: StageKind, mapper: F) -> StreamPipeline<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
        E: std::error::Error,
    {
        let mapper = Arc::new(mapper);
        self.derive(kind, move |upstream| {
            let mapper = mapper.clone();
            Box::new(upstream.map(move |item| {
                item.and_then(|item| {
                    (*mapper)(item).map_err(|err| PipelineError::from_source(kind.name(), &err))
                })
            }))
        })
    }

    fn filter_stage<P, E>(&self, kind: StageKind, predicate: P) -> Self
    where
        P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
        E: std::error::Error,
    {
        let predicate = Arc::new(predicate);
        self.derive(kind, move |upstream| {
            let predicate = predicate.clone();
            Box::new(upstream.filter_map(move |item| match item {
                Ok(item) => match (*predicate)(&item) {
                    Ok(true) => Some(Ok(item)),
                    Ok(false) => None,
                    Err(err) => Some(Err(PipelineError::from_source(kind.name(), &err))),
                },
                Err(err) => Some(Err(err)),
            }))
        })
    }

    /// Pull the elements one at a time.
    ///
    /// The iterator ends right after the first `Err` it yields. Panics raised
    /// by stage functions propagate to the caller; the deferred terminals
    /// ([`collect_to_list`](Self::collect_to_list) and friends) capture them
    /// as failures instead.
    #[must_use]
    pub fn iter(&self) -> Elements<T> {
        tracing::debug!(stages = %self.describe(), "materializing stream pipeline");
        Elements {
            inner: Some((self.factory)()),
        }
    }

    /// Terminal: the remaining elements as an ordered list.
    #[must_use]
    pub fn collect_to_list(&self) -> DeferredValue<Vec<T>> {
        let pipeline = self.clone();
        DeferredValue::try_new(move || pipeline.iter().collect()).named("collect_to_list")
    }

    /// Terminal: the number of elements.
    #[must_use]
    pub fn count(&self) -> DeferredValue<usize> {
        let pipeline = self.clone();
        DeferredValue::try_new(move || {
            pipeline
                .iter()
                .try_fold(0_usize, |count, item| item.map(|_| count + 1))
        })
        .named("count")
    }

    /// Terminal: left fold of every element into one value.
    pub fn reduce<A, F>(&self, initial: A, folder: F) -> DeferredValue<A>
    where
        A: Send + 'static,
        F: FnMut(A, T) -> A + Send + 'static,
    {
        let mut folder = folder;
        self.try_reduce(initial, move |acc, item| Ok::<_, Infallible>(folder(acc, item)))
    }

    /// [`reduce`](Self::reduce) with a folder that may fail.
    pub fn try_reduce<A, F, E>(&self, initial: A, folder: F) -> DeferredValue<A>
    where
        A: Send + 'static,
        F: FnMut(A, T) -> Result<A, E> + Send + 'static,
        E: std::error::Error,
    {
        let pipeline = self.clone();
        let mut folder = folder;
        DeferredValue::try_new(move || {
            pipeline.iter().try_fold(initial, |acc, item| {
                folder(acc, item?).map_err(|err| PipelineError::from_source("reduce", &err))
            })
        })
        .named("reduce")
    }
}

impl<T> StreamPipeline<T>
where
    T: PartialEq + Clone + Send + Sync + 'static,
{
    /// Drop every element equal to `value`.
    #[must_use]
    pub fn remove(&self, value: T) -> Self {
        self.filter_stage(StageKind::Remove, move |item| Ok::<_, Infallible>(*item != value))
    }

    /// Substitute every element equal to `old` with `new`.
    #[must_use]
    pub fn replace(&self, old: T, new: T) -> Self {
        self.map_stage(StageKind::Replace, move |item| {
            Ok::<_, Infallible>(if item == old { new.clone() } else { item })
        })
    }
}

impl<T> FromIterator<T> for StreamPipeline<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::just(iter)
    }
}

impl<T> From<Vec<T>> for StreamPipeline<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

/// Pull-based iterator over one materialization of a [`StreamPipeline`].
pub struct Elements<T> {
    inner: Option<BoxIter<T>>,
}

impl<T> Iterator for Elements<T> {
    type Item = PipelineResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.as_mut()?.next();
        match item {
            Some(Ok(_)) => item,
            Some(Err(ref err)) => {
                tracing::debug!(error = %err, "stream pipeline failed");
                self.inner = None;
                item
            }
            None => {
                self.inner = None;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Any pending element may be a failure that ends the iteration.
        self.inner
            .as_ref()
            .map_or((0, Some(0)), |inner| (0, inner.size_hint().1))
    }
}

impl<T> FusedIterator for Elements<T> {}

impl<T> fmt::Debug for Elements<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Elements")
            .field("finished", &self.inner.is_none())
            .finish()
    }
}

fn settle_deferred<T>(pending: &Mutex<Option<DeferredValue<Vec<T>>>>) -> PipelineResult<Arc<[T]>>
where
    T: Send + 'static,
{
    let value = pending
        .lock()
        .map_err(|_| PipelineError::evaluation_failure("from_deferred", "source lock poisoned"))?
        .take()
        .ok_or(PipelineError::AlreadyMaterialized {
            operation: "from_deferred",
        })?;
    value.materialize().map(Arc::from)
}
