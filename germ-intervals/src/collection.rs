use std::fmt::{self, Debug};

use germ_core::IntervalError;
use germ_core::models::Interval;

use crate::{OverlapperType, PerSequenceIndex};

///
/// A validated set of intervals spanning any number of sequences.
///
/// This is the type other code holds on to: gene models keep their exons in one,
/// mutation filters test membership against one, segment lookups resolve positions
/// with one. Every member is checked with [`Interval::validate`] on the way in, so
/// queries never see a malformed interval.
///
/// Queries are dispatched to the structure for the query's sequence. A sequence
/// without members is a normal condition and gives an empty result.
///
/// # Examples
///
/// ```
/// use germ_intervals::IntervalCollection;
/// use germ_core::models::{Interval, Locus};
///
/// let covered = IntervalCollection::new(vec![Locus::new("chr2", 40, 60).unwrap()]).unwrap();
/// let targets = IntervalCollection::new(vec![Locus::new("chr2", 1, 100).unwrap()]).unwrap();
///
/// let uncovered = covered.diff(&targets);
/// assert_eq!(
///     uncovered.iter().map(|l| l.range()).collect::<Vec<_>>(),
///     vec!["2:1-39", "2:61-100"],
/// );
/// ```
pub struct IntervalCollection<T> {
    index: PerSequenceIndex<T>,
}

impl<T> IntervalCollection<T>
where
    T: Interval + Clone + Send + Sync + 'static,
{
    /// Collect `intervals` into a collection backed by augmented trees.
    pub fn new<I>(intervals: I) -> Result<Self, IntervalError>
    where
        I: IntoIterator<Item = T>,
    {
        Self::with_overlapper(intervals, OverlapperType::default())
    }

    /// Collect `intervals` into a collection backed by the given structure type.
    pub fn with_overlapper<I>(
        intervals: I,
        overlapper_type: OverlapperType,
    ) -> Result<Self, IntervalError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut collection = Self::empty(overlapper_type);
        for interval in intervals {
            collection.add(interval)?;
        }
        Ok(collection)
    }

    fn empty(overlapper_type: OverlapperType) -> Self {
        IntervalCollection {
            index: PerSequenceIndex::new(overlapper_type),
        }
    }

    /// Build from intervals derived from already validated ones.
    fn from_valid(intervals: Vec<T>, overlapper_type: OverlapperType) -> Self {
        let mut collection = Self::empty(overlapper_type);
        collection.index.extend(intervals);
        collection
    }

    ///
    /// Add one interval.
    ///
    /// Adding to a sequence that has already been queried inserts into its built
    /// structure without rebalancing. Prefer handing everything to
    /// [`new`](IntervalCollection::new) when the full set is known up front.
    ///
    pub fn add(&mut self, interval: T) -> Result<(), IntervalError> {
        interval.validate()?;
        self.index.add(interval);
        Ok(())
    }

    /// Members sharing at least one position with `query`, in start order.
    pub fn overlap<Q: Interval>(&self, query: &Q) -> Vec<&T> {
        match self.index.structure(query.seqname()) {
            Some(structure) => structure.find(query.start(), query.stop()),
            None => Vec::new(),
        }
    }

    /// `true` if any member overlaps `query`.
    pub fn overlaps_any<Q: Interval>(&self, query: &Q) -> bool {
        self.index
            .structure(query.seqname())
            .is_some_and(|s| s.find_iter(query.start(), query.stop()).next().is_some())
    }

    /// The member closest to `query`: an overlapping one if there is any, otherwise
    /// the one with the nearest center (ties go to the smaller start).
    pub fn nearest<Q: Interval>(&self, query: &Q) -> Option<&T> {
        self.index
            .structure(query.seqname())?
            .nearest(query.start(), query.stop())
    }

    /// Overlapping members narrowed to the part they share with `query`. Each result
    /// is a copy of the member, so any payload is kept.
    pub fn intersect<Q: Interval>(&self, query: &Q) -> Vec<T> {
        self.overlap(query)
            .into_iter()
            .map(|member| {
                member.with_span(
                    member.start().max(query.start()),
                    member.stop().min(query.stop()),
                )
            })
            .collect()
    }

    /// Total number of positions shared between `query` and the members, counting a
    /// position once per member covering it.
    pub fn intersection_size<Q: Interval>(&self, query: &Q) -> u64 {
        self.intersect(query).iter().map(|iv| iv.size()).sum()
    }

    ///
    /// The parts of `other` not covered by any member of `self`.
    ///
    /// Each interval of `other` has every overlapping member of `self` subtracted from
    /// it in turn; whatever remains is collected into a new collection using the
    /// structure type of `other`.
    ///
    pub fn diff<U>(&self, other: &IntervalCollection<U>) -> IntervalCollection<U>
    where
        U: Interval + Clone + Send + Sync + 'static,
    {
        let mut remainders = Vec::new();
        for target in other.iter() {
            let mut pieces = vec![target.clone()];
            for member in self.overlap(target) {
                pieces = pieces.iter().flat_map(|piece| piece.diff(member)).collect();
                if pieces.is_empty() {
                    break;
                }
            }
            remainders.extend(pieces);
        }
        IntervalCollection::from_valid(remainders, other.overlapper_type())
    }

    /// Merge overlapping members into maximal spans, returned as a new collection.
    pub fn collapse(&self) -> IntervalCollection<T> {
        Self::from_valid(self.flatten(), self.overlapper_type())
    }

    ///
    /// Merge overlapping members into the minimal set of maximal, non-overlapping
    /// spans, per sequence in first-seen order and within a sequence in start order.
    ///
    /// Each span is a copy of the first member it absorbed. Intervals that merely
    /// touch (`stop + 1 == start`) share no position and are kept apart.
    ///
    pub fn flatten(&self) -> Vec<T> {
        let mut spans = Vec::new();
        for (_, structure) in self.index.structures() {
            let mut running: Option<T> = None;
            for interval in structure.iter() {
                running = match running {
                    Some(span) if span.overlaps(interval) => {
                        Some(span.with_span(span.start(), span.stop().max(interval.stop())))
                    }
                    Some(span) => {
                        spans.push(span);
                        Some(interval.clone())
                    }
                    None => Some(interval.clone()),
                };
            }
            spans.extend(running);
        }
        spans
    }

    /// Every member, per sequence in first-seen order and within a sequence in start
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.index
            .structures()
            .flat_map(|(_, structure)| structure.iter())
    }

    /// Sequence names in first-seen order.
    pub fn seqnames(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.seqnames()
    }

    /// Build the structure of every sequence now rather than on first query, e.g.
    /// before sharing the collection between threads.
    pub fn build_all(&self) {
        self.index.build_all();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn overlapper_type(&self) -> OverlapperType {
        self.index.overlapper_type()
    }
}

impl<T> Debug for IntervalCollection<T>
where
    T: Interval + Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalCollection")
            .field("overlapper_type", &self.overlapper_type())
            .field("seqnames", &self.seqnames().collect::<Vec<_>>())
            .field("len", &self.len())
            .finish()
    }
}
