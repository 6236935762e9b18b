use germ_core::models::Interval;

use super::Overlapper;
use crate::traits::{closer, overlaps_span, span_key};

/// A flat, start-ordered list of intervals answered with binary search.
///
/// Alongside the intervals the list keeps the running maximum of their stops. The
/// first position whose running maximum reaches the query start bounds the search
/// from the left: everything before it ends before the query begins. The first
/// interval starting after the query stop bounds it from the right. The slice in
/// between is scanned, which only ever drops intervals nested inside a longer
/// earlier one.
///
/// This is the simple structure: cheap to build, good for small or already sorted
/// sets, and for sets without long intervals hiding many short ones.
///
/// # Examples
///
/// ```
/// use germ_intervals::{Overlapper, SortedIntervalList};
/// use germ_core::models::Locus;
///
/// let exons = vec![
///     Locus::new("chr1", 100, 200).unwrap(),
///     Locus::new("chr1", 250, 300).unwrap(),
///     Locus::new("chr1", 180, 260).unwrap(),
/// ];
/// let list = SortedIntervalList::build(exons);
///
/// let hits = list.find(210, 240);
/// assert_eq!(hits, vec![&Locus::new("chr1", 180, 260).unwrap()]);
/// ```
#[derive(Debug, Clone)]
pub struct SortedIntervalList<T> {
    intervals: Vec<T>,
    /// `max_stops[i]` is the largest stop among `intervals[..=i]`
    max_stops: Vec<u64>,
}

impl<T> SortedIntervalList<T>
where
    T: Interval + Clone + Send + Sync,
{
    /// Index of the first interval that may reach `start`.
    #[inline]
    fn lower_bound(&self, start: u64) -> usize {
        self.max_stops.partition_point(|&max_stop| max_stop < start)
    }

    /// Index of the first interval beginning after `stop`.
    #[inline]
    fn upper_bound(&self, stop: u64) -> usize {
        self.intervals.partition_point(|iv| iv.start() <= stop)
    }

    fn refresh_max_stops(&mut self, from: usize) {
        let mut running = match from {
            0 => 0,
            _ => self.max_stops[from - 1],
        };
        for (iv, max_stop) in self.intervals[from..]
            .iter()
            .zip(self.max_stops[from..].iter_mut())
        {
            running = running.max(iv.stop());
            *max_stop = running;
        }
    }

    /// The intervals as a slice, in start order.
    pub fn as_slice(&self) -> &[T] {
        &self.intervals
    }
}

impl<T> Overlapper<T> for SortedIntervalList<T>
where
    T: Interval + Clone + Send + Sync,
{
    ///
    /// Create a new list, sorting `intervals` by start (then stop). Intervals sharing
    /// both keep their input order.
    ///
    fn build(mut intervals: Vec<T>) -> Self
    where
        Self: Sized,
    {
        intervals.sort_by_key(span_key);
        let mut list = SortedIntervalList {
            max_stops: vec![0; intervals.len()],
            intervals,
        };
        list.refresh_max_stops(0);
        list
    }

    fn find_iter<'a>(&'a self, start: u64, stop: u64) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        let lo = self.lower_bound(start);
        let hi = self.upper_bound(stop).max(lo);
        Box::new(
            self.intervals[lo..hi]
                .iter()
                .filter(move |iv| overlaps_span(*iv, start, stop)),
        )
    }

    fn nearest(&self, start: u64, stop: u64) -> Option<&T> {
        if let Some(hit) = self.find_iter(start, stop).next() {
            return Some(hit);
        }
        // nothing overlaps, so everything left of `hi` ends before the query
        let hi = self.upper_bound(stop);
        let before = hi.checked_sub(1).map(|i| &self.intervals[i]);
        let after = self.intervals.get(hi);
        closer(before, after, start, stop)
    }

    ///
    /// Insert a new interval at its sorted position. This shifts the tail of the list
    /// and should be avoided for bulk loading.
    ///
    fn insert(&mut self, interval: T) {
        let key = span_key(&interval);
        let pos = self.intervals.partition_point(|iv| span_key(iv) <= key);
        self.intervals.insert(pos, interval);
        self.max_stops.insert(pos, 0);
        self.refresh_max_stops(pos);
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        Box::new(self.intervals.iter())
    }

    #[inline]
    fn len(&self) -> usize {
        self.intervals.len()
    }
}

impl<T> IntoIterator for SortedIntervalList<T> {
    type Item = T;
    type IntoIter = ::std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}
