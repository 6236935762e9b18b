use germ_core::models::Interval;

/// A query structure over the intervals of a single sequence.
///
/// Implementors never see the sequence name: a [`PerSequenceIndex`](crate::PerSequenceIndex)
/// keeps one structure per sequence and only hands it coordinates. All spans are
/// 1-based and closed, so `find(10, 10)` is a point query.
pub trait Overlapper<T>: Send + Sync
where
    T: Interval + Clone + Send + Sync,
{
    fn build(intervals: Vec<T>) -> Self
    where
        Self: Sized;

    /// Every interval sharing at least one position with `start..=stop`, in start order.
    fn find(&self, start: u64, stop: u64) -> Vec<&T> {
        self.find_iter(start, stop).collect()
    }

    fn find_iter<'a>(&'a self, start: u64, stop: u64) -> Box<dyn Iterator<Item = &'a T> + 'a>;

    /// The interval closest to `start..=stop`.
    ///
    /// Any overlapping interval wins outright (the one with the leftmost start).
    /// Otherwise the last interval starting before the query and the first one
    /// starting after it are compared by center distance, and a tie goes to the one
    /// with the smaller start.
    fn nearest(&self, start: u64, stop: u64) -> Option<&T>;

    /// Add one interval after the structure has been built. No rebalancing happens.
    fn insert(&mut self, interval: T);

    /// All intervals in start order.
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a T> + 'a>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordering used by every structure: by start, then by stop.
#[inline]
pub(crate) fn span_key<T: Interval>(interval: &T) -> (u64, u64) {
    (interval.start(), interval.stop())
}

/// Overlap test for two spans already known to share a sequence.
#[inline]
pub(crate) fn overlaps_span<T: Interval>(interval: &T, start: u64, stop: u64) -> bool {
    interval.stop() >= start && interval.start() <= stop
}

/// Twice the center distance, kept integral so that ties compare exactly.
#[inline]
fn doubled_distance<T: Interval>(interval: &T, start: u64, stop: u64) -> u64 {
    (interval.start() + interval.stop()).abs_diff(start + stop)
}

/// Pick between the closest candidates on either side of a query that overlaps
/// nothing. `before` always starts no later than `after`, so it wins ties.
pub(crate) fn closer<'a, T: Interval>(
    before: Option<&'a T>,
    after: Option<&'a T>,
    start: u64,
    stop: u64,
) -> Option<&'a T> {
    match (before, after) {
        (Some(b), Some(a)) => {
            if doubled_distance(a, start, stop) < doubled_distance(b, start, stop) {
                Some(a)
            } else {
                Some(b)
            }
        }
        (b, a) => b.or(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use germ_core::models::Locus;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn iv(start: u64, stop: u64) -> Locus {
        Locus::new("chr1", start, stop).unwrap()
    }

    #[rstest]
    #[case(iv(1, 10), iv(30, 39), 20, 20, iv(1, 10))] // both 14.5 away, earlier start wins
    #[case(iv(1, 10), iv(30, 40), 21, 21, iv(30, 40))]
    #[case(iv(1, 10), iv(30, 40), 19, 19, iv(1, 10))]
    fn test_closer(
        #[case] before: Locus,
        #[case] after: Locus,
        #[case] start: u64,
        #[case] stop: u64,
        #[case] expected: Locus,
    ) {
        assert_eq!(closer(Some(&before), Some(&after), start, stop), Some(&expected));
    }

    #[rstest]
    fn test_closer_one_sided() {
        let a = iv(5, 6);
        assert_eq!(closer(Some(&a), None, 100, 100), Some(&a));
        assert_eq!(closer(None, Some(&a), 1, 1), Some(&a));
        assert_eq!(closer::<Locus>(None, None, 1, 1), None);
    }

    #[rstest]
    fn test_overlaps_span_is_closed() {
        let a = iv(10, 20);
        assert!(overlaps_span(&a, 20, 30));
        assert!(overlaps_span(&a, 1, 10));
        assert!(!overlaps_span(&a, 21, 30));
        assert!(!overlaps_span(&a, 1, 9));
    }
}
