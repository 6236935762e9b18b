use germ_core::models::Interval;

use super::Overlapper;
use crate::traits::{closer, overlaps_span, span_key};

/// A balanced binary tree over start-sorted intervals, each node caching the largest
/// stop found in its subtree.
///
/// The tree is built by recursively taking the median of the sorted intervals as the
/// node, the lower half as the left subtree and the upper half as the right one. It
/// is a search tree on `(start, stop)`, not a centered interval tree: overlap queries
/// rely on the cached `max_stop` to skip whole subtrees that end before the query,
/// and on the start order to skip right subtrees once a node begins after it.
///
/// Nodes live in an arena and point at their children by index. Children always sit
/// at higher indices than their parent, which makes the `max_stop` refresh a single
/// reverse pass.
///
/// # Examples
///
/// ```
/// use germ_intervals::{AugmentedIntervalTree, Overlapper};
/// use germ_core::models::{Interval, Locus};
///
/// let tree = AugmentedIntervalTree::build(vec![
///     Locus::new("chr1", 100, 200).unwrap(),
///     Locus::new("chr1", 250, 300).unwrap(),
///     Locus::new("chr1", 180, 260).unwrap(),
/// ]);
///
/// assert_eq!(tree.find(210, 240).len(), 1);
/// assert_eq!(tree.nearest(320, 330).unwrap().start(), 250);
/// ```
#[derive(Debug, Clone)]
pub struct AugmentedIntervalTree<T> {
    nodes: Vec<Node<T>>,
    root: Option<usize>,
}

#[derive(Debug, Clone)]
struct Node<T> {
    interval: T,
    /// Largest stop over this node and both subtrees.
    max_stop: u64,
    left: Option<usize>,
    right: Option<usize>,
}

impl<T> AugmentedIntervalTree<T>
where
    T: Interval + Clone + Send + Sync,
{
    /// Move `sorted[lo..hi]` into the arena, median first, and return the subtree root.
    fn build_subtree(
        nodes: &mut Vec<Node<T>>,
        sorted: &mut [Option<T>],
        lo: usize,
        hi: usize,
    ) -> Option<usize> {
        if lo >= hi {
            return None;
        }
        let mid = lo + (hi - lo - 1) / 2;
        let idx = nodes.len();
        // every slot is taken exactly once, and the median has not been visited yet
        let interval = sorted[mid]
            .take()
            .unwrap_or_else(|| unreachable!("interval {mid} moved twice"));
        nodes.push(Node {
            max_stop: interval.stop(),
            interval,
            left: None,
            right: None,
        });
        let left = Self::build_subtree(nodes, sorted, lo, mid);
        let right = Self::build_subtree(nodes, sorted, mid + 1, hi);
        nodes[idx].left = left;
        nodes[idx].right = right;
        Some(idx)
    }

    /// Recompute every cached `max_stop`, children before parents.
    fn update_max_stops(&mut self) {
        for idx in (0..self.nodes.len()).rev() {
            let node = &self.nodes[idx];
            let mut max_stop = node.interval.stop();
            for child in [node.left, node.right].into_iter().flatten() {
                max_stop = max_stop.max(self.nodes[child].max_stop);
            }
            self.nodes[idx].max_stop = max_stop;
        }
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[idx];
            for child in [node.left, node.right].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }

    /// The last interval, in start order, that starts at or before `pos`.
    fn last_starting_by(&self, pos: u64) -> Option<&T> {
        let mut best = None;
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            if node.interval.start() <= pos {
                best = Some(&node.interval);
                cursor = node.right;
            } else {
                cursor = node.left;
            }
        }
        best
    }

    /// The first interval, in start order, that starts after `pos`.
    fn first_starting_after(&self, pos: u64) -> Option<&T> {
        let mut best = None;
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            if node.interval.start() > pos {
                best = Some(&node.interval);
                cursor = node.left;
            } else {
                cursor = node.right;
            }
        }
        best
    }
}

impl<T> Overlapper<T> for AugmentedIntervalTree<T>
where
    T: Interval + Clone + Send + Sync,
{
    ///
    /// Create a balanced tree from `intervals`, sorting them by start (then stop) first.
    ///
    fn build(mut intervals: Vec<T>) -> Self
    where
        Self: Sized,
    {
        intervals.sort_by_key(span_key);
        let len = intervals.len();
        let mut sorted: Vec<Option<T>> = intervals.into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(len);
        let root = Self::build_subtree(&mut nodes, &mut sorted, 0, len);

        let mut tree = AugmentedIntervalTree { nodes, root };
        tree.update_max_stops();
        tree
    }

    fn find_iter<'a>(&'a self, start: u64, stop: u64) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        Box::new(IterFind::new(self, start, stop))
    }

    fn nearest(&self, start: u64, stop: u64) -> Option<&T> {
        if let Some(hit) = self.find_iter(start, stop).next() {
            return Some(hit);
        }
        // nothing overlaps, so whatever starts by `stop` also ends before `start`
        closer(
            self.last_starting_by(stop),
            self.first_starting_after(stop),
            start,
            stop,
        )
    }

    ///
    /// Insert a new leaf at its search position and raise `max_stop` along the path
    /// from the root. Repeated insertion can unbalance the tree; build in bulk when
    /// the full interval set is known up front.
    ///
    fn insert(&mut self, interval: T) {
        let key = span_key(&interval);
        let stop = interval.stop();
        let idx = self.nodes.len();
        self.nodes.push(Node {
            interval,
            max_stop: stop,
            left: None,
            right: None,
        });

        let Some(mut cursor) = self.root else {
            self.root = Some(idx);
            return;
        };
        loop {
            let node = &mut self.nodes[cursor];
            node.max_stop = node.max_stop.max(stop);
            let slot = match key < span_key(&node.interval) {
                true => &mut node.left,
                false => &mut node.right,
            };
            match *slot {
                Some(next) => cursor = next,
                None => {
                    *slot = Some(idx);
                    return;
                }
            }
        }
    }

    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a T> + 'a> {
        Box::new(IterTree::new(self))
    }

    #[inline]
    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// An iterator over the intervals of an [`AugmentedIntervalTree`] that overlap a
/// query span, in start order.
///
/// This is an in-order walk that never enters a subtree whose `max_stop` falls short
/// of the query start, and never enters the right subtree of a node that already
/// begins past the query stop.
#[derive(Debug)]
pub struct IterFind<'a, T> {
    inner: &'a AugmentedIntervalTree<T>,
    stack: Vec<usize>,
    start: u64,
    stop: u64,
}

impl<'a, T> IterFind<'a, T>
where
    T: Interval + Clone + Send + Sync,
{
    fn new(tree: &'a AugmentedIntervalTree<T>, start: u64, stop: u64) -> Self {
        let mut iter = IterFind {
            inner: tree,
            stack: Vec::new(),
            start,
            stop,
        };
        iter.descend_left(tree.root);
        iter
    }

    fn descend_left(&mut self, mut cursor: Option<usize>) {
        while let Some(idx) = cursor {
            let node = &self.inner.nodes[idx];
            if self.start > node.max_stop {
                // every stop below here ends before the query
                break;
            }
            self.stack.push(idx);
            cursor = node.left;
        }
    }
}

impl<'a, T> Iterator for IterFind<'a, T>
where
    T: Interval + Clone + Send + Sync,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.stack.pop() {
            let node = &self.inner.nodes[idx];
            if node.interval.start() <= self.stop {
                self.descend_left(node.right);
            }
            if overlaps_span(&node.interval, self.start, self.stop) {
                return Some(&node.interval);
            }
        }
        None
    }
}

/// An in-order iterator over every interval of an [`AugmentedIntervalTree`].
#[derive(Debug)]
pub struct IterTree<'a, T> {
    inner: &'a AugmentedIntervalTree<T>,
    stack: Vec<usize>,
}

impl<'a, T> IterTree<'a, T> {
    fn new(tree: &'a AugmentedIntervalTree<T>) -> Self {
        let mut iter = IterTree {
            inner: tree,
            stack: Vec::new(),
        };
        iter.descend_left(tree.root);
        iter
    }

    fn descend_left(&mut self, mut cursor: Option<usize>) {
        while let Some(idx) = cursor {
            self.stack.push(idx);
            cursor = self.inner.nodes[idx].left;
        }
    }
}

impl<'a, T> Iterator for IterTree<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = &self.inner.nodes[idx];
        self.descend_left(node.right);
        Some(&node.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use germ_core::models::{Annotated, Locus};

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    type Feature = Annotated<&'static str>;

    fn feat(start: u64, stop: u64, name: &'static str) -> Feature {
        Annotated::from_coords("chr1", start, stop, name).unwrap()
    }

    fn names<'a>(hits: impl IntoIterator<Item = &'a Feature>) -> Vec<&'static str> {
        hits.into_iter().map(|f| f.data).collect()
    }

    /// Check the cached aggregate against a fresh computation for every node.
    fn assert_max_stops<T: Interval + Clone + Send + Sync>(tree: &AugmentedIntervalTree<T>) {
        fn subtree_max<T: Interval>(nodes: &[Node<T>], idx: usize) -> u64 {
            let node = &nodes[idx];
            [node.left, node.right]
                .into_iter()
                .flatten()
                .map(|c| subtree_max(nodes, c))
                .fold(node.interval.stop(), u64::max)
        }
        for idx in 0..tree.nodes.len() {
            assert_eq!(tree.nodes[idx].max_stop, subtree_max(&tree.nodes, idx));
        }
    }

    #[fixture]
    fn intervals() -> Vec<Feature> {
        vec![
            feat(100, 200, "a"),
            feat(250, 300, "c"),
            feat(180, 260, "b"),
            feat(400, 450, "d"),
            feat(10, 900, "long"),
        ]
    }

    #[rstest]
    fn test_build_and_len(intervals: Vec<Feature>) {
        let tree = AugmentedIntervalTree::build(intervals);
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.is_empty(), false);
        assert_eq!(names(tree.iter()), vec!["long", "a", "b", "c", "d"]);
        assert_max_stops(&tree);
    }

    #[rstest]
    fn test_median_split_is_balanced() {
        let tree = AugmentedIntervalTree::build(
            (1..=1023u64).map(|x| feat(x * 10, x * 10 + 5, "x")).collect(),
        );
        assert_eq!(tree.depth(), 10);
        assert_max_stops(&tree);
    }

    #[rstest]
    #[case(210, 240, vec!["long", "b"])]
    #[case(200, 250, vec!["long", "a", "b", "c"])]
    #[case(901, 1000, vec![])]
    #[case(1, 9, vec![])]
    #[case(1, 10, vec!["long"])]
    #[case(450, 450, vec!["long", "d"])]
    fn test_find(
        intervals: Vec<Feature>,
        #[case] start: u64,
        #[case] stop: u64,
        #[case] expected: Vec<&str>,
    ) {
        let tree = AugmentedIntervalTree::build(intervals);
        assert_eq!(names(tree.find(start, stop)), expected);
    }

    #[rstest]
    fn test_three_exon_scenario() {
        let tree = AugmentedIntervalTree::build(vec![
            feat(100, 200, "a"),
            feat(250, 300, "c"),
            feat(180, 260, "b"),
        ]);
        assert_eq!(names(tree.find(210, 240)), vec!["b"]);
        assert_eq!(tree.nearest(210, 240).map(|f| f.data), Some("b"));
    }

    #[rstest]
    #[case(320, 330, "c")]
    #[case(370, 380, "d")]
    #[case(1, 5, "a")]
    #[case(900, 1000, "d")]
    fn test_nearest(#[case] start: u64, #[case] stop: u64, #[case] expected: &str) {
        let tree = AugmentedIntervalTree::build(vec![
            feat(100, 200, "a"),
            feat(250, 300, "c"),
            feat(180, 260, "b"),
            feat(400, 450, "d"),
        ]);
        assert_eq!(tree.nearest(start, stop).map(|f| f.data), Some(expected));
    }

    #[rstest]
    fn test_nearest_tie_takes_smaller_start() {
        let tree = AugmentedIntervalTree::build(vec![feat(1, 10, "left"), feat(30, 39, "right")]);
        assert_eq!(tree.nearest(20, 20).map(|f| f.data), Some("left"));
    }

    #[rstest]
    fn test_nearest_on_empty_and_single() {
        let empty: AugmentedIntervalTree<Locus> = AugmentedIntervalTree::build(vec![]);
        assert_eq!(empty.nearest(1, 10), None);
        assert_eq!(empty.depth(), 0);

        let single = AugmentedIntervalTree::build(vec![feat(50, 60, "only")]);
        for (start, stop) in [(1, 1), (55, 55), (1000, 2000)] {
            assert_eq!(single.nearest(start, stop).map(|f| f.data), Some("only"));
        }
    }

    #[rstest]
    fn test_insert_updates_max_stop_path(intervals: Vec<Feature>) {
        let mut tree = AugmentedIntervalTree::build(intervals);
        tree.insert(feat(420, 5000, "late"));
        tree.insert(feat(1, 2, "first"));

        assert_max_stops(&tree);
        assert_eq!(tree.len(), 7);
        assert_eq!(
            names(tree.iter()),
            vec!["first", "long", "a", "b", "c", "d", "late"]
        );
        assert_eq!(names(tree.find(1000, 1100)), vec!["late"]);
        assert_eq!(names(tree.find(2, 2)), vec!["first"]);
    }

    #[rstest]
    fn test_insert_into_empty() {
        let mut tree: AugmentedIntervalTree<Feature> = AugmentedIntervalTree::build(vec![]);
        tree.insert(feat(5, 10, "a"));
        tree.insert(feat(1, 3, "b"));
        assert_eq!(names(tree.iter()), vec!["b", "a"]);
        assert_eq!(names(tree.find(2, 6)), vec!["b", "a"]);
        assert_max_stops(&tree);
    }
}
