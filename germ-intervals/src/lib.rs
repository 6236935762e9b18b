//! Overlap and nearest-neighbour queries over genomic intervals.
//!
//! This crate indexes anything implementing [`Interval`](germ_core::models::Interval)
//! and answers range queries against it. It is part of germ, a small toolkit for
//! annotating genomic positions (mutations, reads, peaks) against reference features
//! such as exons and genes.
//!
//! ## Layout
//!
//! - [`Overlapper`] is the per-sequence query contract. Two structures implement it:
//!   [`AugmentedIntervalTree`] (balanced at build time, prunes by subtree max stop) and
//!   [`SortedIntervalList`] (a start-ordered list searched by bisection).
//! - [`PerSequenceIndex`] keeps one such structure per sequence name and builds each
//!   lazily on first query.
//! - [`IntervalCollection`] is the facade most callers want: validation on the way in,
//!   queries by interval, and set operations (diff, collapse) between collections.
//!
//! ## Quick Start
//!
//! ```rust
//! use germ_intervals::IntervalCollection;
//! use germ_core::models::Locus;
//!
//! let exons = IntervalCollection::new(vec![
//!     Locus::new("chr1", 100, 200).unwrap(),
//!     Locus::new("chr1", 250, 300).unwrap(),
//!     Locus::new("chr1", 180, 260).unwrap(),
//! ])
//! .unwrap();
//!
//! let query = Locus::new("chr1", 210, 240).unwrap();
//! assert_eq!(exons.overlap(&query), vec![&Locus::new("chr1", 180, 260).unwrap()]);
//!
//! // the three exons chain into one span
//! let merged = exons.flatten();
//! assert_eq!(merged, vec![Locus::new("chr1", 100, 300).unwrap()]);
//! ```

/// Balanced binary tree with per-node max stop.
///
/// See [`AugmentedIntervalTree`] for details.
pub mod augmented_tree;

/// Validated, multi-sequence interval sets.
///
/// See [`IntervalCollection`] for details.
pub mod collection;

/// Per-sequence partitioning with lazily built structures.
pub mod per_sequence_index;

/// Start-ordered list searched by bisection.
///
/// See [`SortedIntervalList`] for details.
pub mod sorted_list;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

use std::fmt::{self, Display};
use std::str::FromStr;

use germ_core::models::Interval;

// re-exports
pub use self::augmented_tree::AugmentedIntervalTree;
pub use self::collection::IntervalCollection;
pub use self::per_sequence_index::PerSequenceIndex;
pub use self::sorted_list::SortedIntervalList;
pub use self::traits::Overlapper;

/// The type of per-sequence structure to build.
///
/// # Variants
///
/// * `AugmentedTree` - Balanced tree, O(log n + k) queries regardless of how intervals
///   nest. The default.
/// * `SortedList` - Flat sorted list. Cheaper to build, and a good fit for small sets
///   or sets without long intervals that swallow many short ones.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapperType {
    #[default]
    AugmentedTree,
    SortedList,
}

impl OverlapperType {
    /// Build a structure of this type from `intervals`.
    pub fn build<T>(self, intervals: Vec<T>) -> Box<dyn Overlapper<T>>
    where
        T: Interval + Clone + Send + Sync + 'static,
    {
        match self {
            OverlapperType::AugmentedTree => Box::new(AugmentedIntervalTree::build(intervals)),
            OverlapperType::SortedList => Box::new(SortedIntervalList::build(intervals)),
        }
    }
}

impl Display for OverlapperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapperType::AugmentedTree => write!(f, "tree"),
            OverlapperType::SortedList => write!(f, "list"),
        }
    }
}

impl FromStr for OverlapperType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" | "augmented-tree" => Ok(OverlapperType::AugmentedTree),
            "list" | "sorted-list" => Ok(OverlapperType::SortedList),
            other => Err(format!("unknown backend '{other}', expected 'tree' or 'list'")),
        }
    }
}

/// Constants used throughout the crate.
pub mod consts {
    pub const OVERLAP_CMD: &str = "overlap";
    pub const NEAREST_CMD: &str = "nearest";
    pub const INTERSECT_CMD: &str = "intersect";
    pub const DIFF_CMD: &str = "diff";
    pub const COLLAPSE_CMD: &str = "collapse";
}
