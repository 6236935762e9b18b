//! Per-sequence partitioning of a multi-chromosome interval set.
//!
//! [`PerSequenceIndex`] groups intervals by sequence name and keeps one query
//! structure ([`AugmentedIntervalTree`](crate::AugmentedIntervalTree) or
//! [`SortedIntervalList`](crate::SortedIntervalList)) per sequence. Structures are
//! built lazily: the first query touching a sequence builds its structure from every
//! interval recorded for it so far, and the result is cached for later queries.
//!
//! # Examples
//!
//! ```
//! use germ_intervals::{OverlapperType, PerSequenceIndex};
//! use germ_core::models::Locus;
//!
//! let mut index = PerSequenceIndex::new(OverlapperType::AugmentedTree);
//! index.add(Locus::new("chr1", 1000, 2000).unwrap());
//! index.add(Locus::new("chr2", 1000, 3000).unwrap());
//!
//! let chr1 = index.structure("chr1").unwrap();
//! assert_eq!(chr1.find(1500, 2500).len(), 1);
//!
//! // an absent sequence is not an error
//! assert!(index.structure("chrM").is_none());
//! ```

use std::sync::OnceLock;

use fxhash::FxHashMap as HashMap;
use log::{debug, trace};

use germ_core::models::Interval;

use crate::{Overlapper, OverlapperType};

/// One sequence's worth of intervals plus its cached query structure.
struct Partition<T> {
    seqname: String,
    /// Every interval recorded for this sequence, in insertion order.
    members: Vec<T>,
    structure: OnceLock<Box<dyn Overlapper<T>>>,
}

impl<T> Partition<T>
where
    T: Interval + Clone + Send + Sync + 'static,
{
    fn new(seqname: &str) -> Self {
        Partition {
            seqname: seqname.to_string(),
            members: Vec::new(),
            structure: OnceLock::new(),
        }
    }

    fn structure(&self, overlapper_type: OverlapperType) -> &dyn Overlapper<T> {
        self.structure
            .get_or_init(|| {
                debug!(
                    "Building {:?} for {} ({} intervals)",
                    overlapper_type,
                    self.seqname,
                    self.members.len()
                );
                overlapper_type.build(self.members.clone())
            })
            .as_ref()
    }
}

/// A map from sequence name to a lazily built query structure.
///
/// Sequences keep the order in which they were first seen, so iteration (and
/// everything derived from it, such as collapsing) is deterministic.
///
/// Queries take `&self` and may build a structure on the way. Construction is
/// guarded by a [`OnceLock`], so concurrent readers never observe a half-built
/// structure; [`add`](PerSequenceIndex::add) needs `&mut self` and therefore cannot
/// interleave with them.
pub struct PerSequenceIndex<T> {
    lookup: HashMap<String, usize>,
    partitions: Vec<Partition<T>>,
    overlapper_type: OverlapperType,
}

impl<T> PerSequenceIndex<T>
where
    T: Interval + Clone + Send + Sync + 'static,
{
    pub fn new(overlapper_type: OverlapperType) -> Self {
        PerSequenceIndex {
            lookup: HashMap::default(),
            partitions: Vec::new(),
            overlapper_type,
        }
    }

    /// Record `interval` under its sequence.
    ///
    /// If that sequence's structure has already been built, the interval is inserted
    /// into it directly (without rebalancing); otherwise it is picked up when the
    /// structure is first built.
    pub fn add(&mut self, interval: T) {
        let idx = match self.lookup.get(interval.seqname()) {
            Some(idx) => *idx,
            None => {
                let idx = self.partitions.len();
                self.partitions.push(Partition::new(interval.seqname()));
                self.lookup.insert(interval.seqname().to_string(), idx);
                idx
            }
        };

        let partition = &mut self.partitions[idx];
        if let Some(structure) = partition.structure.get_mut() {
            trace!(
                "Inserting {}:{}-{} into built {:?}",
                partition.seqname,
                interval.start(),
                interval.stop(),
                self.overlapper_type
            );
            structure.insert(interval.clone());
        }
        partition.members.push(interval);
    }

    /// The query structure for `seqname`, building it on first use. `None` when no
    /// interval lives on that sequence.
    pub fn structure(&self, seqname: &str) -> Option<&dyn Overlapper<T>> {
        let idx = self.lookup.get(seqname)?;
        Some(self.partitions[*idx].structure(self.overlapper_type))
    }

    /// Every sequence with its query structure, in first-seen order.
    pub fn structures(&self) -> impl Iterator<Item = (&str, &dyn Overlapper<T>)> + '_ {
        self.partitions
            .iter()
            .map(|p| (p.seqname.as_str(), p.structure(self.overlapper_type)))
    }

    /// Build every structure that has not been built yet.
    pub fn build_all(&self) {
        for partition in &self.partitions {
            partition.structure(self.overlapper_type);
        }
    }

    /// Sequence names in first-seen order.
    pub fn seqnames(&self) -> impl Iterator<Item = &str> + '_ {
        self.partitions.iter().map(|p| p.seqname.as_str())
    }

    /// `true` once the structure for `seqname` exists.
    pub fn is_built(&self, seqname: &str) -> bool {
        self.lookup
            .get(seqname)
            .is_some_and(|idx| self.partitions[*idx].structure.get().is_some())
    }

    /// Total number of intervals across all sequences.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(|p| p.members.is_empty())
    }

    pub fn overlapper_type(&self) -> OverlapperType {
        self.overlapper_type
    }
}

impl<T> Extend<T> for PerSequenceIndex<T>
where
    T: Interval + Clone + Send + Sync + 'static,
{
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        for interval in iter {
            self.add(interval);
        }
    }
}
