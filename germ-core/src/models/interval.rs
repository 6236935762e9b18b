use crate::errors::IntervalError;

/// The capability set every genomic range has to provide before it can be indexed.
///
/// Implementors supply the sequence name, the 1-based closed coordinates, and
/// [`with_span`](Interval::with_span), the clone-with-overrides hook used to derive new
/// values. Everything else is provided and pure: no method ever mutates `self`, so a
/// value that sits inside an index can never drift away from the aggregates cached
/// about it.
///
/// ```rust
/// use germ_core::models::{Interval, Locus};
///
/// let a = Locus::new("chr2", 1, 100).unwrap();
/// let b = Locus::new("chr2", 40, 60).unwrap();
///
/// let rest = a.diff(&b);
/// assert_eq!(rest, vec![
///     Locus::new("chr2", 1, 39).unwrap(),
///     Locus::new("chr2", 61, 100).unwrap(),
/// ]);
/// ```
pub trait Interval {
    /// Name of the sequence (chromosome, contig) this interval lives on.
    fn seqname(&self) -> &str;

    /// First covered position, 1-based.
    fn start(&self) -> u64;

    /// Last covered position, inclusive.
    fn stop(&self) -> u64;

    /// Return a copy of `self` spanning `start..=stop` on the same sequence, with every
    /// other field carried over.
    ///
    /// Callers guarantee `start <= stop`; use [`clone_with`](Interval::clone_with) for a
    /// checked variant.
    fn with_span(&self, start: u64, stop: u64) -> Self
    where
        Self: Sized;

    /// `true` if `self` ends before `other` begins.
    #[inline]
    fn below<O: Interval>(&self, other: &O) -> bool {
        self.stop() < other.start()
    }

    /// `true` if `self` begins after `other` ends.
    #[inline]
    fn above<O: Interval>(&self, other: &O) -> bool {
        self.start() > other.stop()
    }

    /// `true` if both intervals share at least one position on the same sequence.
    #[inline]
    fn overlaps<O: Interval>(&self, other: &O) -> bool {
        self.seqname() == other.seqname() && !self.below(other) && !self.above(other)
    }

    /// `true` if `other` lies entirely within `self`.
    #[inline]
    fn contains<O: Interval>(&self, other: &O) -> bool {
        self.seqname() == other.seqname()
            && self.start() <= other.start()
            && self.stop() >= other.stop()
    }

    /// `true` if `pos` falls inside `self`.
    #[inline]
    fn contains_point(&self, pos: u64) -> bool {
        self.start() <= pos && pos <= self.stop()
    }

    /// Number of covered positions.
    #[inline]
    fn size(&self) -> u64 {
        self.stop() - self.start() + 1
    }

    /// Midpoint; fractional when the size is even.
    #[inline]
    fn center(&self) -> f64 {
        (self.start() + self.stop()) as f64 / 2.0
    }

    /// Absolute distance between the centers of `self` and `other`.
    #[inline]
    fn distance<O: Interval>(&self, other: &O) -> f64 {
        (self.center() - other.center()).abs()
    }

    /// Check the construction invariants: a sequence name is present and
    /// `start <= stop`.
    fn validate(&self) -> Result<(), IntervalError> {
        let reason = if self.seqname().is_empty() {
            "missing sequence name"
        } else if self.start() > self.stop() {
            "start is greater than stop"
        } else {
            return Ok(());
        };
        Err(IntervalError::MalformedInterval {
            seqname: self.seqname().to_string(),
            start: self.start(),
            stop: self.stop(),
            reason,
        })
    }

    /// The shared part of two overlapping intervals, as a copy of `self`.
    fn intersect<O: Interval>(&self, other: &O) -> Result<Self, IntervalError>
    where
        Self: Sized,
    {
        if !self.overlaps(other) {
            return Err(no_overlap(self, other));
        }
        Ok(self.with_span(
            self.start().max(other.start()),
            self.stop().min(other.stop()),
        ))
    }

    /// The span covering two overlapping intervals, as a copy of `self`.
    ///
    /// Disjoint pairs are an error rather than a two-piece result; merge those with a
    /// collapse instead.
    fn union<O: Interval>(&self, other: &O) -> Result<Self, IntervalError>
    where
        Self: Sized,
    {
        if !self.overlaps(other) {
            return Err(no_overlap(self, other));
        }
        Ok(self.with_span(
            self.start().min(other.start()),
            self.stop().max(other.stop()),
        ))
    }

    /// The zero, one or two pieces of `self` not covered by `other`, left to right.
    fn diff<O: Interval>(&self, other: &O) -> Vec<Self>
    where
        Self: Sized + Clone,
    {
        if !self.overlaps(other) {
            return vec![self.clone()];
        }
        let mut pieces = Vec::with_capacity(2);
        if other.start() > self.start() {
            pieces.push(self.with_span(self.start(), other.start() - 1));
        }
        if other.stop() < self.stop() {
            pieces.push(self.with_span(other.stop() + 1, self.stop()));
        }
        pieces
    }

    /// Copy `self`, overriding either coordinate.
    fn clone_with(&self, start: Option<u64>, stop: Option<u64>) -> Result<Self, IntervalError>
    where
        Self: Sized,
    {
        let start = start.unwrap_or(self.start());
        let stop = stop.unwrap_or(self.stop());
        if start > stop {
            return Err(IntervalError::MalformedInterval {
                seqname: self.seqname().to_string(),
                start,
                stop,
                reason: "start is greater than stop",
            });
        }
        Ok(self.with_span(start, stop))
    }

    /// Copy `self` narrowed to the single position `pos`.
    fn clone_at(&self, pos: u64) -> Self
    where
        Self: Sized,
    {
        self.with_span(pos, pos)
    }

    /// Sequence name without a leading `chr`.
    fn short_seqname(&self) -> &str {
        self.seqname()
            .strip_prefix("chr")
            .unwrap_or(self.seqname())
    }

    /// Sequence name with a leading `chr`.
    fn long_seqname(&self) -> String {
        format!("chr{}", self.short_seqname())
    }

    /// `short_seqname:start`, the usual key for a point mutation.
    fn loc(&self) -> String {
        format!("{}:{}", self.short_seqname(), self.start())
    }

    /// `short_seqname:start-stop`.
    fn range(&self) -> String {
        format!("{}:{}-{}", self.short_seqname(), self.start(), self.stop())
    }
}

fn no_overlap<A: Interval + ?Sized, B: Interval>(left: &A, right: &B) -> IntervalError {
    IntervalError::NoOverlap {
        left: format!("{}:{}-{}", left.seqname(), left.start(), left.stop()),
        right: format!("{}:{}-{}", right.seqname(), right.start(), right.stop()),
    }
}
