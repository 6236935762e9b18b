use thiserror::Error;

/// Errors raised by the interval contract and by interval-shaped records.
///
/// Every failure is deterministic: constructing the same value, or combining the
/// same pair of values, always fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    /// An interval whose coordinates or sequence name are unusable. Raised when the
    /// value is constructed (or validated on its way into a collection), never later.
    #[error("Malformed interval {seqname}:{start}-{stop}: {reason}")]
    MalformedInterval {
        seqname: String,
        start: u64,
        stop: u64,
        reason: &'static str,
    },

    /// An operation that is only defined for overlapping pairs (`intersect`, `union`)
    /// was handed two disjoint intervals.
    #[error("Intervals do not overlap: {left} and {right}")]
    NoOverlap { left: String, right: String },

    /// A loosely typed record (a region string, a tab-delimited row) that does not
    /// carry the sequence name, start and stop an interval needs.
    #[error("Value does not describe an interval: {0}")]
    NotAnInterval(String),
}
