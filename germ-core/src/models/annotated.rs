use std::fmt::{self, Display};

use crate::errors::IntervalError;
use crate::models::{Interval, Locus};

///
/// A [`Locus`] carrying an arbitrary payload: a parsed GTF feature, a mutation
/// record, the extra columns of a region file.
///
/// Intervals derived from an `Annotated` value (intersections, diff remainders,
/// collapsed spans) keep a copy of its payload.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotated<D> {
    locus: Locus,
    pub data: D,
}

impl<D> Annotated<D> {
    pub fn new(locus: Locus, data: D) -> Self {
        Annotated { locus, data }
    }

    /// Build the locus and attach `data` in one step.
    pub fn from_coords(
        seqname: impl Into<String>,
        start: u64,
        stop: u64,
        data: D,
    ) -> Result<Self, IntervalError> {
        Ok(Annotated {
            locus: Locus::new(seqname, start, stop)?,
            data,
        })
    }

    pub fn locus(&self) -> &Locus {
        &self.locus
    }

    pub fn into_parts(self) -> (Locus, D) {
        (self.locus, self.data)
    }
}

impl<D: Clone> Interval for Annotated<D> {
    #[inline]
    fn seqname(&self) -> &str {
        self.locus.seqname()
    }

    #[inline]
    fn start(&self) -> u64 {
        self.locus.start()
    }

    #[inline]
    fn stop(&self) -> u64 {
        self.locus.stop()
    }

    fn with_span(&self, start: u64, stop: u64) -> Self {
        Annotated {
            locus: self.locus.with_span(start, stop),
            data: self.data.clone(),
        }
    }
}

impl<D> Display for Annotated<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.locus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_payload_survives_derivation() {
        let exon = Annotated::from_coords("chr1", 100, 200, "ENSE0001").unwrap();
        let probe = Locus::new("chr1", 150, 300).unwrap();

        let inter = exon.intersect(&probe).unwrap();
        assert_eq!(inter.data, "ENSE0001");
        assert_eq!((inter.start(), inter.stop()), (150, 200));

        let rest = exon.diff(&probe);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].data, "ENSE0001");
        assert_eq!((rest[0].start(), rest[0].stop()), (100, 149));
    }

    #[rstest]
    fn test_annotated_overlaps_plain_locus() {
        let a = Annotated::from_coords("chr3", 10, 20, 7u8).unwrap();
        let b = Locus::new("chr3", 20, 30).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[rstest]
    fn test_from_coords_validates() {
        let res = Annotated::from_coords("chr3", 30, 20, ());
        assert!(matches!(res, Err(IntervalError::MalformedInterval { .. })));
    }
}
