use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::IntervalError;
use crate::models::Interval;

///
/// A bare genomic region: a sequence name and a 1-based, closed `start..=stop` range.
///
/// Fields are private so that a `Locus` can only be built through a validating
/// constructor and only changed by deriving a new value.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locus {
    seqname: String,
    start: u64,
    stop: u64,
}

impl Locus {
    /// Create a region, failing with [`IntervalError::MalformedInterval`] when the
    /// sequence name is empty or `start > stop`.
    pub fn new(seqname: impl Into<String>, start: u64, stop: u64) -> Result<Self, IntervalError> {
        let locus = Locus {
            seqname: seqname.into(),
            start,
            stop,
        };
        locus.validate()?;
        Ok(locus)
    }

    /// Create a single-position region, e.g. for a point mutation.
    pub fn point(seqname: impl Into<String>, pos: u64) -> Result<Self, IntervalError> {
        Self::new(seqname, pos, pos)
    }
}

impl Interval for Locus {
    #[inline]
    fn seqname(&self) -> &str {
        &self.seqname
    }

    #[inline]
    fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    fn stop(&self) -> u64 {
        self.stop
    }

    fn with_span(&self, start: u64, stop: u64) -> Self {
        debug_assert!(start <= stop, "with_span called with start > stop");
        Locus {
            seqname: self.seqname.clone(),
            start,
            stop,
        }
    }
}

impl Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.seqname, self.start, self.stop)
    }
}

impl FromStr for Locus {
    type Err = IntervalError;

    ///
    /// Parse `seqname:start-stop` or `seqname:pos`. Thousands separators in the
    /// coordinates are ignored, so `chr1:1,000-2,000` is accepted.
    ///
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_an_interval = || IntervalError::NotAnInterval(s.to_string());

        let (seqname, coords) = s.trim().rsplit_once(':').ok_or_else(not_an_interval)?;
        let parse = |raw: &str| -> Result<u64, IntervalError> {
            raw.trim()
                .replace(',', "")
                .parse::<u64>()
                .map_err(|_| not_an_interval())
        };

        let (start, stop) = match coords.split_once('-') {
            Some((start, stop)) => (parse(start)?, parse(stop)?),
            None => {
                let pos = parse(coords)?;
                (pos, pos)
            }
        };

        Locus::new(seqname, start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("chr1:100-200", "chr1", 100, 200)]
    #[case("chr1:1,000-2,000", "chr1", 1000, 2000)]
    #[case("7:55249071", "7", 55249071, 55249071)]
    #[case("HLA-A*01:01:1-5", "HLA-A*01:01", 1, 5)]
    fn test_parse_locus(
        #[case] input: &str,
        #[case] seqname: &str,
        #[case] start: u64,
        #[case] stop: u64,
    ) {
        let locus: Locus = input.parse().unwrap();
        assert_eq!(locus.seqname(), seqname);
        assert_eq!(locus.start(), start);
        assert_eq!(locus.stop(), stop);
    }

    #[rstest]
    #[case("chr1")]
    #[case("chr1:abc-200")]
    #[case("chr1:100-")]
    fn test_parse_not_an_interval(#[case] input: &str) {
        let res = input.parse::<Locus>();
        assert!(matches!(res, Err(IntervalError::NotAnInterval(_))));
    }

    #[rstest]
    fn test_parse_inverted_is_malformed() {
        let res = "chr1:200-100".parse::<Locus>();
        assert!(matches!(res, Err(IntervalError::MalformedInterval { .. })));
    }

    #[rstest]
    fn test_construction_is_validated() {
        assert!(Locus::new("chr1", 10, 10).is_ok());
        assert!(matches!(
            Locus::new("chr1", 11, 10),
            Err(IntervalError::MalformedInterval { .. })
        ));
        assert!(matches!(
            Locus::new("", 1, 10),
            Err(IntervalError::MalformedInterval { reason: "missing sequence name", .. })
        ));
    }

    #[rstest]
    fn test_display_round_trips() {
        let locus = Locus::new("chrX", 5, 15).unwrap();
        assert_eq!(locus.to_string(), "chrX:5-15");
        assert_eq!(locus.to_string().parse::<Locus>().unwrap(), locus);
    }
}
