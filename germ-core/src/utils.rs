use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

use crate::errors::IntervalError;
use crate::models::Annotated;

/// A region read from a tab-delimited file; the payload holds any columns past
/// the third, tab-joined.
pub type RegionRecord = Annotated<Option<String>>;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Parse one tab-delimited line into a region: `seqname start stop [rest...]`.
///
/// Coordinates are taken as 1-based and closed; normalizing from other conventions
/// is the job of whoever produced the file.
///
pub fn parse_region_line(line: &str) -> Result<RegionRecord, IntervalError> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');

    let seqname = fields
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| IntervalError::NotAnInterval(format!("missing sequence name: {line}")))?;
    let mut coord = |name: &str| -> Result<u64, IntervalError> {
        let raw = fields
            .next()
            .ok_or_else(|| IntervalError::NotAnInterval(format!("missing {name} column: {line}")))?;
        raw.trim().parse::<u64>().map_err(|_| {
            IntervalError::NotAnInterval(format!("{name} is not a position ({raw}): {line}"))
        })
    };
    let start = coord("start")?;
    let stop = coord("stop")?;

    let rest: Vec<&str> = fields.collect();
    let rest = match rest.is_empty() {
        true => None,
        false => Some(rest.join("\t")),
    };

    Annotated::from_coords(seqname, start, stop, rest)
}

/// `true` for lines that carry no region: blanks, comments, and UCSC headers.
pub fn is_header_line(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with('#')
        || line.starts_with("track")
        || line.starts_with("browser")
}

///
/// Read every region from a plain or gzip'd tab-delimited file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn read_regions(path: &Path) -> Result<Vec<RegionRecord>> {
    let reader = get_dynamic_reader(path)?;
    let mut regions = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {} of {:?}", idx + 1, path))?;
        if is_header_line(&line) {
            continue;
        }
        let region = parse_region_line(&line)
            .with_context(|| format!("Bad region on line {} of {:?}", idx + 1, path))?;
        regions.push(region);
    }

    Ok(regions)
}
