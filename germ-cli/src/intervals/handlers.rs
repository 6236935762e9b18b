use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{debug, info};

use germ_core::models::Interval;
use germ_core::utils::{RegionRecord, read_regions};
use germ_intervals::{IntervalCollection, OverlapperType};

type RegionCollection = IntervalCollection<RegionRecord>;

pub fn run_overlap(matches: &ArgMatches) -> Result<()> {
    let (queries, universe) = load_lookup(matches)?;
    let mut out = open_output(matches)?;
    write_overlaps(&queries, &universe, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_nearest(matches: &ArgMatches) -> Result<()> {
    let (queries, universe) = load_lookup(matches)?;
    let mut out = open_output(matches)?;
    write_nearest(&queries, &universe, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_intersect(matches: &ArgMatches) -> Result<()> {
    let (queries, universe) = load_lookup(matches)?;
    let mut out = open_output(matches)?;
    write_intersections(&queries, &universe, &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_diff(matches: &ArgMatches) -> Result<()> {
    let backend = get_backend(matches);
    let covering = load_collection(get_path(matches, "A")?, backend)?;
    let targets = load_collection(get_path(matches, "B")?, backend)?;

    let uncovered = covering.diff(&targets);
    info!(
        "{} of {} regions in B have uncovered parts ({} pieces)",
        targets.iter().filter(|t| uncovered.overlaps_any(*t)).count(),
        targets.len(),
        uncovered.len()
    );

    let mut out = open_output(matches)?;
    write_regions(uncovered.iter(), &mut out)?;
    out.flush()?;
    Ok(())
}

pub fn run_collapse(matches: &ArgMatches) -> Result<()> {
    let input = load_collection(get_path(matches, "input")?, get_backend(matches))?;

    let spans = input.flatten();
    info!("Collapsed {} regions into {} spans", input.len(), spans.len());

    let mut out = open_output(matches)?;
    write_regions(spans.iter(), &mut out)?;
    out.flush()?;
    Ok(())
}

fn get_path<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a Path> {
    matches
        .get_one::<String>(id)
        .map(Path::new)
        .with_context(|| format!("A path for -{} is required", id))
}

fn get_backend(matches: &ArgMatches) -> OverlapperType {
    matches
        .get_one::<OverlapperType>("backend")
        .copied()
        .unwrap_or_default()
}

fn load_collection(path: &Path, backend: OverlapperType) -> Result<RegionCollection> {
    let regions = read_regions(path)?;
    let collection = IntervalCollection::with_overlapper(regions, backend)
        .with_context(|| format!("Failed to index regions from {:?}", path))?;
    info!(
        "Loaded {} regions on {} sequences from {:?}",
        collection.len(),
        collection.seqnames().count(),
        path
    );
    Ok(collection)
}

/// Queries stay a plain list; only the universe gets indexed.
fn load_lookup(matches: &ArgMatches) -> Result<(Vec<RegionRecord>, RegionCollection)> {
    let query_path = get_path(matches, "query")?;
    let queries = read_regions(query_path)?;
    debug!("Read {} query regions from {:?}", queries.len(), query_path);

    let universe = load_collection(get_path(matches, "universe")?, get_backend(matches))?;
    universe.build_all();

    Ok((queries, universe))
}

fn open_output(matches: &ArgMatches) -> Result<BufWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(p) => Box::new(
            File::create(p).with_context(|| format!("Failed to create output file {}", p))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::new(writer))
}

fn write_region<W: Write, T: Interval>(out: &mut W, region: &T) -> io::Result<()> {
    writeln!(out, "{}\t{}\t{}", region.seqname(), region.start(), region.stop())
}

fn write_regions<'a, W, T, I>(regions: I, out: &mut W) -> Result<()>
where
    W: Write,
    T: Interval + 'a,
    I: IntoIterator<Item = &'a T>,
{
    for region in regions {
        write_region(out, region)?;
    }
    Ok(())
}

fn write_overlaps<W: Write>(
    queries: &[RegionRecord],
    universe: &RegionCollection,
    out: &mut W,
) -> Result<()> {
    for query in queries {
        write_regions(universe.overlap(query), out)?;
    }
    Ok(())
}

fn write_nearest<W: Write>(
    queries: &[RegionRecord],
    universe: &RegionCollection,
    out: &mut W,
) -> Result<()> {
    for query in queries {
        if let Some(hit) = universe.nearest(query) {
            write_region(out, hit)?;
        }
    }
    Ok(())
}

fn write_intersections<W: Write>(
    queries: &[RegionRecord],
    universe: &RegionCollection,
    out: &mut W,
) -> Result<()> {
    for query in queries {
        write_regions(universe.intersect(query).iter(), out)?;
    }
    Ok(())
}
