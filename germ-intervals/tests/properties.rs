use germ_core::models::{Interval, Locus};
use germ_intervals::{
    AugmentedIntervalTree, IntervalCollection, Overlapper, OverlapperType, SortedIntervalList,
};

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::*;

const SEQNAMES: [&str; 3] = ["chr1", "chr2", "chrX"];

fn random_locus(rng: &mut StdRng, seqname: &str, max_len: u64) -> Locus {
    let start = rng.random_range(1..=10_000);
    let len = rng.random_range(0..max_len);
    Locus::new(seqname, start, start + len).unwrap()
}

fn random_set(seed: u64, n: usize, max_len: u64) -> Vec<Locus> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let seqname = SEQNAMES[rng.random_range(0..SEQNAMES.len())];
            random_locus(&mut rng, seqname, max_len)
        })
        .collect()
}

fn random_queries(seed: u64, n: usize) -> Vec<Locus> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(7919));
    (0..n)
        .map(|_| random_locus(&mut rng, "chr1", 300))
        .collect()
}

fn brute_force<'a>(intervals: &'a [Locus], query: &Locus) -> Vec<&'a Locus> {
    let mut hits: Vec<&Locus> = intervals.iter().filter(|iv| iv.overlaps(query)).collect();
    hits.sort();
    hits
}

fn sorted(mut hits: Vec<&Locus>) -> Vec<&Locus> {
    hits.sort();
    hits
}

#[rstest]
fn overlap_matches_brute_force(
    #[values(0, 1, 1000)] n: usize,
    #[values(1, 50, 2000)] max_len: u64,
    #[values(OverlapperType::AugmentedTree, OverlapperType::SortedList)]
    overlapper_type: OverlapperType,
) {
    let intervals = random_set(n as u64 + max_len, n, max_len);
    let collection =
        IntervalCollection::with_overlapper(intervals.clone(), overlapper_type).unwrap();

    for query in random_queries(n as u64, 200) {
        assert_eq!(
            sorted(collection.overlap(&query)),
            brute_force(&intervals, &query),
            "query {query}"
        );
        assert_eq!(
            collection.overlaps_any(&query),
            intervals.iter().any(|iv| iv.overlaps(&query))
        );
    }
}

#[rstest]
fn tree_and_list_agree_on_nearest(#[values(1, 2, 1000)] n: usize) {
    let on_chr1: Vec<Locus> = random_set(n as u64, n, 500)
        .into_iter()
        .filter(|l| l.seqname() == "chr1")
        .collect();
    let tree = AugmentedIntervalTree::build(on_chr1.clone());
    let list = SortedIntervalList::build(on_chr1.clone());

    for query in random_queries(n as u64, 200) {
        let from_tree = tree.nearest(query.start(), query.stop());
        let from_list = list.nearest(query.start(), query.stop());
        assert_eq!(from_tree, from_list, "query {query}");
        assert_eq!(from_tree.is_some(), !on_chr1.is_empty());
    }
}

#[rstest]
fn nearest_on_empty_and_single(
    #[values(OverlapperType::AugmentedTree, OverlapperType::SortedList)]
    overlapper_type: OverlapperType,
) {
    let empty: IntervalCollection<Locus> =
        IntervalCollection::with_overlapper(vec![], overlapper_type).unwrap();
    let only = Locus::new("chr1", 5_000, 5_100).unwrap();
    let single = IntervalCollection::with_overlapper(vec![only.clone()], overlapper_type).unwrap();

    for query in random_queries(3, 50) {
        assert_eq!(empty.nearest(&query), None);
        assert_eq!(single.nearest(&query), Some(&only));
    }
}

#[rstest]
fn collapse_is_idempotent_and_disjoint(#[values(0, 1, 1000)] n: usize) {
    let collection = IntervalCollection::new(random_set(42 + n as u64, n, 200)).unwrap();

    let once = collection.collapse();
    let twice = once.collapse();
    assert_eq!(once.flatten(), twice.flatten());

    // every original position is still covered, and no two spans overlap
    for member in collection.iter() {
        assert!(once.iter().any(|span| span.contains(member)));
    }
    for seqname in once.seqnames() {
        let spans: Vec<&Locus> = once.iter().filter(|s| s.seqname() == seqname).collect();
        for pair in spans.windows(2) {
            assert!(pair[0].below(pair[1]));
        }
    }
}

#[rstest]
fn diff_leaves_only_uncovered_parts(#[values(1, 1000)] n: usize) {
    let covered = IntervalCollection::new(random_set(n as u64, n, 100)).unwrap();
    let targets = IntervalCollection::new(random_queries(n as u64, 100)).unwrap();

    let uncovered = covered.diff(&targets);
    for piece in uncovered.iter() {
        assert!(!covered.overlaps_any(piece), "{piece} is still covered");
        assert!(targets.iter().any(|t| t.contains(piece)));
    }
}
