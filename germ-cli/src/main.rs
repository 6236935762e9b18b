mod intervals;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use log::LevelFilter;

use intervals::{cli, handlers};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "germ";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Overlap, nearest-neighbour and set operations over genomic region files.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log verbosity (-v info, -vv debug)"),
        )
        .subcommand(cli::create_overlap_cli())
        .subcommand(cli::create_nearest_cli())
        .subcommand(cli::create_intersect_cli())
        .subcommand(cli::create_diff_cli())
        .subcommand(cli::create_collapse_cli())
}

fn init_logging(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    let (_, sub_matches) = matches
        .subcommand()
        .context("A subcommand is required")?;
    init_logging(sub_matches.get_count("verbose"));

    match matches.subcommand() {
        Some((cli::OVERLAP_CMD, matches)) => handlers::run_overlap(matches)?,
        Some((cli::NEAREST_CMD, matches)) => handlers::run_nearest(matches)?,
        Some((cli::INTERSECT_CMD, matches)) => handlers::run_intersect(matches)?,
        Some((cli::DIFF_CMD, matches)) => handlers::run_diff(matches)?,
        Some((cli::COLLAPSE_CMD, matches)) => handlers::run_collapse(matches)?,
        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    #[case(vec!["germ", "overlap", "-q", "q.bed", "-u", "u.bed"], 0)]
    #[case(vec!["germ", "-v", "nearest", "-q", "q.bed", "-u", "u.bed"], 1)]
    #[case(vec!["germ", "collapse", "-i", "in.bed", "-vv"], 2)]
    fn test_verbosity_reaches_subcommand(#[case] argv: Vec<&str>, #[case] expected: u8) {
        let matches = build_parser().try_get_matches_from(argv).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_count("verbose"), expected);
    }

    #[rstest]
    fn test_rejects_unknown_backend() {
        let result = build_parser().try_get_matches_from([
            "germ", "overlap", "-q", "q.bed", "-u", "u.bed", "--backend", "ailist",
        ]);
        assert!(result.is_err());
    }
}
