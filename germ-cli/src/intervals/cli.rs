use clap::{Arg, Command, arg, value_parser};

use germ_intervals::OverlapperType;

pub use germ_intervals::consts::{
    COLLAPSE_CMD, DIFF_CMD, INTERSECT_CMD, NEAREST_CMD, OVERLAP_CMD,
};

fn backend_arg() -> Arg {
    arg!(-e --backend <backend> "Per-sequence structure to build (tree or list)")
        .required(false)
        .value_parser(value_parser!(OverlapperType))
        .default_value("tree")
}

fn output_arg() -> Arg {
    arg!(-o --output <output> "Output file (default: stdout)").required(false)
}

/// The shared `-q <query> -u <universe>` shape of the lookup commands.
fn query_universe_cli(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg_required_else_help(true)
        .arg(arg!(-q <query> "Region file with the positions to look up"))
        .arg(arg!(-u <universe> "Region file with the features to look them up in"))
        .arg(backend_arg())
        .arg(output_arg())
}

pub fn create_overlap_cli() -> Command {
    query_universe_cli(
        OVERLAP_CMD,
        "Report every universe region overlapping each query region",
    )
}

pub fn create_nearest_cli() -> Command {
    query_universe_cli(
        NEAREST_CMD,
        "Report the universe region nearest to each query region",
    )
}

pub fn create_intersect_cli() -> Command {
    query_universe_cli(
        INTERSECT_CMD,
        "Report the parts of universe regions shared with each query region",
    )
}

pub fn create_diff_cli() -> Command {
    Command::new(DIFF_CMD)
        .about("Report the parts of B not covered by any region of A")
        .arg_required_else_help(true)
        .arg(arg!(-a <A> "Region file with the covering regions"))
        .arg(arg!(-b <B> "Region file with the regions to subtract from"))
        .arg(backend_arg())
        .arg(output_arg())
}

pub fn create_collapse_cli() -> Command {
    Command::new(COLLAPSE_CMD)
        .about("Merge overlapping regions into maximal spans")
        .arg_required_else_help(true)
        .arg(arg!(-i <input> "Region file to collapse"))
        .arg(backend_arg())
        .arg(output_arg())
}
