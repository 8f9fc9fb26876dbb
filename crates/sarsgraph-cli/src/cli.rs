//! Command-line definition

use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};
use sarsgraph_core::Domain;
use std::path::PathBuf;

fn graph_file() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Graph exported as JSON")
}

/// Build the `sarsgraph` command tree
pub(crate) fn command() -> Command {
    Command::new("sarsgraph")
        .version(sarsgraph_core::VERSION)
        .about("SARS-CoV-2 multi-intent knowledge graph")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results as JSON"),
        )
        .subcommand(
            Command::new("demo")
                .about("Build the sample SARS-CoV-2 graph and export it")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file (stdout when omitted)"),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Node, edge and evidence statistics")
                .arg(graph_file()),
        )
        .subcommand(
            Command::new("traces")
                .about("Serendipity metrics per trace")
                .arg(graph_file()),
        )
        .subcommand(
            Command::new("provenance")
                .about("Evidence references per edge")
                .arg(graph_file()),
        )
        .subcommand(
            Command::new("path")
                .about("Depth-first path between nodes, ignoring edge direction")
                .arg(graph_file())
                .arg(
                    Arg::new("from")
                        .long("from")
                        .required(true)
                        .help("Start node id"),
                )
                .arg(Arg::new("to").long("to").help("Target node id"))
                .arg(
                    Arg::new("domain")
                        .long("domain")
                        .value_parser(|s: &str| s.parse::<Domain>())
                        .help("Stop at the first node in this domain"),
                )
                .group(
                    ArgGroup::new("target")
                        .args(["to", "domain"])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("governance")
                .about("Check per-domain evidence thresholds; exits 1 when blocked")
                .arg(graph_file()),
        )
        .subcommand(
            Command::new("rd")
                .about("Find the rate-distortion knee of measured batches")
                .arg(
                    Arg::new("batches")
                        .long("batches")
                        .value_delimiter(',')
                        .value_parser(value_parser!(u32))
                        .help("Batch sizes (config sweep when omitted)"),
                )
                .arg(
                    Arg::new("distortions")
                        .long("distortions")
                        .required(true)
                        .value_delimiter(',')
                        .value_parser(value_parser!(f64))
                        .help("Distortion per batch size, same order"),
                ),
        )
}
