//! `sarsgraph` command-line tool

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::ArgMatches;
use commands::PathTarget;
use sarsgraph_core::{sample, Domain, NodeId, SarsGraphConfig};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    match run(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SarsGraphConfig> {
    match path {
        Some(path) => SarsGraphConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => Ok(SarsGraphConfig::default()),
    }
}

fn graph_arg(args: &ArgMatches) -> Result<&Path> {
    args.get_one::<PathBuf>("file")
        .map(PathBuf::as_path)
        .context("missing graph file")
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let (name, args) = matches.subcommand().context("no subcommand given")?;

    // Global flags are propagated into every subcommand
    let config = load_config(args.get_one::<PathBuf>("config"))?;
    logging::init(&config.logging)?;
    let json = args.get_flag("json");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match name {
        "demo" => {
            let graph = sample::sample_graph()?;
            let path = args.get_one::<PathBuf>("out").map(PathBuf::as_path);
            commands::export(&graph, path, &mut out)?;
        }
        "stats" => {
            let graph = commands::load_graph(graph_arg(args)?)?;
            commands::stats(&graph, json, &mut out)?;
        }
        "traces" => {
            let graph = commands::load_graph(graph_arg(args)?)?;
            commands::traces(&graph, json, &mut out)?;
        }
        "provenance" => {
            let graph = commands::load_graph(graph_arg(args)?)?;
            commands::provenance(&graph, json, &mut out)?;
        }
        "path" => {
            let graph = commands::load_graph(graph_arg(args)?)?;
            let from = args
                .get_one::<String>("from")
                .map(NodeId::new)
                .context("missing --from")?;
            let target = match (args.get_one::<String>("to"), args.get_one::<Domain>("domain")) {
                (Some(to), _) => PathTarget::Node(NodeId::new(to.as_str())),
                (None, Some(domain)) => PathTarget::Domain(*domain),
                (None, None) => anyhow::bail!("either --to or --domain is required"),
            };
            commands::path(&graph, &from, &target, json, &mut out)?;
        }
        "governance" => {
            let graph = commands::load_graph(graph_arg(args)?)?;
            let rule = config.governance_rule()?;
            let passed = commands::governance(&graph, &rule, json, &mut out)?;
            out.flush()?;
            if !passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        "rd" => {
            let batches: Vec<u32> = match args.get_many::<u32>("batches") {
                Some(values) => values.copied().collect(),
                None => config.rate_distortion.batch_sizes.clone(),
            };
            let distortions: Vec<f64> = args
                .get_many::<f64>("distortions")
                .context("missing --distortions")?
                .copied()
                .collect();
            commands::rd(&batches, &distortions, json, &mut out)?;
        }
        other => anyhow::bail!("unknown subcommand {other}"),
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
