mod config;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use config::AppConfig;
use graph_layout::{GenerationSeed, Relaxation};
use kinfold_families::{default_active_families, detect_in_graph};
use kinfold_graph::{FamilyGraph, GraphData};
use report::{build_report, LayoutReport};
use ron::ser::PrettyConfig;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Lay out a family tree and split it into families
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Family graph in RON format
    data: PathBuf,

    /// RON file with layout settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Relaxation passes per level, overrides the config file
    #[arg(long)]
    passes: Option<usize>,

    /// Person whose families are active, defaults to the start person
    #[arg(long)]
    current: Option<String>,

    /// Keep the positions found in the data instead of seeding new ones
    #[arg(long)]
    no_seed: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(passes) = args.passes {
        config.layout.passes = passes;
    }

    let text = fs::read_to_string(&args.data)
        .with_context(|| format!("Failed to read {}", args.data.display()))?;
    let data: GraphData =
        ron::from_str(&text).with_context(|| format!("Invalid graph {}", args.data.display()))?;

    let report = layout(data, &config, args.current.as_deref(), !args.no_seed)?;
    println!("{}", ron::ser::to_string_pretty(&report, PrettyConfig::default())?);

    Ok(())
}

/// Build the graph, lay it out and detect its families
fn layout(
    data: GraphData,
    config: &AppConfig,
    current: Option<&str>,
    seed: bool,
) -> Result<LayoutReport> {
    let relaxation = Relaxation::from_config(&config.layout).context("Invalid layout settings")?;
    let mut graph = FamilyGraph::from_data(data);

    if seed {
        let seeder = GenerationSeed::from_config(&config.seed);
        if let Err(e) = graph.seed(&seeder, relaxation.min_spacing()) {
            warn!("Keeping input positions: {e}");
        }
    }
    graph.relax(&relaxation);

    let detection = detect_in_graph(&graph);
    let current = current.or(graph.start());
    let active =
        default_active_families(&detection.families, &detection.member_to_families, current);
    info!(
        "Laid out {} nodes in {} families, {} active",
        graph.len(),
        detection.families.len(),
        active.len()
    );

    Ok(build_report(&graph, &detection, &active))
}
