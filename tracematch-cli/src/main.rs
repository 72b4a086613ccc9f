//! `tracematch` — build road-network graphs and map-match GPS
//! trajectories against them from the command line (SPEC_FULL.md §2).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tracematch_common::{init_tracing, NetworkType, OsmDocument};
use tracematch_graph::{build_graph, interpolate_graph, load, save};
use tracematch_match::{match_trajectory, MatchConfig, MatchOutcome};

#[derive(Parser)]
#[command(name = "tracematch")]
#[command(about = "HMM/Viterbi map-matching for OSM road networks", long_about = None)]
struct Cli {
    /// Log format: "text" (default) or "json".
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an OSM JSON document into a simplified graph and save it to disk.
    Build {
        /// Input OSM JSON file (`{"elements": [...]}`).
        #[arg(long)]
        input: PathBuf,
        /// Output graph file (bincode).
        #[arg(long)]
        output: PathBuf,
        /// Network filter; only "drive" is implemented.
        #[arg(long, default_value = "drive")]
        network_type: String,
        /// Skip junction-chain simplification.
        #[arg(long)]
        no_simplify: bool,
    },
    /// Match a GPS trajectory against a saved graph.
    Match {
        /// Graph file produced by `build`.
        #[arg(long)]
        graph: PathBuf,
        /// Trajectory file: a JSON array of `[lat, lon]` pairs.
        #[arg(long)]
        trajectory: PathBuf,
        /// Output file for the matched JSON result; stdout if omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        config: MatchConfigArgs,
    },
    /// Time the matching pipeline over a synthetic straight-line trajectory.
    Bench {
        /// Number of chained edges in the synthetic graph.
        #[arg(long, default_value = "500")]
        edges: usize,
        /// Number of observations along the chain.
        #[arg(long, default_value = "200")]
        observations: usize,
        #[command(flatten)]
        config: MatchConfigArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct MatchConfigArgs {
    /// Edge interpolation spacing in meters.
    #[arg(long, default_value = "1.0")]
    interp_dist: f64,
    /// Candidate search radius in meters.
    #[arg(long, default_value = "10.0")]
    radius: f64,
    /// Keep all hits per observation instead of closest-per-edge.
    #[arg(long)]
    no_closest: bool,
    /// GPS noise standard deviation, in meters.
    #[arg(long, default_value = "4.07")]
    sigma: f64,
    /// Transition model scale, in meters.
    #[arg(long, default_value = "20.0")]
    beta: f64,
    /// Optional cap on shortest-path search distance, in meters.
    #[arg(long)]
    route_cap: Option<f64>,
}

impl From<MatchConfigArgs> for MatchConfig {
    fn from(a: MatchConfigArgs) -> Self {
        MatchConfig {
            interp_dist: a.interp_dist,
            radius: a.radius,
            closest: !a.no_closest,
            sigma: a.sigma,
            beta: a.beta,
            route_length_cap: a.route_cap,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_format);

    match cli.command {
        Commands::Build { input, output, network_type, no_simplify } => {
            run_build(&input, &output, &network_type, !no_simplify)
        }
        Commands::Match { graph, trajectory, output, config } => {
            run_match(&graph, &trajectory, output.as_deref(), config.into())
        }
        Commands::Bench { edges, observations, config } => {
            run_bench(edges, observations, config.into())
        }
    }
}

fn run_build(input: &PathBuf, output: &PathBuf, network_type: &str, simplify: bool) -> Result<()> {
    let network_type = NetworkType::parse(network_type)
        .with_context(|| format!("unrecognized network type {network_type:?}"))?;

    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading OSM JSON from {}", input.display()))?;
    let doc = OsmDocument::from_json_str(&raw).context("parsing OSM JSON")?;

    let start = Instant::now();
    let graph = build_graph(&doc, network_type, simplify).context("building graph")?;
    eprintln!(
        "built graph: {} nodes, {} edges, {:.2}s",
        graph.node_count(),
        graph.edge_count(),
        start.elapsed().as_secs_f64()
    );

    save(&graph, output).with_context(|| format!("saving graph to {}", output.display()))?;
    eprintln!("saved to {}", output.display());
    Ok(())
}

fn run_match(
    graph_path: &PathBuf,
    trajectory_path: &PathBuf,
    output: Option<&std::path::Path>,
    cfg: MatchConfig,
) -> Result<()> {
    let graph = load(graph_path).with_context(|| format!("loading graph from {}", graph_path.display()))?;

    let raw = std::fs::read_to_string(trajectory_path)
        .with_context(|| format!("reading trajectory from {}", trajectory_path.display()))?;
    let trajectory: Vec<(f64, f64)> = serde_json::from_str(&raw).context("parsing trajectory JSON")?;

    let start = Instant::now();
    let outcome = match_trajectory(&graph, &trajectory, &cfg).context("matching trajectory")?;
    eprintln!(
        "matched {} observations in {:.3}s, joint_log_prob = {:.3}",
        trajectory.len(),
        start.elapsed().as_secs_f64(),
        outcome.joint_log_prob
    );

    let json = serde_json::to_string_pretty(&MatchOutcomeJson::from(outcome))?;
    match output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("writing result to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct MatchOutcomeJson {
    node_ids: Vec<u64>,
    polyline: Vec<(f64, f64)>,
    joint_log_prob: f64,
}

impl From<MatchOutcome> for MatchOutcomeJson {
    fn from(o: MatchOutcome) -> Self {
        MatchOutcomeJson { node_ids: o.node_ids, polyline: o.polyline, joint_log_prob: o.joint_log_prob }
    }
}

/// Build a synthetic straight chain of `edges` ~20m segments and an
/// observation every `edges/observations` segments, offset slightly off
/// the road to exercise candidate search, then time matching it.
fn run_bench(edges: usize, observations: usize, cfg: MatchConfig) -> Result<()> {
    use tracematch_graph::{Edge, Graph, TagBag};

    let segment_deg = 0.0002; // ~20m at the equator
    let mut graph = Graph::new();
    for i in 0..=edges {
        graph.add_node(i as u64, 0.0, i as f64 * segment_deg);
    }
    for i in 0..edges {
        graph.push_edge(Edge {
            u: i as u64,
            v: (i + 1) as u64,
            key: 0,
            osmid: i as i64,
            geometry: vec![(0.0, i as f64 * segment_deg), (0.0, (i + 1) as f64 * segment_deg)],
            length_m: 20.0,
            oneway: true,
            tags: TagBag::default(),
        });
    }
    graph.meta.simplified = true;

    let observations = observations.max(2).min(edges + 1);
    let step = (edges as f64) / (observations as f64 - 1.0);
    let trajectory: Vec<(f64, f64)> = (0..observations)
        .map(|i| (0.00003, (i as f64 * step) * segment_deg))
        .collect();

    let build_start = Instant::now();
    let interpolated = interpolate_graph(&graph, cfg.interp_dist);
    eprintln!(
        "interpolated {} edges -> {} nodes in {:.3}s",
        edges,
        interpolated.node_count(),
        build_start.elapsed().as_secs_f64()
    );

    let match_start = Instant::now();
    let outcome = match_trajectory(&graph, &trajectory, &cfg).context("matching synthetic trajectory")?;
    eprintln!(
        "matched {} observations over {} edges in {:.3}s, joint_log_prob = {:.3}",
        trajectory.len(),
        edges,
        match_start.elapsed().as_secs_f64(),
        outcome.joint_log_prob
    );
    Ok(())
}
