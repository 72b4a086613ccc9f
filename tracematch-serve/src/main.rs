//! `tracematch-serve` — load a graph once and serve `/match` over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use tracematch_common::init_tracing;
use tracematch_graph::load;
use tracematch_serve::{build_router, ServerState};

#[derive(Parser)]
#[command(name = "tracematch-serve")]
#[command(about = "HTTP surface for the tracematch map-matching engine")]
struct Cli {
    /// Graph file produced by `tracematch build`.
    #[arg(long)]
    graph: PathBuf,
    /// Port to listen on.
    #[arg(short, long, default_value = "8080")]
    port: u16,
    /// Log format: "text" (default) or "json".
    #[arg(long, default_value = "text")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_format);

    let graph = load(&cli.graph).with_context(|| format!("loading graph from {}", cli.graph.display()))?;
    tracing::info!(nodes = graph.node_count(), edges = graph.edge_count(), "graph loaded");

    let state = Arc::new(ServerState::new(graph));
    let router = build_router(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "tracematch-serve listening");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
