//! src/main.rs
//! Loads configuration and the seed tree, then prints the explorer rows.

use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use explorer_core::{
    config::Config,
    logging::init_logging_with_config,
    model::{ExplorerState, NodeKind, Tree},
};

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        Config::default()
    });

    let _guard: Option<WorkerGuard> = if config.logging.enabled {
        Some(
            init_logging_with_config(config.logging.clone())
                .context("Failed to initialize logging")?,
        )
    } else {
        None
    };

    info!("Starting explorer");

    let tree = match &config.explorer.seed_path {
        Some(path) => Tree::load_seed(path)
            .with_context(|| format!("Failed to load seed tree from {}", path.display()))?,
        None => Tree::seed(),
    };

    let state = ExplorerState::from_config(tree, &config.explorer);
    if state.tree().is_empty() {
        warn!("Seed tree has no roots");
    }

    print_rows(&state).context("Failed to write tree")?;

    info!(nodes = state.tree().len(), "Explorer exited cleanly");
    Ok(())
}

fn print_rows(state: &ExplorerState) -> io::Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());

    for row in state.tree().visible_rows() {
        let indent = "  ".repeat(row.depth);
        let marker = match (row.node.kind(), row.node.is_open()) {
            (NodeKind::Folder, Some(true)) => "v",
            (NodeKind::Folder, _) => ">",
            (NodeKind::File, _) => " ",
        };

        writeln!(out, "{indent}{marker} {}", row.node.name())?;
    }

    out.flush()
}
