use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use super::load_graph;

pub fn graph(input_path: PathBuf, output_path: PathBuf) -> Result<()> {
    let graph = load_graph(&input_path)?;

    fs::write(&output_path, graph.to_dot())
        .with_context(|| format!("failed to write {output_path:?}"))?;

    info!("Wrote graphviz dot file to: {:?}", output_path);

    Ok(())
}
