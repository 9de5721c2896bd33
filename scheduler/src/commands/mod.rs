use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::trace;
use psp_lib_parser::parse_psp_lib;
use rcpsp::ProjectGraph;

mod benchmark;
mod generate;
mod graph;
mod schedule;

pub use benchmark::benchmark;
pub use generate::generate;
pub use graph::graph;
pub use schedule::schedule;

/// Reads and validates a psp lib problem file.
fn load_graph(path: &Path) -> Result<ProjectGraph> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read psp lib problem {path:?}"))?;
    trace!("input file contents: {contents}");

    let psp = parse_psp_lib(contents.as_str())
        .with_context(|| format!("failed to parse psp lib problem {path:?}"))?;
    trace!("parsed psp: {psp:#?}");

    ProjectGraph::try_from(&psp).with_context(|| format!("invalid project in {path:?}"))
}
