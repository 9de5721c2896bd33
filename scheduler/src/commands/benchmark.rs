use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use rcpsp::{solve, CriticalPath, SchedulerOptions};

use super::load_graph;
use crate::Benchmark;

pub fn benchmark(benchmark: Benchmark) -> Result<()> {
    if !benchmark.psp_problem_file_folder.is_dir() {
        anyhow::bail!("psp_problem_file_folder is not a directory")
    }

    let mut paths = benchmark
        .psp_problem_file_folder
        .read_dir()?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|path| path.is_file() && path.extension().map_or(false, |ext| ext == "sm"));
    paths.sort();

    let options = SchedulerOptions::from(&benchmark.solver);
    let mut scheduling_results = Vec::with_capacity(paths.len());

    for path in paths {
        let graph = load_graph(&path)?;
        let lower_bound = CriticalPath::compute(&graph).lower_bound();

        let start_time = Instant::now();
        let best = solve(&graph, options.clone())
            .with_context(|| format!("failed to schedule {path:?}"))?;
        let elapsed = start_time.elapsed();

        info!("{path:?}: {} in {elapsed:?}", best.fitness);
        scheduling_results.push(format!(
            "{path:?}: {} (lower bound {lower_bound}, {} ms)",
            best.fitness,
            elapsed.as_millis()
        ));
    }

    fs::write(&benchmark.output, scheduling_results.join("\n"))
        .with_context(|| format!("failed to write {:?}", benchmark.output))?;

    Ok(())
}
