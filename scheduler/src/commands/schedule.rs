use anyhow::Result;
use log::{info, warn};
use rcpsp::{solve, CriticalPath, SchedulerOptions};

use super::load_graph;
use crate::Schedule;

pub fn schedule(schedule: Schedule) -> Result<()> {
    let graph = load_graph(&schedule.path)?;
    let options = SchedulerOptions::from(&schedule.solver);

    info!(
        "{} jobs ({} real), horizon {}, resource availabilities {:?}",
        graph.len(),
        graph.real_activity_count(),
        graph.horizon(),
        graph.capacities()
    );
    let lower_bound = CriticalPath::compute(&graph).lower_bound();

    let best = solve(&graph, options)?;

    if best.start_times.len() < graph.len() {
        warn!(
            "no schedule within the horizon of {} was found, showing the partial schedule",
            graph.horizon()
        );
    }

    let mut activities: Vec<usize> = best.start_times.keys().copied().collect();
    activities.sort_by_key(|&id| (best.start_times[&id], id));

    println!("{:>6} {:>8} {:>6} {:>6}", "job", "duration", "start", "finish");
    for id in activities {
        println!(
            "{:>6} {:>8} {:>6} {:>6}",
            id + 1,
            graph.activity(id).duration,
            best.start_times[&id],
            best.finish_times[&id]
        );
    }
    println!("makespan: {} (lower bound {lower_bound})", best.fitness);

    Ok(())
}
