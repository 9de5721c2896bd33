use log::debug;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use super::individual::{Individual, Population};
use crate::dag::critical_path::CriticalPath;
use crate::dag::ProjectGraph;

/// Builds `size` precedence feasible activity lists.
///
/// The first one orders activities by latest finish time, the others are drawn
/// with [`sample_activity_list`].
pub fn initial_population<R: Rng + ?Sized>(
    graph: &ProjectGraph,
    critical_path: &CriticalPath,
    size: usize,
    rng: &mut R,
) -> Result<Population, WeightedError> {
    let mut population = Population::with_capacity(size);
    if size == 0 {
        return Ok(population);
    }

    population.push(Individual::new(latest_finish_order(graph, critical_path)));
    while population.len() < size {
        population.push(Individual::new(sample_activity_list(graph, critical_path, rng)?));
    }

    debug!("initial population of {size} individuals created");

    Ok(population)
}

/// All activity ids, stably sorted by latest finish time.
pub fn latest_finish_order(graph: &ProjectGraph, critical_path: &CriticalPath) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.len()).collect();
    order.sort_by_key(|&id| critical_path.latest_finish[id]);
    order
}

/// Roulette wheel construction of an activity list.
///
/// Starting after the source, one eligible activity is drawn at a time, with
/// weight `max LF - LF + 1` over the current eligible set so that urgent
/// activities tend to come first. Fails only if the eligible set runs dry
/// before every activity is placed.
pub fn sample_activity_list<R: Rng + ?Sized>(
    graph: &ProjectGraph,
    critical_path: &CriticalPath,
    rng: &mut R,
) -> Result<Vec<usize>, WeightedError> {
    let count = graph.len();
    let source = graph.source();
    let latest_finish = &critical_path.latest_finish;

    let mut unplaced_predecessors: Vec<usize> = graph
        .activities()
        .iter()
        .map(|activity| activity.predecessors.len())
        .collect();

    let mut activity_list = Vec::with_capacity(count);
    activity_list.push(source);
    for &successor in &graph.activity(source).successors {
        unplaced_predecessors[successor] -= 1;
    }

    let mut eligible: Vec<usize> = (0..count)
        .filter(|&id| id != source && unplaced_predecessors[id] == 0)
        .collect();

    while activity_list.len() < count {
        let max_latest_finish = eligible
            .iter()
            .map(|&id| latest_finish[id])
            .max()
            .unwrap_or(0);
        let wheel = WeightedIndex::new(
            eligible
                .iter()
                .map(|&id| max_latest_finish - latest_finish[id] + 1),
        )?;

        let id = eligible.swap_remove(wheel.sample(rng));
        activity_list.push(id);

        for &successor in &graph.activity(id).successors {
            unplaced_predecessors[successor] -= 1;
            if unplaced_predecessors[successor] == 0 {
                eligible.push(successor);
            }
        }
    }

    Ok(activity_list)
}
