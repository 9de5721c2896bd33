use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use log::trace;

use super::{DecodeState, Schedule, ScheduleGenerationScheme};
use crate::dag::{Activity, ProjectGraph};
use crate::resource_profile::ResourceProfile;

/// Serial SGS: schedules one eligible activity at a time, in priority order,
/// at its earliest precedence and resource feasible start.
///
/// The activity list should be precedence feasible; eligibility itself is
/// derived from the project graph, so an infeasible list only changes the
/// order in which eligible activities are picked.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialSgs;

impl ScheduleGenerationScheme for SerialSgs {
    fn decode(&self, graph: &ProjectGraph, activity_list: &[usize]) -> Schedule {
        let mut state = DecodeState::new(graph, activity_list);
        let mut resources = ResourceProfile::new(graph.capacities(), graph.horizon());
        // finish times of scheduled activities, the only points where the profile frees capacity
        let mut change_points = BTreeSet::from([0]);
        let mut unscheduled_predecessors: Vec<usize> = graph
            .activities()
            .iter()
            .map(|activity| activity.predecessors.len())
            .collect();

        let source = graph.source();
        state.commit(source, 0, 0);
        for &successor in &graph.activity(source).successors {
            unscheduled_predecessors[successor] -= 1;
        }

        let mut eligible: BinaryHeap<Reverse<(usize, usize)>> = graph
            .activities()
            .iter()
            .filter(|activity| activity.id != source && unscheduled_predecessors[activity.id] == 0)
            .map(|activity| Reverse((state.priority[activity.id], activity.id)))
            .collect();

        while let Some(Reverse((_, id))) = eligible.pop() {
            let activity = graph.activity(id);

            let precedence_start = activity
                .predecessors
                .iter()
                .filter_map(|&predecessor| state.finish[predecessor])
                .max()
                .unwrap_or(0);
            let start = earliest_resource_start(&resources, &change_points, precedence_start, activity);
            let finish = start + activity.duration;

            resources.reserve(start, finish, &activity.demands);
            state.commit(id, start, activity.duration);
            change_points.insert(finish);
            trace!("serial sgs: activity {id} scheduled at [{start}, {finish})");

            for &successor in &activity.successors {
                unscheduled_predecessors[successor] -= 1;
                if unscheduled_predecessors[successor] == 0 {
                    eligible.push(Reverse((state.priority[successor], successor)));
                }
            }
        }

        let makespan = state.makespan();
        state.into_schedule(makespan as f64)
    }
}

/// Scans forward from `from` over the profile change points until the activity fits.
fn earliest_resource_start(
    resources: &ResourceProfile,
    change_points: &BTreeSet<usize>,
    from: usize,
    activity: &Activity,
) -> usize {
    let mut candidate = from;

    while !resources.fits(candidate, activity.duration, &activity.demands) {
        match change_points.range(candidate + 1..).next() {
            Some(&next) => candidate = next,
            // past the last finish time every resource is idle again
            None => break,
        }
    }

    candidate
}
