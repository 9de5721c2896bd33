use log::trace;

use super::{DecodeState, Schedule, ScheduleGenerationScheme};
use crate::dag::ProjectGraph;
use crate::resource_profile::ResourceProfile;

/// Parallel SGS: walks forward in time and, at every decision point, starts as
/// many eligible activities as the remaining capacity allows, in priority order.
///
/// Activities must finish within the horizon. Running out of horizon with work
/// left yields a partial schedule whose fitness is twice the horizon.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelSgs;

impl ScheduleGenerationScheme for ParallelSgs {
    fn decode(&self, graph: &ProjectGraph, activity_list: &[usize]) -> Schedule {
        let horizon = graph.horizon();
        let mut state = DecodeState::new(graph, activity_list);
        let mut resources = ResourceProfile::new(graph.capacities(), horizon);

        let source = graph.source();
        state.commit(source, 0, 0);

        let mut pending: Vec<usize> = (0..graph.len()).filter(|&id| id != source).collect();
        pending.sort_by_key(|&id| (state.priority[id], id));

        let mut current_time = 0;
        while !pending.is_empty() {
            if current_time > horizon {
                trace!(
                    "parallel sgs: horizon {horizon} exceeded with {} activities left",
                    pending.len()
                );
                return state.into_schedule(2.0 * horizon as f64);
            }

            // zero-duration activities free their successors at the same instant
            loop {
                let eligible: Vec<usize> = pending
                    .iter()
                    .copied()
                    .filter(|&id| {
                        graph.activity(id).predecessors.iter().all(|&predecessor| {
                            state.finish[predecessor].map_or(false, |finish| finish <= current_time)
                        })
                    })
                    .collect();

                let mut committed = false;
                for id in eligible {
                    let activity = graph.activity(id);
                    let finish = current_time + activity.duration;

                    if finish <= horizon
                        && resources.fits(current_time, activity.duration, &activity.demands)
                    {
                        resources.reserve(current_time, finish, &activity.demands);
                        state.commit(id, current_time, activity.duration);
                        committed = true;
                        trace!("parallel sgs: activity {id} scheduled at [{current_time}, {finish})");
                    }
                }

                if !committed {
                    break;
                }
                pending.retain(|&id| !state.is_scheduled(id));
            }

            current_time = state
                .finish
                .iter()
                .flatten()
                .copied()
                .filter(|&finish| finish > current_time)
                .min()
                .unwrap_or(current_time + 1);
        }

        let makespan = state.makespan();
        state.into_schedule(makespan as f64)
    }
}
