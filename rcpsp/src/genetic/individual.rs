use hashbrown::HashMap;

use crate::dag::ProjectGraph;
use crate::sgs::ScheduleGenerationScheme;

pub type Population = Vec<Individual>;

/// A chromosome: an activity list together with the schedule it decoded to.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub activity_list: Vec<usize>,
    /// Makespan (or penalty) of the decoded schedule, `f64::INFINITY` until evaluated
    pub fitness: f64,
    pub start_times: HashMap<usize, usize>,
    pub finish_times: HashMap<usize, usize>,
}

impl Individual {
    pub fn new(activity_list: Vec<usize>) -> Self {
        Self {
            activity_list,
            fitness: f64::INFINITY,
            start_times: HashMap::new(),
            finish_times: HashMap::new(),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_finite()
    }

    pub fn evaluate<S: ScheduleGenerationScheme + ?Sized>(
        &mut self,
        graph: &ProjectGraph,
        decoder: &S,
    ) {
        let schedule = decoder.decode(graph, &self.activity_list);

        self.fitness = schedule.fitness;
        self.start_times = schedule.start_times;
        self.finish_times = schedule.finish_times;
    }

    /// Drops a stale evaluation after the activity list changed.
    pub fn invalidate(&mut self) {
        self.fitness = f64::INFINITY;
        self.start_times.clear();
        self.finish_times.clear();
    }

    /// Whether the list holds every id in `0..activity_count` exactly once.
    pub fn is_permutation(&self, activity_count: usize) -> bool {
        if self.activity_list.len() != activity_count {
            return false;
        }

        let mut seen = vec![false; activity_count];
        self.activity_list.iter().all(|&id| {
            id < activity_count && !std::mem::replace(&mut seen[id], true)
        })
    }

    /// Full check that no activity is listed before one of its predecessors.
    pub fn is_precedence_feasible(&self, graph: &ProjectGraph) -> bool {
        let mut position = vec![usize::MAX; graph.len()];
        for (index, &id) in self.activity_list.iter().enumerate() {
            if let Some(slot) = position.get_mut(id) {
                *slot = index;
            }
        }

        graph.activities().iter().all(|activity| {
            activity
                .predecessors
                .iter()
                .all(|&predecessor| position[predecessor] < position[activity.id])
        })
    }

    pub fn makespan(&self) -> Option<usize> {
        self.finish_times.values().max().copied()
    }
}
