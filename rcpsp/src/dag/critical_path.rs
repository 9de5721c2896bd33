use log::debug;

use super::ProjectGraph;

/// Earliest and latest start/finish times of every activity (CPM).
///
/// Latest times are anchored at the project horizon and may become negative when
/// the horizon is shorter than the critical path, hence the signed representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalPath {
    pub earliest_start: Vec<i64>,
    pub earliest_finish: Vec<i64>,
    pub latest_start: Vec<i64>,
    pub latest_finish: Vec<i64>,
}

impl CriticalPath {
    pub fn compute(graph: &ProjectGraph) -> Self {
        let count = graph.len();
        let horizon = graph.horizon() as i64;

        // Forward pass in id order, which is a topological order
        let mut earliest_start = vec![0; count];
        let mut earliest_finish = vec![0; count];
        for activity in graph.activities() {
            let start = activity
                .predecessors
                .iter()
                .map(|&predecessor| earliest_finish[predecessor])
                .max()
                .unwrap_or(0);

            earliest_start[activity.id] = start;
            earliest_finish[activity.id] = start + activity.duration as i64;
        }

        // Backward pass from the sink, anchored at the horizon
        let mut latest_start = vec![horizon; count];
        let mut latest_finish = vec![horizon; count];
        for activity in graph.activities().iter().rev() {
            let finish = activity
                .successors
                .iter()
                .map(|&successor| latest_start[successor])
                .min()
                .unwrap_or(horizon);

            latest_finish[activity.id] = finish;
            latest_start[activity.id] = finish - activity.duration as i64;
        }

        let critical_path = Self {
            earliest_start,
            earliest_finish,
            latest_start,
            latest_finish,
        };
        debug!(
            "critical path lower bound: {} (horizon {horizon})",
            critical_path.lower_bound()
        );

        critical_path
    }

    /// Find the lower bound of execution time, the earliest finish of the sink
    pub fn lower_bound(&self) -> i64 {
        self.earliest_finish.last().copied().unwrap_or(0)
    }

    pub fn slack(&self, id: usize) -> i64 {
        self.latest_start[id] - self.earliest_start[id]
    }

    /// Activities with minimal slack. With the horizon equal to the lower bound
    /// these form the critical path(s).
    pub fn critical_activities(&self) -> Vec<usize> {
        let minimal_slack = (0..self.latest_start.len())
            .map(|id| self.slack(id))
            .min()
            .unwrap_or(0);

        (0..self.latest_start.len())
            .filter(|&id| self.slack(id) == minimal_slack)
            .collect()
    }
}
