use log::trace;
use petgraph::algo;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use psp_lib_parser::structs::PspLibProblem;

use crate::error::GraphError;

pub mod critical_path;

type Graph = DiGraph<usize, ()>;

/// Raw description of an activity as handed over by an instance loader.
///
/// The id of an activity is its position in the list passed to [`ProjectGraph::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityData {
    pub duration: usize,
    pub demands: Vec<usize>,
    pub successors: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: usize,
    pub duration: usize,
    /// Units of every renewable resource held for the whole duration
    pub demands: Vec<usize>,
    /// Sorted ascending
    pub predecessors: Vec<usize>,
    /// Sorted ascending
    pub successors: Vec<usize>,
}

/// Immutable project topology together with resource capacities and the planning horizon.
///
/// Activity `0` is the source and activity `len() - 1` the sink. Every precedence
/// relation points from a lower to a higher id, which makes the id order a
/// topological order.
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    activities: Vec<Activity>,
    capacities: Vec<usize>,
    horizon: usize,
    graph: Graph,
}

impl ProjectGraph {
    pub fn new(
        activities: Vec<ActivityData>,
        capacities: Vec<usize>,
        horizon: usize,
    ) -> Result<Self, GraphError> {
        let count = activities.len();
        if count < 2 {
            return Err(GraphError::TooFewActivities(count));
        }

        let mut activities: Vec<Activity> = activities
            .into_iter()
            .enumerate()
            .map(|(id, data)| {
                let mut successors = data.successors;
                successors.sort_unstable();
                successors.dedup();

                Activity {
                    id,
                    duration: data.duration,
                    demands: data.demands,
                    predecessors: vec![],
                    successors,
                }
            })
            .collect();

        let edges: Vec<(usize, usize)> = activities
            .iter()
            .flat_map(|activity| {
                activity
                    .successors
                    .iter()
                    .map(move |&successor| (activity.id, successor))
            })
            .collect();

        let mut graph = Graph::with_capacity(count, edges.len());
        let nodes: Vec<NodeIndex> = (0..count).map(|id| graph.add_node(id)).collect();

        for &(activity, successor) in &edges {
            if successor >= count {
                return Err(GraphError::UnknownSuccessor {
                    activity,
                    successor,
                });
            }
            graph.add_edge(nodes[activity], nodes[successor], ());
        }

        if let Err(cycle) = algo::toposort(&graph, None) {
            return Err(GraphError::Cycle(graph[cycle.node_id()]));
        }

        if let Some(&(activity, successor)) = edges.iter().find(|(from, to)| to <= from) {
            return Err(GraphError::NotTopologicallyOrdered {
                activity,
                successor,
            });
        }

        // edges are in ascending source order, so predecessor lists come out sorted
        for &(activity, successor) in &edges {
            activities[successor].predecessors.push(activity);
        }

        if activities[0].duration != 0 {
            return Err(GraphError::MalformedSource(activities[0].duration));
        }

        let sink = &activities[count - 1];
        if sink.duration != 0 || !sink.successors.is_empty() {
            return Err(GraphError::MalformedSink(sink.id));
        }

        // the parallel decoder's infeasibility penalty of 2 * horizon would be 0
        let total_duration: usize = activities.iter().map(|activity| activity.duration).sum();
        if horizon == 0 && total_duration > 0 {
            return Err(GraphError::ZeroHorizon(total_duration));
        }

        for activity in &activities {
            if activity.demands.len() != capacities.len() {
                return Err(GraphError::DemandLength {
                    activity: activity.id,
                    expected: capacities.len(),
                    found: activity.demands.len(),
                });
            }

            let exceeded = activity
                .demands
                .iter()
                .zip(&capacities)
                .position(|(demand, capacity)| demand > capacity);

            if let Some(resource) = exceeded {
                return Err(GraphError::DemandExceedsCapacity {
                    activity: activity.id,
                    resource,
                    demand: activity.demands[resource],
                    capacity: capacities[resource],
                });
            }
        }

        trace!(
            "built project graph with {count} activities, {} precedence relations and capacities {capacities:?}",
            edges.len()
        );

        Ok(Self {
            activities,
            capacities,
            horizon,
            graph,
        })
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity(&self, id: usize) -> &Activity {
        &self.activities[id]
    }

    /// Number of activities including source and sink
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Always false for a validated graph, which holds at least source and sink
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Number of non-dummy activities
    pub fn real_activity_count(&self) -> usize {
        self.activities.len().saturating_sub(2)
    }

    pub fn source(&self) -> usize {
        0
    }

    pub fn sink(&self) -> usize {
        self.activities.len() - 1
    }

    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }

    pub fn resource_count(&self) -> usize {
        self.capacities.len()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Whether `predecessor` is a direct predecessor of `successor`.
    pub fn is_predecessor(&self, predecessor: usize, successor: usize) -> bool {
        self.activities
            .get(successor)
            .map_or(false, |activity| {
                activity.predecessors.binary_search(&predecessor).is_ok()
            })
    }

    /// Compute the upper bound of execution time by accumulating all durations
    pub fn compute_upper_bound(&self) -> usize {
        self.activities
            .iter()
            .fold(0, |acc, activity| acc + activity.duration)
    }

    /// Graphviz notation of the precedence network, nodes labelled `id (duration)`
    pub fn to_dot(&self) -> String {
        format!(
            "{:?}",
            Dot::with_attr_getters(
                &self.graph,
                &[Config::NodeNoLabel, Config::EdgeNoLabel],
                &|_, _| String::new(),
                &|_, (_, id)| format!(
                    "label = \"{} ({})\"",
                    id, self.activities[*id].duration
                ),
            )
        )
    }
}

impl TryFrom<&PspLibProblem> for ProjectGraph {
    type Error = GraphError;

    fn try_from(psp: &PspLibProblem) -> Result<Self, Self::Error> {
        let mut activities = vec![ActivityData::default(); psp.jobs];

        // PSPLIB job numbers are 1-based; a job number of 0 wraps around and is
        // rejected as an unknown successor
        for request in &psp.request_durations {
            if let Some(activity) = activities.get_mut(request.job_number.wrapping_sub(1)) {
                activity.duration = request.duration;
                activity.demands = request.requests.clone();
            }
        }

        for relation in &psp.precedence_relations {
            if let Some(activity) = activities.get_mut(relation.job_number.wrapping_sub(1)) {
                activity.successors = relation
                    .successors
                    .iter()
                    .map(|successor| successor.wrapping_sub(1))
                    .collect();
            }
        }

        Self::new(
            activities,
            psp.resource_availabilities.clone(),
            psp.horizon,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use psp_lib_parser::parse_psp_lib;

    use super::{ActivityData, ProjectGraph};
    use crate::error::GraphError;

    pub(crate) fn activity(duration: usize, demands: &[usize], successors: &[usize]) -> ActivityData {
        ActivityData {
            duration,
            demands: demands.to_vec(),
            successors: successors.to_vec(),
        }
    }

    /// Two activities competing for a single unit of one resource.
    pub(crate) fn serial_pair(horizon: usize) -> ProjectGraph {
        ProjectGraph::new(
            vec![
                activity(0, &[0], &[1, 2]),
                activity(2, &[1], &[3]),
                activity(3, &[1], &[3]),
                activity(0, &[0], &[]),
            ],
            vec![1],
            horizon,
        )
        .unwrap()
    }

    pub(crate) fn j10() -> ProjectGraph {
        let psp = parse_psp_lib(include_str!("../../../instances/j10_1.sm")).unwrap();
        ProjectGraph::try_from(&psp).unwrap()
    }

    #[test]
    fn predecessors_are_inverse_of_successors() {
        let graph = j10();

        for activity in graph.activities() {
            for &successor in &activity.successors {
                assert!(graph.activity(successor).predecessors.contains(&activity.id));
            }
            for &predecessor in &activity.predecessors {
                assert!(graph.activity(predecessor).successors.contains(&activity.id));
                assert!(predecessor < activity.id);
            }
        }

        assert_eq!(graph.activity(8).predecessors, vec![4, 5]);
        assert!(graph.is_predecessor(4, 8));
        assert!(!graph.is_predecessor(8, 4));
    }

    #[test]
    fn psp_conversion_shifts_job_numbers() {
        let graph = j10();

        assert_eq!(graph.len(), 10);
        assert_eq!(graph.real_activity_count(), 8);
        assert_eq!(graph.sink(), 9);
        assert_eq!(graph.horizon(), 26);
        assert_eq!(graph.capacities(), &[6, 5, 6, 3]);
        assert_eq!(graph.activity(0).successors, vec![1, 2, 3]);
        assert_eq!(graph.activity(5).duration, 6);
        assert_eq!(graph.compute_upper_bound(), 26);
    }

    #[test]
    fn duplicate_successors_are_merged() {
        let graph = ProjectGraph::new(
            vec![
                activity(0, &[], &[1, 1]),
                activity(1, &[], &[2]),
                activity(0, &[], &[]),
            ],
            vec![],
            5,
        )
        .unwrap();

        assert_eq!(graph.activity(0).successors, vec![1]);
        assert_eq!(graph.activity(1).predecessors, vec![0]);
    }

    #[test]
    fn rejects_cycles() {
        let result = ProjectGraph::new(
            vec![
                activity(0, &[], &[1]),
                activity(1, &[], &[2]),
                activity(1, &[], &[1, 3]),
                activity(0, &[], &[]),
            ],
            vec![],
            5,
        );

        assert!(matches!(result, Err(GraphError::Cycle(_))));
    }

    #[test]
    fn rejects_non_topological_ids() {
        let result = ProjectGraph::new(
            vec![
                activity(0, &[], &[2]),
                activity(1, &[], &[3]),
                activity(1, &[], &[1]),
                activity(0, &[], &[]),
            ],
            vec![],
            5,
        );

        assert_eq!(
            result.unwrap_err(),
            GraphError::NotTopologicallyOrdered {
                activity: 2,
                successor: 1
            }
        );
    }

    #[test]
    fn rejects_unknown_successor() {
        let result = ProjectGraph::new(
            vec![activity(0, &[], &[7]), activity(0, &[], &[])],
            vec![],
            5,
        );

        assert_eq!(
            result.unwrap_err(),
            GraphError::UnknownSuccessor {
                activity: 0,
                successor: 7
            }
        );
    }

    #[test]
    fn rejects_malformed_dummies() {
        let source = ProjectGraph::new(
            vec![activity(2, &[], &[1]), activity(0, &[], &[])],
            vec![],
            5,
        );
        assert_eq!(source.unwrap_err(), GraphError::MalformedSource(2));

        let sink = ProjectGraph::new(
            vec![activity(0, &[], &[1]), activity(3, &[], &[])],
            vec![],
            5,
        );
        assert_eq!(sink.unwrap_err(), GraphError::MalformedSink(1));

        let too_small = ProjectGraph::new(vec![activity(0, &[], &[])], vec![], 5);
        assert_eq!(too_small.unwrap_err(), GraphError::TooFewActivities(1));
    }

    #[test]
    fn rejects_zero_horizon_with_work() {
        let result = ProjectGraph::new(
            vec![
                activity(0, &[0], &[1, 2]),
                activity(2, &[1], &[3]),
                activity(3, &[1], &[3]),
                activity(0, &[0], &[]),
            ],
            vec![1],
            0,
        );
        assert_eq!(result.unwrap_err(), GraphError::ZeroHorizon(5));

        // dummies only fit into an empty horizon
        let empty = ProjectGraph::new(vec![activity(0, &[], &[1]), activity(0, &[], &[])], vec![], 0);
        assert!(empty.is_ok());
    }

    #[test]
    fn rejects_bad_demands() {
        let length = ProjectGraph::new(
            vec![
                activity(0, &[0], &[1]),
                activity(1, &[1, 1], &[2]),
                activity(0, &[0], &[]),
            ],
            vec![2],
            5,
        );
        assert_eq!(
            length.unwrap_err(),
            GraphError::DemandLength {
                activity: 1,
                expected: 1,
                found: 2
            }
        );

        let capacity = ProjectGraph::new(
            vec![
                activity(0, &[0], &[1]),
                activity(1, &[3], &[2]),
                activity(0, &[0], &[]),
            ],
            vec![2],
            5,
        );
        assert_eq!(
            capacity.unwrap_err(),
            GraphError::DemandExceedsCapacity {
                activity: 1,
                resource: 0,
                demand: 3,
                capacity: 2
            }
        );
    }

    #[test]
    fn dot_output_labels_durations() {
        let dot = serial_pair(10).to_dot();

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("label = \"2 (3)\""));
        assert!(dot.contains("0 -> 1"));
    }
}
