use psp_lib_parser::structs::{
    PspLibPrecedenceRelation, PspLibProblem, PspLibProblemResources, PspLibProjectInformation,
    PspLibRequestDuration,
};
use rand::Rng;

use crate::dag::ProjectGraph;
use crate::error::GraphError;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    /// Number of non-dummy activities
    pub activities: usize,
    pub resources: usize,
    pub max_duration: usize,
    pub min_capacity: usize,
    pub max_capacity: usize,
    /// Chance of a precedence relation between any two non-dummy activities
    pub edge_probability: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            activities: 30,
            resources: 4,
            max_duration: 10,
            min_capacity: 6,
            max_capacity: 14,
            edge_probability: 0.15,
        }
    }
}

/// Generates a random single-mode problem in PSPLIB form.
///
/// Precedence relations only point from lower to higher job numbers, every job
/// without a predecessor hangs off the supersource and every job without a
/// successor feeds the supersink. The horizon is the sum of all durations.
pub fn generate_psp<R: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut R) -> PspLibProblem {
    let jobs = options.activities + 2;
    let sink = jobs - 1;
    let min_capacity = options.min_capacity.max(1);
    let max_capacity = options.max_capacity.max(min_capacity);
    let edge_probability = if options.edge_probability.is_nan() {
        0.0
    } else {
        options.edge_probability.clamp(0.0, 1.0)
    };

    let capacities: Vec<usize> = (0..options.resources)
        .map(|_| rng.gen_range(min_capacity..=max_capacity))
        .collect();

    let durations: Vec<usize> = (0..jobs)
        .map(|job| {
            if job == 0 || job == sink {
                0
            } else {
                rng.gen_range(1..=options.max_duration.max(1))
            }
        })
        .collect();

    // upper triangular adjacency keeps the job order topological
    let mut successors: Vec<Vec<usize>> = vec![vec![]; jobs];
    let mut has_predecessor = vec![false; jobs];
    for job in 1..sink {
        for later in (job + 1)..sink {
            if rng.gen_bool(edge_probability) {
                successors[job].push(later);
                has_predecessor[later] = true;
            }
        }
    }
    for job in 1..sink {
        if !has_predecessor[job] {
            successors[0].push(job);
        }
        if successors[job].is_empty() {
            successors[job].push(sink);
        }
    }
    if successors[0].is_empty() {
        successors[0].push(sink);
    }

    let requests: Vec<Vec<usize>> = (0..jobs)
        .map(|job| {
            capacities
                .iter()
                .map(|&capacity| {
                    if job == 0 || job == sink {
                        return 0;
                    }
                    // makes requests well below the capacity more likely
                    let t1 = rng.gen_range(0..=capacity);
                    let t2 = rng.gen_range(0..=capacity);
                    t1 * t2 / capacity
                })
                .collect()
        })
        .collect();

    let mut earliest_finish = vec![0; jobs];
    for job in 0..jobs {
        earliest_finish[job] += durations[job];
        for &successor in &successors[job] {
            earliest_finish[successor] = earliest_finish[successor].max(earliest_finish[job]);
        }
    }
    let mpm_time = earliest_finish[sink];

    PspLibProblem {
        file_with_basedata: "GENERATED.BAS".to_string(),
        initial_rng: 0,
        projects: 1,
        jobs,
        horizon: durations.iter().sum(),
        resources: PspLibProblemResources {
            renewable: options.resources,
            nonrenewable: 0,
            doubly_constrained: 0,
        },
        project_info: vec![PspLibProjectInformation {
            number: 1,
            jobs: options.activities,
            relative_date: 0,
            due_date: mpm_time,
            tard_cost: 0,
            mpm_time,
        }],
        precedence_relations: successors
            .iter()
            .enumerate()
            .map(|(job, successors)| PspLibPrecedenceRelation {
                job_number: job + 1,
                mode_count: 1,
                successor_count: successors.len(),
                successors: successors.iter().map(|successor| successor + 1).collect(),
            })
            .collect(),
        request_durations: requests
            .into_iter()
            .enumerate()
            .map(|(job, requests)| PspLibRequestDuration {
                job_number: job + 1,
                mode: 1,
                duration: durations[job],
                requests,
            })
            .collect(),
        resource_availabilities: capacities,
    }
}

pub fn generate_graph<R: Rng + ?Sized>(
    options: &GeneratorOptions,
    rng: &mut R,
) -> Result<ProjectGraph, GraphError> {
    ProjectGraph::try_from(&generate_psp(options, rng))
}

#[cfg(test)]
mod tests {
    use psp_lib_parser::parse_psp_lib;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{generate_graph, generate_psp, GeneratorOptions};
    use crate::dag::critical_path::CriticalPath;

    #[test]
    fn generated_problems_are_valid_graphs() {
        let mut rng = StdRng::seed_from_u64(1);

        for activities in [0, 1, 8, 40] {
            let options = GeneratorOptions {
                activities,
                ..GeneratorOptions::default()
            };
            let graph = generate_graph(&options, &mut rng).unwrap();

            assert_eq!(graph.real_activity_count(), activities);
            for activity in &graph.activities()[1..graph.sink()] {
                assert!(!activity.predecessors.is_empty());
                assert!(!activity.successors.is_empty());
            }
        }
    }

    #[test]
    fn unusable_edge_probability_does_not_panic() {
        let mut rng = StdRng::seed_from_u64(4);

        for edge_probability in [f64::NAN, -1.0, 2.0] {
            let options = GeneratorOptions {
                activities: 6,
                edge_probability,
                ..GeneratorOptions::default()
            };

            assert!(generate_graph(&options, &mut rng).is_ok());
        }
    }

    #[test]
    fn generated_problem_survives_psp_lib_round_trip() {
        let mut rng = StdRng::seed_from_u64(2);
        let psp = generate_psp(&GeneratorOptions::default(), &mut rng);

        let parsed = parse_psp_lib(&psp.to_string()).unwrap();

        assert_eq!(parsed, psp);
    }

    #[test]
    fn mpm_time_is_the_critical_path_length() {
        let mut rng = StdRng::seed_from_u64(3);
        let psp = generate_psp(&GeneratorOptions::default(), &mut rng);
        let graph = crate::dag::ProjectGraph::try_from(&psp).unwrap();

        assert_eq!(
            CriticalPath::compute(&graph).lower_bound(),
            psp.project_info[0].mpm_time as i64
        );
    }
}
