use rand::Rng;

use super::individual::Individual;
use crate::dag::ProjectGraph;

pub fn mutate<R: Rng + ?Sized>(
    graph: &ProjectGraph,
    population: &mut [Individual],
    probability: f64,
    rng: &mut R,
) {
    for individual in population {
        mutate_individual(graph, individual, probability, rng);
    }
}

/// Swaps every adjacent pair with the given probability, undoing swaps that
/// would list a successor before its predecessor.
///
/// Returns whether the activity list changed; if so the evaluation is dropped.
pub fn mutate_individual<R: Rng + ?Sized>(
    graph: &ProjectGraph,
    individual: &mut Individual,
    probability: f64,
    rng: &mut R,
) -> bool {
    let list = &mut individual.activity_list;
    let mut changed = false;

    for position in 1..list.len() {
        if rng.gen::<f64>() >= probability {
            continue;
        }

        list.swap(position - 1, position);
        // only the relative order of the swapped pair changed
        if graph.is_predecessor(list[position], list[position - 1]) {
            list.swap(position - 1, position);
        } else {
            changed = true;
        }
    }

    if changed {
        individual.invalidate();
    }

    changed
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{mutate, mutate_individual};
    use crate::dag::critical_path::CriticalPath;
    use crate::dag::tests::{activity, serial_pair};
    use crate::dag::ProjectGraph;
    use crate::genetic::individual::Individual;
    use crate::genetic::population::initial_population;
    use crate::psp_gen::{generate_graph, GeneratorOptions};
    use crate::sgs::Decoder;

    #[test]
    fn zero_probability_is_a_no_op() {
        let graph = serial_pair(10);
        let mut rng = StdRng::seed_from_u64(31);
        let mut individual = Individual::new(vec![0, 1, 2, 3]);
        individual.evaluate(&graph, &Decoder::Serial);
        let before = individual.clone();

        assert!(!mutate_individual(&graph, &mut individual, 0.0, &mut rng));
        assert_eq!(individual, before);
    }

    #[test]
    fn chain_cannot_be_reordered() {
        let graph = ProjectGraph::new(
            vec![
                activity(0, &[], &[1]),
                activity(1, &[], &[2]),
                activity(1, &[], &[3]),
                activity(0, &[], &[]),
            ],
            vec![],
            5,
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(32);
        let mut individual = Individual::new(vec![0, 1, 2, 3]);

        for _ in 0..20 {
            assert!(!mutate_individual(&graph, &mut individual, 1.0, &mut rng));
        }
        assert_eq!(individual.activity_list, vec![0, 1, 2, 3]);
    }

    #[test]
    fn independent_neighbours_are_swapped() {
        let graph = serial_pair(10);
        let mut rng = StdRng::seed_from_u64(33);
        let mut individual = Individual::new(vec![0, 1, 2, 3]);
        individual.evaluate(&graph, &Decoder::Serial);

        // the only admissible swap with probability 1 is the pair (1, 2)
        assert!(mutate_individual(&graph, &mut individual, 1.0, &mut rng));

        assert_eq!(individual.activity_list, vec![0, 2, 1, 3]);
        assert!(!individual.is_evaluated());
    }

    #[test]
    fn random_mutations_stay_feasible() {
        let mut rng = StdRng::seed_from_u64(34);

        for probability in [0.05, 0.5, 1.0] {
            let graph = generate_graph(&GeneratorOptions::default(), &mut rng).unwrap();
            let critical_path = CriticalPath::compute(&graph);
            let mut population = initial_population(&graph, &critical_path, 10, &mut rng).unwrap();

            for _ in 0..10 {
                mutate(&graph, &mut population, probability, &mut rng);

                for individual in &population {
                    assert!(individual.is_permutation(graph.len()));
                    assert!(individual.is_precedence_feasible(&graph));
                }
            }
        }
    }
}
