use hashbrown::HashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use super::individual::{Individual, Population};
use crate::dag::ProjectGraph;

/// One-point order crossover over a shuffled pairing of the population.
///
/// The population is split into mothers and fathers, every pair yields two
/// children and all pairs share a single cut point. With an odd population the
/// last father stays without a partner.
pub fn crossover<R: Rng + ?Sized>(
    graph: &ProjectGraph,
    population: &[Individual],
    rng: &mut R,
) -> Population {
    let mut parents: Vec<&Individual> = population.iter().collect();
    parents.shuffle(rng);
    let (mothers, fathers) = parents.split_at(parents.len() / 2);

    let cut = rng.gen_range(1..=graph.real_activity_count().saturating_sub(1).max(1));

    mothers
        .iter()
        .zip(fathers)
        .flat_map(|(mother, father)| {
            let (daughter, son) = crossover_pair(mother, father, cut);
            [daughter, son]
        })
        .collect()
}

/// Children keep the first `cut` activities of one parent and take the remaining
/// ones in the order of the other parent.
pub fn crossover_pair(mother: &Individual, father: &Individual, cut: usize) -> (Individual, Individual) {
    (
        recombine(&mother.activity_list, &father.activity_list, cut),
        recombine(&father.activity_list, &mother.activity_list, cut),
    )
}

fn recombine(head: &[usize], tail: &[usize], cut: usize) -> Individual {
    let head = &head[..cut.min(head.len())];
    let taken: HashSet<usize> = head.iter().copied().collect();

    let activity_list = head
        .iter()
        .copied()
        .chain(tail.iter().copied().filter(|id| !taken.contains(id)))
        .collect();

    Individual::new(activity_list)
}
