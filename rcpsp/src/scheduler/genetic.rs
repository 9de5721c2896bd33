use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use super::SchedulerOptions;
use crate::dag::critical_path::CriticalPath;
use crate::dag::ProjectGraph;
use crate::error::{ConfigError, SolveError};
use crate::genetic::{crossover, initial_population, mutate, Individual, Population};
use crate::sgs::Decoder;

/// Steppable genetic algorithm over activity lists.
///
/// Every generation crosses over and mutates the population, decodes the
/// offspring and keeps the `population_size` fittest of parents and offspring.
/// Randomness is only drawn on the calling thread, so a fixed seed gives the
/// same run with or without the thread pool.
pub struct GeneticScheduler<'a> {
    graph: &'a ProjectGraph,
    options: SchedulerOptions,
    rng: StdRng,
    pool: Option<ThreadPool>,
    population: Population,
    incumbent: Individual,
    generation: usize,
}

impl<'a> GeneticScheduler<'a> {
    /// Validates the options, then creates and evaluates the initial population.
    pub fn new(graph: &'a ProjectGraph, options: SchedulerOptions) -> Result<Self, SolveError> {
        options.validate()?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let pool = if options.parallel {
            let threads = options.threads.unwrap_or_else(num_cpus::get);
            debug!("evaluating on {threads} threads");
            Some(ThreadPoolBuilder::new().num_threads(threads).build()?)
        } else {
            None
        };

        let critical_path = CriticalPath::compute(graph);
        info!("lower bound: {}", critical_path.lower_bound());

        let mut population =
            initial_population(graph, &critical_path, options.population_size, &mut rng)?;
        evaluate(graph, options.decoder, pool.as_ref(), &mut population);

        let incumbent = population
            .iter()
            .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .cloned()
            .ok_or(ConfigError::EmptyPopulation)?;
        info!("initial best fitness: {}", incumbent.fitness);

        Ok(Self {
            graph,
            options,
            rng,
            pool,
            population,
            incumbent,
            generation: 0,
        })
    }

    /// Runs one generation: crossover, mutation, evaluation and rank and reduce.
    pub fn evolve(&mut self) {
        let mut offspring = crossover(self.graph, &self.population, &mut self.rng);
        mutate(
            self.graph,
            &mut offspring,
            self.options.mutation_probability,
            &mut self.rng,
        );
        evaluate(
            self.graph,
            self.options.decoder,
            self.pool.as_ref(),
            &mut offspring,
        );

        self.population.append(&mut offspring);
        // stable, so equally fit parents stay ahead of their offspring
        self.population
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        self.population.truncate(self.options.population_size);

        if let Some(best) = self.population.first() {
            if best.fitness < self.incumbent.fitness {
                info!(
                    "generation {}: improved best fitness {} -> {}",
                    self.generation + 1,
                    self.incumbent.fitness,
                    best.fitness
                );
                self.incumbent = best.clone();
            }
        }

        self.generation += 1;
        debug!(
            "generation {}: best fitness {}, population best {:?}",
            self.generation,
            self.incumbent.fitness,
            self.population.first().map(|individual| individual.fitness)
        );
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Best individual seen so far, including the initial population
    pub fn incumbent(&self) -> &Individual {
        &self.incumbent
    }

    /// Number of generations evolved so far
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Evolves the remaining generations and returns the incumbent.
    pub fn run(mut self) -> Individual {
        while self.generation < self.options.generations {
            self.evolve();
        }

        info!(
            "finished {} generations with {} decoding, best fitness: {}",
            self.generation, self.options.decoder, self.incumbent.fitness
        );

        self.incumbent
    }
}

fn evaluate(
    graph: &ProjectGraph,
    decoder: Decoder,
    pool: Option<&ThreadPool>,
    individuals: &mut [Individual],
) {
    match pool {
        Some(pool) => pool.install(|| {
            individuals
                .par_iter_mut()
                .for_each(|individual| individual.evaluate(graph, &decoder))
        }),
        None => individuals
            .iter_mut()
            .for_each(|individual| individual.evaluate(graph, &decoder)),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::GeneticScheduler;
    use crate::dag::tests::{j10, serial_pair};
    use crate::psp_gen::{generate_graph, GeneratorOptions};
    use crate::scheduler::{solve, SchedulerOptions};
    use crate::sgs::tests::assert_feasible;
    use crate::sgs::{Decoder, Schedule};

    fn options(decoder: Decoder, seed: u64) -> SchedulerOptions {
        SchedulerOptions {
            population_size: 16,
            generations: 20,
            decoder,
            seed: Some(seed),
            ..SchedulerOptions::default()
        }
    }

    #[test]
    fn serial_pair_is_solved_by_both_decoders() {
        let graph = serial_pair(10);

        for decoder in [Decoder::Serial, Decoder::Parallel] {
            let best = solve(&graph, options(decoder, 1)).unwrap();

            assert_eq!(best.fitness, 5.0);
            assert_eq!(best.finish_times[&3], 5);
        }
    }

    #[test]
    fn incumbent_never_regresses_and_population_keeps_its_size() {
        let mut rng = StdRng::seed_from_u64(41);
        let graph = generate_graph(&GeneratorOptions::default(), &mut rng).unwrap();

        for decoder in [Decoder::Serial, Decoder::Parallel] {
            let mut scheduler = GeneticScheduler::new(&graph, options(decoder, 2)).unwrap();
            let mut best = scheduler.incumbent().fitness;

            for generation in 1..=15 {
                scheduler.evolve();

                assert_eq!(scheduler.generation(), generation);
                assert_eq!(scheduler.population().len(), 16);
                assert!(scheduler.incumbent().fitness <= best);
                assert!(scheduler
                    .population()
                    .windows(2)
                    .all(|pair| pair[0].fitness <= pair[1].fitness));
                best = scheduler.incumbent().fitness;
            }
        }
    }

    #[test]
    fn odd_and_single_populations_are_kept() {
        let graph = j10();

        for population_size in [1, 5] {
            let mut scheduler = GeneticScheduler::new(
                &graph,
                SchedulerOptions {
                    population_size,
                    ..options(Decoder::Serial, 3)
                },
            )
            .unwrap();

            scheduler.evolve();

            assert_eq!(scheduler.population().len(), population_size);
        }
    }

    #[test]
    fn zero_generations_returns_best_initial_individual() {
        let graph = j10();
        let scheduler = GeneticScheduler::new(
            &graph,
            SchedulerOptions {
                generations: 0,
                ..options(Decoder::Serial, 4)
            },
        )
        .unwrap();
        let initial_best = scheduler
            .population()
            .iter()
            .map(|individual| individual.fitness)
            .fold(f64::INFINITY, f64::min);

        let best = scheduler.run();

        assert_eq!(best.fitness, initial_best);
    }

    #[test]
    fn best_schedule_is_feasible() {
        let graph = j10();

        for decoder in [Decoder::Serial, Decoder::Parallel] {
            let best = solve(&graph, options(decoder, 5)).unwrap();
            let schedule = Schedule {
                start_times: best.start_times.clone(),
                finish_times: best.finish_times.clone(),
                fitness: best.fitness,
            };

            assert!(best.is_precedence_feasible(&graph));
            assert_feasible(&graph, &schedule);
            assert!(best.fitness >= 11.0);
        }
    }

    #[test]
    fn thread_pool_does_not_change_the_result() {
        let mut rng = StdRng::seed_from_u64(42);
        let graph = generate_graph(&GeneratorOptions::default(), &mut rng).unwrap();

        let sequential = solve(&graph, options(Decoder::Parallel, 6)).unwrap();
        let pooled = solve(
            &graph,
            SchedulerOptions {
                parallel: true,
                threads: Some(2),
                ..options(Decoder::Parallel, 6)
            },
        )
        .unwrap();

        assert_eq!(sequential.activity_list, pooled.activity_list);
        assert_eq!(sequential.fitness, pooled.fitness);
    }
}
