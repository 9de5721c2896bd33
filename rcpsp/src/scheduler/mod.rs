use crate::dag::ProjectGraph;
use crate::error::{ConfigError, SolveError};
use crate::genetic::Individual;
use crate::sgs::Decoder;

pub mod genetic;

pub use genetic::GeneticScheduler;

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerOptions {
    pub population_size: usize,
    pub generations: usize,
    /// Chance of swapping each adjacent pair of an offspring's activity list
    pub mutation_probability: f64,
    pub decoder: Decoder,
    /// Fixed seed for reproducible runs, drawn from the OS otherwise
    pub seed: Option<u64>,
    /// Decode each generation on a rayon thread pool
    pub parallel: bool,
    /// Pool size when `parallel` is set, defaults to the number of logical cores
    pub threads: Option<usize>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_probability: 0.05,
            decoder: Decoder::Serial,
            seed: None,
            parallel: false,
            threads: None,
        }
    }
}

impl SchedulerOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        // also rejects NaN
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(ConfigError::MutationProbability(self.mutation_probability));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::NoThreads);
        }

        Ok(())
    }
}

/// Runs the genetic algorithm for the configured number of generations and
/// returns the best individual found, with its schedule.
pub fn solve(graph: &ProjectGraph, options: SchedulerOptions) -> Result<Individual, SolveError> {
    Ok(GeneticScheduler::new(graph, options)?.run())
}
