//! Chromosome representation and the genetic operators working on activity lists.

pub mod crossover;
pub mod individual;
pub mod mutation;
pub mod population;

pub use crossover::{crossover, crossover_pair};
pub use individual::{Individual, Population};
pub use mutation::{mutate, mutate_individual};
pub use population::{initial_population, latest_finish_order, sample_activity_list};
