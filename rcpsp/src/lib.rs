pub mod dag;
pub mod error;
pub mod genetic;
pub mod psp_gen;
pub mod resource_profile;
pub mod scheduler;
pub mod sgs;

pub use dag::critical_path::CriticalPath;
pub use dag::{Activity, ActivityData, ProjectGraph};
pub use error::{ConfigError, GraphError, SolveError};
pub use genetic::{Individual, Population};
pub use scheduler::{solve, GeneticScheduler, SchedulerOptions};
pub use sgs::{Decoder, Schedule, ScheduleGenerationScheme};
