use rand::distributions::WeightedError;
use rayon::ThreadPoolBuildError;
use thiserror::Error;

/// Reasons a project topology is rejected when a [`crate::dag::ProjectGraph`] is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("a project needs at least a source and a sink activity, got {0} activities")]
    TooFewActivities(usize),
    #[error("activity {activity} lists unknown successor {successor}")]
    UnknownSuccessor { activity: usize, successor: usize },
    #[error("precedence relations contain a cycle through activity {0}")]
    Cycle(usize),
    #[error("activity ids are not topologically ordered: {activity} precedes {successor}")]
    NotTopologicallyOrdered { activity: usize, successor: usize },
    #[error("source activity must have a duration of 0, got {0}")]
    MalformedSource(usize),
    #[error("sink activity {0} must have a duration of 0 and no successors")]
    MalformedSink(usize),
    #[error("a horizon of 0 cannot hold activities with a total duration of {0}")]
    ZeroHorizon(usize),
    #[error("activity {activity} has {found} resource demands, expected {expected}")]
    DemandLength {
        activity: usize,
        expected: usize,
        found: usize,
    },
    #[error(
        "activity {activity} demands {demand} units of resource {resource} with a capacity of {capacity}"
    )]
    DemandExceedsCapacity {
        activity: usize,
        resource: usize,
        demand: usize,
        capacity: usize,
    },
}

/// Invalid parameters passed to the genetic scheduler.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population size must be positive")]
    EmptyPopulation,
    #[error("mutation probability must lie within [0, 1], got {0}")]
    MutationProbability(f64),
    #[error("thread count must be positive")]
    NoThreads,
    #[error("unknown decoder `{0}`, expected `serial` or `parallel`")]
    UnknownDecoder(String),
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build evaluation thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
    #[error("failed to sample an eligible activity: {0}")]
    Sampling(#[from] WeightedError),
}
