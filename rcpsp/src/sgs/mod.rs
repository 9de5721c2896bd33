//! Schedule generation schemes turning an activity list into a schedule.

use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;

use crate::dag::ProjectGraph;
use crate::error::ConfigError;

pub mod parallel;
pub mod serial;

pub use parallel::ParallelSgs;
pub use serial::SerialSgs;

/// Start and finish times keyed by activity id, plus the fitness they score.
///
/// When the parallel scheme runs out of horizon only the activities scheduled
/// so far are present and the fitness is the infeasibility penalty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub start_times: HashMap<usize, usize>,
    pub finish_times: HashMap<usize, usize>,
    pub fitness: f64,
}

impl Schedule {
    pub fn makespan(&self) -> Option<usize> {
        self.finish_times.values().max().copied()
    }
}

pub trait ScheduleGenerationScheme {
    /// Decodes `activity_list`, where an earlier position means a higher priority.
    fn decode(&self, graph: &ProjectGraph, activity_list: &[usize]) -> Schedule;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Decoder {
    #[default]
    Serial,
    Parallel,
}

impl ScheduleGenerationScheme for Decoder {
    fn decode(&self, graph: &ProjectGraph, activity_list: &[usize]) -> Schedule {
        match self {
            Decoder::Serial => SerialSgs.decode(graph, activity_list),
            Decoder::Parallel => ParallelSgs.decode(graph, activity_list),
        }
    }
}

impl FromStr for Decoder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" | "ssgs" => Ok(Decoder::Serial),
            "parallel" | "psgs" => Ok(Decoder::Parallel),
            _ => Err(ConfigError::UnknownDecoder(s.to_string())),
        }
    }
}

impl fmt::Display for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoder::Serial => write!(f, "serial"),
            Decoder::Parallel => write!(f, "parallel"),
        }
    }
}

/// Scratch state of a single decode call.
struct DecodeState {
    priority: Vec<usize>,
    start: Vec<Option<usize>>,
    finish: Vec<Option<usize>>,
}

impl DecodeState {
    fn new(graph: &ProjectGraph, activity_list: &[usize]) -> Self {
        let count = graph.len();

        // activities missing from the list rank behind every listed one
        let mut priority = vec![count + 1; count];
        for (position, &id) in activity_list.iter().enumerate() {
            if let Some(slot) = priority.get_mut(id) {
                *slot = position;
            }
        }

        Self {
            priority,
            start: vec![None; count],
            finish: vec![None; count],
        }
    }

    fn is_scheduled(&self, id: usize) -> bool {
        self.start[id].is_some()
    }

    fn commit(&mut self, id: usize, start: usize, duration: usize) {
        self.start[id] = Some(start);
        self.finish[id] = Some(start + duration);
    }

    fn makespan(&self) -> usize {
        self.finish.iter().flatten().copied().max().unwrap_or(0)
    }

    fn into_schedule(self, fitness: f64) -> Schedule {
        let collect = |times: Vec<Option<usize>>| -> HashMap<usize, usize> {
            times
                .into_iter()
                .enumerate()
                .filter_map(|(id, time)| time.map(|time| (id, time)))
                .collect()
        };

        Schedule {
            start_times: collect(self.start),
            finish_times: collect(self.finish),
            fitness,
        }
    }
}
