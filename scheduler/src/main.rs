#![forbid(unsafe_code)]
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use log::{debug, error};
use rcpsp::{Decoder, SchedulerOptions};

mod commands;

#[derive(Debug, Parser)]
#[command(author, version)]
/// RCPSP scheduler based on a genetic algorithm
struct App {
    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a graphviz notation for specific psp lib problem
    Graph {
        #[arg(required = true)]
        psp_problem_file: PathBuf,
        #[arg(required = true)]
        output: PathBuf,
    },
    /// Create a schedule for a given psp lib problem
    Schedule(Schedule),
    /// Schedule every psp lib problem in a folder and write the makespans to a file
    Benchmark(Benchmark),
    /// Write a random psp lib problem
    Generate(Generate),
}

/// Genetic algorithm parameters shared by all solving commands
#[derive(Args, Debug)]
pub struct Solver {
    #[arg(short, long, default_value_t = 50)]
    population_size: usize,
    #[arg(short, long, default_value_t = 100)]
    generations: usize,
    /// Probability of swapping two adjacent activities of an offspring
    #[arg(short, long, default_value_t = 0.05)]
    mutation_probability: f64,
    /// Schedule generation scheme: serial or parallel
    #[arg(short, long, default_value_t = Decoder::Serial)]
    decoder: Decoder,
    #[arg(short, long)]
    seed: Option<u64>,
    /// Decode individuals on a thread pool
    #[arg(long)]
    parallel: bool,
    /// Thread pool size, defaults to the number of logical cores
    #[arg(short, long)]
    threads: Option<usize>,
}

impl From<&Solver> for SchedulerOptions {
    fn from(solver: &Solver) -> Self {
        Self {
            population_size: solver.population_size,
            generations: solver.generations,
            mutation_probability: solver.mutation_probability,
            decoder: solver.decoder,
            seed: solver.seed,
            parallel: solver.parallel,
            threads: solver.threads,
        }
    }
}

#[derive(Args, Debug)]
pub struct Schedule {
    #[arg(required = true)]
    path: PathBuf,
    #[command(flatten)]
    solver: Solver,
}

#[derive(Args, Debug)]
pub struct Benchmark {
    #[arg(required = true)]
    psp_problem_file_folder: PathBuf,
    #[arg(short, long, default_value = "benchmark.txt")]
    output: PathBuf,
    #[command(flatten)]
    solver: Solver,
}

#[derive(Args, Debug)]
pub struct Generate {
    #[arg(required = true)]
    output: PathBuf,
    /// Number of non-dummy activities
    #[arg(short, long, default_value_t = 30)]
    activities: usize,
    #[arg(short, long, default_value_t = 4)]
    resources: usize,
    #[arg(long, default_value_t = 10)]
    max_duration: usize,
    #[arg(long, default_value_t = 6)]
    min_capacity: usize,
    #[arg(long, default_value_t = 14)]
    max_capacity: usize,
    /// Chance of a precedence relation between two activities
    #[arg(short, long, default_value_t = 0.15)]
    edge_probability: f64,
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    if let Err(err) = match args.command {
        Commands::Graph {
            psp_problem_file,
            output,
        } => commands::graph(psp_problem_file, output),
        Commands::Schedule(schedule) => commands::schedule(schedule),
        Commands::Benchmark(benchmark) => commands::benchmark(benchmark),
        Commands::Generate(generate) => commands::generate(generate),
    } {
        error!("An error occurred: {err:#}");
        std::process::exit(1);
    }
}
