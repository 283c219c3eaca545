use std::{fmt, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::Rng;
use survival_bag_genetic::{
    EngineParams, Problem,
    engine::{Engine, RunOutcome},
    selection::ZeroFitnessPolicy,
};

use self::{optimize::OptimizeArg, tune::TuneArg};
use crate::logging;

mod optimize;
mod tune;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Which search to run
    #[command(subcommand)]
    mode: Mode,
    /// Print every generation and enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Find the most valuable set of items that fits in the bag
    GeneticAlgorithm(#[clap(flatten)] OptimizeArg),
    /// Tune the parameters of the item search with a second genetic algorithm
    GeneticProgramming(#[clap(flatten)] TuneArg),
}

/// Options shared by both searches.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Item file (YAML, or JSON with a `.json` extension)
    #[arg(short, long, default_value = "items.yml")]
    filename: PathBuf,
    /// Max weight capacity of the survival bag
    #[arg(short = 'w', long, default_value_t = 20.0)]
    max_weight: f64,
    /// Number of individuals
    #[arg(short, long, default_value_t = 1)]
    nb_individuals: usize,
    /// Number of generations
    #[arg(short = 'g', long, default_value_t = 1)]
    nb_generations: usize,
    /// Mutation rate (between 0 and 1)
    #[arg(short, long, default_value_t = 0.05)]
    mutation_rate: f64,
    /// Elite rate (between 0 and 1)
    #[arg(short, long, default_value_t = 0.5)]
    elite_rate: f64,
    /// What roulette selection does when every bag is over capacity
    #[arg(long, default_value = "fail")]
    on_degenerate: ZeroFitnessPolicy,
    /// Seed of the random stream (drawn from the OS when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path for the JSON result (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Display the best fitness per generation curve
    #[arg(long)]
    graph: bool,
}

impl SearchArg {
    fn engine_params(&self) -> EngineParams {
        EngineParams {
            nb_individuals: self.nb_individuals,
            nb_generations: self.nb_generations,
            mutation_rate: self.mutation_rate,
            elite_percentage: self.elite_rate,
        }
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(args.verbose);
    match &args.mode {
        Mode::GeneticAlgorithm(arg) => optimize::run(arg, args.verbose)?,
        Mode::GeneticProgramming(arg) => tune::run(arg, args.verbose)?,
    }
    Ok(())
}

/// Steps `engine` to the end, printing every generation when `verbose`.
fn evolve<P, R>(
    mut engine: Engine<P>,
    rng: &mut R,
    verbose: bool,
) -> anyhow::Result<RunOutcome<P::Genome, P::Fitness>>
where
    P: Problem,
    P::Genome: fmt::Display,
    R: Rng + ?Sized,
{
    while !engine.state().is_done() {
        let generation = engine.generation() + 1;
        if verbose {
            eprintln!("--- Start Generation {generation} ---");
        }
        engine
            .step(rng)
            .with_context(|| format!("Generation {generation} failed"))?;
        if verbose {
            eprintln!("  Individuals:");
            for (i, ind) in engine.population().iter().enumerate() {
                eprintln!("  {i:3}: {} => {:.3}", ind.genome(), ind.score());
            }
            if let Some(stats) = engine.fitness_stats() {
                eprintln!("  Fitness Stats:");
                eprintln!("    Min:        {:.3}", stats.min);
                eprintln!("    Max:        {:.3}", stats.max);
                eprintln!("    Mean:       {:.3}", stats.mean);
                eprintln!("    NormStddev: {:.3}", stats.normalized_std_dev);
            }
            eprintln!("--- End Generation {generation} ---");
            eprintln!();
        }
    }
    engine
        .into_outcome()
        .context("Engine finished without a population")
}
