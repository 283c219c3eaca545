use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use survival_bag_genetic::engine::Engine;
use survival_bag_tuning::{
    hyperparams::HyperParamSpace,
    tuner::{Evaluation, TuningParams, TuningProblem, TuningRun},
};

use crate::{items, plot, report::TuningReport, util};

use super::SearchArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TuneArg {
    #[clap(flatten)]
    search: SearchArg,
    /// Number of inner runs averaged per individual
    #[arg(short = 'r', long, default_value_t = 3)]
    nb_repetitions: usize,
    /// Largest inner population size to try
    #[arg(long, default_value_t = 100)]
    max_inner_individuals: usize,
    /// Largest inner generation count to try
    #[arg(long, default_value_t = 100)]
    max_inner_generations: usize,
    /// Evaluate individuals one after another instead of one thread each
    #[arg(long)]
    sequential: bool,
}

pub(crate) fn run(arg: &TuneArg, verbose: bool) -> anyhow::Result<()> {
    let TuneArg {
        search,
        nb_repetitions,
        max_inner_individuals,
        max_inner_generations,
        sequential,
    } = arg;
    let catalogue = items::load(&search.filename)?;
    let params = TuningParams {
        engine: search.engine_params(),
        nb_repetitions: *nb_repetitions,
    };
    params.validate()?;
    let space = HyperParamSpace {
        max_individuals: *max_inner_individuals,
        max_generations: *max_inner_generations,
    };
    let evaluation = if *sequential {
        Evaluation::Sequential
    } else {
        Evaluation::Parallel
    };
    let problem = TuningProblem::new(&catalogue, search.max_weight, params.nb_repetitions)?
        .with_space(space)?
        .with_zero_fitness_policy(search.on_degenerate)
        .with_evaluation(evaluation);

    let seed = search.seed();
    let mut rng = Pcg32::seed_from_u64(seed);
    tracing::info!(seed, items = catalogue.len(), ?evaluation, "starting tuning");

    let outcome = super::evolve(Engine::new(problem, params.engine)?, &mut rng, verbose)?;
    let (best, fitness) = outcome.best.into_parts();
    let run = TuningRun {
        params: best,
        fitness,
        trace: outcome.trace,
    };

    let report = TuningReport::new(seed, search.max_weight, params, space, run);
    report.print_summary();
    if search.graph {
        plot::print_trace(&report.trace);
    }
    util::save_json(&report, search.output.as_deref())
}
