use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use survival_bag_genetic::engine::Engine;
use survival_bag_knapsack::problem::{KnapsackParams, KnapsackProblem, KnapsackRun};

use crate::{items, plot, report::KnapsackReport, util};

use super::SearchArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct OptimizeArg {
    #[clap(flatten)]
    search: SearchArg,
    /// Pick rate of the initial population (between 0 and 1)
    #[arg(short, long, default_value_t = 0.5)]
    pick_rate: f64,
}

pub(crate) fn run(arg: &OptimizeArg, verbose: bool) -> anyhow::Result<()> {
    let OptimizeArg { search, pick_rate } = arg;
    let catalogue = items::load(&search.filename)?;
    let params = KnapsackParams {
        engine: search.engine_params(),
        pick_percentage: *pick_rate,
    };
    params.validate()?;
    let problem = KnapsackProblem::new(&catalogue, search.max_weight, params.pick_percentage)?
        .with_zero_fitness_policy(search.on_degenerate);

    let seed = search.seed();
    let mut rng = Pcg32::seed_from_u64(seed);
    tracing::info!(seed, items = catalogue.len(), "starting item search");

    let outcome = super::evolve(Engine::new(problem, params.engine)?, &mut rng, verbose)?;
    let (bag, fitness) = outcome.best.into_parts();
    let run = KnapsackRun {
        packing: problem.pack(&bag),
        bag,
        fitness,
        trace: outcome.trace,
    };

    let report = KnapsackReport::new(seed, search.max_weight, params, run);
    report.print_summary();
    if search.graph {
        plot::print_trace(&report.trace);
    }
    util::save_json(&report, search.output.as_deref())
}
