//! The outer search: tuning hyperparameters by repeated inner runs.
//!
//! Every outer individual is a [`HyperParams`] record. Its fitness is the
//! mean best fitness reached by `nb_repetitions` independent item-selection
//! runs configured with it, each starting from a fresh random population.
//! Parents are picked by rank scan, not roulette.
//!
//! Individuals of one outer generation are evaluated concurrently, one scoped
//! thread per individual. Each thread owns a [`Pcg32`] seeded from the outer
//! random stream, so a seeded tuning run is reproducible whether or not it
//! runs in parallel. Sequential evaluation draws from the outer stream
//! directly and produces a different (equally reproducible) run.

use std::{
    thread,
    time::{Duration, Instant},
};

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use survival_bag_genetic::{
    ConfigurationError, EngineParams, EvolutionError, Fitness, Problem,
    engine::{Engine, RunOutcome},
    selection::{ParentSelection, ZeroFitnessPolicy},
};
use survival_bag_knapsack::{item::ItemCatalogue, problem::KnapsackProblem};

use crate::hyperparams::{self, HyperParamSpace, HyperParams, ParamName};

/// Run configuration of the outer search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningParams {
    #[serde(flatten)]
    pub engine: EngineParams,
    /// Inner runs averaged per outer individual.
    pub nb_repetitions: usize,
}

impl TuningParams {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.engine.validate()?;
        if self.nb_repetitions == 0 {
            return Err(ConfigurationError::ZeroRepetitions);
        }
        Ok(())
    }
}

/// Fitness of a hyperparameter record over its repeated inner runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialFitness {
    /// Sum of the inner runs' best fitness.
    pub total: f64,
    /// Mean of the inner runs' best fitness. This is what the outer search ranks by.
    pub mean: f64,
    /// Mean wall-clock time of one inner run, in seconds.
    pub mean_elapsed_secs: f64,
}

impl Fitness for TrialFitness {
    fn score(&self) -> f64 {
        self.mean
    }
}

/// How the individuals of one outer generation are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Evaluation {
    /// One scoped thread per individual.
    #[default]
    Parallel,
    /// One individual after another on the calling thread.
    Sequential,
}

/// Hyperparameter tuning for one item catalogue and capacity.
///
/// # Example
///
/// ```
/// use survival_bag_genetic::{EngineParams, selection::ZeroFitnessPolicy};
/// use survival_bag_knapsack::item::{Item, ItemCatalogue};
/// use survival_bag_tuning::{hyperparams::HyperParamSpace, tuner::TuningProblem};
///
/// let catalogue = ItemCatalogue::new([
///     Item::new("raincoat", 5.0, 2.0),
///     Item::new("knife", 3.0, 1.0),
///     Item::new("water", 15.0, 5.0),
/// ])?;
/// let problem = TuningProblem::new(&catalogue, 6.0, 2)?
///     .with_space(HyperParamSpace { max_individuals: 10, max_generations: 10 })?
///     .with_zero_fitness_policy(ZeroFitnessPolicy::Uniform);
/// let params = EngineParams {
///     nb_individuals: 4,
///     nb_generations: 2,
///     mutation_rate: 0.2,
///     elite_percentage: 0.25,
/// };
/// let run = problem.tune(params, &mut rand::rng())?;
/// assert_eq!(run.trace.len(), 2);
/// assert!(run.params.nb_individuals <= 10);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TuningProblem<'a> {
    catalogue: &'a ItemCatalogue,
    capacity: f64,
    nb_repetitions: usize,
    space: HyperParamSpace,
    zero_fitness_policy: ZeroFitnessPolicy,
    evaluation: Evaluation,
}

impl<'a> TuningProblem<'a> {
    pub fn new(
        catalogue: &'a ItemCatalogue,
        capacity: f64,
        nb_repetitions: usize,
    ) -> Result<Self, ConfigurationError> {
        if capacity.is_nan() || capacity < 0.0 {
            return Err(ConfigurationError::NegativeCapacity { capacity });
        }
        if nb_repetitions == 0 {
            return Err(ConfigurationError::ZeroRepetitions);
        }
        Ok(Self {
            catalogue,
            capacity,
            nb_repetitions,
            space: HyperParamSpace::default(),
            zero_fitness_policy: ZeroFitnessPolicy::default(),
            evaluation: Evaluation::default(),
        })
    }

    /// Sets the bounds hyperparameters are drawn from.
    pub fn with_space(self, space: HyperParamSpace) -> Result<Self, ConfigurationError> {
        space.validate()?;
        Ok(Self { space, ..self })
    }

    /// Sets what the inner roulette does when every bag is infeasible.
    #[must_use]
    pub fn with_zero_fitness_policy(self, policy: ZeroFitnessPolicy) -> Self {
        Self {
            zero_fitness_policy: policy,
            ..self
        }
    }

    #[must_use]
    pub fn with_evaluation(self, evaluation: Evaluation) -> Self {
        Self { evaluation, ..self }
    }

    #[must_use]
    pub fn space(&self) -> &HyperParamSpace {
        &self.space
    }

    /// Runs `nb_repetitions` independent inner searches configured by `params`.
    ///
    /// Any inner failure aborts the trial and is reported as
    /// [`EvolutionError::InnerRun`].
    pub fn run_trials<R>(
        &self,
        params: &HyperParams,
        rng: &mut R,
    ) -> Result<TrialFitness, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let inner_failure = |source: EvolutionError| EvolutionError::InnerRun {
            params: params.to_string(),
            source: Box::new(source),
        };

        let knapsack = params.knapsack_params();
        let problem = KnapsackProblem::new(self.catalogue, self.capacity, knapsack.pick_percentage)
            .map_err(|e| inner_failure(e.into()))?
            .with_zero_fitness_policy(self.zero_fitness_policy);

        let mut total = 0.0;
        let mut elapsed = Duration::ZERO;
        for _ in 0..self.nb_repetitions {
            let start = Instant::now();
            let run = problem.solve(knapsack.engine, rng).map_err(inner_failure)?;
            elapsed += start.elapsed();
            total += run.fitness;
        }

        #[expect(clippy::cast_precision_loss)]
        let repetitions = self.nb_repetitions as f64;
        let fitness = TrialFitness {
            total,
            mean: total / repetitions,
            mean_elapsed_secs: elapsed.as_secs_f64() / repetitions,
        };
        tracing::info!(
            %params,
            mean = fitness.mean,
            mean_elapsed_secs = fitness.mean_elapsed_secs,
            "trial finished"
        );
        Ok(fitness)
    }

    /// Runs the outer search to completion.
    pub fn tune<R>(&self, params: EngineParams, rng: &mut R) -> Result<TuningRun, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let RunOutcome { best, trace, .. } = Engine::new(*self, params)?.run(rng)?;
        let (params, fitness) = best.into_parts();
        Ok(TuningRun {
            params,
            fitness,
            trace,
        })
    }
}

impl Problem for TuningProblem<'_> {
    type Genome = HyperParams;
    type Fitness = TrialFitness;

    fn random_genome<R>(&self, rng: &mut R) -> HyperParams
    where
        R: Rng + ?Sized,
    {
        self.space.sample(rng)
    }

    fn evaluate<R>(
        &self,
        genomes: &[HyperParams],
        rng: &mut R,
    ) -> Result<Vec<TrialFitness>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        match self.evaluation {
            Evaluation::Sequential => genomes.iter().map(|p| self.run_trials(p, rng)).collect(),
            Evaluation::Parallel => {
                let seeds = genomes.iter().map(|_| rng.random()).collect::<Vec<u64>>();
                thread::scope(|s| {
                    let handles = genomes
                        .iter()
                        .zip(seeds)
                        .map(|(params, seed)| {
                            s.spawn(move || {
                                let mut rng = Pcg32::seed_from_u64(seed);
                                self.run_trials(params, &mut rng)
                            })
                        })
                        .collect::<Vec<_>>();
                    handles
                        .into_iter()
                        .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                        .collect()
                })
            }
        }
    }

    fn crossover<R>(&self, a: &HyperParams, b: &HyperParams, rng: &mut R) -> HyperParams
    where
        R: Rng + ?Sized,
    {
        hyperparams::key_crossover(a, b, rng)
    }

    fn mutate<R>(&self, genome: &mut HyperParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let name = ParamName::random(rng);
        self.space.resample(genome, name, rng);
    }

    fn parent_selection(&self) -> ParentSelection {
        ParentSelection::RankScan
    }
}

/// Result of one tuning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningRun {
    /// Best hyperparameters of the final generation.
    pub params: HyperParams,
    /// Their trial fitness.
    pub fitness: TrialFitness,
    /// Best mean fitness of every outer generation.
    pub trace: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use survival_bag_knapsack::item::Item;

    use super::*;

    fn survival_kit() -> ItemCatalogue {
        ItemCatalogue::new([
            Item::new("raincoat", 5.0, 2.0),
            Item::new("knife", 3.0, 1.0),
            Item::new("water", 15.0, 5.0),
        ])
        .unwrap()
    }

    fn small_space() -> HyperParamSpace {
        HyperParamSpace {
            max_individuals: 8,
            max_generations: 5,
        }
    }

    fn outer_params() -> EngineParams {
        EngineParams {
            nb_individuals: 4,
            nb_generations: 3,
            mutation_rate: 0.3,
            elite_percentage: 0.25,
        }
    }

    fn problem(catalogue: &ItemCatalogue) -> TuningProblem<'_> {
        TuningProblem::new(catalogue, 6.0, 2)
            .unwrap()
            .with_space(small_space())
            .unwrap()
            .with_zero_fitness_policy(ZeroFitnessPolicy::Uniform)
    }

    /// Three all-items bags over capacity 6 are all infeasible.
    fn always_infeasible() -> HyperParams {
        HyperParams {
            nb_individuals: 3,
            nb_generations: 2,
            mutation_rate: 0.0,
            pick_percentage: 1.0,
            elite_percentage: 0.0,
        }
    }

    #[test]
    fn test_params_validation() {
        let params = TuningParams {
            engine: outer_params(),
            nb_repetitions: 0,
        };
        assert_eq!(params.validate(), Err(ConfigurationError::ZeroRepetitions));

        let catalogue = survival_kit();
        assert!(TuningProblem::new(&catalogue, 6.0, 0).is_err());
        assert!(TuningProblem::new(&catalogue, -1.0, 1).is_err());
    }

    #[test]
    fn test_params_json_is_flat() {
        let params = TuningParams {
            engine: outer_params(),
            nb_repetitions: 3,
        };
        let json = serde_json::to_value(params).unwrap();
        assert_eq!(json["nb_individuals"], 4);
        assert_eq!(json["nb_repetitions"], 3);
        let back: TuningParams = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_trial_fitness_scores_by_mean() {
        let fitness = TrialFitness {
            total: 30.0,
            mean: 10.0,
            mean_elapsed_secs: 0.5,
        };
        assert_eq!(fitness.score(), 10.0);
    }

    #[test]
    fn test_run_trials_averages_repetitions() {
        let catalogue = survival_kit();
        let problem = problem(&catalogue);
        let params = HyperParams {
            nb_individuals: 6,
            nb_generations: 4,
            mutation_rate: 0.2,
            pick_percentage: 0.5,
            elite_percentage: 0.3,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let fitness = problem.run_trials(&params, &mut rng).unwrap();
        assert!((fitness.mean * 2.0 - fitness.total).abs() < 1e-9);
        assert!((0.0..=18.0).contains(&fitness.mean));
        assert!(fitness.mean_elapsed_secs >= 0.0);
    }

    #[test]
    fn test_tune_shapes() {
        let catalogue = survival_kit();
        let mut rng = Pcg32::seed_from_u64(5);
        let run = problem(&catalogue).tune(outer_params(), &mut rng).unwrap();
        assert_eq!(run.trace.len(), 3);
        assert_eq!(run.trace.last().copied(), Some(run.fitness.mean));
        assert!((1..=8).contains(&run.params.nb_individuals));
        assert!((1..=5).contains(&run.params.nb_generations));
        assert!(run.params.knapsack_params().validate().is_ok());
    }

    #[test]
    fn test_parallel_and_sequential_are_each_reproducible() {
        let catalogue = survival_kit();
        for evaluation in [Evaluation::Parallel, Evaluation::Sequential] {
            let problem = problem(&catalogue).with_evaluation(evaluation);
            let a = problem
                .tune(outer_params(), &mut Pcg32::seed_from_u64(8))
                .unwrap();
            let b = problem
                .tune(outer_params(), &mut Pcg32::seed_from_u64(8))
                .unwrap();
            assert_eq!(a.params, b.params, "{evaluation:?}");
            assert_eq!(a.trace, b.trace, "{evaluation:?}");
        }
    }

    mod inner_failure {
        use super::*;

        #[test]
        fn test_trial_reports_inner_run() {
            let catalogue = survival_kit();
            let problem = problem(&catalogue).with_zero_fitness_policy(ZeroFitnessPolicy::Fail);
            let mut rng = Pcg32::seed_from_u64(0);
            let err = problem
                .run_trials(&always_infeasible(), &mut rng)
                .unwrap_err();
            let EvolutionError::InnerRun { params, source } = err else {
                panic!("expected an inner run failure, got {err:?}");
            };
            assert_eq!(params, always_infeasible().to_string());
            assert!(matches!(
                *source,
                EvolutionError::DegenerateSelection { generation: 1 }
            ));
        }

        #[test]
        fn test_failure_aborts_outer_generation() {
            let catalogue = survival_kit();
            let problem = problem(&catalogue).with_zero_fitness_policy(ZeroFitnessPolicy::Fail);
            let genomes = [always_infeasible(); 3];
            let mut rng = Pcg32::seed_from_u64(0);
            let result = problem.evaluate(&genomes, &mut rng);
            assert!(matches!(result, Err(EvolutionError::InnerRun { .. })));
        }

        #[test]
        fn test_uniform_policy_tolerates_infeasible_generation() {
            let catalogue = survival_kit();
            let problem = problem(&catalogue);
            let mut rng = Pcg32::seed_from_u64(0);
            let fitness = problem.run_trials(&always_infeasible(), &mut rng).unwrap();
            assert_eq!(fitness.mean, 0.0);
        }
    }
}
