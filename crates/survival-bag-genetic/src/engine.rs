//! The generation loop.
//!
//! An [`Engine`] moves through a fixed sequence of states:
//!
//! ```text
//! Uninitialized → Generation(1) → Generation(2) → … → Generation(N) → Done
//! ```
//!
//! - **Generation 1**: draw `nb_individuals` random genomes, evaluate them,
//!   record the best score.
//! - **Generation k > 1**: copy the elites, breed children until the
//!   population is full again, mutate every individual (elites included) with
//!   probability `mutation_rate`, evaluate, record the best score.
//! - **Done**: the trace holds exactly `nb_generations` entries.
//!
//! There is no early stopping. A generation that fails leaves the engine in
//! the state it had before the failing step.

use rand::Rng;
use survival_bag_stats::descriptive::DescriptiveStats;

use crate::{
    error::{ConfigurationError, EvolutionError},
    params::EngineParams,
    problem::{self, Individual, Problem},
    selection::{self, ParentPicker},
};

/// Where an [`Engine`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    /// No population yet.
    Uninitialized,
    /// The numbered generation has been evaluated and more remain.
    Generation(usize),
    /// All configured generations have been evaluated.
    Done,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutcome<G, F> {
    /// Best individual of the final generation.
    pub best: Individual<G, F>,
    /// Best score of every generation, in order.
    pub trace: Vec<f64>,
    /// The final generation.
    pub population: Vec<Individual<G, F>>,
}

/// A genetic algorithm over the chromosome encoding of `P`.
///
/// # Example
///
/// ```
/// use rand::Rng;
/// use survival_bag_genetic::{
///     EngineParams, EvolutionError, Problem,
///     engine::Engine,
///     selection::{ParentSelection, ZeroFitnessPolicy},
/// };
///
/// /// Maximizes a number in `0..=100`.
/// struct Peak;
///
/// impl Problem for Peak {
///     type Genome = u32;
///     type Fitness = f64;
///
///     fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
///         rng.random_range(0..=100)
///     }
///     fn evaluate<R: Rng + ?Sized>(&self, genomes: &[u32], _: &mut R) -> Result<Vec<f64>, EvolutionError> {
///         Ok(genomes.iter().map(|g| f64::from(*g) + 1.0).collect())
///     }
///     fn crossover<R: Rng + ?Sized>(&self, a: &u32, b: &u32, _: &mut R) -> u32 {
///         a.max(b).to_owned()
///     }
///     fn mutate<R: Rng + ?Sized>(&self, genome: &mut u32, rng: &mut R) {
///         *genome = rng.random_range(0..=100);
///     }
///     fn parent_selection(&self) -> ParentSelection {
///         ParentSelection::Roulette(ZeroFitnessPolicy::Fail)
///     }
/// }
///
/// let params = EngineParams {
///     nb_individuals: 20,
///     nb_generations: 30,
///     mutation_rate: 0.1,
///     elite_percentage: 0.1,
/// };
/// let outcome = Engine::new(Peak, params)?.run(&mut rand::rng())?;
/// assert_eq!(outcome.trace.len(), 30);
/// assert!(outcome.best.score() >= 1.0);
/// # Ok::<(), EvolutionError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Engine<P>
where
    P: Problem,
{
    problem: P,
    params: EngineParams,
    state: EngineState,
    population: Vec<Individual<P::Genome, P::Fitness>>,
    trace: Vec<f64>,
}

impl<P> Engine<P>
where
    P: Problem,
{
    /// Creates an engine after validating `params`.
    pub fn new(problem: P, params: EngineParams) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(Self {
            problem,
            params,
            state: EngineState::Uninitialized,
            population: Vec::with_capacity(params.nb_individuals),
            trace: Vec::with_capacity(params.nb_generations),
        })
    }

    #[must_use]
    pub fn problem(&self) -> &P {
        &self.problem
    }

    #[must_use]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Number of generations evaluated so far.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.trace.len()
    }

    /// The current, evaluated generation. Empty before the first step.
    #[must_use]
    pub fn population(&self) -> &[Individual<P::Genome, P::Fitness>] {
        &self.population
    }

    /// Best score of every generation evaluated so far.
    #[must_use]
    pub fn trace(&self) -> &[f64] {
        &self.trace
    }

    /// Best individual of the current generation (first-seen-highest on ties).
    #[must_use]
    pub fn best(&self) -> Option<&Individual<P::Genome, P::Fitness>> {
        problem::best_index(&self.population).map(|i| &self.population[i])
    }

    /// Score statistics of the current generation.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.population.iter().map(Individual::score))
    }

    /// Evaluates the next generation and returns the new state.
    ///
    /// Does nothing once the engine is [`EngineState::Done`].
    pub fn step<R>(&mut self, rng: &mut R) -> Result<EngineState, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let generation = match self.state {
            EngineState::Uninitialized => 1,
            EngineState::Generation(g) => g + 1,
            EngineState::Done => return Ok(self.state),
        };

        let genomes = if generation == 1 {
            (0..self.params.nb_individuals)
                .map(|_| self.problem.random_genome(rng))
                .collect::<Vec<_>>()
        } else {
            let mut genomes = self.breed(rng)?;
            self.mutate_all(&mut genomes, rng);
            genomes
        };

        let fitness = self.problem.evaluate(&genomes, rng)?;
        assert_eq!(
            fitness.len(),
            genomes.len(),
            "evaluate must return one fitness per genome"
        );
        self.population = genomes
            .into_iter()
            .zip(fitness)
            .map(|(genome, fitness)| Individual::new(genome, fitness))
            .collect();

        let best = self
            .best()
            .map(Individual::score)
            .expect("population is never empty after evaluation");
        self.trace.push(best);

        if let Some(stats) = self.fitness_stats() {
            tracing::debug!(
                generation,
                best,
                min = stats.min,
                mean = stats.mean,
                max = stats.max,
                "generation evaluated"
            );
        }

        self.state = if generation >= self.params.nb_generations {
            EngineState::Done
        } else {
            EngineState::Generation(generation)
        };
        Ok(self.state)
    }

    /// Steps until [`EngineState::Done`] and returns the final result.
    pub fn run<R>(
        mut self,
        rng: &mut R,
    ) -> Result<RunOutcome<P::Genome, P::Fitness>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        while !self.state.is_done() {
            self.step(rng)?;
        }
        Ok(self
            .into_outcome()
            .expect("a finished engine has a population"))
    }

    /// Consumes the engine, returning its current best, trace and population.
    ///
    /// Returns `None` before the first step.
    #[must_use]
    pub fn into_outcome(self) -> Option<RunOutcome<P::Genome, P::Fitness>> {
        let best = self.best()?.clone();
        Some(RunOutcome {
            best,
            trace: self.trace,
            population: self.population,
        })
    }

    /// Builds the genomes of the next generation from the current one, before
    /// mutation: elites first, in rank order, then children.
    ///
    /// A single-individual population is carried over as is. When the elites
    /// already fill the population no child is bred.
    pub fn breed<R>(&self, rng: &mut R) -> Result<Vec<P::Genome>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let n = self.params.nb_individuals;
        if self.population.len() < 2 {
            return Ok(self
                .population
                .iter()
                .map(|ind| ind.genome().clone())
                .collect());
        }

        let scores = self
            .population
            .iter()
            .map(Individual::score)
            .collect::<Vec<_>>();
        let ranking = selection::rank(&scores);
        let elite_count = self.params.elite_count();

        let mut next = ranking[..elite_count]
            .iter()
            .map(|&i| self.population[i].genome().clone())
            .collect::<Vec<_>>();

        if next.len() < n {
            let mut picker = ParentPicker::new(
                self.problem.parent_selection(),
                &scores,
                &ranking,
                elite_count,
                self.generation(),
            );
            while next.len() < n {
                let (a, b) = picker.pick(rng)?;
                let child = self.problem.crossover(
                    self.population[a].genome(),
                    self.population[b].genome(),
                    rng,
                );
                next.push(child);
            }
        }

        tracing::trace!(
            generation = self.generation() + 1,
            elites = elite_count,
            children = n - elite_count,
            "next generation bred"
        );
        Ok(next)
    }

    fn mutate_all<R>(&self, genomes: &mut [P::Genome], rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for genome in genomes {
            if rng.random_bool(self.params.mutation_rate) {
                self.problem.mutate(genome, rng);
            }
        }
    }
}
