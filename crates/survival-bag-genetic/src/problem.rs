use std::fmt;

use rand::Rng;

use crate::{error::EvolutionError, selection::ParentSelection};

/// A fitness value the engine can rank by.
pub trait Fitness: Clone + fmt::Debug {
    /// Scalar used for ranking, elite selection, roulette weights and the trace.
    ///
    /// Higher is better. Roulette selection expects non-negative scores.
    fn score(&self) -> f64;
}

impl Fitness for f64 {
    fn score(&self) -> f64 {
        *self
    }
}

/// The capability set an [`Engine`](crate::engine::Engine) is generic over.
///
/// A problem fixes the chromosome encoding and supplies the four operations
/// the generation loop needs: random initialization, fitness evaluation,
/// crossover and mutation. It also picks the parent selection scheme the
/// loop uses.
///
/// Implementations must never change a chromosome's shape: every genome a
/// problem produces has the same length (or key set) as its inputs.
pub trait Problem {
    /// Chromosome type.
    type Genome: Clone + fmt::Debug;
    /// Fitness attached to one genome for one generation.
    type Fitness: Fitness;

    /// Draws one independent random genome for the initial population.
    fn random_genome<R>(&self, rng: &mut R) -> Self::Genome
    where
        R: Rng + ?Sized;

    /// Evaluates a whole generation, returning one fitness per genome, in order.
    ///
    /// Evaluation is batched so that expensive problems can evaluate
    /// individuals concurrently.
    fn evaluate<R>(
        &self,
        genomes: &[Self::Genome],
        rng: &mut R,
    ) -> Result<Vec<Self::Fitness>, EvolutionError>
    where
        R: Rng + ?Sized;

    /// Combines two parents into exactly one child.
    fn crossover<R>(&self, a: &Self::Genome, b: &Self::Genome, rng: &mut R) -> Self::Genome
    where
        R: Rng + ?Sized;

    /// Perturbs exactly one gene of `genome`.
    fn mutate<R>(&self, genome: &mut Self::Genome, rng: &mut R)
    where
        R: Rng + ?Sized;

    /// How parents are picked for crossover.
    fn parent_selection(&self) -> ParentSelection;
}

/// A genome together with its fitness for the current generation.
#[derive(Debug, Clone)]
pub struct Individual<G, F> {
    genome: G,
    fitness: F,
}

impl<G, F> Individual<G, F>
where
    F: Fitness,
{
    #[must_use]
    pub fn new(genome: G, fitness: F) -> Self {
        Self { genome, fitness }
    }

    #[must_use]
    pub fn genome(&self) -> &G {
        &self.genome
    }

    #[must_use]
    pub fn fitness(&self) -> &F {
        &self.fitness
    }

    /// Shorthand for `self.fitness().score()`.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.fitness.score()
    }

    #[must_use]
    pub fn into_parts(self) -> (G, F) {
        (self.genome, self.fitness)
    }
}

/// Index of the best individual: first-seen-highest wins on ties.
///
/// Returns `None` for an empty population.
#[must_use]
pub fn best_index<G, F>(individuals: &[Individual<G, F>]) -> Option<usize>
where
    F: Fitness,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, ind) in individuals.iter().enumerate() {
        let score = ind.score();
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}
