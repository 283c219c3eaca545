//! Generic genetic algorithm engine.
//!
//! This crate contains the evolutionary loop shared by both searches of the
//! workspace: the item-selection search over boolean chromosomes
//! (`survival-bag-knapsack`) and the hyperparameter search that drives it
//! (`survival-bag-tuning`). Neither encoding is known here; the engine is
//! generic over a [`Problem`], which supplies initialization, evaluation,
//! crossover and mutation.
//!
//! # How a Run Works
//!
//! 1. **Initialize** - Draw `nb_individuals` independent random genomes
//! 2. **Evaluate** - Score every genome; record the best score in the trace
//! 3. **Elites** - Copy the top `round(nb_individuals * elite_percentage)`
//!    genomes verbatim into the next generation
//! 4. **Breed** - Pick parent pairs and cross them over until the population
//!    is full again
//! 5. **Mutate** - Each individual, elites included, is mutated once with
//!    probability `mutation_rate`
//! 6. **Repeat** - Back to step 2 until `nb_generations` have been evaluated
//!
//! # Architecture
//!
//! ```text
//! EngineParams ──┐
//!                ▼
//! Problem ──▶ Engine ──▶ RunOutcome (best individual, trace, final population)
//!                │
//!                ├─ selection::rank          (elites)
//!                └─ selection::ParentPicker  (roulette or rank scan)
//! ```
//!
//! # Randomness
//!
//! Every operation that needs randomness borrows an `&mut R where R: Rng`.
//! Nothing in this crate owns or reaches for a global generator, so seeding
//! one generator reproduces a whole run.
//!
//! # Errors
//!
//! [`EngineParams`] are validated when an [`Engine`](engine::Engine) is
//! created ([`ConfigurationError`]). During a run, roulette selection over a
//! population where nobody has positive fitness either fails with
//! [`EvolutionError::DegenerateSelection`] or falls back to uniform sampling,
//! depending on the [`ZeroFitnessPolicy`](selection::ZeroFitnessPolicy).

pub use self::{
    error::{ConfigurationError, EvolutionError},
    params::EngineParams,
    problem::{Fitness, Individual, Problem},
};

pub mod engine;
pub mod error;
pub mod params;
pub mod problem;
pub mod selection;
