//! Hyperparameter chromosomes and their genetic operators.
//!
//! A [`HyperParams`] record is the genome of the tuning search: one run
//! configuration for the item-selection search. Its fields always come in
//! the fixed order of [`ParamName::ALL`], which is also the order crossover
//! cuts along.
//!
//! # Operations
//!
//! - **Initialization**: [`HyperParamSpace::sample`] draws every field
//!   independently (counts uniformly from `1..=max`, rates from `[0, 1)`)
//! - **Crossover**: [`key_crossover`] takes a prefix of fields from one
//!   parent and the rest from the other
//! - **Mutation**: [`HyperParamSpace::resample`] redraws one field from its
//!   initialization distribution; it is a full resample, not a nudge

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use survival_bag_genetic::{ConfigurationError, EngineParams};
use survival_bag_knapsack::problem::KnapsackParams;

/// Names of the tuned parameters, in crossover order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ParamName {
    #[display("nb_individuals")]
    NbIndividuals,
    #[display("nb_generations")]
    NbGenerations,
    #[display("mutation_rate")]
    MutationRate,
    #[display("pick_percentage")]
    PickPercentage,
    #[display("elite_percentage")]
    ElitePercentage,
}

impl ParamName {
    pub const ALL: [Self; 5] = [
        Self::NbIndividuals,
        Self::NbGenerations,
        Self::MutationRate,
        Self::PickPercentage,
        Self::ElitePercentage,
    ];

    /// Draws one name uniformly.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A run configuration of the item-selection search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HyperParams {
    pub nb_individuals: usize,
    pub nb_generations: usize,
    pub mutation_rate: f64,
    pub pick_percentage: f64,
    pub elite_percentage: f64,
}

impl HyperParams {
    /// Copies the field called `name` from `other`.
    pub fn copy_param(&mut self, name: ParamName, other: &Self) {
        match name {
            ParamName::NbIndividuals => self.nb_individuals = other.nb_individuals,
            ParamName::NbGenerations => self.nb_generations = other.nb_generations,
            ParamName::MutationRate => self.mutation_rate = other.mutation_rate,
            ParamName::PickPercentage => self.pick_percentage = other.pick_percentage,
            ParamName::ElitePercentage => self.elite_percentage = other.elite_percentage,
        }
    }

    /// The item-selection run configuration these parameters describe.
    #[must_use]
    pub fn knapsack_params(&self) -> KnapsackParams {
        KnapsackParams {
            engine: EngineParams {
                nb_individuals: self.nb_individuals,
                nb_generations: self.nb_generations,
                mutation_rate: self.mutation_rate,
                elite_percentage: self.elite_percentage,
            },
            pick_percentage: self.pick_percentage,
        }
    }
}

impl fmt::Display for HyperParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}, {}={}, {}={:.3}, {}={:.3}, {}={:.3}",
            ParamName::NbIndividuals,
            self.nb_individuals,
            ParamName::NbGenerations,
            self.nb_generations,
            ParamName::MutationRate,
            self.mutation_rate,
            ParamName::PickPercentage,
            self.pick_percentage,
            ParamName::ElitePercentage,
            self.elite_percentage,
        )
    }
}

/// Bounds of the hyperparameter search space.
///
/// The cost of one tuning generation grows with
/// `population × repetitions × max_individuals × max_generations`, so these
/// bounds are the main lever for keeping a tuning run tractable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperParamSpace {
    /// Largest inner population size that may be drawn.
    pub max_individuals: usize,
    /// Largest inner generation count that may be drawn.
    pub max_generations: usize,
}

impl Default for HyperParamSpace {
    fn default() -> Self {
        Self {
            max_individuals: 100,
            max_generations: 100,
        }
    }
}

impl HyperParamSpace {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_individuals == 0 {
            return Err(ConfigurationError::ZeroIndividuals);
        }
        if self.max_generations == 0 {
            return Err(ConfigurationError::ZeroGenerations);
        }
        Ok(())
    }

    /// Draws every parameter independently.
    pub fn sample<R>(&self, rng: &mut R) -> HyperParams
    where
        R: Rng + ?Sized,
    {
        HyperParams {
            nb_individuals: rng.random_range(1..=self.max_individuals),
            nb_generations: rng.random_range(1..=self.max_generations),
            mutation_rate: rng.random(),
            pick_percentage: rng.random(),
            elite_percentage: rng.random(),
        }
    }

    /// Redraws the parameter called `name` from its initialization distribution.
    pub fn resample<R>(&self, params: &mut HyperParams, name: ParamName, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        match name {
            ParamName::NbIndividuals => {
                params.nb_individuals = rng.random_range(1..=self.max_individuals);
            }
            ParamName::NbGenerations => {
                params.nb_generations = rng.random_range(1..=self.max_generations);
            }
            ParamName::MutationRate => params.mutation_rate = rng.random(),
            ParamName::PickPercentage => params.pick_percentage = rng.random(),
            ParamName::ElitePercentage => params.elite_percentage = rng.random(),
        }
    }
}

/// Key-based single-point crossover.
///
/// Draws a cut name uniformly; the child takes every field up to and including
/// the cut from `a`, and the remaining fields from `b`. Cutting at the last
/// name yields a copy of `a`.
pub fn key_crossover<R>(a: &HyperParams, b: &HyperParams, rng: &mut R) -> HyperParams
where
    R: Rng + ?Sized,
{
    let cut = rng.random_range(0..ParamName::ALL.len());
    let mut child = *b;
    for name in &ParamName::ALL[..=cut] {
        child.copy_param(*name, a);
    }
    child
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn params(n: usize) -> HyperParams {
        #[expect(clippy::cast_precision_loss)]
        let rate = n as f64 / 100.0;
        HyperParams {
            nb_individuals: n,
            nb_generations: n,
            mutation_rate: rate,
            pick_percentage: rate,
            elite_percentage: rate,
        }
    }

    /// Which parent each field of `child` came from, in `ParamName::ALL` order.
    fn origins(child: &HyperParams, a: &HyperParams) -> Vec<bool> {
        vec![
            child.nb_individuals == a.nb_individuals,
            child.nb_generations == a.nb_generations,
            child.mutation_rate == a.mutation_rate,
            child.pick_percentage == a.pick_percentage,
            child.elite_percentage == a.elite_percentage,
        ]
    }

    #[test]
    fn test_crossover_is_prefix_of_a_then_b() {
        let mut rng = Pcg32::seed_from_u64(0);
        let (a, b) = (params(10), params(20));
        let mut seen_cuts = [false; 5];
        for _ in 0..200 {
            let child = key_crossover(&a, &b, &mut rng);
            let from_a = origins(&child, &a);
            let prefix = from_a.iter().take_while(|x| **x).count();
            assert!(prefix >= 1, "cut field always comes from the first parent");
            assert!(from_a[prefix..].iter().all(|x| !*x));
            seen_cuts[prefix - 1] = true;
        }
        assert!(seen_cuts.iter().all(|s| *s));
    }

    #[test]
    fn test_resample_changes_only_named_field() {
        let mut rng = Pcg32::seed_from_u64(1);
        let space = HyperParamSpace::default();
        let before = params(50);
        for name in ParamName::ALL {
            let mut after = before;
            space.resample(&mut after, name, &mut rng);
            let mut restored = after;
            restored.copy_param(name, &before);
            assert_eq!(restored, before, "{name} resample touched another field");
        }
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        assert_eq!(
            params(10).to_string(),
            "nb_individuals=10, nb_generations=10, mutation_rate=0.100, \
             pick_percentage=0.100, elite_percentage=0.100"
        );
    }

    #[test]
    fn test_knapsack_params() {
        let knapsack = params(30).knapsack_params();
        assert_eq!(knapsack.engine.nb_individuals, 30);
        assert_eq!(knapsack.pick_percentage, 0.3);
        assert!(knapsack.validate().is_ok());
    }

    #[test]
    fn test_space_validation() {
        let space = HyperParamSpace {
            max_individuals: 0,
            ..HyperParamSpace::default()
        };
        assert_eq!(space.validate(), Err(ConfigurationError::ZeroIndividuals));
    }

    proptest! {
        #[test]
        fn sampled_params_are_valid(
            max_individuals in 1usize..200,
            max_generations in 1usize..200,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let space = HyperParamSpace { max_individuals, max_generations };
            let mut p = space.sample(&mut rng);
            prop_assert!(p.knapsack_params().validate().is_ok());
            prop_assert!(p.nb_individuals <= max_individuals);
            prop_assert!(p.nb_generations <= max_generations);

            space.resample(&mut p, ParamName::random(&mut rng), &mut rng);
            prop_assert!(p.knapsack_params().validate().is_ok());
        }

        #[test]
        fn crossover_fields_come_from_parents(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let space = HyperParamSpace::default();
            let (a, b) = (space.sample(&mut rng), space.sample(&mut rng));
            let child = key_crossover(&a, &b, &mut rng);
            prop_assert!(child.nb_individuals == a.nb_individuals || child.nb_individuals == b.nb_individuals);
            prop_assert!(child.elite_percentage == a.elite_percentage || child.elite_percentage == b.elite_percentage);
        }
    }
}
