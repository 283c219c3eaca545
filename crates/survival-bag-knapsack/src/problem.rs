use rand::Rng;
use serde::{Deserialize, Serialize};
use survival_bag_genetic::{
    ConfigurationError, EngineParams, EvolutionError, Problem,
    engine::{Engine, RunOutcome},
    selection::{ParentSelection, ZeroFitnessPolicy},
};

use crate::{
    bag::{self, Bag},
    item::ItemCatalogue,
    solution::Packing,
};

/// Run configuration of the item-selection search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KnapsackParams {
    #[serde(flatten)]
    pub engine: EngineParams,
    /// Probability that each gene is set in the initial population.
    pub pick_percentage: f64,
}

impl KnapsackParams {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.engine.validate()?;
        ConfigurationError::check_rate("pick_percentage", self.pick_percentage)
    }
}

/// A survival-bag instance: which items to pack without exceeding `capacity`.
///
/// Fitness is the total value of the packed items, or exactly zero when their
/// total weight exceeds the capacity. Infeasible bags are not repaired or
/// partially credited, they just stop competing.
///
/// # Example
///
/// ```
/// use survival_bag_genetic::{EngineParams, selection::ZeroFitnessPolicy};
/// use survival_bag_knapsack::{
///     item::{Item, ItemCatalogue},
///     problem::{KnapsackParams, KnapsackProblem},
/// };
///
/// let catalogue = ItemCatalogue::new([
///     Item::new("raincoat", 5.0, 2.0),
///     Item::new("knife", 3.0, 1.0),
///     Item::new("water", 15.0, 5.0),
/// ])?;
/// let params = KnapsackParams {
///     engine: EngineParams {
///         nb_individuals: 10,
///         nb_generations: 20,
///         mutation_rate: 0.1,
///         elite_percentage: 0.2,
///     },
///     pick_percentage: 0.5,
/// };
/// let problem = KnapsackProblem::new(&catalogue, 6.0, params.pick_percentage)?
///     .with_zero_fitness_policy(ZeroFitnessPolicy::Uniform);
/// let run = problem.solve(params.engine, &mut rand::rng())?;
/// assert!(run.fitness <= 18.0);
/// assert_eq!(run.trace.len(), 20);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct KnapsackProblem<'a> {
    catalogue: &'a ItemCatalogue,
    capacity: f64,
    pick_percentage: f64,
    zero_fitness_policy: ZeroFitnessPolicy,
}

impl<'a> KnapsackProblem<'a> {
    /// Creates a problem over `catalogue`.
    ///
    /// Fails if `capacity` is negative or `pick_percentage` is outside `[0, 1]`.
    pub fn new(
        catalogue: &'a ItemCatalogue,
        capacity: f64,
        pick_percentage: f64,
    ) -> Result<Self, ConfigurationError> {
        if capacity.is_nan() || capacity < 0.0 {
            return Err(ConfigurationError::NegativeCapacity { capacity });
        }
        ConfigurationError::check_rate("pick_percentage", pick_percentage)?;
        Ok(Self {
            catalogue,
            capacity,
            pick_percentage,
            zero_fitness_policy: ZeroFitnessPolicy::default(),
        })
    }

    /// Sets what roulette selection does when every bag is infeasible.
    #[must_use]
    pub fn with_zero_fitness_policy(self, policy: ZeroFitnessPolicy) -> Self {
        Self {
            zero_fitness_policy: policy,
            ..self
        }
    }

    #[must_use]
    pub fn catalogue(&self) -> &'a ItemCatalogue {
        self.catalogue
    }

    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Value of `bag`, or zero if it is over capacity.
    ///
    /// # Panics
    ///
    /// Panics if `bag` does not have one gene per catalogue item.
    #[must_use]
    pub fn fitness(&self, bag: &Bag) -> f64 {
        self.check_len(bag);
        let (value, weight) = bag
            .packed()
            .filter_map(|i| self.catalogue.get(i))
            .fold((0.0, 0.0), |(value, weight), item| {
                (value + item.value(), weight + item.weight())
            });
        if weight > self.capacity { 0.0 } else { value }
    }

    /// Decodes `bag` into the names, value and weight of its packed items.
    ///
    /// # Panics
    ///
    /// Panics if `bag` does not have one gene per catalogue item.
    #[must_use]
    pub fn pack(&self, bag: &Bag) -> Packing {
        self.check_len(bag);
        Packing::from_items(bag.packed().filter_map(|i| self.catalogue.get(i)))
    }

    fn check_len(&self, bag: &Bag) {
        assert_eq!(
            bag.len(),
            self.catalogue.len(),
            "bag must have one gene per catalogue item"
        );
    }

    /// Runs the item-selection search to completion.
    pub fn solve<R>(&self, params: EngineParams, rng: &mut R) -> Result<KnapsackRun, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let RunOutcome { best, trace, .. } = Engine::new(*self, params)?.run(rng)?;
        let (bag, fitness) = best.into_parts();
        Ok(KnapsackRun {
            packing: self.pack(&bag),
            bag,
            fitness,
            trace,
        })
    }
}

impl Problem for KnapsackProblem<'_> {
    type Genome = Bag;
    type Fitness = f64;

    fn random_genome<R>(&self, rng: &mut R) -> Bag
    where
        R: Rng + ?Sized,
    {
        Bag::random(rng, self.pick_percentage, self.catalogue.len())
    }

    fn evaluate<R>(&self, genomes: &[Bag], _rng: &mut R) -> Result<Vec<f64>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        Ok(genomes.iter().map(|bag| self.fitness(bag)).collect())
    }

    fn crossover<R>(&self, a: &Bag, b: &Bag, rng: &mut R) -> Bag
    where
        R: Rng + ?Sized,
    {
        bag::single_point_crossover(a, b, rng)
    }

    fn mutate<R>(&self, genome: &mut Bag, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        genome.flip_random_gene(rng);
    }

    fn parent_selection(&self) -> ParentSelection {
        ParentSelection::Roulette(self.zero_fitness_policy)
    }
}

/// Result of one item-selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnapsackRun {
    /// Best chromosome of the final generation.
    pub bag: Bag,
    /// Its fitness.
    pub fitness: f64,
    /// Its packed items.
    pub packing: Packing,
    /// Best fitness of every generation.
    pub trace: Vec<f64>,
}
