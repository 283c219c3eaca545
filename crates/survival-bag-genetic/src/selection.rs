//! Elite and parent selection.
//!
//! Selection never mutates the population it reads from. A generation is
//! scored once, ranked into a list of indices, and the next generation is
//! assembled by copying genomes out of that snapshot by index.
//!
//! # Elites
//!
//! [`rank`] orders indices by score, best first. It is a stable sort, so
//! individuals with equal scores keep their scan order and the first-seen one
//! ranks higher. The first `k` entries of the ranking are the elites; every
//! individual appears at most once.
//!
//! # Parents
//!
//! Two schemes are available through [`ParentSelection`]:
//!
//! - **Roulette**: fitness-proportional sampling of two distinct parents from
//!   the whole previous generation. Cheap individuals with a small share of
//!   the total fitness still get picked now and then, which keeps diversity.
//! - **Rank scan**: deterministic pairing down the ranking of the non-elite
//!   individuals. Much less diverse, but sensible when every evaluation is
//!   expensive and the search space is small.
//!
//! With exactly two individuals, both schemes return that pair directly.

use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};

use crate::error::EvolutionError;

/// What roulette selection does when no individual has positive fitness.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum ZeroFitnessPolicy {
    /// Stop the run with [`EvolutionError::DegenerateSelection`].
    #[default]
    #[display("fail")]
    Fail,
    /// Draw parents uniformly at random instead.
    #[display("uniform")]
    Uniform,
}

/// Parent selection scheme used to breed children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSelection {
    /// Fitness-proportional sampling.
    Roulette(ZeroFitnessPolicy),
    /// Consecutive pairs down the non-elite ranking.
    RankScan,
}

/// Returns population indices ordered by score, best first.
///
/// Ties keep scan order.
#[must_use]
pub fn rank(scores: &[f64]) -> Vec<usize> {
    let mut ranking = (0..scores.len()).collect::<Vec<_>>();
    ranking.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranking
}

/// Picks parent pairs out of one scored generation.
#[derive(Debug, Clone)]
pub struct ParentPicker {
    generation: usize,
    kind: PickerKind,
}

#[derive(Debug, Clone)]
enum PickerKind {
    Pair,
    Roulette {
        weights: Vec<f64>,
        policy: ZeroFitnessPolicy,
    },
    RankScan {
        pool: Vec<usize>,
        next: usize,
    },
}

impl ParentPicker {
    /// Prepares a picker for the generation numbered `generation`.
    ///
    /// `ranking` is the output of [`rank`] over `scores`; its first
    /// `elite_count` entries are the elites.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer than two individuals.
    #[must_use]
    pub fn new(
        selection: ParentSelection,
        scores: &[f64],
        ranking: &[usize],
        elite_count: usize,
        generation: usize,
    ) -> Self {
        assert!(scores.len() >= 2, "parent selection needs two individuals");
        assert_eq!(scores.len(), ranking.len());

        let kind = if scores.len() == 2 {
            PickerKind::Pair
        } else {
            match selection {
                ParentSelection::Roulette(policy) => PickerKind::Roulette {
                    weights: scores.to_vec(),
                    policy,
                },
                ParentSelection::RankScan => {
                    let rest = &ranking[elite_count.min(ranking.len())..];
                    let pool = if rest.len() >= 2 { rest } else { ranking };
                    PickerKind::RankScan {
                        pool: pool.to_vec(),
                        next: 0,
                    }
                }
            }
        };
        Self { generation, kind }
    }

    /// Returns the indices of the next two distinct parents.
    pub fn pick<R>(&mut self, rng: &mut R) -> Result<(usize, usize), EvolutionError>
    where
        R: Rng + ?Sized,
    {
        match &mut self.kind {
            PickerKind::Pair => Ok((0, 1)),
            PickerKind::Roulette { weights, policy } => {
                roulette_pair(weights, *policy, self.generation, rng)
            }
            PickerKind::RankScan { pool, next } => {
                let m = pool.len();
                let pair = (pool[*next % m], pool[(*next + 1) % m]);
                *next += 2;
                Ok(pair)
            }
        }
    }
}

fn roulette_pair<R>(
    weights: &[f64],
    policy: ZeroFitnessPolicy,
    generation: usize,
    rng: &mut R,
) -> Result<(usize, usize), EvolutionError>
where
    R: Rng + ?Sized,
{
    let Some(first) = roulette_index(weights, rng) else {
        return match policy {
            ZeroFitnessPolicy::Fail => Err(EvolutionError::DegenerateSelection { generation }),
            ZeroFitnessPolicy::Uniform => Ok(uniform_pair(weights.len(), None, rng)),
        };
    };

    // Drawing from the remaining weights is the same distribution as
    // redrawing until the second index differs from the first. When the first
    // parent held all the fitness, every other index is equally likely.
    let mut rest = weights.to_vec();
    rest[first] = 0.0;
    match roulette_index(&rest, rng) {
        Some(second) => Ok((first, second)),
        None => Ok(uniform_pair(weights.len(), Some(first), rng)),
    }
}

fn roulette_index<R>(weights: &[f64], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let dist = WeightedIndex::new(weights).ok()?;
    Some(dist.sample(rng))
}

fn uniform_pair<R>(len: usize, first: Option<usize>, rng: &mut R) -> (usize, usize)
where
    R: Rng + ?Sized,
{
    let first = first.unwrap_or_else(|| rng.random_range(0..len));
    let mut second = rng.random_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}
