//! Item-selection chromosomes and their genetic operators.
//!
//! A [`Bag`] is a fixed-length vector of booleans, one gene per catalogue
//! item in catalogue order. Gene `i` set means item `i` is packed.
//!
//! # Operations
//!
//! - **Initialization**: [`Bag::random`] sets each gene independently
//! - **Crossover**: [`single_point_crossover`] splices two parents at a random cut
//! - **Mutation**: [`Bag::flip_random_gene`] negates exactly one gene
//!
//! None of them ever change the number of genes.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Item-selection chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bag {
    genes: Vec<bool>,
}

impl Bag {
    #[must_use]
    pub fn from_genes(genes: Vec<bool>) -> Self {
        Self { genes }
    }

    /// Draws `len` genes, each set independently with probability `pick_percentage`.
    ///
    /// `pick_percentage = 0` always yields the empty bag and `1` the full one.
    ///
    /// # Panics
    ///
    /// Panics if `pick_percentage` is outside `[0, 1]`.
    pub fn random<R>(rng: &mut R, pick_percentage: f64, len: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let genes = (0..len).map(|_| rng.random_bool(pick_percentage)).collect();
        Self { genes }
    }

    #[must_use]
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Indices of the packed items.
    pub fn packed(&self) -> impl Iterator<Item = usize> + '_ {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(i, &g)| g.then_some(i))
    }

    /// Negates one uniformly chosen gene. Does nothing on a gene-less bag.
    pub fn flip_random_gene<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.genes.is_empty() {
            return;
        }
        let i = rng.random_range(0..self.genes.len());
        self.genes[i] = !self.genes[i];
    }
}

impl fmt::Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &g in &self.genes {
            f.write_str(if g { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Single-point crossover.
///
/// Draws a cut index uniformly from `1..len`; the child takes `a`'s genes
/// before the cut and `b`'s genes from the cut onward, so both parents
/// contribute at least one gene. A fresh cut is drawn on every call. With a
/// single gene there is nothing to splice and the child is a copy of `a`.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn single_point_crossover<R>(a: &Bag, b: &Bag, rng: &mut R) -> Bag
where
    R: Rng + ?Sized,
{
    assert_eq!(a.len(), b.len(), "parents must have the same length");
    if a.len() < 2 {
        return a.clone();
    }
    let cut = rng.random_range(1..a.len());
    let genes = a.genes[..cut].iter().chain(&b.genes[cut..]).copied().collect();
    Bag { genes }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_extremes() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(Bag::random(&mut rng, 0.0, 4).genes(), [false; 4]);
        assert_eq!(Bag::random(&mut rng, 1.0, 4).genes(), [true; 4]);
    }

    #[test]
    fn test_crossover_takes_prefix_and_suffix() {
        let mut rng = Pcg32::seed_from_u64(1);
        let a = Bag::from_genes(vec![true; 6]);
        let b = Bag::from_genes(vec![false; 6]);
        for _ in 0..50 {
            let child = single_point_crossover(&a, &b, &mut rng);
            let cut = child.genes().iter().take_while(|g| **g).count();
            assert!((1..6).contains(&cut), "cut {cut} out of range");
            assert!(child.genes()[cut..].iter().all(|g| !*g));
        }
    }

    #[test]
    fn test_crossover_single_gene_copies_first_parent() {
        let mut rng = Pcg32::seed_from_u64(2);
        let a = Bag::from_genes(vec![true]);
        let b = Bag::from_genes(vec![false]);
        assert_eq!(single_point_crossover(&a, &b, &mut rng), a);
    }

    #[test]
    fn test_flip_changes_exactly_one_gene() {
        let mut rng = Pcg32::seed_from_u64(3);
        let before = Bag::from_genes(vec![true, false, true, false, false]);
        let mut after = before.clone();
        after.flip_random_gene(&mut rng);
        let diff = before
            .genes()
            .iter()
            .zip(after.genes())
            .filter(|(x, y)| x != y)
            .count();
        assert_eq!(diff, 1);
    }

    #[test]
    fn test_packed_and_display() {
        let bag = Bag::from_genes(vec![true, true, false]);
        assert_eq!(bag.packed().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(bag.to_string(), "110");
        assert_eq!(serde_json::to_string(&bag).unwrap(), "[true,true,false]");
    }

    proptest! {
        #[test]
        fn crossover_preserves_length(
            (a, b) in (1usize..40).prop_flat_map(|len| {
                (prop::collection::vec(any::<bool>(), len), prop::collection::vec(any::<bool>(), len))
            }),
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let child = single_point_crossover(&Bag::from_genes(a.clone()), &Bag::from_genes(b), &mut rng);
            prop_assert_eq!(child.len(), a.len());
        }

        #[test]
        fn mutation_preserves_length(genes in prop::collection::vec(any::<bool>(), 1..40), seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut bag = Bag::from_genes(genes.clone());
            bag.flip_random_gene(&mut rng);
            prop_assert_eq!(bag.len(), genes.len());
        }

        #[test]
        fn random_has_requested_length(len in 0usize..64, pick in 0.0f64..=1.0, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_eq!(Bag::random(&mut rng, pick, len).len(), len);
        }
    }
}
