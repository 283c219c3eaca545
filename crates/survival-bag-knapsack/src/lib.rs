//! The survival-bag problem: a 0/1 knapsack searched with a genetic algorithm.
//!
//! Given an [`ItemCatalogue`](item::ItemCatalogue) of named items with a value
//! and a weight, and a weight capacity, find a subset of items with maximal
//! total value that still fits.
//!
//! - [`item`] - items and their ordered catalogue (also the item file format)
//! - [`bag`] - boolean chromosomes and their crossover/mutation operators
//! - [`problem`] - [`KnapsackProblem`](problem::KnapsackProblem), the fitness
//!   evaluator plugged into the generic engine of `survival-bag-genetic`
//! - [`solution`] - decoding a chromosome into item names and totals
//!
//! Bags over capacity get a fitness of exactly zero. The search never repairs
//! them; they simply lose every roulette draw and every elite slot to a
//! feasible bag.

pub mod bag;
pub mod item;
pub mod problem;
pub mod solution;
