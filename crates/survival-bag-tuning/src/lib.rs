//! Hyperparameter tuning for the survival-bag search.
//!
//! The item-selection search of `survival-bag-knapsack` has five knobs:
//! population size, generation count, mutation rate, initial pick rate and
//! elite fraction. This crate runs a second genetic algorithm over those
//! knobs, on the same generic engine, scoring each configuration by the mean
//! best fitness of several fresh inner runs.
//!
//! - [`hyperparams`] - the [`HyperParams`](hyperparams::HyperParams) chromosome,
//!   its search space and its operators
//! - [`tuner`] - [`TuningProblem`](tuner::TuningProblem), the repeated-trial
//!   evaluator plugged into the engine
//!
//! A failing inner run aborts the whole outer generation with
//! [`EvolutionError::InnerRun`](survival_bag_genetic::EvolutionError::InnerRun).

pub mod hyperparams;
pub mod tuner;
