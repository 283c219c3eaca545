//! JSON result documents and the human-readable run summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use survival_bag_knapsack::{
    bag::Bag,
    problem::{KnapsackParams, KnapsackRun},
};
use survival_bag_stats::trace::TraceSummary;
use survival_bag_tuning::{
    hyperparams::{HyperParamSpace, HyperParams},
    tuner::{TrialFitness, TuningParams, TuningRun},
};

/// Outcome of an item-selection run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct KnapsackReport {
    pub finished_at: DateTime<Utc>,
    pub seed: u64,
    pub capacity: f64,
    pub params: KnapsackParams,
    pub best: Bag,
    pub fitness: f64,
    pub items: Vec<String>,
    pub total_value: f64,
    pub total_weight: f64,
    pub summary: Option<TraceSummary>,
    pub trace: Vec<f64>,
}

impl KnapsackReport {
    pub(crate) fn new(seed: u64, capacity: f64, params: KnapsackParams, run: KnapsackRun) -> Self {
        Self {
            finished_at: Utc::now(),
            seed,
            capacity,
            params,
            best: run.bag,
            fitness: run.fitness,
            items: run.packing.items,
            total_value: run.packing.total_value,
            total_weight: run.packing.total_weight,
            summary: TraceSummary::new(&run.trace),
            trace: run.trace,
        }
    }

    pub(crate) fn print_summary(&self) {
        eprintln!("Best items   : {}", self.items.join(", "));
        eprintln!("Best fitness : {}", self.fitness);
        eprintln!("Total weight : {} / {}", self.total_weight, self.capacity);
    }
}

/// Outcome of a hyperparameter tuning run.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct TuningReport {
    pub finished_at: DateTime<Utc>,
    pub seed: u64,
    pub capacity: f64,
    pub params: TuningParams,
    pub space: HyperParamSpace,
    pub best: HyperParams,
    pub fitness: TrialFitness,
    pub summary: Option<TraceSummary>,
    pub trace: Vec<f64>,
}

impl TuningReport {
    pub(crate) fn new(
        seed: u64,
        capacity: f64,
        params: TuningParams,
        space: HyperParamSpace,
        run: TuningRun,
    ) -> Self {
        Self {
            finished_at: Utc::now(),
            seed,
            capacity,
            params,
            space,
            best: run.params,
            fitness: run.fitness,
            summary: TraceSummary::new(&run.trace),
            trace: run.trace,
        }
    }

    pub(crate) fn print_summary(&self) {
        eprintln!("Best params  : {}", self.best);
        eprintln!(
            "Best fitness : {:.3} (mean of {} runs, {:.3}s each)",
            self.fitness.mean, self.params.nb_repetitions, self.fitness.mean_elapsed_secs
        );
    }
}
