//! Statistical summaries for fitness samples.
//!
//! The genetic engines report on every generation they produce: how good the
//! best individual is, and how spread out the rest of the population is. This
//! crate holds the small amount of arithmetic behind those reports.
//!
//! - [`descriptive`]: min, max, mean, median and dispersion of a sample
//! - [`trace`]: summaries over a best-fitness-per-generation trace
//!
//! # Examples
//!
//! ```
//! use survival_bag_stats::descriptive::DescriptiveStats;
//!
//! let scores = [0.0, 8.0, 20.0, 8.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.max, 20.0);
//! assert_eq!(stats.mean, 9.0);
//! ```

pub mod descriptive;
pub mod trace;
