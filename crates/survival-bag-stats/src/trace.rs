//! Summaries over a best-fitness-per-generation trace.
//!
//! A trace holds one entry per generation, in order. Engines only append to
//! it; the functions here are for reports and charts.

use serde::{Deserialize, Serialize};

/// Headline numbers of a best-fitness trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Number of generations recorded.
    pub generations: usize,
    /// Best score of the first generation.
    pub first: f64,
    /// Best score of the last generation.
    pub last: f64,
    /// Highest score seen in any generation.
    pub peak: f64,
    /// 1-based generation where `peak` was first reached.
    pub peak_generation: usize,
    /// Number of generations whose best score is lower than the previous one.
    pub regressions: usize,
}

impl TraceSummary {
    /// Summarizes `trace`, or returns `None` if it is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survival_bag_stats::trace::TraceSummary;
    /// let summary = TraceSummary::new(&[3.0, 8.0, 5.0, 8.0]).unwrap();
    /// assert_eq!(summary.peak, 8.0);
    /// assert_eq!(summary.peak_generation, 2);
    /// assert_eq!(summary.regressions, 1);
    /// ```
    #[must_use]
    pub fn new(trace: &[f64]) -> Option<Self> {
        let first = *trace.first()?;
        let last = *trace.last()?;
        let (peak_index, peak) = trace
            .iter()
            .copied()
            .enumerate()
            .fold((0, first), |(bi, bv), (i, v)| if v > bv { (i, v) } else { (bi, bv) });
        let regressions = trace.windows(2).filter(|w| w[1] < w[0]).count();
        Some(Self {
            generations: trace.len(),
            first,
            last,
            peak,
            peak_generation: peak_index + 1,
            regressions,
        })
    }

    /// Returns `true` if the best score never decreased between generations.
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.regressions == 0
    }
}

/// Lower and upper bounds of a trace, widened so that a flat trace still has
/// a non-empty range to plot.
#[must_use]
pub fn bounds(trace: &[f64]) -> [f64; 2] {
    let min = trace.iter().copied().fold(f64::INFINITY, f64::min);
    let max = trace.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if max - min < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    [min, max]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_trace() {
        assert!(TraceSummary::new(&[]).is_none());
    }

    #[test]
    fn test_monotonic_trace() {
        let summary = TraceSummary::new(&[1.0, 1.0, 4.0]).unwrap();
        assert!(summary.is_monotonic());
        assert_eq!(summary.first, 1.0);
        assert_eq!(summary.last, 4.0);
        assert_eq!(summary.peak_generation, 3);
    }

    #[test]
    fn test_first_peak_wins() {
        let summary = TraceSummary::new(&[2.0, 9.0, 9.0]).unwrap();
        assert_eq!(summary.peak_generation, 2);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(bounds(&[]), [0.0, 1.0]);
        assert_eq!(bounds(&[3.0, 3.0]), [2.0, 4.0]);
        assert_eq!(bounds(&[1.0, 5.0, 2.0]), [1.0, 5.0]);
    }
}
