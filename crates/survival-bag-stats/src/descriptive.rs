use serde::{Deserialize, Serialize};

/// Descriptive statistics over the fitness scores of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of samples.
    pub count: usize,
    /// The lowest score.
    pub min: f64,
    /// The highest score.
    pub max: f64,
    /// The arithmetic mean of the scores.
    pub mean: f64,
    /// The upper median (the element at `len / 2` after sorting).
    pub median: f64,
    /// The population variance.
    pub variance: f64,
    /// The population standard deviation.
    pub std_dev: f64,
    /// `std_dev / (max - min)`, or zero when every score is the same.
    ///
    /// Useful as a scale-free convergence signal: it shrinks towards zero as
    /// the population collapses onto a single solution.
    pub normalized_std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted scores.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survival_bag_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Like [`Self::new`], but skips sorting.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = sorted_values[count / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();
        let range = max - min;
        let normalized_std_dev = if range <= f64::EPSILON * mean.abs().max(1.0) {
            0.0
        } else {
            std_dev / range
        };

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
            normalized_std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_has_no_stats() {
        assert!(DescriptiveStats::new([]).is_none());
    }

    #[test]
    fn test_constant_sample_is_fully_converged() {
        let stats = DescriptiveStats::new([8.0; 4]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.normalized_std_dev, 0.0);
    }

    #[test]
    fn test_dispersion() {
        let stats = DescriptiveStats::new([0.0, 0.0, 10.0, 10.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 10.0);
        assert_eq!(stats.variance, 25.0);
        assert_eq!(stats.std_dev, 5.0);
        assert_eq!(stats.normalized_std_dev, 0.5);
    }

    #[test]
    #[should_panic(expected = "sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = DescriptiveStats::from_sorted(&[2.0, 1.0]);
    }

    #[test]
    fn test_serializes_field_names() {
        let stats = DescriptiveStats::new([1.0]).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["max"], 1.0);
        assert_eq!(json["count"], 1);
    }
}
