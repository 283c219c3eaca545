use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Parameters shared by every engine, whatever its chromosome encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Number of individuals per generation.
    pub nb_individuals: usize,
    /// Number of generations to run, counting the initial one.
    pub nb_generations: usize,
    /// Probability that an individual receives one mutation per generation.
    pub mutation_rate: f64,
    /// Fraction of the population copied unchanged into the next generation.
    pub elite_percentage: f64,
}

impl EngineParams {
    /// Checks counts are positive and rates are within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.nb_individuals == 0 {
            return Err(ConfigurationError::ZeroIndividuals);
        }
        if self.nb_generations == 0 {
            return Err(ConfigurationError::ZeroGenerations);
        }
        ConfigurationError::check_rate("mutation_rate", self.mutation_rate)?;
        ConfigurationError::check_rate("elite_percentage", self.elite_percentage)?;
        Ok(())
    }

    /// Number of elites kept each generation: `nb_individuals * elite_percentage`
    /// rounded half to even.
    ///
    /// Never exceeds the population size.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn elite_count(&self) -> usize {
        let count = (self.nb_individuals as f64 * self.elite_percentage).round_ties_even();
        (count.max(0.0) as usize).min(self.nb_individuals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(nb_individuals: usize, elite_percentage: f64) -> EngineParams {
        EngineParams {
            nb_individuals,
            nb_generations: 10,
            mutation_rate: 0.05,
            elite_percentage,
        }
    }

    #[test]
    fn test_elite_count_rounds() {
        assert_eq!(params(10, 0.0).elite_count(), 0);
        assert_eq!(params(10, 0.24).elite_count(), 2);
        assert_eq!(params(10, 0.25).elite_count(), 2);
        assert_eq!(params(10, 0.35).elite_count(), 4);
        assert_eq!(params(5, 0.5).elite_count(), 2);
        assert_eq!(params(6, 0.25).elite_count(), 2);
        assert_eq!(params(4, 1.0).elite_count(), 4);
        assert_eq!(params(1, 0.5).elite_count(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(params(4, 0.5).validate().is_ok());
        assert_eq!(
            params(0, 0.5).validate(),
            Err(ConfigurationError::ZeroIndividuals)
        );
        assert_eq!(
            EngineParams {
                nb_generations: 0,
                ..params(4, 0.5)
            }
            .validate(),
            Err(ConfigurationError::ZeroGenerations)
        );
        assert!(matches!(
            params(4, 1.2).validate(),
            Err(ConfigurationError::RateOutOfRange {
                name: "elite_percentage",
                ..
            })
        ));
        assert!(matches!(
            EngineParams {
                mutation_rate: -0.1,
                ..params(4, 0.5)
            }
            .validate(),
            Err(ConfigurationError::RateOutOfRange {
                name: "mutation_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_field_names() {
        let json = serde_json::to_value(params(4, 0.5)).unwrap();
        assert_eq!(json["nb_individuals"], 4);
        assert_eq!(json["elite_percentage"], 0.5);
    }
}
