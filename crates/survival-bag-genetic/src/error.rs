/// Invalid or missing problem or run parameters.
///
/// Raised before any generation runs.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("population size must be positive")]
    ZeroIndividuals,
    #[display("generation count must be positive")]
    ZeroGenerations,
    #[display("repetition count must be positive")]
    ZeroRepetitions,
    #[display("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[display("item catalogue is empty")]
    EmptyCatalogue,
    #[display("capacity must be non-negative, got {capacity}")]
    NegativeCapacity { capacity: f64 },
    #[display("item '{name}' has an invalid {field}: {value}")]
    InvalidItem {
        name: String,
        field: &'static str,
        value: f64,
    },
    #[display("item '{name}' is defined more than once")]
    DuplicateItem { name: String },
}

impl ConfigurationError {
    /// Checks that `value` is a finite rate within `[0, 1]`.
    pub fn check_rate(name: &'static str, value: f64) -> Result<(), Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(Self::RateOutOfRange { name, value })
        }
    }
}

/// Errors that stop an evolutionary run.
///
/// None of these are retried: the generation that raised it is abandoned and
/// no partial result is returned for it.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum EvolutionError {
    #[display("invalid configuration: {_0}")]
    Configuration(ConfigurationError),
    #[display(
        "fitness-proportional selection is undefined in generation {generation}: \
         no individual has positive fitness"
    )]
    DegenerateSelection { generation: usize },
    #[display("inner run failed for {params}: {source}")]
    InnerRun {
        params: String,
        source: Box<EvolutionError>,
    },
}

impl From<ConfigurationError> for EvolutionError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}
