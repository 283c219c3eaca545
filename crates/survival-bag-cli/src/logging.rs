use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const QUIET: &str = "warn";
const VERBOSE: &str =
    "warn,survival_bag_genetic=debug,survival_bag_knapsack=debug,survival_bag_tuning=info";

/// Installs the global subscriber. Events go to stderr so stdout stays JSON.
///
/// `RUST_LOG` overrides the default filter.
pub(crate) fn init(verbose: bool) {
    let default_filter = if verbose { VERBOSE } else { QUIET };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();
}
