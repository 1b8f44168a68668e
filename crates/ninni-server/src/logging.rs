use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "ninni=info,tower_http=info";

/// Initialize tracing subscriber with environment filter
///
/// `verbose` raises the default to debug; an explicit `RUST_LOG` always wins.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ninni=debug,ninni_llm_api=debug,tower_http=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
