use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level;
/// `verbose` forces debug output for this crate.
pub fn init_logger(config: &LoggingConfig, verbose: bool) {
    let default_directive = if verbose {
        format!("stock_pairing=debug,{}", config.level)
    } else {
        config.level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if config.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer.compact()).try_init()
    };
}
