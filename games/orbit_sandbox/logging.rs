//! Global logging setup.

use std::{env, panic};

use tracing::{error, info};
use tracing_subscriber::{
    fmt::{self, time::uptime},
    prelude::*,
    EnvFilter, Registry,
};

/// Our crates log at debug, everything else at warn.
const DEFAULT_FILTER: &str = "warn,orbitsim=debug,orbit_sandbox=debug";

/// Installs a compact stdout `tracing` subscriber. `RUST_LOG` directives are
/// appended to the default filter, so they can override it per target.
pub fn init_logging() {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer().event_format(format);

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("log subscriber already installed");
        return;
    }
    info!("starting orbit sandbox");

    // route panic messages through the log
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
    }));
}
