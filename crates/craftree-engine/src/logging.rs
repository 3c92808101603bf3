//! Tracing setup.
//!
//! The subscriber is installed before anything else runs, with `RUST_LOG` or
//! a bootstrap filter, so that config loading is logged. Once the config is
//! read its `log_filter` replaces the bootstrap filter unless `RUST_LOG` is
//! set.

use craftree_common::{CraftreeError, CraftreeResult};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use crate::config::AppConfig;

/// Filter used until the config file has been read.
pub const BOOTSTRAP_FILTER: &str = "craftree=info";

/// Handle for swapping the active filter.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Builds the subscriber with a reloadable filter and a formatter writing to
/// `writer`.
pub fn subscriber<W>(writer: W) -> (impl Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = env_filter().unwrap_or_else(|| EnvFilter::new(BOOTSTRAP_FILTER));
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer));
    (subscriber, handle)
}

/// Installs the global subscriber, logging to stderr.
pub fn init() -> FilterHandle {
    let (subscriber, handle) = subscriber(std::io::stderr);
    subscriber.init();
    handle
}

/// Switches to the configured filter unless `RUST_LOG` overrides it.
pub fn apply_config(handle: &FilterHandle, config: &AppConfig) -> CraftreeResult<()> {
    if env_filter().is_some() {
        return Ok(());
    }
    apply_filter(handle, &config.log_filter)
}

/// Replaces the active filter with `directives`.
pub fn apply_filter(handle: &FilterHandle, directives: &str) -> CraftreeResult<()> {
    let filter = EnvFilter::try_new(directives)
        .map_err(|e| CraftreeError::InvalidData(format!("log filter '{directives}': {e}")))?;
    handle
        .reload(filter)
        .map_err(|e| CraftreeError::InvalidData(format!("log filter reload: {e}")))
}

fn env_filter() -> Option<EnvFilter> {
    EnvFilter::try_from_default_env().ok()
}
