use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn build_filter(rust_log: Option<&str>, default_directives: &str) -> Result<EnvFilter> {
    match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid RUST_LOG filter: {}", directives)),
        None => EnvFilter::try_new(default_directives)
            .with_context(|| format!("invalid LOG_LEVEL filter: {}", default_directives)),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured
/// default; actix's server chatter is held at `warn` either way.
pub fn init_logging(default_directives: &str) -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_filter(rust_log.as_deref(), default_directives)?
        .add_directive("actix_server=warn".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .context("global tracing subscriber already installed")
}
