use tracing_subscriber::EnvFilter;

/// Overrides the default `info` filter, e.g. `YCSB_LOADER_LOG=debug`.
pub const LOG_ENV: &str = "YCSB_LOADER_LOG";

/// Logs go to stderr so stdout only carries commands and the final report.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        tracing::debug!("Global tracing subscriber already set");
    }
}
