use std::fs;

use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

/// Initializes logging with a JSON file layer and a console layer.
///
/// The console layer writes to stderr so reports on stdout stay clean.
/// The returned guard must be held until exit so buffered lines are flushed.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise fall back to the configured filter
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    if fs::create_dir_all(&config.directory).is_err() {
        build_subscriber::<NonBlocking>(env_filter, None).init();
        tracing::warn!(directory = %config.directory.display(), "log directory unavailable, logging to console only");
        return None;
    }

    // Daily rotation, written off the hot path
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_name);
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

    build_subscriber(env_filter, Some(non_blocking_writer)).init();

    Some(guard)
}

/// Layer stack shared by both branches: filter, optional JSON file output, stderr console
fn build_subscriber<W>(env_filter: EnvFilter, file_writer: Option<W>) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let file_layer = file_writer.map(|writer| fmt::layer().json().with_writer(writer));
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
}
