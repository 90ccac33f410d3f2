use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber.
///
/// The level comes from `RUST_LOG`, defaulting to "info". Without a log file,
/// compact text goes to stderr so stdout stays free for JSON output. With a
/// log file, JSON lines are written to it through a non-blocking writer; the
/// returned guard must be held until shutdown to flush it.
pub fn init(
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let Some(log_file) = log_file else {
        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()?;
        return Ok(None);
    };

    let directory = log_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = log_file
        .file_name()
        .ok_or("log file path has no file name")?;
    std::fs::create_dir_all(directory)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().json().with_writer(writer))
        .try_init()?;

    Ok(Some(guard))
}
