use crate::prelude::*;
use cap_std::fs::Dir;

pub const LOG_FILE_NAME: &str = "tyria.log";

/// Everything goes to `tyria.log` in the data dir, warnings and errors are also printed to stderr.
/// stdout is left alone for the json output.
/// The returned guard flushes the log file when dropped, so keep it alive until exit.
pub fn install_tracing(tyria_dir: &Dir) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter_layer = EnvFilter::try_from_env("TYRIA_LOG")
        .or_else(|_| EnvFilter::try_new("info"))
        .into_diagnostic()
        .wrap_err("failed to create log filter")?;
    // creating the log file also checks that the directory is writeable by us
    let writer = std::io::BufWriter::new(
        tyria_dir
            .create(LOG_FILE_NAME)
            .into_diagnostic()
            .wrap_err("failed to create tyria.log file")?,
    );
    let (nb, guard) = tracing_appender::non_blocking(writer);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(nb);
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::WARN);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .into_diagnostic()
        .wrap_err("failed to install tracing subscriber")?;
    Ok(guard)
}
