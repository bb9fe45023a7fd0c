use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

pub const LOG_FILE_PREFIX: &str = "app.log";

/// Keeps the file writer flushing. Hold it for the life of the process.
#[must_use]
pub struct LogGuard {
    pub installed: bool,
    _file: Option<WorkerGuard>,
}

/// Installs the global tracing subscriber: console output (text or JSON)
/// plus, when `cfg.dir` is set, a daily-rotated plain-text file.
///
/// Only the first call takes effect; later calls (e.g. several tests in one
/// process) leave the existing subscriber in place and report
/// `installed == false`.
pub fn init(cfg: &LogConfig) -> anyhow::Result<LogGuard> {
    let (file_layer, file_guard) = match &cfg.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(EnvFilter::new(&cfg.filter))
        .with(cfg.json.then(|| fmt::layer().with_target(false).json()))
        .with((!cfg.json).then(fmt::layer))
        .with(file_layer)
        .try_init();

    let installed = match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(error = %e, "tracing subscriber already installed");
            false
        }
    };
    Ok(LogGuard {
        installed,
        _file: file_guard,
    })
}
