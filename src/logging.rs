//! Logging initialization
//!
//! Logs go to stderr so they never mix with command output on stdout, or to
//! the file named by `log.file`. `RUST_LOG` overrides the configured level.

use std::path::Path;

use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogConfig, LogFormat};

/// Initialize the global tracing subscriber.
///
/// Must be called once, before any tracing macros are used. When logging to
/// a file, the returned guard has to be kept alive until exit so buffered
/// lines get flushed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, guard) = match &config.file {
        Some(path) => {
            let (dir, file_name) = split_log_path(path)?;
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow!("failed to create log directory {:?}: {}", dir, e))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = config.file.is_none();

    match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
                .try_init()
                .map_err(|e| anyhow!("failed to initialize JSON tracing subscriber: {}", e))?;
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(ansi)
                        .with_writer(writer),
                )
                .try_init()
                .map_err(|e| anyhow!("failed to initialize tracing subscriber: {}", e))?;
        }
    }

    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(&Path, &Path)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file {:?} has no file name", path))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, Path::new(file_name)))
}
