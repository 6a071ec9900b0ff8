//! Logging setup for the command-line tools.
//!
//! Installs a global tracing subscriber that writes progress lines to stdout
//! and, unless disabled, to a per-run log file. Log files are timestamped and
//! kept to a bounded count.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs;

/// Maximum number of log files to retain.
const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "c45";

static LOG_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// No platform config directory could be resolved for the logs folder.
    #[error("No suitable data directory available for logs")]
    NoDataDir,
    /// Failed to create or access the log directory.
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to enumerate existing log files for pruning.
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to remove a log file beyond the retention count.
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to format the timestamp in the log file name.
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    /// Another global tracing subscriber is already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
    /// Failed to create the log file for this run.
    #[error("Failed to create log file at {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where log lines go.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Also write to a timestamped file in the application logs directory.
    pub log_file: bool,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            log_file: true,
            default_filter: "info".to_string(),
        }
    }
}

/// Initialize tracing for the process.
///
/// Subsequent calls are no-ops. Failures are returned so callers can carry on
/// without logging.
pub fn init(options: &LogOptions) -> Result<(), LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let (file_writer, guard, log_path) = if options.log_file {
        let log_dir = log_directory()?;
        let log_file_name = format_log_file_name(now_local_or_utc())?;
        let log_path = log_dir.join(&log_file_name);
        ensure_file_exists(&log_path)?;
        let file_appender = rolling::never(&log_dir, log_file_name);
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        prune_old_logs(&log_dir, MAX_LOG_FILES)?;
        (Some(writer), Some(guard), Some(log_path))
    } else {
        (None, None, None)
    };

    let timer = build_timer();
    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_timer(timer.clone())
        .with_writer(std::io::stdout);
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_timer(timer)
            .with_writer(writer)
    });

    let subscriber = Registry::default()
        .with(build_env_filter(&options.default_filter))
        .with(stdout_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = LOG_GUARD.set(guard);

    if let Some(path) = log_path {
        tracing::debug!("Logging to {}", path.display());
    }
    Ok(())
}

fn log_directory() -> Result<PathBuf, LoggingError> {
    app_dirs::logs_dir().map_err(map_app_dir_error)
}

fn ensure_file_exists(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LoggingError::CreateLogFile {
            path: path.to_path_buf(),
            source,
        })
}

fn prune_old_logs(dir: &Path, max_files: usize) -> Result<(), LoggingError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|source| LoggingError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("log"))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect::<Vec<_>>();

    entries.sort_by_key(|(modified, _)| *modified);
    let excess = entries.len().saturating_sub(max_files);
    for (_, path) in entries.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::RemoveFile { path, source })?;
    }
    Ok(())
}

fn format_log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[FormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    let name = now.format(NAME_FORMAT).map_err(LoggingError::FormatTime)?;
    Ok(format!("{LOG_FILE_PREFIX}_{name}.log"))
}

fn build_timer() -> fmt::time::OffsetTime<time::format_description::BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[FormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn build_env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> LoggingError {
    match error {
        app_dirs::AppDirError::NoBaseDir => LoggingError::NoDataDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            LoggingError::CreateDir { path, source }
        }
    }
}
