//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start the rolling file logger at most once per process.
//! - Capture panics as sanitized, metadata-only log records.
//!
//! # Invariants
//! - Initialization never panics.
//! - Repeating the active configuration is a no-op; a different level or
//!   directory is rejected.
//! - Log records carry ids and amounts, never user-entered text.

use crate::config::LoggingConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "lazyquest";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogTarget {
    level: &'static str,
    dir: PathBuf,
}

impl LogTarget {
    fn parse(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: normalize_level(level)?,
            dir: normalize_log_dir(log_dir)?,
        })
    }

    /// Describes why `requested` cannot replace `self`, if it cannot.
    fn conflict(&self, requested: &Self) -> Option<String> {
        if self.dir != requested.dir {
            return Some(format!(
                "logging already writes to `{}`; refusing to switch to `{}`",
                self.dir.display(),
                requested.dir.display()
            ));
        }
        if self.level != requested.level {
            return Some(format!(
                "logging already runs at `{}`; refusing to switch to `{}`",
                self.level, requested.level
            ));
        }
        None
    }
}

struct ActiveLogger {
    target: LogTarget,
    _handle: LoggerHandle,
}

/// Starts file logging under the absolute directory `log_dir`.
///
/// # Errors
/// - `level` is not one of trace|debug|info|warn|error.
/// - `log_dir` is blank, relative, or cannot be created.
/// - Logging is already active with a different level or directory.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogTarget::parse(level, log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(&requested))?;
    match active.target.conflict(&requested) {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}

/// Starts logging from engine configuration.
///
/// Returns `Ok(false)` when no log directory is configured.
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<bool, String> {
    match config.log_dir.as_deref() {
        Some(dir) => init_logging(&config.level, dir).map(|()| true),
        None => Ok(false),
    }
}

/// Active `(level, directory)`, or `None` before initialization.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.target.level, active.target.dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(target: &LogTarget) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&target.dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            target.dir.display()
        )
    })?;

    let handle = Logger::try_with_str(target.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", target.level))?
        .log_to_file(
            FileSpec::default()
                .directory(target.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=engine_start module=logging status=ok platform={} build={} version={}",
        std::env::consts::OS,
        if cfg!(debug_assertions) { "debug" } else { "release" },
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=logging status=ok level={} dir={}",
        target.level,
        target.dir.display()
    );

    Ok(ActiveLogger {
        target: target.clone(),
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log directory cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log directory must be absolute, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(message) = info.payload().downcast_ref::<&str>() {
            sanitize(message, MAX_PANIC_PAYLOAD_CHARS)
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            sanitize(message, MAX_PANIC_PAYLOAD_CHARS)
        } else {
            "non-string panic payload".to_string()
        };
        error!("event=panic module=logging status=error location={location} payload={payload}");
        previous(info);
    }));
}

/// Single-line, length-capped copy of `value`.
fn sanitize(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut capped: String = flattened.chars().take(max_chars).collect();
    if flattened.chars().count() > max_chars {
        capped.push_str("...");
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, init_logging_from_config, logging_status, normalize_level,
        normalize_log_dir, sanitize, LogTarget,
    };
    use crate::config::LoggingConfig;

    #[test]
    fn levels_normalize_case_and_aliases() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert_eq!(normalize_level("Info").unwrap(), "info");
        assert!(normalize_level("verbose").is_err());
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = normalize_log_dir("logs/dev").unwrap_err();
        assert!(err.contains("absolute"));
    }

    #[test]
    fn sanitize_flattens_and_caps() {
        let value = sanitize("line1\nline2\rline3", 8);
        assert_eq!(value, "line1 li...");
    }

    #[test]
    fn conflict_reports_directory_before_level() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let active = LogTarget::parse("info", dir.path().to_str().unwrap()).unwrap();

        assert!(active.conflict(&active.clone()).is_none());
        let moved = LogTarget::parse("debug", other.path().to_str().unwrap()).unwrap();
        assert!(active.conflict(&moved).unwrap().contains("writes to"));
    }

    #[test]
    fn missing_dir_in_config_skips_file_logging() {
        let config = LoggingConfig {
            level: "info".to_string(),
            log_dir: None,
        };
        assert_eq!(init_logging_from_config(&config), Ok(false));
    }

    #[test]
    fn init_is_idempotent_and_rejects_reconfiguration() {
        // The logger outlives the test, so the directory is not cleaned up.
        let dir = std::env::temp_dir().join(format!("lazyquest-logs-{}", std::process::id()));
        let dir_str = dir.to_str().unwrap();
        let other = tempfile::tempdir().unwrap();

        init_logging("info", dir_str).unwrap();
        init_logging("info", dir_str).unwrap();
        assert!(init_logging("debug", dir_str)
            .unwrap_err()
            .contains("refusing to switch"));
        assert!(init_logging("info", other.path().to_str().unwrap())
            .unwrap_err()
            .contains("refusing to switch"));

        let (level, active_dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir);
    }
}
