//! Logging setup for the sticky lines feature, with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level (or higher if the user asks for more).
//! Stdout logging is enabled when `STICKY_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`STICKY_LOG`** (highest priority) - feature-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for the sticky crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/sticky_lines/logs/sticky-<pid>.log`
//! - macOS: `~/Library/Application Support/sticky_lines/logs/sticky-12345.log`
//! - Linux: `~/.local/share/sticky_lines/logs/sticky-12345.log`
//!
//! Override with `STICKY_LOG_FILE`.

use std::{env, path::PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Initialize logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the feature --
/// dropping it flushes and stops the background file writer.
pub fn init() -> Result<LogGuard, Box<dyn std::error::Error + Send + Sync>> {
    let (log_dir, filename) = resolve_log_path();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter()?);

    let stdout_enabled =
        env::var("STICKY_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = if stdout_enabled {
        Some(fmt::layer().with_filter(create_filter()?))
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stdout-only (no file output). Will not crash if called multiple times or if
/// logging is already initialized by another test.
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter()?;
    fmt().with_env_filter(filter).try_init()?;
    Ok(())
}

fn resolve_log_path() -> (PathBuf, String) {
    let filename = format!("sticky-{}.log", std::process::id());

    if let Ok(path) = env::var("STICKY_LOG_FILE") {
        let path = PathBuf::from(path);
        if path.extension().is_some() {
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sticky_lines")
        .join("logs");

    (dir, filename)
}

/// File filter: uses user-specified level if set, otherwise defaults to `warn`.
fn create_file_filter() -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    if env::var("STICKY_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    Ok(EnvFilter::new("warn"))
}

/// Create the appropriate [`EnvFilter`] based on environment variables.
///
/// Implements the priority system: `STICKY_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
    if let Ok(sticky_log) = env::var("STICKY_LOG") {
        return Ok(expand_sticky_log(&sticky_log));
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::new(rust_log));
    }

    // Default: warn globally, info for the sticky crates
    Ok(EnvFilter::new("warn,sticky=info,sticky_log=info"))
}

/// Expand `STICKY_LOG` values into full tracing filter strings.
///
/// `STICKY_LOG=debug` becomes `warn,sticky=debug,...`, while module-specific
/// syntax like `STICKY_LOG=sticky=trace` is used as-is.
fn expand_sticky_log(sticky_log: &str) -> EnvFilter {
    if sticky_log.contains('=') || sticky_log.contains(':') || sticky_log.contains(',') {
        return EnvFilter::new(sticky_log);
    }

    EnvFilter::new(format!("warn,sticky={sticky_log},sticky_log={sticky_log}"))
}
