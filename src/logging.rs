//! Structured JSONL logging to a file plus human-readable stderr output.
//!
//! - **JSONL to file** (~/.agent-portal/logs/agent-portal.jsonl), one JSON object per line
//! - **Compact to stderr** for whoever is running the CLI
//!
//! # Usage
//!
//! ```rust,ignore
//! use agent_portal::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(false);
//!
//! tracing::info!(event_type = "catalogue", count = 4, "Catalogue built");
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_NAME: &str = "agent-portal.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// `verbose` lowers the stderr threshold from `warn` to `debug`;
/// `RUST_LOG` overrides the global filter when set. If the log file cannot be opened only
/// the stderr layer is installed.
pub fn init(verbose: bool) -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_path();

    let default_filter = if verbose {
        "debug,ureq=warn"
    } else {
        "info,ureq=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stderr stays quiet unless asked; the file gets everything the filter lets through
    let stderr_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    match file {
        Ok(file) => {
            // Non-blocking writer so file I/O never stalls the CLI
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

            let json_layer = fmt::layer()
                .json()
                .with_writer(non_blocking_file)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_span_events(FmtSpan::NONE);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer)
                .with(stderr_layer(stderr_level))
                .init();

            tracing::debug!(
                event_type = "app_lifecycle",
                action = "started",
                log_path = %log_path.display(),
                "Logging initialized"
            );

            LoggingGuard {
                _file_guard: Some(file_guard),
            }
        }
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer(stderr_level))
                .init();
            LoggingGuard { _file_guard: None }
        }
    }
}

/// Compact stderr layer for humans
fn stderr_layer<S>(level: LevelFilter) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .compact()
        .with_filter(level)
}

/// Get the log directory path (~/.agent-portal/logs/)
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".agent-portal").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("agent-portal-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

// =============================================================================
// STRUCTURED LOGGING HELPERS
// =============================================================================

/// Log a catalogue build or search with structured fields
pub fn log_catalogue_event(action: &str, record_count: usize, skipped: usize) {
    tracing::info!(
        event_type = "catalogue_event",
        action = action,
        record_count = record_count,
        skipped = skipped,
        "Catalogue {}: {} records ({} skipped)", action, record_count, skipped
    );
}

/// Log a chat round-trip with structured fields
pub fn log_chat_event(page: &str, action: &str, duration_ms: Option<u64>, success: bool) {
    match duration_ms {
        Some(duration) => {
            tracing::info!(
                event_type = "chat_event",
                page = page,
                action = action,
                duration_ms = duration,
                success = success,
                "Chat {} for {}", action, page
            );
        }
        None => {
            tracing::info!(
                event_type = "chat_event",
                page = page,
                action = action,
                success = success,
                "Chat {} for {}", action, page
            );
        }
    }
}

/// Log an error with structured fields and context
pub fn log_error(category: &str, error: &str, context: Option<&str>) {
    let msg = match context {
        Some(ctx) => format!("{}: {} (context: {})", category, error, ctx),
        None => format!("{}: {}", category, error),
    };

    tracing::error!(
        event_type = "error",
        category = category,
        error_message = error,
        context = context,
        "{}", msg
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_is_jsonl_under_log_dir() {
        let path = log_path();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(LOG_FILE_NAME));
        assert_eq!(path.parent(), Some(get_log_dir().as_path()));
    }
}
