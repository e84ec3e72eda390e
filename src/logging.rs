use std::sync::Mutex;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, DEFAULT_LOG_FILTER};
use crate::{AppError, AppResult};

pub const LOG_FILE_NAME: &str = "keepsake.log";

static INIT: OnceCell<()> = OnceCell::new();
static FILE_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Installs the global subscriber: JSON lines to stderr and, when `log_dir`
/// is configured, to `keepsake.log`. Later calls are no-ops.
pub fn init_logging(config: &AppConfig) -> AppResult<()> {
    INIT.get_or_try_init(|| install(config)).map(|_| ())
}

fn install(config: &AppConfig) -> AppResult<()> {
    let filter = resolve_filter(&config.log_filter);

    let file_layer = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            *FILE_GUARD.lock().unwrap_or_else(|e| e.into_inner()) = Some(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(writer),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| {
            flush_file_logs();
            AppError::new("LOGGING/INIT", "Failed to install the log subscriber")
                .with_context("error", err.to_string())
        })
}

/// Parses `spec`, warning on stderr and using the default filter when it is invalid.
fn resolve_filter(spec: &str) -> EnvFilter {
    EnvFilter::try_new(spec).unwrap_or_else(|err| {
        eprintln!("warning: invalid log filter '{spec}' ({err}); using '{DEFAULT_LOG_FILTER}'");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// Flushes and detaches the file sink. Lines logged afterwards only reach stderr.
pub fn flush_file_logs() {
    let guard = FILE_GUARD.lock().unwrap_or_else(|e| e.into_inner()).take();
    drop(guard);
}
