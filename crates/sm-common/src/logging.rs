use std::any::Any;
use std::panic::{self, PanicHookInfo};
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const LOG_DIR_ENV: &str = "SM_LOG_DIR";
pub const BACKTRACE_ENV: &str = "SM_LOG_INCLUDE_BACKTRACE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic payload not string".into())
}

fn log_panic(app_name: &'static str, info: &PanicHookInfo<'_>) {
    let thread = std::thread::current();
    let location = info
        .location()
        .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));

    tracing::error!(
        application = app_name,
        thread_name = thread.name().unwrap_or("unknown"),
        location = location.as_deref().unwrap_or("unknown"),
        panic_message = %payload_message(info.payload()),
        "panic captured"
    );
}

/// Route panics through `tracing`. The default hook (with its backtrace) still
/// runs when `SM_LOG_INCLUDE_BACKTRACE` is truthy. Installed once per process.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();
        let include_backtrace = std::env::var(BACKTRACE_ENV)
            .map(|value| is_truthy(&value))
            .unwrap_or(false);

        panic::set_hook(Box::new(move |info| {
            log_panic(app_name, info);
            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn rotating_file_writer(app_name: &'static str) -> Option<BoxMakeWriter> {
    let dir = PathBuf::from(std::env::var_os(LOG_DIR_ENV)?);
    if let Err(err) = std::fs::create_dir_all(&dir) {
        eprintln!("{LOG_DIR_ENV}={} is not usable ({err}); logging to stdout", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

/// Install the global subscriber. Filtering comes from `RUST_LOG` (default
/// `info`); output goes to `<SM_LOG_DIR>/<app>.log` with daily rotation when
/// that variable is set, stdout otherwise. Later calls are no-ops.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    let installed = match rotating_file_writer(app_name) {
        Some(writer) => builder.with_ansi(false).with_writer(writer).try_init(),
        None => builder.try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(application = app_name, "tracing initialized");
    }
}
