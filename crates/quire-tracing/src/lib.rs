use quire_config::logging::{ConsoleStream, LoggingStyle};
use quire_config::vars;
use quire_error::ext::ResultExt;
use quire_error::Result;
use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn};
use tracing_appender::non_blocking::WorkerGuard as FileLayerGuard;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

pub mod logging;

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

/// Keeps the file writer alive. Logs written after this guard
/// is dropped may be lost.
#[allow(unused)]
pub struct TracingInitGuard {
    file_guard: Option<FileLayerGuard>,
}

pub fn init(config: &quire_config::Logging) -> Result<TracingInitGuard, TracingInitError> {
    let console = self::logging::console_layer(config);
    let (file, file_guard) = self::logging::file_layer(config)?;

    let registry = tracing_subscriber::Registry::default()
        .with(console)
        .with(file);

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if std::env::var("RUST_LOG").is_ok() && std::env::var(vars::LOG_TARGETS).is_ok() {
        warn!(
            "Both `RUST_LOG` and `{}` are set, please pick one of them to determine the logging targets",
            vars::LOG_TARGETS
        );
    }

    Ok(TracingInitGuard { file_guard })
}

/// Sets up logging captured by the test harness. Calling it
/// more than once does nothing.
pub fn init_for_tests() {
    let maker = self::logging::ConsoleWriterMaker::new(ConsoleStream::TestWriter);
    let targets = quire_utils::env::var("RUST_LOG").unwrap_or_default();
    let console = self::logging::common_layer(maker, false, LoggingStyle::Full, &targets);

    let registry = tracing_subscriber::Registry::default().with(console);
    if tracing::subscriber::set_global_default(registry).is_err() {
        tracing::trace!("tracing is already initialized");
    }
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if quire_utils::RELEASE {
        LevelFilter::INFO
    } else {
        LevelFilter::DEBUG
    };

    // `RUST_LOG` is used if no targets are configured
    let targets = if targets.trim().is_empty() {
        std::env::var("RUST_LOG").unwrap_or_default()
    } else {
        targets.to_string()
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
