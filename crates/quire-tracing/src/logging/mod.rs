mod writer;

pub(crate) use self::writer::ConsoleWriterMaker;

use crate::{make_env_filter, TracingInitError};

use quire_config::logging::LoggingStyle;
use quire_error::ext::ResultExt;
use quire_error::Result;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard as FileLayerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

pub fn file_layer<S>(
    config: &quire_config::Logging,
) -> Result<(Option<impl Layer<S>>, Option<FileLayerGuard>), TracingInitError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let Some(directory) = config.file_directory.as_ref() else {
        return Ok((None, None));
    };

    let appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .filename_prefix("quire")
        .filename_suffix("log")
        .build(directory)
        .change_context(TracingInitError)
        .attach_printable("could not initialize file logging")
        .attach_printable_lazy(|| {
            format!(
                "suggestion: make sure {} exists and it is a directory",
                directory.display()
            )
        })?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = common_layer(writer, false, config.style, &config.targets);

    Ok((Some(layer), Some(guard)))
}

pub fn console_layer<S>(config: &quire_config::Logging) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let maker = ConsoleWriterMaker::new(config.stream);
    let ansi = maker.supports_color();
    common_layer(maker, ansi, config.style, &config.targets)
}

pub(crate) fn common_layer<S>(
    maker: impl for<'w> MakeWriter<'w> + Sync + Send + 'static,
    ansi: bool,
    style: LoggingStyle,
    targets: &str,
) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(ansi)
        .with_writer(maker);

    match style {
        LoggingStyle::Compact => layer
            .compact()
            .with_filter(make_env_filter(targets))
            .boxed(),
        LoggingStyle::Full => layer.with_filter(make_env_filter(targets)).boxed(),
        LoggingStyle::Json => layer
            .json()
            .flatten_event(true)
            .with_filter(make_env_filter(targets))
            .boxed(),
    }
}
