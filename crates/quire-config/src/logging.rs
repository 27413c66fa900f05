use quire_error::ext::NoContextResultExt;
use quire_error::Result;
use quire_utils::env;
use serde::Deserialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::{vars, ConfigParts};

#[derive(Debug, Clone)]
pub struct Logging {
    /// **Environment variable**: `QUIRE_LOG_STYLE`
    ///
    /// How every log line is formatted in the console:
    /// - `full` - default formatter from `tracing_subscriber`
    /// - `compact` - compacts logs but it is readable enough
    /// - `json` - serializes logs into JSON data
    ///
    /// The default value is `full`, if not set.
    pub style: LoggingStyle,

    /// **Environment variable**: `QUIRE_LOG_TARGETS`
    ///
    /// Directives used to filter logging events. It works the
    /// same way as `RUST_LOG` does.
    ///
    /// The default value is a blank string, if not set.
    pub targets: String,

    /// Where console logs are written into.
    pub stream: ConsoleStream,

    /// **Environment variable**: `QUIRE_LOG_FILE_DIRECTORY`
    ///
    /// Directory to write daily rotated log files into. File
    /// logging is disabled if not set.
    pub file_directory: Option<PathBuf>,
}

impl Logging {
    pub(crate) fn from_partial(partial: PartialLogging) -> Self {
        Self {
            style: partial.style.unwrap_or_default(),
            targets: partial.targets.unwrap_or_default(),
            stream: partial.stream.unwrap_or_default(),
            file_directory: partial.file_directory,
        }
    }

    /// Logging configuration used in tests. Logs are captured
    /// by the test harness.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            style: LoggingStyle::Full,
            targets: String::new(),
            stream: ConsoleStream::TestWriter,
            file_directory: None,
        }
    }
}

#[derive(Debug, Error)]
#[error("Could not load logging configuration")]
pub struct LoggingLoadError;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PartialLogging {
    pub style: Option<LoggingStyle>,
    pub targets: Option<String>,
    pub stream: Option<ConsoleStream>,
    pub file_directory: Option<PathBuf>,
}

impl PartialLogging {
    pub fn from_env() -> Result<Self, LoggingLoadError> {
        let style =
            env::var_opt_parsed::<LoggingStyle>(vars::LOG_STYLE).change_context(LoggingLoadError)?;

        let targets = env::var_opt(vars::LOG_TARGETS).change_context(LoggingLoadError)?;
        let file_directory = env::var_opt(vars::LOG_FILE_DIRECTORY)
            .change_context(LoggingLoadError)?
            .map(PathBuf::from);

        Ok(Self {
            style,
            targets,
            stream: None,
            file_directory,
        })
    }
}

impl ConfigParts for PartialLogging {
    fn merge(self, other: Self) -> Self {
        Self {
            style: self.style.merge(other.style),
            targets: self.targets.merge(other.targets),
            stream: self.stream.merge(other.stream),
            file_directory: self.file_directory.merge(other.file_directory),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    Compact,
    #[default]
    Full,
    Json,
}

#[derive(Debug, Error)]
#[error("unknown {0:?} logging style")]
pub struct InvalidLoggingStyle(String);

impl FromStr for LoggingStyle {
    type Err = InvalidLoggingStyle;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        match s.as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            "json" => Ok(Self::Json),
            _ => Err(InvalidLoggingStyle(s)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleStream {
    Stdout,
    #[default]
    Stderr,
    #[serde(skip)]
    TestWriter,
}

impl Display for ConsoleStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Stdout => f.write_str("stdout"),
            Self::TestWriter => f.write_str("test-writer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_logging_style() {
        assert_eq!("JSON".parse::<LoggingStyle>().unwrap(), LoggingStyle::Json);
        assert_eq!(
            "compact".parse::<LoggingStyle>().unwrap(),
            LoggingStyle::Compact
        );
        assert!("pretty".parse::<LoggingStyle>().is_err());
    }

    #[test]
    fn should_prefer_first_partial_when_merging() {
        let env = PartialLogging {
            style: Some(LoggingStyle::Json),
            ..Default::default()
        };
        let file = PartialLogging {
            style: Some(LoggingStyle::Compact),
            targets: Some("quire=trace".into()),
            ..Default::default()
        };

        let logging = Logging::from_partial(env.merge(file));
        assert_eq!(logging.style, LoggingStyle::Json);
        assert_eq!(logging.targets, "quire=trace");
        assert_eq!(logging.stream, ConsoleStream::Stderr);
    }
}
