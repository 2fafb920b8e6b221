//! # Logger
//!
//! Process-wide logging for the registrar binaries.
//!
//! Console output goes to **stderr** so command results on stdout stay machine
//! readable. An optional rolling file appender writes through a non-blocking worker.
//! Filtering combines a default level, optional directives
//! (`registrar_enrollment=debug`), and `RUST_LOG`.
//!
//! ## Example
//!
//! ```rust
//! # use registrar_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("registrar")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use registrar_domain::config::LoggingConfig;
use std::fs;
use std::io::IsTerminal;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
struct LoggerSettings {
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    settings: LoggerSettings,
    name: N,
    file_state: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the name of the logger, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder { name: WithName(name.into()), settings: self.settings, file_state: PhantomData }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Configures maximum number of log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Adds explicit filter directives (e.g., `registrar_storage=debug`).
    ///
    /// Invalid directives cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.settings.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Emits JSON lines instead of the compact text format, on every output.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.settings.json = enabled;
        self
    }

    /// Sets the directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut settings = self.settings;
        settings.path = Some(path.into());
        LoggerBuilder { settings, name: self.name, file_state: PhantomData }
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// The returned [`Logger`] owns the file worker guard and must be kept alive
    /// until shutdown, or buffered lines are lost.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let LoggerBuilder { settings, name: WithName(name), .. } = self;
        validate_settings(&settings, &name)?;

        let env_filter = build_env_filter(&settings)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if settings.console {
            layers.push(console_layer(settings.json));
        }

        let guard = match &settings.path {
            Some(path) => {
                let (file_layer, guard) = file_layer(&settings, path, &name)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(env_filter).try_init()?;

        Ok(Logger { guard })
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background worker guard. Drop it only when the process is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    ///
    /// The `name` is used as the prefix for rolling log files
    /// (e.g., `registrar.2024-09-02.log`).
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: LoggerSettings::default(), name: NoName, file_state: PhantomData }
    }

    /// Initializes logging from the `[logging]` configuration section.
    ///
    /// Console output is always on; `directory` adds the rolling file appender.
    ///
    /// # Errors
    /// Same as [`LoggerBuilder::init`], plus [`LoggerError::InvalidConfiguration`] for an
    /// unknown `level`.
    pub fn from_config(name: impl Into<String>, config: &LoggingConfig) -> Result<Self, LoggerError> {
        let builder = Self::builder()
            .name(name)
            .console(true)
            .level(parse_level(&config.level)?)
            .json(config.json);
        let builder = match &config.filter {
            Some(filter) => builder.env_filter(filter.clone()),
            None => builder,
        };

        match &config.directory {
            Some(directory) => builder.path(directory).init(),
            None => builder.init(),
        }
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Logging system shutting down, flushing buffers");
        }
    }
}

/// Parses a level name (`off`, `error`, `warn`, `info`, `debug`, `trace`), case-insensitive.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for anything else.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse().map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}'").into(),
        context: Some("logging.level".into()),
    })
}

fn console_layer(json: bool) -> BoxedLayer {
    let base = layer().with_writer(std::io::stderr).with_ansi(std::io::stderr().is_terminal());
    if json { base.json().boxed() } else { base.compact().boxed() }
}

fn file_layer(
    settings: &LoggerSettings,
    path: &Path,
    name: &str,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(path).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create path: {}", path.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(settings.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let base = layer().with_writer(non_blocking).with_ansi(false);
    let boxed = if settings.json { base.json().boxed() } else { base.boxed() };

    Ok((boxed, guard))
}

fn validate_settings(settings: &LoggerSettings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(settings: &LoggerSettings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    settings.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;

    #[test]
    fn builder_defaults() {
        let builder = Logger::builder().name("registrar").env_filter("registrar_storage=debug");
        assert!(builder.settings.console);
        assert!(!builder.settings.json);
        assert_eq!(builder.settings.level, LevelFilter::INFO);
        assert_eq!(builder.settings.env_filter.as_deref(), Some("registrar_storage=debug"));
        assert!(builder.settings.path.is_none());
    }

    #[test]
    fn file_settings_carry_through() {
        let builder = Logger::builder()
            .name("registrar")
            .json(true)
            .path("logs")
            .max_files(3)
            .rotation(Rotation::HOURLY)
            .level(LevelFilter::DEBUG);

        assert!(builder.settings.json);
        assert_eq!(builder.settings.max_files, 3);
        assert_eq!(builder.settings.level, LevelFilter::DEBUG);
        assert_eq!(builder.settings.path.as_deref(), Some(std::path::Path::new("logs")));
    }

    #[test]
    fn level_names_parse() {
        assert_eq!(parse_level("warn").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level(" DEBUG ").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert_eq!(parse_level("loud").unwrap_err().kind(), "InvalidConfiguration");
    }

    #[test]
    #[serial]
    fn rejects_bad_settings_before_touching_global_state() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert_eq!(err.kind(), "InvalidConfiguration");

        let err = Logger::builder().name("registrar").console(false).init().unwrap_err();
        assert_eq!(err.kind(), "InvalidConfiguration");

        let err = Logger::builder().name("registrar").env_filter("registrar=loud").init().unwrap_err();
        assert_eq!(err.kind(), "InvalidConfiguration");
    }

    #[test]
    #[serial]
    fn file_output_creates_directory_and_log() -> Result<(), LoggerError> {
        let tmp_dir = tempfile::tempdir().map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some("Failed to create temp dir".into()),
        })?;
        let log_dir = tmp_dir.path().join("nested").join("logs");

        let logger = Logger::builder().name("registrar-unit").console(false).path(&log_dir).init()?;
        tracing::info!(student_id = "S001", "file sink ready");
        std::thread::sleep(Duration::from_millis(20));
        drop(logger);

        let has_log = fs::read_dir(&log_dir)
            .map_err(|e| LoggerError::Internal { message: e.to_string().into(), context: None })?
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some(LOG_FILE_SUFFIX));
        assert!(has_log, "at least one log file should be created");
        Ok(())
    }
}
