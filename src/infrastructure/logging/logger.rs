use super::config::{LogConfig, LogFormat, RotationPolicy};
use super::levels::to_directives;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const LOG_FILE_NAME: &str = "envtree.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logger implementation using tracing
pub struct LoggerImpl {
    _guard: Option<WorkerGuard>,
}

impl LoggerImpl {
    /// Initialize the logger with the given configuration
    ///
    /// `levels` maps dotted target names to levels and applies to both the
    /// console and the file output.
    ///
    /// # Errors
    /// Returns an error if a level is invalid or a global subscriber is
    /// already installed
    pub fn init(config: &LogConfig, levels: &BTreeMap<String, String>) -> Result<Self> {
        let directives = to_directives(levels);
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if config.enable_console {
            let filter = build_filter(&config.level, &directives)?;
            layers.push(console_layer(config.format, filter));
        }

        let guard = match config.log_dir {
            Some(ref log_dir) => match fs::create_dir_all(log_dir) {
                Ok(()) => {
                    let file_appender = match config.rotation {
                        RotationPolicy::Daily => rolling::daily(log_dir, LOG_FILE_NAME),
                        RotationPolicy::Hourly => rolling::hourly(log_dir, LOG_FILE_NAME),
                        RotationPolicy::Never => rolling::never(log_dir, LOG_FILE_NAME),
                    };
                    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

                    // File layer - always JSON for structured logging
                    let filter = build_filter(&config.file_level, &directives)?;
                    layers.push(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(non_blocking_file)
                            .with_ansi(false)
                            .with_current_span(true)
                            .with_span_list(true)
                            .with_target(true)
                            .with_thread_names(true)
                            .with_file(true)
                            .with_line_number(true)
                            .with_filter(filter)
                            .boxed(),
                    );
                    Some(guard)
                }
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to create log directory {}: {e}",
                        log_dir.display()
                    );
                    None
                }
            },
            None => None,
        };

        let file_output = guard.is_some();
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        tracing::info!(
            level = %config.level,
            format = ?config.format,
            file_output,
            target_levels = directives.len(),
            "logger initialized"
        );

        Ok(Self { _guard: guard })
    }
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer {
    let ansi = io::stderr().is_terminal();
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_ansi(ansi)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed(),
        LogFormat::Plain => tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(ansi)
            .with_target(true)
            .with_line_number(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// `RUST_LOG` wins over the configured default; target directives are
/// layered on top of both.
fn build_filter(level: &str, directives: &[String]) -> Result<EnvFilter> {
    let default_level = parse_log_level(level)?;
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy();

    for directive in directives {
        filter = filter.add_directive(
            directive
                .parse()
                .with_context(|| format!("Invalid log directive: {directive}"))?,
        );
    }
    Ok(filter)
}

/// Parse log level string to Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}
