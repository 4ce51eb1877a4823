//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Plain, pretty or JSON console output
//! - Rotating JSON log files
//! - Per-target levels from `LOGGING_LEVELS_FILE` / `LOGGING_LEVELS`

pub mod config;
pub mod levels;
pub mod logger;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use levels::load_levels;
pub use logger::LoggerImpl;
