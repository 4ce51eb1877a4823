//! Infrastructure layer module
//!
//! Everything that touches the process or the filesystem:
//! - Environment snapshots and key resolution
//! - Configuration of the tool itself
//! - Logging infrastructure

pub mod config;
pub mod env;
pub mod logging;
