//! Domain layer
//!
//! Schemas, resolved configuration values, and the error taxonomy. Nothing in
//! this layer touches the process environment.

pub mod errors;
pub mod models;

pub use errors::ResolveError;
