//! Environment access
//!
//! The only place the process environment is read. Everything downstream
//! works on an [`EnvSnapshot`].

pub mod keys;
pub mod snapshot;

pub use keys::{EnvVarName, KeyResolver};
pub use snapshot::{canonical_key, EnvSnapshot};
