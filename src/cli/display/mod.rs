//! Display primitives shared by CLI command output.

pub mod table;

pub use table::*;
