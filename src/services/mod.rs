//! Resolution services
//!
//! The resolution engine and its parts: literal coercion, the recursive
//! resolver, extension-map capture, direct construction, and display masking.

pub mod coercion;
pub mod construct;
pub mod extras;
pub mod masking;
pub mod resolver;

pub use construct::construct;
pub use masking::{is_sensitive, mask, to_printable, to_printable_flat, MASK};
pub use resolver::{resolve, resolve_with, ResolveOptions, DEFAULT_MAX_DEPTH, DEFAULT_SEPARATOR};
