//! Errors raised while building schemas and resolving configuration.

use thiserror::Error;

/// Failure of a single resolution call.
///
/// Resolution is atomic: a call either yields a fully populated
/// [`ResolvedConfig`](crate::domain::models::ResolvedConfig) or exactly one of
/// these errors. Every variant carries the full dotted path of the offending
/// field so misconfiguration is diagnosable at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A field declaration cannot be mapped onto a supported type, or the
    /// schema itself is malformed.
    #[error("Schema error at `{path}`: {reason}")]
    Schema { path: String, reason: String },

    /// A required field received no value from the environment, the call-site
    /// defaults, or its own declaration.
    #[error("Missing required field `{path}`")]
    MissingField { path: String },

    /// A raw literal does not parse under the field's declared type.
    #[error("Cannot coerce `{path}` value {raw:?} to {expected}")]
    Coercion {
        path: String,
        raw: String,
        expected: &'static str,
    },

    /// A required nested field would need resolution beyond `max_depth`.
    #[error("Field `{path}` needs nesting beyond max depth {max_depth} and has no default")]
    DepthExceeded { path: String, max_depth: usize },
}

impl ResolveError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn coercion(
        path: impl Into<String>,
        raw: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::Coercion {
            path: path.into(),
            raw: raw.into(),
            expected,
        }
    }

    /// Dotted path of the field the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::Schema { path, .. }
            | Self::MissingField { path }
            | Self::Coercion { path, .. }
            | Self::DepthExceeded { path, .. } => path,
        }
    }
}
