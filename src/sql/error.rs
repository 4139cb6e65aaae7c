//! Error taxonomy for statement construction and rendering.

use super::dialect::Dialect;

/// Errors raised while building or rendering SQL.
///
/// Every variant is a local, synchronous failure. Rendering is deterministic,
/// so retrying without changing the statement fails the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SqlError {
    /// The caller assembled something that can never render
    /// (unnamed alias, unaliased subquery source, truncate with a filter).
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Column '{column}' is not registered on table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// The target dialect lacks a feature the statement asked for.
    #[error("{operation} is not supported for {dialect}")]
    Unsupported { operation: String, dialect: Dialect },

    /// A case the engine has no handler for. Indicates a bug in quill itself.
    #[error("Internal invariant violated: {0}")]
    Internal(String),

    #[error("No default dialect configured; call set_default_dialect or pass a dialect explicitly")]
    NoDefaultDialect,

    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
}

impl SqlError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SqlError::Config(msg.into())
    }

    pub(crate) fn unsupported(operation: impl Into<String>, dialect: Dialect) -> Self {
        SqlError::Unsupported {
            operation: operation.into(),
            dialect,
        }
    }

    /// Whether this error comes from dialect capability gating.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SqlError::Unsupported { .. })
    }
}
