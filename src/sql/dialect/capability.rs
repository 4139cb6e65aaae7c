//! Runtime capability tables.
//!
//! Each dialect declares, once, which optional features it supports. Builders
//! ask the renderer before emitting a gated clause, so a single build serves
//! every engine and an unsupported request fails at render time instead of
//! silently dropping the clause.

use std::collections::HashMap;
use std::fmt;

use crate::sql::error::SqlError;

/// Optional SQL features that differ between engines and versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// `OFFSET n ROWS FETCH NEXT m ROWS ONLY`, or `LIMIT start,count`.
    OffsetPaging,
    /// `OUTPUT INSERTED.x` / `OUTPUT DELETED.x`, with optional `INTO`.
    OutputClause,
    /// `expr OVER (PARTITION BY ... ORDER BY ...)`.
    WindowFunctions,
    FullOuterJoin,
    /// Table hints such as `WITH (NOLOCK)`.
    TableHints,
    /// `CLUSTERED` / `NONCLUSTERED` index options.
    ClusteredIndex,
    /// `USING BTREE` / `USING HASH` index options.
    IndexMethod,
    /// Dropping a CHECK constraint by name.
    DropCheckConstraint,
}

impl Feature {
    /// Every feature a complete capability table must answer for.
    pub const ALL: [Feature; 8] = [
        Feature::OffsetPaging,
        Feature::OutputClause,
        Feature::WindowFunctions,
        Feature::FullOuterJoin,
        Feature::TableHints,
        Feature::ClusteredIndex,
        Feature::IndexMethod,
        Feature::DropCheckConstraint,
    ];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::OffsetPaging => "OFFSET paging",
            Feature::OutputClause => "OUTPUT clause",
            Feature::WindowFunctions => "window functions (OVER)",
            Feature::FullOuterJoin => "FULL OUTER JOIN",
            Feature::TableHints => "table hints",
            Feature::ClusteredIndex => "CLUSTERED index option",
            Feature::IndexMethod => "USING BTREE/HASH index option",
            Feature::DropCheckConstraint => "DROP CHECK",
        };
        f.write_str(name)
    }
}

/// Feature availability table for one dialect.
#[derive(Debug, Clone)]
pub struct Capabilities {
    dialect: &'static str,
    table: HashMap<Feature, bool>,
}

impl Capabilities {
    pub fn new(dialect: &'static str) -> Self {
        Self {
            dialect,
            table: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, feature: Feature, supported: bool) -> Self {
        self.table.insert(feature, supported);
        self
    }

    /// Look up a feature.
    ///
    /// A feature missing from the table means the dialect was registered
    /// without answering for it, which is an engine bug rather than a
    /// caller mistake.
    pub fn supports(&self, feature: Feature) -> Result<bool, SqlError> {
        self.table.get(&feature).copied().ok_or_else(|| {
            SqlError::Internal(format!(
                "capability table for {} has no entry for {:?}",
                self.dialect, feature
            ))
        })
    }

    /// Features this table does not answer for.
    pub fn missing(&self) -> Vec<Feature> {
        Feature::ALL
            .into_iter()
            .filter(|f| !self.table.contains_key(f))
            .collect()
    }
}
