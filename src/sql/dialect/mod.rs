//! SQL Dialect definitions and formatting rules.
//!
//! A dialect is one registered (engine, version) pair. Each dialect
//! implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `` ` `` (MySQL), `[]` (SQL Server)
//! - Paging: `TOP` vs `OFFSET ... FETCH NEXT` vs `LIMIT start,count`
//! - Identity columns: `IDENTITY(seed,increment)` vs `AUTO_INCREMENT`
//! - Join placement in UPDATE, column-change keyword, DROP CONSTRAINT form
//!
//! Optional features are answered by a runtime [`Capabilities`] table rather
//! than by separate builds per engine.
//!
//! # Usage
//!
//! ```ignore
//! use quill::sql::dialect::{Dialect, Engine, SqlDialect};
//!
//! let dialect = Dialect::lookup(Engine::MySql, "8.0")?;
//! let quoted = dialect.quote_identifier("user");  // `user`
//! ```
//!
//! # Feature Matrix
//!
//! | Feature | SQL Server 2008 | SQL Server 2012 | MySQL 5.7 | MySQL 8.0 |
//! |---------|-----------------|-----------------|-----------|-----------|
//! | Paging | TOP only | OFFSET/FETCH | LIMIT | LIMIT |
//! | OUTPUT | ✓ | ✓ | ❌ | ❌ |
//! | Window Functions | ✓ | ✓ | ❌ | ✓ |
//! | FULL OUTER JOIN | ✓ | ✓ | ❌ | ❌ |
//! | Table hints | ✓ | ✓ | ❌ | ❌ |
//! | CLUSTERED index | ✓ | ✓ | ❌ | ❌ |
//! | USING BTREE/HASH | ❌ | ❌ | ✓ | ✓ |
//! | DROP CHECK | ✓ | ✓ | ❌ | ✓ |

mod capability;
pub mod helpers;
mod mysql;
mod tsql;

pub use capability::{Capabilities, Feature};
pub use mysql::{MySql, MySqlVersion};
pub use tsql::{SqlServerVersion, TSql};

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::error::SqlError;
use super::token::{Token, TokenStream};
use super::types::DataType;

/// How a dialect expresses row limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStyle {
    /// `SELECT TOP (n)`; no offset support.
    Top,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`, requires ORDER BY.
    OffsetFetch,
    /// `LIMIT [start,] count`.
    Limit,
}

/// Where joins go in an UPDATE statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateJoinStyle {
    /// `UPDATE t JOIN o ON ... SET ...`
    Inline,
    /// `UPDATE t SET ... FROM t JOIN o ON ...`
    FromClause,
}

/// How ALTER TABLE drops a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropConstraintStyle {
    /// `DROP CONSTRAINT name` regardless of kind.
    Named,
    /// Kind-specific syntax (`DROP PRIMARY KEY`, `DROP FOREIGN KEY name`, ...).
    Typed,
}

/// How an index is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIndexStyle {
    /// `DROP INDEX ix ON t`
    OnTable,
    /// `ALTER TABLE t DROP INDEX ix`
    AlterTable,
}

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    fn engine(&self) -> Engine;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - MySQL: `` `identifier` ``
    /// - SQL Server: `[identifier]`
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal. Only used by debug rendering.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal. Only used by debug rendering.
    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    /// Format a binary literal. Only used by debug rendering.
    fn format_bytes(&self, bytes: &[u8]) -> String {
        helpers::format_bytes_hex(bytes)
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    /// Optional-feature table for this dialect.
    fn capabilities(&self) -> &'static Capabilities;

    // =========================================================================
    // Statement Shape
    // =========================================================================

    fn paging_style(&self) -> PagingStyle;

    /// Whether OFFSET paging needs an ORDER BY clause to be valid.
    fn requires_order_by_for_offset(&self) -> bool {
        false
    }

    fn update_join_style(&self) -> UpdateJoinStyle;

    /// Keyword pair used by ALTER TABLE to change a column definition.
    ///
    /// - SQL Server: `ALTER COLUMN`
    /// - MySQL: `MODIFY COLUMN`
    fn change_column_keyword(&self) -> Token;

    fn drop_constraint_style(&self) -> DropConstraintStyle;

    fn drop_index_style(&self) -> DropIndexStyle;

    /// Separator between statements rendered together.
    fn statement_separator(&self) -> &'static str {
        ";\n"
    }

    // =========================================================================
    // Function Remapping
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to
    /// keep the original. The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    // =========================================================================
    // DDL Support
    // =========================================================================

    /// Emit a column type for this dialect.
    fn emit_data_type(&self, dt: &DataType) -> String;

    /// Emit identity/auto-increment syntax.
    ///
    /// - SQL Server: IDENTITY(seed,increment)
    /// - MySQL: AUTO_INCREMENT
    fn emit_identity(&self, seed: i64, increment: i64) -> TokenStream;
}

/// Database engines with at least one registered dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    SqlServer,
    MySql,
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Engine::SqlServer => f.write_str("mssql"),
            Engine::MySql => f.write_str("mysql"),
        }
    }
}

impl FromStr for Engine {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mssql" | "sqlserver" | "tsql" => Ok(Engine::SqlServer),
            "mysql" => Ok(Engine::MySql),
            other => Err(SqlError::UnknownDialect(other.to_string())),
        }
    }
}

/// Registered dialects, one per supported (engine, version) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    SqlServer2008,
    SqlServer2012,
    MySql57,
    MySql80,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::SqlServer2008,
        Dialect::SqlServer2012,
        Dialect::MySql57,
        Dialect::MySql80,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::SqlServer2008 => &TSql::V2008,
            Dialect::SqlServer2012 => &TSql::V2012,
            Dialect::MySql57 => &MySql::V57,
            Dialect::MySql80 => &MySql::V80,
        }
    }

    /// Resolve a registered (engine, version) pair.
    ///
    /// SQL Server versions are release years (`"2008"`, `"2012"`); MySQL
    /// versions are `major.minor` (`"5.7"`, `"8.0"`, or `"8"`).
    pub fn lookup(engine: Engine, version: &str) -> Result<Dialect, SqlError> {
        let version = version.trim();
        let found = match engine {
            Engine::SqlServer => match version {
                "2008" => Some(Dialect::SqlServer2008),
                "2012" => Some(Dialect::SqlServer2012),
                _ => None,
            },
            Engine::MySql => match version {
                "5.7" => Some(Dialect::MySql57),
                "8" | "8.0" => Some(Dialect::MySql80),
                _ => None,
            },
        };

        found.ok_or_else(|| {
            tracing::debug!(%engine, version, "no dialect registered for engine version");
            SqlError::UnknownDialect(format!("{}-{}", engine, version))
        })
    }

    /// Shortcut for `self.capabilities().supports(feature)`.
    pub fn supports(&self, feature: Feature) -> Result<bool, SqlError> {
        self.capabilities().supports(feature)
    }
}

impl FromStr for Dialect {
    type Err = SqlError;

    /// Parse `engine-version`, e.g. `mssql-2012` or `mysql-8.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (engine, version) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| SqlError::UnknownDialect(s.to_string()))?;
        Dialect::lookup(engine.parse()?, version)
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn engine(&self) -> Engine {
        self.dialect().engine()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_bytes(&self, bytes: &[u8]) -> String {
        self.dialect().format_bytes(bytes)
    }

    fn capabilities(&self) -> &'static Capabilities {
        self.dialect().capabilities()
    }

    fn paging_style(&self) -> PagingStyle {
        self.dialect().paging_style()
    }

    fn requires_order_by_for_offset(&self) -> bool {
        self.dialect().requires_order_by_for_offset()
    }

    fn update_join_style(&self) -> UpdateJoinStyle {
        self.dialect().update_join_style()
    }

    fn change_column_keyword(&self) -> Token {
        self.dialect().change_column_keyword()
    }

    fn drop_constraint_style(&self) -> DropConstraintStyle {
        self.dialect().drop_constraint_style()
    }

    fn drop_index_style(&self) -> DropIndexStyle {
        self.dialect().drop_index_style()
    }

    fn statement_separator(&self) -> &'static str {
        self.dialect().statement_separator()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        self.dialect().emit_data_type(dt)
    }

    fn emit_identity(&self, seed: i64, increment: i64) -> TokenStream {
        self.dialect().emit_identity(seed, increment)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

// =============================================================================
// Process-wide default
// =============================================================================

static DEFAULT_DIALECT: OnceLock<Dialect> = OnceLock::new();

/// Configure the dialect used by `to_sql_default`.
///
/// The default can be set once per process. Setting the same dialect again
/// is a no-op; setting a different one is a configuration error.
pub fn set_default_dialect(dialect: Dialect) -> Result<(), SqlError> {
    let current = DEFAULT_DIALECT.get_or_init(|| dialect);
    if *current == dialect {
        Ok(())
    } else {
        Err(SqlError::config(format!(
            "default dialect already set to {}, cannot change it to {}",
            current, dialect
        )))
    }
}

/// The configured process-wide default dialect.
pub fn default_dialect() -> Result<Dialect, SqlError> {
    DEFAULT_DIALECT
        .get()
        .copied()
        .ok_or(SqlError::NoDefaultDialect)
}
