//! # Quill
//!
//! Dialect-aware SQL construction and rendering.
//!
//! Statements are assembled from a small entity model (tables, columns,
//! aliases) and rendered for a target engine version into a SQL string plus
//! an ordered list of bound parameters:
//!
//! ```text
//! ┌───────────────────────────────┐
//! │  Entity model                 │  Table, Column, Alias, Constraint, Index
//! └───────────────────────────────┘
//!                 │
//!                 ▼ [builders]
//! ┌───────────────────────────────┐
//! │  Statement tree               │  Select, Insert, Update, Delete, Create, Alter
//! └───────────────────────────────┘
//!                 │
//!                 ▼ [render, per dialect]
//! ┌───────────────────────────────┐
//! │  SQL text  +  Params          │  @param0, @param1, ...
//! └───────────────────────────────┘
//! ```
//!
//! Values never appear in the text; they are bound to `@paramN` placeholders
//! whose numbering matches their position in [`Params`].
//!
//! ```ignore
//! use quill::prelude::*;
//!
//! let mut users = Table::new("users");
//! users.add_column("id", DataType::Int32);
//! users.add_column("email", DataType::Varchar(200));
//!
//! let query = Select::new()
//!     .select(&users.col("email")?)
//!     .from(&users)
//!     .where_(users.col("id")?.eq(42));
//!
//! let mut params = Params::new();
//! let sql = query.to_sql(Dialect::SqlServer2012, &mut params)?;
//! // SELECT [users].[email] FROM [users] WHERE ([users].[id] = @param0)
//! ```

pub mod config;
pub mod sql;

// Re-export SQL submodules at crate level
pub use sql::ddl;
pub use sql::dialect;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::schema;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::sql::ddl::{Alter, Create};
    pub use crate::sql::declare::{ColumnSchema, TableSchema};
    pub use crate::sql::dialect::{Dialect, Engine, SqlDialect};
    pub use crate::sql::dml::{Delete, Insert, Update};
    pub use crate::sql::error::SqlError;
    pub use crate::sql::expr::{
        avg, coalesce, count, count_star, func, max, min, row_number, sum, ExprExt,
        LogicalClause, MathExpr,
    };
    pub use crate::sql::query::{JoinType, Select, SortDir, TableHint};
    pub use crate::sql::render::{Batch, Render};
    pub use crate::sql::schema::{Alias, Column, Constraint, Index, IndexKind, Table};
    pub use crate::sql::types::DataType;
    pub use crate::sql::value::{Expr, Params, TypedParam, Value};
}

// Also export at crate root for convenience
pub use config::{Settings, SettingsError};
pub use sql::{Dialect, Expr, Params, Render, Select, SqlError, Table, Value};
