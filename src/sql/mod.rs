//! SQL construction and rendering.
//!
//! Statements are trees of [`Render`] nodes built from the entity model and
//! rendered per dialect into parameterized SQL:
//!
//! - [`schema`] - tables, columns, aliases, constraints, indexes
//! - [`declare`] - declarative table schemas
//! - [`expr`] - predicates, logical groups, arithmetic, functions, windows
//! - [`query`] - SELECT builder
//! - [`dml`] - INSERT, UPDATE, DELETE (with OUTPUT)
//! - [`ddl`] - CREATE TABLE / INDEX and ALTER TABLE
//! - [`render`] - the render protocol and statement batches
//! - [`dialect`] - registered dialects and capability tables
//! - [`token`] - output tokens

pub mod ddl;
pub mod declare;
pub mod dialect;
pub mod dml;
pub mod error;
pub mod expr;
pub mod query;
pub mod render;
pub mod schema;
pub mod token;
pub mod types;
pub mod value;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use ddl::{Alter, Create};
pub use declare::{ColumnSchema, TableSchema};
pub use dialect::{
    default_dialect, set_default_dialect, Dialect, Engine, Feature, SqlDialect,
};
pub use dml::{Delete, Insert, Pseudo, Update};
pub use error::SqlError;
pub use expr::{
    avg, coalesce, count, count_star, func, max, min, row_number, sum, BoolExpr, Cast,
    Comparator, Connective, Exists, ExprExt, Function, In, LogicalClause, MathExpr, MathOp, Over,
    Quantified, Quantifier,
};
pub use query::{Join, JoinType, OrderBy, Select, SortDir, TableHint};
pub use render::{Batch, Render, RenderMode, Renderer};
pub use schema::{
    Alias, Column, ColumnRef, Constraint, ConstraintDef, ConstraintKind, ForeignKey, Identity,
    Index, IndexKind, ReferentialAction, Source, Table, TableName,
};
pub use token::{Token, TokenStream};
pub use types::{DataType, TypeArg};
pub use value::{Expr, Param, Params, TypedParam, Value};
