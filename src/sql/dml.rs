//! DML (Data Manipulation Language) support.
//!
//! Builders for INSERT, UPDATE, and DELETE. Values are always bound as
//! parameters; the OUTPUT clause is only available where the dialect has one.
//!
//! # Examples
//!
//! ```ignore
//! use quill::sql::dml::{Insert, Update, Delete};
//! use quill::sql::expr::ExprExt;
//!
//! // INSERT
//! let insert = Insert::into(&users)
//!     .add_pair(&users.col("name")?, "Alice")
//!     .add_pair(&users.col("email")?, "alice@example.com");
//!
//! // UPDATE
//! let update = Update::table(&users)
//!     .set(&users.col("status")?, "active")
//!     .where_(users.col("id")?.eq(1));
//!
//! // DELETE
//! let delete = Delete::from(&users)
//!     .where_(users.col("status")?.eq("inactive"));
//! ```

use super::dialect::{Feature, SqlDialect, UpdateJoinStyle};
use super::error::SqlError;
use super::expr::LogicalClause;
use super::query::{Join, JoinType, Select};
use super::render::{Render, Renderer};
use super::schema::{Column, Source, Table, TableName};
use super::token::{Token, TokenStream};
use super::value::Expr;

// ============================================================================
// OUTPUT
// ============================================================================

/// Row image an OUTPUT column reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    Inserted,
    Deleted,
}

impl Pseudo {
    fn token(&self) -> Token {
        match self {
            Pseudo::Inserted => Token::Inserted,
            Pseudo::Deleted => Token::Deleted,
        }
    }
}

/// `OUTPUT INSERTED.[a],DELETED.[b] [INTO target]` (SQL Server only).
#[derive(Debug, Clone, Default)]
struct Output {
    columns: Vec<(Pseudo, String)>,
    into: Option<TableName>,
}

impl Output {
    fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.into.is_none()
    }

    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        if self.is_empty() {
            return Ok(ts);
        }
        r.require(Feature::OutputClause, "OUTPUT clause")?;
        if self.columns.is_empty() {
            return Err(SqlError::config("OUTPUT INTO needs at least one output column"));
        }

        let columns = self.columns.iter().map(|(pseudo, name)| {
            let mut item = TokenStream::from(pseudo.token());
            item.push(Token::Dot).push(r.ident(name));
            item
        });
        ts.keyword(Token::Output).comma_separated(columns.collect::<Vec<_>>());

        if let Some(target) = &self.into {
            ts.space().keyword(Token::Into).push(target.token());
        }
        Ok(ts)
    }
}

// ============================================================================
// INSERT
// ============================================================================

/// INSERT statement.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until rendered"]
pub struct Insert {
    table: TableName,
    columns: Vec<String>,
    values: Vec<Expr>,
    select: Option<Box<Select>>,
    output: Output,
}

impl Insert {
    /// Create an INSERT statement.
    pub fn into(table: &Table) -> Self {
        Self {
            table: table.table_name().clone(),
            columns: Vec::new(),
            values: Vec::new(),
            select: None,
            output: Output::default(),
        }
    }

    /// Add one column and its value.
    pub fn add_pair(mut self, column: &Column, value: impl Into<Expr>) -> Self {
        self.columns.push(column.name().to_string());
        self.values.push(value.into());
        self
    }

    /// Set the target columns; pair with [`Insert::values`] or
    /// [`Insert::from_select`].
    pub fn columns<'c>(mut self, columns: impl IntoIterator<Item = &'c Column>) -> Self {
        self.columns
            .extend(columns.into_iter().map(|c| c.name().to_string()));
        self
    }

    pub fn values<I, E>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// `INSERT INTO t (cols) SELECT ...`
    pub fn from_select(mut self, query: Select) -> Self {
        self.select = Some(Box::new(query));
        self
    }

    /// `OUTPUT INSERTED.column` (SQL Server only).
    pub fn output(mut self, column: &Column) -> Self {
        self.output
            .columns
            .push((Pseudo::Inserted, column.name().to_string()));
        self
    }

    /// Redirect OUTPUT rows into `table`.
    pub fn output_into(mut self, table: &Table) -> Self {
        self.output.into = Some(table.table_name().clone());
        self
    }
}

impl Render for Insert {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        ts.keyword(Token::Insert)
            .keyword(Token::Into)
            .push(self.table.token());

        if !self.columns.is_empty() {
            let names = self
                .columns
                .iter()
                .map(|c| TokenStream::from(r.ident(c)))
                .collect::<Vec<_>>();
            let mut list = TokenStream::new();
            list.comma_separated(names);
            ts.space().parens(&list);
        }

        // SQL Server wants OUTPUT between the column list and the row source.
        let output = self.output.render(r)?;
        if !output.is_empty() {
            ts.space().append(&output);
        }

        match (&self.select, self.values.is_empty()) {
            (Some(_), false) => {
                return Err(SqlError::config(
                    "INSERT cannot take both VALUES and a SELECT source",
                ));
            }
            (Some(select), true) => {
                ts.space().append(&r.node(select.as_ref())?);
            }
            (None, true) => {
                return Err(SqlError::config(format!(
                    "INSERT INTO {} has no values",
                    self.table.name
                )));
            }
            (None, false) => {
                if self.values.len() != self.columns.len() {
                    return Err(SqlError::config(format!(
                        "INSERT has {} columns but {} values",
                        self.columns.len(),
                        self.values.len()
                    )));
                }
                ts.space()
                    .keyword(Token::Values)
                    .parens(&r.expr_list(&self.values)?);
            }
        }
        Ok(ts)
    }
}

// ============================================================================
// UPDATE
// ============================================================================

/// UPDATE statement.
///
/// Join placement follows the dialect: MySQL joins inline after the target
/// table, SQL Server repeats the target in a FROM clause after SET.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until rendered"]
pub struct Update {
    table: TableName,
    assignments: Vec<(String, Expr)>,
    joins: Vec<Join>,
    filter: LogicalClause,
    output: Output,
}

impl Update {
    /// Create an UPDATE statement.
    pub fn table(table: &Table) -> Self {
        Self {
            table: table.table_name().clone(),
            assignments: Vec::new(),
            joins: Vec::new(),
            filter: LogicalClause::new(),
            output: Output::default(),
        }
    }

    /// `SET column = value`
    pub fn set(mut self, column: &Column, value: impl Into<Expr>) -> Self {
        self.assignments
            .push((column.name().to_string(), value.into()));
        self
    }

    /// INNER JOIN another source.
    pub fn join(mut self, source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Inner,
            source: source.into(),
            on: Some(on.into()),
        });
        self
    }

    pub fn left_join(mut self, source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Left,
            source: source.into(),
            on: Some(on.into()),
        });
        self
    }

    /// Add a WHERE condition. Repeated calls are ANDed.
    pub fn where_(mut self, condition: impl Into<Expr>) -> Self {
        self.filter = self.filter.and(condition);
        self
    }

    /// `OUTPUT INSERTED.column`: the value after the update (SQL Server only).
    pub fn output(mut self, column: &Column) -> Self {
        self.output
            .columns
            .push((Pseudo::Inserted, column.name().to_string()));
        self
    }

    /// `OUTPUT DELETED.column`: the value before the update (SQL Server only).
    pub fn output_deleted(mut self, column: &Column) -> Self {
        self.output
            .columns
            .push((Pseudo::Deleted, column.name().to_string()));
        self
    }

    pub fn output_into(mut self, table: &Table) -> Self {
        self.output.into = Some(table.table_name().clone());
        self
    }

    fn render_joins(&self, r: &mut Renderer<'_>, ts: &mut TokenStream) -> Result<(), SqlError> {
        for join in &self.joins {
            ts.space().append(&r.node(join)?);
        }
        Ok(())
    }
}

impl Render for Update {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        if self.assignments.is_empty() {
            return Err(SqlError::config(format!(
                "UPDATE {} has no SET assignments",
                self.table.name
            )));
        }

        let style = r.dialect().update_join_style();
        let mut ts = TokenStream::new();
        ts.keyword(Token::Update).push(self.table.token());

        if style == UpdateJoinStyle::Inline {
            self.render_joins(r, &mut ts)?;
        }

        // Joined MySQL updates must say which table a column belongs to.
        let qualify = style == UpdateJoinStyle::Inline && !self.joins.is_empty();
        let mut assignments = Vec::with_capacity(self.assignments.len());
        for (column, value) in &self.assignments {
            let mut item = TokenStream::new();
            if qualify {
                item.push(r.ident(&self.table.name)).push(Token::Dot);
            }
            item.push(r.ident(column))
                .space()
                .push(Token::Eq)
                .space()
                .append(&r.expr(value)?);
            assignments.push(item);
        }
        ts.space().keyword(Token::Set).comma_separated(assignments);

        let output = self.output.render(r)?;
        if !output.is_empty() {
            ts.space().append(&output);
        }

        if style == UpdateJoinStyle::FromClause && !self.joins.is_empty() {
            ts.space().keyword(Token::From).push(self.table.token());
            self.render_joins(r, &mut ts)?;
        }

        if !self.filter.is_empty() {
            ts.space().keyword(Token::Where).append(&r.node(&self.filter)?);
        }
        Ok(ts)
    }
}

// ============================================================================
// DELETE
// ============================================================================

/// DELETE statement, or TRUNCATE TABLE when [`Delete::truncate`] is set.
#[derive(Debug, Clone)]
#[must_use = "DML statements have no effect until rendered"]
pub struct Delete {
    table: TableName,
    filter: LogicalClause,
    truncate: bool,
    output: Output,
}

impl Delete {
    /// Create a DELETE statement.
    pub fn from(table: &Table) -> Self {
        Self {
            table: table.table_name().clone(),
            filter: LogicalClause::new(),
            truncate: false,
            output: Output::default(),
        }
    }

    /// Add a WHERE condition. Repeated calls are ANDed.
    pub fn where_(mut self, condition: impl Into<Expr>) -> Self {
        self.filter = self.filter.and(condition);
        self
    }

    /// Render as `TRUNCATE TABLE`. Cannot be combined with a WHERE
    /// condition or an OUTPUT clause.
    pub fn truncate(mut self) -> Self {
        self.truncate = true;
        self
    }

    /// `OUTPUT DELETED.column` (SQL Server only).
    pub fn output(mut self, column: &Column) -> Self {
        self.output
            .columns
            .push((Pseudo::Deleted, column.name().to_string()));
        self
    }

    pub fn output_into(mut self, table: &Table) -> Self {
        self.output.into = Some(table.table_name().clone());
        self
    }
}

impl Render for Delete {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();

        if self.truncate {
            if !self.filter.is_empty() {
                return Err(SqlError::config(format!(
                    "TRUNCATE TABLE {} cannot take a WHERE condition",
                    self.table.name
                )));
            }
            if !self.output.is_empty() {
                return Err(SqlError::config(format!(
                    "TRUNCATE TABLE {} cannot take an OUTPUT clause",
                    self.table.name
                )));
            }
            ts.keyword(Token::Truncate)
                .keyword(Token::Table)
                .push(self.table.token());
            return Ok(ts);
        }

        ts.keyword(Token::Delete)
            .keyword(Token::From)
            .push(self.table.token());

        let output = self.output.render(r)?;
        if !output.is_empty() {
            ts.space().append(&output);
        }

        if !self.filter.is_empty() {
            ts.space().keyword(Token::Where).append(&r.node(&self.filter)?);
        }
        Ok(ts)
    }
}
