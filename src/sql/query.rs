//! SELECT builder - construct queries with a fluent API.
//!
//! Configuration only appends to the builder; nothing is validated until
//! render time, when the target dialect decides paging syntax and whether
//! hints or FULL joins are allowed at all.

use super::dialect::{Feature, PagingStyle, SqlDialect};
use super::error::SqlError;
use super::expr::LogicalClause;
use super::render::{Render, Renderer};
use super::schema::Source;
use super::token::{Token, TokenStream};
use super::value::{Expr, Value};

// =============================================================================
// Select list
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone)]
struct SelectItem {
    expr: Expr,
    alias: Option<String>,
}

impl Render for SelectItem {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = r.expr(&self.expr)?;
        if let Some(alias) = &self.alias {
            ts.space().keyword(Token::As).push(r.ident(alias));
        }
        Ok(ts)
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of JOIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// A JOIN clause. Also used by UPDATE.
#[derive(Debug, Clone)]
pub struct Join {
    pub join_type: JoinType,
    pub source: Source,
    pub on: Option<Expr>,
}

impl Render for Join {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        match self.join_type {
            JoinType::Inner => ts.keyword(Token::Inner),
            JoinType::Left => ts.keyword(Token::Left),
            JoinType::Right => ts.keyword(Token::Right),
            JoinType::Full => {
                r.require(Feature::FullOuterJoin, "FULL OUTER JOIN")?;
                ts.keyword(Token::Full).keyword(Token::Outer)
            }
            JoinType::Cross => ts.keyword(Token::Cross),
        };
        ts.keyword(Token::Join).append(&r.node(&self.source)?);

        if let Some(on) = self.on.as_ref().filter(|on| !on.is_empty()) {
            ts.space().keyword(Token::On).append(&r.expr(on)?);
        }
        Ok(ts)
    }
}

// =============================================================================
// Ordering
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub(crate) fn token(&self) -> Token {
        match self {
            SortDir::Asc => Token::Asc,
            SortDir::Desc => Token::Desc,
        }
    }
}

/// ORDER BY item.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub expr: Expr,
    pub dir: SortDir,
}

impl OrderBy {
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            dir: SortDir::Asc,
        }
    }

    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            dir: SortDir::Desc,
        }
    }
}

impl Render for OrderBy {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = r.expr(&self.expr)?;
        ts.space().push(self.dir.token());
        Ok(ts)
    }
}

// =============================================================================
// Table hints
// =============================================================================

/// SQL Server table hint, emitted as `WITH (...)` after the FROM sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHint {
    NoLock,
    ReadPast,
    UpdLock,
    RowLock,
    HoldLock,
}

impl TableHint {
    fn keyword(&self) -> &'static str {
        match self {
            TableHint::NoLock => "NOLOCK",
            TableHint::ReadPast => "READPAST",
            TableHint::UpdLock => "UPDLOCK",
            TableHint::RowLock => "ROWLOCK",
            TableHint::HoldLock => "HOLDLOCK",
        }
    }
}

// =============================================================================
// Select
// =============================================================================

/// A SELECT statement.
///
/// ```ignore
/// let q = Select::new()
///     .select(users.col("id")?)
///     .from(&users)
///     .where_(users.col("active")?.eq(true))
///     .order_by(users.col("id")?)
///     .take(20);
/// let sql = q.to_sql(Dialect::SqlServer2012, &mut params)?;
/// ```
#[derive(Debug, Clone, Default)]
#[must_use = "builders have no effect until rendered"]
pub struct Select {
    distinct: bool,
    columns: Vec<SelectItem>,
    sources: Vec<Source>,
    hints: Vec<TableHint>,
    joins: Vec<Join>,
    filter: LogicalClause,
    group_by: Vec<Expr>,
    having: LogicalClause,
    unions: Vec<(bool, Select)>,
    order_by: Vec<OrderBy>,
    skip: Option<u64>,
    take: Option<u64>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Select list
    // =========================================================================

    pub fn select(mut self, expr: impl Into<Expr>) -> Self {
        self.columns.push(SelectItem {
            expr: expr.into(),
            alias: None,
        });
        self
    }

    /// `expr AS alias`
    pub fn select_as(mut self, expr: impl Into<Expr>, alias: impl Into<String>) -> Self {
        self.columns.push(SelectItem {
            expr: expr.into(),
            alias: Some(alias.into()),
        });
        self
    }

    /// `SELECT *`, discarding any columns selected so far.
    pub fn select_all(mut self) -> Self {
        self.columns.clear();
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // =========================================================================
    // Sources
    // =========================================================================

    /// Add a FROM source: a table or an alias. Subqueries must be aliased.
    pub fn from(mut self, source: impl Into<Source>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Table hint (SQL Server only).
    pub fn hint(mut self, hint: TableHint) -> Self {
        self.hints.push(hint);
        self
    }

    fn add_join(mut self, join_type: JoinType, source: Source, on: Option<Expr>) -> Self {
        self.joins.push(Join {
            join_type,
            source,
            on,
        });
        self
    }

    /// INNER JOIN
    pub fn join(self, source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        self.add_join(JoinType::Inner, source.into(), Some(on.into()))
    }

    pub fn left_join(self, source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        self.add_join(JoinType::Left, source.into(), Some(on.into()))
    }

    pub fn right_join(self, source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        self.add_join(JoinType::Right, source.into(), Some(on.into()))
    }

    /// FULL OUTER JOIN (not available on MySQL).
    pub fn full_join(self, source: impl Into<Source>, on: impl Into<Expr>) -> Self {
        self.add_join(JoinType::Full, source.into(), Some(on.into()))
    }

    pub fn cross_join(self, source: impl Into<Source>) -> Self {
        self.add_join(JoinType::Cross, source.into(), None)
    }

    // =========================================================================
    // Filtering and grouping
    // =========================================================================

    /// Add a WHERE condition. Repeated calls are ANDed; empty conditions are
    /// dropped.
    pub fn where_(mut self, condition: impl Into<Expr>) -> Self {
        self.filter = self.filter.and(condition);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expr>) -> Self {
        self.group_by.push(expr.into());
        self
    }

    /// Add a HAVING condition. Repeated calls are ANDed.
    pub fn having(mut self, condition: impl Into<Expr>) -> Self {
        self.having = self.having.and(condition);
        self
    }

    pub fn union(mut self, other: Select) -> Self {
        self.unions.push((false, other));
        self
    }

    pub fn union_all(mut self, other: Select) -> Self {
        self.unions.push((true, other));
        self
    }

    // =========================================================================
    // Ordering and paging
    // =========================================================================

    pub fn order_by(mut self, expr: impl Into<Expr>) -> Self {
        self.order_by.push(OrderBy::asc(expr));
        self
    }

    pub fn order_by_desc(mut self, expr: impl Into<Expr>) -> Self {
        self.order_by.push(OrderBy::desc(expr));
        self
    }

    /// Rows to skip. Bound as a parameter.
    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    /// Maximum rows to return. Bound as a parameter.
    pub fn take(mut self, n: u64) -> Self {
        self.take = Some(n);
        self
    }

    fn render_paging(&self, r: &mut Renderer<'_>, ts: &mut TokenStream) -> Result<(), SqlError> {
        if self.skip.is_none() && self.take.is_none() {
            return Ok(());
        }

        match r.dialect().paging_style() {
            // TOP is emitted with the select list.
            PagingStyle::Top => {}
            PagingStyle::OffsetFetch => {
                if self.order_by.is_empty() && r.dialect().requires_order_by_for_offset() {
                    ts.space()
                        .keyword(Token::OrderBy)
                        .lparen()
                        .keyword(Token::Select)
                        .push(Token::Null)
                        .rparen();
                }
                ts.space()
                    .keyword(Token::Offset)
                    .push(bind_count(r, self.skip.unwrap_or(0))?)
                    .space()
                    .push(Token::Rows);
                if let Some(take) = self.take {
                    ts.space()
                        .keyword(Token::Fetch)
                        .keyword(Token::Next)
                        .push(bind_count(r, take)?)
                        .space()
                        .keyword(Token::Rows)
                        .push(Token::Only);
                }
            }
            PagingStyle::Limit => {
                ts.space().keyword(Token::Limit);
                if let Some(skip) = self.skip {
                    ts.push(bind_count(r, skip)?).comma();
                }
                // MySQL has no "offset only" form; the largest count stands in.
                let take = self.take.unwrap_or(i64::MAX as u64);
                ts.push(bind_count(r, take)?);
            }
        }
        Ok(())
    }
}

fn bind_count(r: &mut Renderer<'_>, n: u64) -> Result<Token, SqlError> {
    let n = i64::try_from(n)
        .map_err(|_| SqlError::config(format!("row count {} does not fit a BIGINT", n)))?;
    r.bind(&Value::Int(n))
}

impl Render for Select {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        ts.keyword(Token::Select);
        if self.distinct {
            ts.keyword(Token::Distinct);
        }

        if r.dialect().paging_style() == PagingStyle::Top {
            if self.skip.is_some() {
                r.require(Feature::OffsetPaging, "OFFSET paging")?;
            }
            if let Some(take) = self.take {
                let count = bind_count(r, take)?;
                ts.keyword(Token::Top).lparen().push(count).rparen().space();
            }
        }

        if self.columns.is_empty() {
            ts.push(Token::Star);
        } else {
            let mut items = Vec::with_capacity(self.columns.len());
            for item in &self.columns {
                items.push(r.node(item)?);
            }
            ts.comma_separated(items);
        }

        if !self.sources.is_empty() {
            let mut sources = Vec::with_capacity(self.sources.len());
            for source in &self.sources {
                sources.push(r.node(source)?);
            }
            ts.space().keyword(Token::From).comma_separated(sources);
        }

        if !self.hints.is_empty() {
            r.require(Feature::TableHints, "table hints")?;
            let hints = self
                .hints
                .iter()
                .map(|h| TokenStream::from(Token::Raw(h.keyword().into())));
            let mut list = TokenStream::new();
            list.comma_separated(hints);
            ts.space().keyword(Token::With).parens(&list);
        }

        for join in &self.joins {
            ts.space().append(&r.node(join)?);
        }

        if !self.filter.is_empty() {
            ts.space().keyword(Token::Where).append(&r.node(&self.filter)?);
        }

        if !self.group_by.is_empty() {
            ts.space()
                .keyword(Token::GroupBy)
                .append(&r.expr_list(&self.group_by)?);
        }

        if !self.having.is_empty() {
            ts.space().keyword(Token::Having).append(&r.node(&self.having)?);
        }

        for (all, other) in &self.unions {
            ts.space().keyword(Token::Union);
            if *all {
                ts.keyword(Token::All);
            }
            ts.append(&r.node(other)?);
        }

        if !self.order_by.is_empty() {
            let mut items = Vec::with_capacity(self.order_by.len());
            for item in &self.order_by {
                items.push(r.node(item)?);
            }
            ts.space().keyword(Token::OrderBy).comma_separated(items);
        }

        self.render_paging(r, &mut ts)?;
        Ok(ts)
    }
}

/// A SELECT used as a value, IN candidate list, or aliased source.
#[derive(Debug, Clone)]
struct Subquery(Select);

impl Render for Subquery {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        ts.parens(&r.node(&self.0)?);
        Ok(ts)
    }
}

impl From<Select> for Expr {
    fn from(select: Select) -> Self {
        Expr::node(Subquery(select))
    }
}
