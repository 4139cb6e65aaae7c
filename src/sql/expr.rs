//! Expression nodes.
//!
//! Every node here implements [`Render`] and converts into [`Expr`], so any
//! of them can sit in a WHERE, HAVING, ON, SET, or select-list position.
//! Nodes wrap themselves in parentheses; containers never add their own.
//!
//! ```ignore
//! use quill::sql::expr::ExprExt;
//!
//! let cond = users.col("age")?.gte(18).and(users.col("email")?.is_not_null());
//! ```

use super::error::SqlError;
use super::query::{OrderBy, Select};
use super::render::{Render, Renderer};
use super::token::{Token, TokenStream};
use super::types::DataType;
use super::value::Expr;

// =============================================================================
// Operators
// =============================================================================

/// Comparison operator of a [`BoolExpr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
    Is,
    IsNot,
}

impl Comparator {
    fn tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Comparator::Eq => ts.push(Token::Eq),
            Comparator::Ne => ts.push(Token::Ne),
            Comparator::Lt => ts.push(Token::Lt),
            Comparator::Lte => ts.push(Token::Lte),
            Comparator::Gt => ts.push(Token::Gt),
            Comparator::Gte => ts.push(Token::Gte),
            Comparator::Like => ts.push(Token::Like),
            Comparator::NotLike => ts.keyword(Token::Not).push(Token::Like),
            Comparator::Is => ts.push(Token::Is),
            Comparator::IsNot => ts.keyword(Token::Is).push(Token::Not),
        };
        ts
    }

    fn is_identity_test(&self) -> bool {
        matches!(self, Comparator::Is | Comparator::IsNot)
    }
}

/// Connective joining the operands of a [`LogicalClause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    fn token(&self) -> Token {
        match self {
            Connective::And => Token::And,
            Connective::Or => Token::Or,
        }
    }
}

/// Arithmetic operator of a [`MathExpr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl MathOp {
    fn token(&self) -> Token {
        match self {
            MathOp::Add => Token::Plus,
            MathOp::Sub => Token::Minus,
            MathOp::Mul => Token::Mul,
            MathOp::Div => Token::Div,
            MathOp::Mod => Token::Mod,
        }
    }
}

// =============================================================================
// Boolean expressions
// =============================================================================

/// `(lhs OP rhs)`, optionally negated as `NOT (lhs OP rhs)`.
#[derive(Debug, Clone)]
pub struct BoolExpr {
    lhs: Expr,
    op: Comparator,
    rhs: Expr,
    negated: bool,
}

impl BoolExpr {
    pub fn new(lhs: impl Into<Expr>, op: Comparator, rhs: impl Into<Expr>) -> Self {
        Self {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
            negated: false,
        }
    }

    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl Render for BoolExpr {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut inner = r.expr(&self.lhs)?;
        inner.space().append(&self.op.tokens()).space();

        // IS NULL cannot take a bound parameter.
        if self.op.is_identity_test() && self.rhs.is_null_value() {
            inner.push(Token::Null);
        } else {
            inner.append(&r.expr(&self.rhs)?);
        }

        let mut ts = TokenStream::new();
        if self.negated {
            ts.keyword(Token::Not);
        }
        ts.parens(&inner);
        Ok(ts)
    }
}

/// A group of operands joined by AND / OR.
///
/// Empty operands are skipped. A clause whose operands are all empty is
/// itself empty, so WHERE / HAVING / ON containers leave it out.
#[derive(Debug, Clone, Default)]
pub struct LogicalClause {
    operands: Vec<(Connective, Expr)>,
    negated: bool,
}

impl LogicalClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operand. The first operand's connective is ignored.
    pub fn push(&mut self, connective: Connective, operand: impl Into<Expr>) -> &mut Self {
        self.operands.push((connective, operand.into()));
        self
    }

    #[must_use]
    pub fn and(mut self, operand: impl Into<Expr>) -> Self {
        self.push(Connective::And, operand);
        self
    }

    #[must_use]
    pub fn or(mut self, operand: impl Into<Expr>) -> Self {
        self.push(Connective::Or, operand);
        self
    }

    /// Negate the whole group.
    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// `a AND b AND ...`
    pub fn all<I, E>(operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        operands.into_iter().fold(Self::new(), |c, e| c.and(e))
    }

    /// `a OR b OR ...`
    pub fn any<I, E>(operands: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        operands.into_iter().fold(Self::new(), |c, e| c.or(e))
    }
}

impl Render for LogicalClause {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let present: Vec<&(Connective, Expr)> =
            self.operands.iter().filter(|(_, e)| !e.is_empty()).collect();

        let mut ts = TokenStream::new();
        if present.is_empty() {
            return Ok(ts);
        }
        if self.negated {
            ts.keyword(Token::Not);
        }

        if let [(_, only)] = present.as_slice() {
            ts.append(&operand(r, only)?);
            return Ok(ts);
        }

        let mut inner = TokenStream::new();
        for (i, (connective, expr)) in present.iter().enumerate() {
            if i > 0 {
                inner.space().push(connective.token()).space();
            }
            inner.append(&operand(r, expr)?);
        }
        ts.parens(&inner);
        Ok(ts)
    }

    fn is_empty(&self) -> bool {
        self.operands.iter().all(|(_, e)| e.is_empty())
    }
}

/// Group operand. Nodes parenthesize themselves; raw text gets wrapped so
/// its own operators cannot bind across the connective.
fn operand(r: &mut Renderer<'_>, expr: &Expr) -> Result<TokenStream, SqlError> {
    let rendered = r.expr(expr)?;
    match expr {
        Expr::Raw(_) => {
            let mut ts = TokenStream::new();
            ts.parens(&rendered);
            Ok(ts)
        }
        _ => Ok(rendered),
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

/// `(t0 OP t1 OP t2 ...)`
#[derive(Debug, Clone)]
pub struct MathExpr {
    first: Expr,
    rest: Vec<(MathOp, Expr)>,
}

impl MathExpr {
    pub fn new(first: impl Into<Expr>) -> Self {
        Self {
            first: first.into(),
            rest: Vec::new(),
        }
    }

    #[must_use]
    pub fn then(mut self, op: MathOp, term: impl Into<Expr>) -> Self {
        self.rest.push((op, term.into()));
        self
    }

    #[must_use]
    pub fn add(self, term: impl Into<Expr>) -> Self {
        self.then(MathOp::Add, term)
    }

    #[must_use]
    pub fn sub(self, term: impl Into<Expr>) -> Self {
        self.then(MathOp::Sub, term)
    }

    #[must_use]
    pub fn mul(self, term: impl Into<Expr>) -> Self {
        self.then(MathOp::Mul, term)
    }

    #[must_use]
    pub fn div(self, term: impl Into<Expr>) -> Self {
        self.then(MathOp::Div, term)
    }

    #[must_use]
    pub fn rem(self, term: impl Into<Expr>) -> Self {
        self.then(MathOp::Mod, term)
    }
}

impl Render for MathExpr {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut inner = r.expr(&self.first)?;
        for (op, term) in &self.rest {
            inner.space().push(op.token()).space();
            inner.append(&r.expr(term)?);
        }
        let mut ts = TokenStream::new();
        ts.parens(&inner);
        Ok(ts)
    }
}

// =============================================================================
// Subquery predicates
// =============================================================================

#[derive(Debug, Clone)]
enum Candidates {
    List(Vec<Expr>),
    Query(Box<Select>),
}

/// `(lhs IN (v0,v1,...))` or `(lhs IN (SELECT ...))`.
#[derive(Debug, Clone)]
pub struct In {
    lhs: Expr,
    candidates: Candidates,
    negated: bool,
}

impl In {
    pub fn list<I, E>(lhs: impl Into<Expr>, values: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self {
            lhs: lhs.into(),
            candidates: Candidates::List(values.into_iter().map(Into::into).collect()),
            negated: false,
        }
    }

    pub fn query(lhs: impl Into<Expr>, query: Select) -> Self {
        Self {
            lhs: lhs.into(),
            candidates: Candidates::Query(Box::new(query)),
            negated: false,
        }
    }

    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl Render for In {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut inner = r.expr(&self.lhs)?;
        inner.space();
        if self.negated {
            inner.keyword(Token::Not);
        }
        inner.keyword(Token::In);

        let candidates = match &self.candidates {
            Candidates::List(values) if values.is_empty() => {
                return Err(SqlError::config("IN list has no candidates"));
            }
            Candidates::List(values) => r.expr_list(values)?,
            Candidates::Query(query) => r.node(query.as_ref())?,
        };
        inner.parens(&candidates);

        let mut ts = TokenStream::new();
        ts.parens(&inner);
        Ok(ts)
    }
}

/// `(EXISTS (SELECT ...))`
#[derive(Debug, Clone)]
pub struct Exists {
    query: Box<Select>,
    negated: bool,
}

impl Exists {
    pub fn new(query: Select) -> Self {
        Self {
            query: Box::new(query),
            negated: false,
        }
    }

    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl Render for Exists {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut inner = TokenStream::new();
        if self.negated {
            inner.keyword(Token::Not);
        }
        inner.keyword(Token::Exists).parens(&r.node(self.query.as_ref())?);

        let mut ts = TokenStream::new();
        ts.parens(&inner);
        Ok(ts)
    }
}

/// Quantifier of a [`Quantified`] comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    All,
    Any,
}

/// `(lhs OP ALL (SELECT ...))` / `(lhs OP ANY (SELECT ...))`.
#[derive(Debug, Clone)]
pub struct Quantified {
    lhs: Expr,
    op: Comparator,
    quantifier: Quantifier,
    query: Box<Select>,
    negated: bool,
}

impl Quantified {
    pub fn all(lhs: impl Into<Expr>, op: Comparator, query: Select) -> Self {
        Self::new(lhs, op, Quantifier::All, query)
    }

    pub fn any(lhs: impl Into<Expr>, op: Comparator, query: Select) -> Self {
        Self::new(lhs, op, Quantifier::Any, query)
    }

    fn new(lhs: impl Into<Expr>, op: Comparator, quantifier: Quantifier, query: Select) -> Self {
        Self {
            lhs: lhs.into(),
            op,
            quantifier,
            query: Box::new(query),
            negated: false,
        }
    }

    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

impl Render for Quantified {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        if self.op.is_identity_test() || matches!(self.op, Comparator::Like | Comparator::NotLike) {
            return Err(SqlError::config(
                "ALL / ANY takes a comparison operator (=, <>, <, <=, >, >=)",
            ));
        }

        let mut inner = TokenStream::new();
        if self.negated {
            inner.keyword(Token::Not);
        }
        inner
            .append(&r.expr(&self.lhs)?)
            .space()
            .append(&self.op.tokens())
            .space()
            .keyword(match self.quantifier {
                Quantifier::All => Token::All,
                Quantifier::Any => Token::Any,
            })
            .parens(&r.node(self.query.as_ref())?);

        let mut ts = TokenStream::new();
        ts.parens(&inner);
        Ok(ts)
    }
}

// =============================================================================
// Window functions
// =============================================================================

/// `expr OVER (PARTITION BY ... ORDER BY ...)`
#[derive(Debug, Clone)]
pub struct Over {
    expr: Expr,
    partition_by: Vec<Expr>,
    order_by: Vec<OrderBy>,
}

impl Over {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            partition_by: Vec::new(),
            order_by: Vec::new(),
        }
    }

    #[must_use]
    pub fn partition_by(mut self, expr: impl Into<Expr>) -> Self {
        self.partition_by.push(expr.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, expr: impl Into<Expr>) -> Self {
        self.order_by.push(OrderBy::asc(expr));
        self
    }

    #[must_use]
    pub fn order_by_desc(mut self, expr: impl Into<Expr>) -> Self {
        self.order_by.push(OrderBy::desc(expr));
        self
    }
}

impl Render for Over {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        r.require(super::dialect::Feature::WindowFunctions, "OVER clause")?;

        let mut window = TokenStream::new();
        if !self.partition_by.is_empty() {
            window
                .keyword(Token::PartitionBy)
                .append(&r.expr_list(&self.partition_by)?);
        }
        if !self.order_by.is_empty() {
            if !window.is_empty() {
                window.space();
            }
            let mut items = Vec::with_capacity(self.order_by.len());
            for item in &self.order_by {
                items.push(r.node(item)?);
            }
            window.keyword(Token::OrderBy).comma_separated(items);
        }

        let mut ts = r.expr(&self.expr)?;
        ts.space().keyword(Token::Over).parens(&window);
        Ok(ts)
    }
}

// =============================================================================
// Functions and casts
// =============================================================================

/// `NAME(arg,...)`. The name is remapped per dialect where engines
/// disagree (`LENGTH` is `LEN` on SQL Server) and is trusted text.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    args: Vec<Expr>,
}

impl Function {
    pub fn new<I, E>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Render for Function {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::from(Token::FunctionName(self.name.clone()));
        ts.parens(&r.expr_list(&self.args)?);
        Ok(ts)
    }
}

/// `CAST(expr AS type)`
#[derive(Debug, Clone)]
pub struct Cast {
    expr: Expr,
    data_type: DataType,
}

impl Cast {
    pub fn new(expr: impl Into<Expr>, data_type: DataType) -> Self {
        Self {
            expr: expr.into(),
            data_type,
        }
    }
}

impl Render for Cast {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut inner = r.expr(&self.expr)?;
        inner
            .space()
            .keyword(Token::As)
            .push(r.data_type(&self.data_type));

        let mut ts = TokenStream::from(Token::Cast);
        ts.parens(&inner);
        Ok(ts)
    }
}

pub fn func<I, E>(name: &str, args: I) -> Function
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Function::new(name, args)
}

/// COUNT(*)
pub fn count_star() -> Function {
    Function::new("COUNT", [Expr::raw("*")])
}

pub fn count(expr: impl Into<Expr>) -> Function {
    Function::new("COUNT", [expr.into()])
}

pub fn sum(expr: impl Into<Expr>) -> Function {
    Function::new("SUM", [expr.into()])
}

pub fn avg(expr: impl Into<Expr>) -> Function {
    Function::new("AVG", [expr.into()])
}

pub fn min(expr: impl Into<Expr>) -> Function {
    Function::new("MIN", [expr.into()])
}

pub fn max(expr: impl Into<Expr>) -> Function {
    Function::new("MAX", [expr.into()])
}

pub fn coalesce<I, E>(args: I) -> Function
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Function::new("COALESCE", args)
}

/// ROW_NUMBER(); pair with [`ExprExt::over`].
pub fn row_number() -> Function {
    Function::new("ROW_NUMBER", Vec::<Expr>::new())
}

macro_rules! node_into_expr {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Expr {
                fn from(node: $t) -> Self {
                    Expr::node(node)
                }
            }
        )*
    };
}

node_into_expr!(BoolExpr, LogicalClause, MathExpr, In, Exists, Quantified, Over, Function, Cast);

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently from anything that
/// converts into [`Expr`]: columns, aliases' columns, values, other nodes.
pub trait ExprExt: Into<Expr> + Sized {
    fn compare(self, op: Comparator, rhs: impl Into<Expr>) -> BoolExpr {
        BoolExpr::new(self, op, rhs)
    }

    // Comparison operators
    fn eq(self, rhs: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Eq, rhs)
    }

    fn ne(self, rhs: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Ne, rhs)
    }

    fn lt(self, rhs: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Lt, rhs)
    }

    fn lte(self, rhs: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Lte, rhs)
    }

    fn gt(self, rhs: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Gt, rhs)
    }

    fn gte(self, rhs: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Gte, rhs)
    }

    // String operators
    fn like(self, pattern: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::Like, pattern)
    }

    fn not_like(self, pattern: impl Into<Expr>) -> BoolExpr {
        self.compare(Comparator::NotLike, pattern)
    }

    // Null tests
    fn is_null(self) -> BoolExpr {
        self.compare(Comparator::Is, Expr::null())
    }

    fn is_not_null(self) -> BoolExpr {
        self.compare(Comparator::IsNot, Expr::null())
    }

    // Set membership
    fn in_list<I, E>(self, values: I) -> In
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        In::list(self, values)
    }

    fn not_in_list<I, E>(self, values: I) -> In
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        In::list(self, values).not()
    }

    fn in_query(self, query: Select) -> In {
        In::query(self, query)
    }

    fn all(self, op: Comparator, query: Select) -> Quantified {
        Quantified::all(self, op, query)
    }

    fn any(self, op: Comparator, query: Select) -> Quantified {
        Quantified::any(self, op, query)
    }

    // Logical operators
    fn and(self, other: impl Into<Expr>) -> LogicalClause {
        LogicalClause::new().and(self).and(other)
    }

    fn or(self, other: impl Into<Expr>) -> LogicalClause {
        LogicalClause::new().or(self).or(other)
    }

    // Arithmetic operators
    fn add(self, other: impl Into<Expr>) -> MathExpr {
        MathExpr::new(self).add(other)
    }

    fn sub(self, other: impl Into<Expr>) -> MathExpr {
        MathExpr::new(self).sub(other)
    }

    fn mul(self, other: impl Into<Expr>) -> MathExpr {
        MathExpr::new(self).mul(other)
    }

    fn div(self, other: impl Into<Expr>) -> MathExpr {
        MathExpr::new(self).div(other)
    }

    fn cast(self, data_type: DataType) -> Cast {
        Cast::new(self, data_type)
    }

    fn over(self) -> Over {
        Over::new(self)
    }
}

impl<T: Into<Expr>> ExprExt for T {}
