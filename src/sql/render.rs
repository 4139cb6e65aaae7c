//! The render protocol.
//!
//! Rendering is a conversation between two roles. Every node implements
//! [`Render`]; the [`Renderer`] carries the dialect, the parameter sink, and
//! the render mode. A node never formats its children or values itself: it
//! hands them back to the renderer (`r.node(..)`, `r.expr(..)`, `r.bind(..)`),
//! so identifier quoting and parameter allocation stay in one place and
//! placeholder order matches text order by construction (a single
//! depth-first, left-to-right walk).

use std::fmt;

use super::dialect::{default_dialect, Dialect, Feature, SqlDialect};
use super::error::SqlError;
use super::token::{Token, TokenStream};
use super::types::DataType;
use super::value::{Expr, Params, TypedParam, Value};

/// A node that can render itself as SQL tokens.
pub trait Render: fmt::Debug + Send + Sync {
    /// Render this node, routing children and values through `r`.
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError>;

    /// Whether this node has no renderable content.
    ///
    /// Containers use this to omit WHERE / HAVING / ON entirely rather than
    /// render an empty group.
    fn is_empty(&self) -> bool {
        false
    }

    /// Render to parameterized SQL, appending bound values to `params`.
    fn to_sql(&self, dialect: Dialect, params: &mut Params) -> Result<String, SqlError>
    where
        Self: Sized,
    {
        render_to_string(self, dialect, params, RenderMode::Parameterized)
    }

    /// Render with the process-wide default dialect.
    ///
    /// Fails with [`SqlError::NoDefaultDialect`] if none was configured.
    fn to_sql_default(&self, params: &mut Params) -> Result<String, SqlError>
    where
        Self: Sized,
    {
        self.to_sql(default_dialect()?, params)
    }

    /// Render with values substituted as literals.
    ///
    /// **For logging and debugging only.** The output re-introduces the
    /// injection risk that parameter binding exists to prevent; never
    /// execute it.
    fn to_debug_sql(&self, dialect: Dialect) -> Result<String, SqlError>
    where
        Self: Sized,
    {
        let mut scratch = Params::new();
        render_to_string(self, dialect, &mut scratch, RenderMode::Inline)
    }
}

/// How values reach the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Values become `@paramN` placeholders and sink entries.
    Parameterized,
    /// Values are written as literals. Debug output only.
    Inline,
}

fn render_to_string(
    node: &dyn Render,
    dialect: Dialect,
    params: &mut Params,
    mode: RenderMode,
) -> Result<String, SqlError> {
    let first = params.len();
    let mut r = Renderer {
        dialect,
        params,
        mode,
        qualify_columns: true,
    };
    let tokens = match r.node(node) {
        Ok(tokens) => tokens,
        Err(err) => {
            r.params.truncate(first);
            return Err(err);
        }
    };
    let sql = tokens.serialize(dialect);

    match mode {
        RenderMode::Parameterized => tracing::debug!(
            dialect = %dialect,
            params = r.params.len() - first,
            "rendered statement"
        ),
        RenderMode::Inline => tracing::warn!(
            dialect = %dialect,
            "rendered statement with inlined values; not safe to execute"
        ),
    }
    Ok(sql)
}

/// Render state shared by every node of one render call.
pub struct Renderer<'a> {
    dialect: Dialect,
    params: &'a mut Params,
    mode: RenderMode,
    qualify_columns: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: Dialect, params: &'a mut Params) -> Self {
        Self {
            dialect,
            params,
            mode: RenderMode::Parameterized,
            qualify_columns: true,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Whether column references carry their table qualifier.
    pub fn qualify_columns(&self) -> bool {
        self.qualify_columns
    }

    /// Render a child node.
    pub fn node(&mut self, node: &dyn Render) -> Result<TokenStream, SqlError> {
        node.render(self)
    }

    /// Render any clause input according to its classification.
    pub fn expr(&mut self, expr: &Expr) -> Result<TokenStream, SqlError> {
        match expr {
            Expr::Node(node) => self.node(node.as_ref()),
            Expr::Raw(sql) => Ok(Token::Raw(sql.clone()).into()),
            Expr::Typed(param) => Ok(self.bind_typed(param)?.into()),
            Expr::Value(value) => Ok(self.bind(value)?.into()),
        }
    }

    /// Render an expression stored in a table definition (CHECK bodies,
    /// column defaults).
    ///
    /// DDL cannot reference bound parameters, so values are written as
    /// literals, and column references drop their table qualifier.
    pub fn ddl_expr(&mut self, expr: &Expr) -> Result<TokenStream, SqlError> {
        let (mode, qualify) = (self.mode, self.qualify_columns);
        self.mode = RenderMode::Inline;
        self.qualify_columns = false;
        let result = self.expr(expr);
        self.mode = mode;
        self.qualify_columns = qualify;
        result
    }

    /// Render several inputs separated by commas.
    pub fn expr_list<'e>(
        &mut self,
        exprs: impl IntoIterator<Item = &'e Expr>,
    ) -> Result<TokenStream, SqlError> {
        let mut items = Vec::new();
        for expr in exprs {
            items.push(self.expr(expr)?);
        }
        let mut ts = TokenStream::new();
        ts.comma_separated(items);
        Ok(ts)
    }

    /// Bind a plain value and return its placeholder.
    pub fn bind(&mut self, value: &Value) -> Result<Token, SqlError> {
        self.bind_with(value, None, None)
    }

    /// Bind a value with an explicit parameter type.
    pub fn bind_typed(&mut self, param: &TypedParam) -> Result<Token, SqlError> {
        self.bind_with(&param.value, Some(&param.data_type), param.size)
    }

    fn bind_with(
        &mut self,
        value: &Value,
        data_type: Option<&DataType>,
        size: Option<u32>,
    ) -> Result<Token, SqlError> {
        match self.mode {
            RenderMode::Parameterized => {
                let index = self.params.push(value.clone(), data_type.cloned(), size);
                tracing::trace!(placeholder = index, "bound parameter");
                Ok(Token::Param(index))
            }
            RenderMode::Inline => literal(value),
        }
    }

    /// Quoted identifier token.
    pub fn ident(&self, name: &str) -> Token {
        Token::Ident(name.to_string())
    }

    /// Dialect spelling of a column type.
    pub fn data_type(&self, dt: &DataType) -> Token {
        Token::Raw(self.dialect.emit_data_type(dt))
    }

    /// Whether the target dialect supports `feature`.
    pub fn supports(&self, feature: Feature) -> Result<bool, SqlError> {
        self.dialect.capabilities().supports(feature)
    }

    /// Fail with an "unsupported for this engine" error unless the target
    /// dialect supports `feature`.
    pub fn require(&self, feature: Feature, operation: &str) -> Result<(), SqlError> {
        if self.supports(feature)? {
            Ok(())
        } else {
            tracing::debug!(?feature, dialect = %self.dialect, operation, "feature not supported");
            Err(SqlError::unsupported(operation, self.dialect))
        }
    }
}

/// Literal token for debug rendering.
fn literal(value: &Value) -> Result<Token, SqlError> {
    Ok(match value {
        Value::Null => Token::LitNull,
        Value::Bool(b) => Token::LitBool(*b),
        Value::Int(n) => Token::LitInt(*n),
        Value::Float(f) if f.is_finite() => Token::LitFloat(*f),
        Value::Float(f) => {
            return Err(SqlError::config(format!(
                "cannot inline non-finite float {}",
                f
            )))
        }
        Value::String(s) => Token::LitString(s.clone()),
        Value::Bytes(b) => Token::LitBytes(b.clone()),
    })
}

// =============================================================================
// Batches
// =============================================================================

/// Several statements rendered as one string.
///
/// Statements are joined by the dialect's separator and share one sink, so
/// placeholder numbering runs continuously across the whole batch. Empty
/// statements are skipped.
#[derive(Debug, Default)]
#[must_use = "batches have no effect until rendered"]
pub struct Batch {
    statements: Vec<Box<dyn Render>>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, statement: impl Render + 'static) -> Self {
        self.statements.push(Box::new(statement));
        self
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

impl Render for Batch {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        for statement in self.statements.iter().filter(|s| !s.is_empty()) {
            if !ts.is_empty() {
                ts.push(Token::Separator);
            }
            ts.append(&r.node(statement.as_ref())?);
        }
        Ok(ts)
    }

    fn is_empty(&self) -> bool {
        self.statements.iter().all(|s| s.is_empty())
    }
}
