//! Value classification and the parameter sink.
//!
//! Anything a clause accepts is first converted into an [`Expr`], which is
//! exactly one of:
//!
//! - [`Expr::Node`] - a node that renders itself (columns, expressions, subqueries)
//! - [`Expr::Raw`] - trusted, unescaped SQL text
//! - [`Expr::Typed`] - a value bound with an explicit parameter type and size
//! - [`Expr::Value`] - a plain value, always bound as a parameter
//!
//! Plain and typed values never appear in the SQL text. The renderer appends
//! them to a [`Params`] sink and emits an `@paramN` placeholder, where N is
//! the sink length just before the append.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::render::Render;
use super::token::placeholder;
use super::types::DataType;

// =============================================================================
// Plain values
// =============================================================================

/// A plain value destined for a bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Whether this value counts as absent for clause omission.
    ///
    /// `Null` and the empty string are empty; everything else, including
    /// `0`, `false`, and empty byte strings, is not.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Int(v.into())
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(v.into())
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

// =============================================================================
// Custom-typed parameters
// =============================================================================

/// A value bound with an explicit target type and optional size, for drivers
/// that need the parameter type spelled out (e.g. `NVARCHAR(50)`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedParam {
    pub value: Value,
    pub data_type: DataType,
    pub size: Option<u32>,
}

impl TypedParam {
    pub fn new(value: impl Into<Value>, data_type: DataType) -> Self {
        Self {
            value: value.into(),
            data_type,
            size: None,
        }
    }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Anything a clause can hold, classified once at construction.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A node that renders itself through the renderer.
    Node(Arc<dyn Render>),
    /// Trusted, unescaped SQL text inserted verbatim.
    ///
    /// # Security Warning
    ///
    /// Never build this from user input. Use plain values instead; they are
    /// always bound as parameters.
    Raw(String),
    /// A value bound with an explicit parameter type.
    Typed(TypedParam),
    /// A plain value, always bound as a parameter.
    Value(Value),
}

impl Expr {
    /// Trusted, unescaped SQL text (a default-value expression, a date unit
    /// keyword, ...). Never pass user input here.
    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    /// Wrap any renderable node.
    pub fn node(node: impl Render + 'static) -> Self {
        Expr::Node(Arc::new(node))
    }

    /// The SQL `NULL` value (bound as a parameter except on the right-hand
    /// side of `IS` / `IS NOT`).
    pub fn null() -> Self {
        Expr::Value(Value::Null)
    }

    /// Whether this input counts as absent, so that containers can omit
    /// WHERE / HAVING / ON clauses instead of rendering `()`.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::Node(node) => node.is_empty(),
            Expr::Raw(sql) => sql.is_empty(),
            Expr::Typed(_) => false,
            Expr::Value(value) => value.is_empty(),
        }
    }

    /// Trusted keyword text such as a date-part unit (`DAY`, `MONTH`).
    /// Inserted verbatim; never pass user input here.
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Expr::Raw(keyword.into())
    }

    pub(crate) fn is_null_value(&self) -> bool {
        matches!(self, Expr::Value(Value::Null))
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Value(v)
    }
}

impl From<TypedParam> for Expr {
    fn from(p: TypedParam) -> Self {
        Expr::Typed(p)
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

macro_rules! expr_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Expr {
                fn from(v: $t) -> Self {
                    Expr::Value(v.into())
                }
            }
        )*
    };
}

expr_from_value!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, Vec<u8>);

impl<T: Into<Value>> From<Option<T>> for Expr {
    fn from(v: Option<T>) -> Self {
        Expr::Value(v.into())
    }
}

// =============================================================================
// Parameter sink
// =============================================================================

/// One bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    /// Placeholder name as it appears in the SQL text (`@param0`).
    pub name: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// Ordered, append-only parameter sink.
///
/// The Nth entry corresponds to the `@paramN` placeholder. A sink may be
/// reused for several renders in sequence, in which case numbering
/// continues from its current length; it must never be shared between
/// concurrent renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params {
    entries: Vec<Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Param> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.entries.iter()
    }

    /// Bound values in placeholder order.
    pub fn values(&self) -> Vec<&Value> {
        self.entries.iter().map(|p| &p.value).collect()
    }

    pub fn into_vec(self) -> Vec<Param> {
        self.entries
    }

    /// Append a value and return its placeholder index.
    pub(crate) fn push(
        &mut self,
        value: Value,
        data_type: Option<DataType>,
        size: Option<u32>,
    ) -> usize {
        let index = self.entries.len();
        self.entries.push(Param {
            name: placeholder(index),
            value,
            data_type,
            size,
        });
        index
    }

    /// Drop every entry from `len` on. Used to undo a failed render.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
