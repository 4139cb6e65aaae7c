//! Column and cast target types.
//!
//! `DataType` is engine-neutral; each dialect maps it to its own type name
//! (`Varchar(50)` is `NVARCHAR(50)` on SQL Server and `VARCHAR(50)` on MySQL).
//! `Custom` carries a caller-written type name plus an argument list for
//! anything the neutral variants do not cover.
//!
//! # Examples
//!
//! ```ignore
//! use quill::sql::types::DataType;
//!
//! let parsed = DataType::parse("decimal(10,2)").unwrap();
//! assert_eq!(parsed, DataType::Decimal(10, 2));
//! ```

use std::fmt;

use serde::Serialize;

use super::error::SqlError;
use super::render::{Render, Renderer};
use super::token::TokenStream;

/// Argument of a [`DataType::Custom`] type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TypeArg {
    /// Length, precision, or scale.
    Int(u32),
    /// `MAX` length.
    Max,
    /// Trusted, unescaped text (e.g. an ENUM member list entry).
    Keyword(String),
}

/// Engine-neutral SQL data type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Bool,

    /// 8-bit integer (TINYINT).
    Int8,

    /// 16-bit signed integer (SMALLINT).
    Int16,

    /// 32-bit signed integer (INT).
    Int32,

    /// 64-bit signed integer (BIGINT).
    Int64,

    Float32,
    Float64,

    /// Fixed-precision decimal: precision (total digits), scale (digits after
    /// the decimal point).
    Decimal(u8, u8),

    /// Unbounded text.
    String,

    /// Fixed-length character string.
    Char(u16),

    /// Variable-length character string. `u16::MAX` means `MAX`.
    Varchar(u16),

    Date,
    Time,
    Timestamp,
    TimestampTz,
    Binary,
    Json,
    Uuid,

    /// Engine-specific type, emitted as `NAME(arg,...)`.
    ///
    /// The name is trusted, unescaped text.
    Custom { name: String, args: Vec<TypeArg> },
}

impl DataType {
    /// Custom type without arguments.
    pub fn custom(name: impl Into<String>) -> Self {
        DataType::Custom {
            name: name.into(),
            args: vec![],
        }
    }

    /// Parse a SQL data type from a string.
    ///
    /// Accepts the common spellings of both engines plus ANSI names:
    /// `bit`, `bool`, `tinyint`, `smallint`, `int`, `bigint`, `real`,
    /// `float`, `double`, `decimal(p,s)`, `numeric(p,s)`, `text`, `char(n)`,
    /// `varchar(n)`, `nvarchar(n|max)`, `date`, `time`, `datetime`,
    /// `datetime2`, `timestamp`, `datetimeoffset`, `varbinary`, `blob`,
    /// `json`, `uniqueidentifier`, `uuid`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        // Handle types with parameters first
        if let Some(inner) =
            extract_parens(&s, "decimal").or_else(|| extract_parens(&s, "numeric"))
        {
            return parse_decimal_params(&inner);
        }

        if let Some(inner) = extract_parens(&s, "varchar")
            .or_else(|| extract_parens(&s, "nvarchar"))
            .or_else(|| extract_parens(&s, "character varying"))
        {
            return parse_length_param(&inner).map(DataType::Varchar);
        }

        if let Some(inner) = extract_parens(&s, "char")
            .or_else(|| extract_parens(&s, "nchar"))
            .or_else(|| extract_parens(&s, "character"))
        {
            return parse_length_param(&inner).map(DataType::Char);
        }

        match s.as_str() {
            "bool" | "boolean" | "bit" => Some(DataType::Bool),

            "tinyint" => Some(DataType::Int8),
            "smallint" => Some(DataType::Int16),
            "int" | "integer" => Some(DataType::Int32),
            "bigint" => Some(DataType::Int64),

            "real" => Some(DataType::Float32),
            "float" | "double" | "double precision" => Some(DataType::Float64),

            // Without parameters the engines default differently; pin a precision.
            "decimal" | "numeric" => Some(DataType::Decimal(18, 2)),

            "text" | "ntext" | "longtext" => Some(DataType::String),
            "varchar" | "nvarchar" => Some(DataType::String),

            "date" => Some(DataType::Date),
            "time" => Some(DataType::Time),
            "timestamp" | "datetime" | "datetime2" => Some(DataType::Timestamp),
            "timestamptz" | "datetimeoffset" => Some(DataType::TimestampTz),

            "binary" | "varbinary" | "blob" | "longblob" => Some(DataType::Binary),

            "json" => Some(DataType::Json),

            "uuid" | "uniqueidentifier" => Some(DataType::Uuid),

            _ => None,
        }
    }

    /// Returns true if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::Float32
                | DataType::Float64
                | DataType::Decimal(_, _)
        )
    }

    /// Returns true if this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        )
    }

    /// Returns true if this is a string/text type.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DataType::String | DataType::Char(_) | DataType::Varchar(_)
        )
    }

    /// Returns true if this is a temporal (date/time) type.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date | DataType::Time | DataType::Timestamp | DataType::TimestampTz
        )
    }
}

impl Render for DataType {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        Ok(r.data_type(self).into())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "bool"),
            DataType::Int8 => write!(f, "tinyint"),
            DataType::Int16 => write!(f, "smallint"),
            DataType::Int32 => write!(f, "int"),
            DataType::Int64 => write!(f, "bigint"),
            DataType::Float32 => write!(f, "real"),
            DataType::Float64 => write!(f, "double"),
            DataType::Decimal(p, s) => write!(f, "decimal({},{})", p, s),
            DataType::String => write!(f, "text"),
            DataType::Char(n) => write!(f, "char({})", n),
            DataType::Varchar(u16::MAX) => write!(f, "varchar(max)"),
            DataType::Varchar(n) => write!(f, "varchar({})", n),
            DataType::Date => write!(f, "date"),
            DataType::Time => write!(f, "time"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::TimestampTz => write!(f, "timestamptz"),
            DataType::Binary => write!(f, "binary"),
            DataType::Json => write!(f, "json"),
            DataType::Uuid => write!(f, "uuid"),
            DataType::Custom { name, .. } => write!(f, "{}", name),
        }
    }
}

/// Extract content inside parentheses for a given type prefix.
/// e.g., extract_parens("decimal(10,2)", "decimal") returns Some("10,2")
fn extract_parens(s: &str, prefix: &str) -> Option<String> {
    let rest = s.trim().strip_prefix(prefix)?.trim();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.to_string())
}

/// Parse decimal parameters "precision,scale" or "precision, scale".
fn parse_decimal_params(inner: &str) -> Option<DataType> {
    let (precision, scale) = inner.split_once(',')?;
    let precision: u8 = precision.trim().parse().ok()?;
    let scale: u8 = scale.trim().parse().ok()?;
    if scale > precision {
        return None;
    }
    Some(DataType::Decimal(precision, scale))
}

/// Parse a single length parameter; `max` is the SQL Server spelling of
/// an unbounded length.
fn parse_length_param(inner: &str) -> Option<u16> {
    let inner = inner.trim();
    if inner.eq_ignore_ascii_case("max") {
        return Some(u16::MAX);
    }
    inner.parse().ok()
}
