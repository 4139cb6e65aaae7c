//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::super::token::{Token, TokenStream};
use super::super::types::{DataType, TypeArg};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: SQL Server
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

// =============================================================================
// Literal Formatting (debug rendering only)
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with N prefix for Unicode.
/// Used by: SQL Server for non-ASCII strings
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

/// Escape backslashes as well as quotes; MySQL treats `\` as an escape
/// character in string literals by default.
pub fn quote_string_mysql(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Format boolean as numeric 1/0.
/// Used by: SQL Server, MySQL
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// Format bytes as a `0x` hex literal.
pub fn format_bytes_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for MySQL dialect.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        "GETDATE" => Some("NOW"),
        "LEN" => Some("CHAR_LENGTH"),
        "SUBSTR" => Some("SUBSTRING"),
        _ => None,
    }
}

/// Remap functions for SQL Server dialect.
pub fn remap_function_tsql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LENGTH" => Some("LEN"),
        "CHAR_LENGTH" => Some("LEN"),
        "SUBSTR" => Some("SUBSTRING"),
        "NOW" => Some("GETDATE"),
        "NVL" => Some("ISNULL"),
        "IFNULL" => Some("ISNULL"),
        _ => None,
    }
}

// =============================================================================
// Data Type Emission
// =============================================================================

/// Length value meaning "no fixed maximum" (`MAX` on SQL Server).
pub const MAX_LENGTH: u16 = u16::MAX;

/// Emit data type for SQL Server.
pub fn emit_data_type_tsql(dt: &DataType) -> String {
    match dt {
        DataType::Bool => "BIT".into(),
        DataType::Int8 => "TINYINT".into(),
        DataType::Int16 => "SMALLINT".into(),
        DataType::Int32 => "INT".into(),
        DataType::Int64 => "BIGINT".into(),
        DataType::Float32 => "REAL".into(),
        DataType::Float64 => "FLOAT".into(),
        DataType::Decimal(p, s) => format!("DECIMAL({},{})", p, s),
        DataType::String => "NVARCHAR(MAX)".into(),
        DataType::Char(n) => format!("NCHAR({})", n),
        DataType::Varchar(MAX_LENGTH) => "NVARCHAR(MAX)".into(),
        DataType::Varchar(n) => format!("NVARCHAR({})", n),
        DataType::Date => "DATE".into(),
        DataType::Time => "TIME".into(),
        DataType::Timestamp => "DATETIME2".into(),
        DataType::TimestampTz => "DATETIMEOFFSET".into(),
        DataType::Binary => "VARBINARY(MAX)".into(),
        DataType::Json => "NVARCHAR(MAX)".into(),
        DataType::Uuid => "UNIQUEIDENTIFIER".into(),
        DataType::Custom { name, args } => emit_custom_type(name, args),
    }
}

/// Emit data type for MySQL.
pub fn emit_data_type_mysql(dt: &DataType) -> String {
    match dt {
        DataType::Bool => "TINYINT(1)".into(),
        DataType::Int8 => "TINYINT".into(),
        DataType::Int16 => "SMALLINT".into(),
        DataType::Int32 => "INT".into(),
        DataType::Int64 => "BIGINT".into(),
        DataType::Float32 => "FLOAT".into(),
        DataType::Float64 => "DOUBLE".into(),
        DataType::Decimal(p, s) => format!("DECIMAL({},{})", p, s),
        DataType::String => "TEXT".into(),
        DataType::Char(n) => format!("CHAR({})", n),
        DataType::Varchar(MAX_LENGTH) => "LONGTEXT".into(),
        DataType::Varchar(n) => format!("VARCHAR({})", n),
        DataType::Date => "DATE".into(),
        DataType::Time => "TIME".into(),
        DataType::Timestamp => "DATETIME".into(),
        DataType::TimestampTz => "TIMESTAMP".into(),
        DataType::Binary => "LONGBLOB".into(),
        DataType::Json => "JSON".into(),
        DataType::Uuid => "CHAR(36)".into(),
        DataType::Custom { name, args } => emit_custom_type(name, args),
    }
}

/// Engine-specific type written by the caller, e.g. `GEOGRAPHY` or `ENUM('a','b')`.
fn emit_custom_type(name: &str, args: &[TypeArg]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let args: Vec<String> = args
        .iter()
        .map(|arg| match arg {
            TypeArg::Int(n) => n.to_string(),
            TypeArg::Max => "MAX".to_string(),
            TypeArg::Keyword(k) => k.clone(),
        })
        .collect();
    format!("{}({})", name, args.join(","))
}

// =============================================================================
// Identity / Auto-Increment
// =============================================================================

/// Emit identity for SQL Server (IDENTITY(seed,increment)).
pub fn emit_identity_tsql(seed: i64, increment: i64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Raw(format!("IDENTITY({},{})", seed, increment)));
    ts
}

/// Emit identity for MySQL (AUTO_INCREMENT). Seed and increment are
/// table or server options there, not column options.
pub fn emit_identity_mysql(_seed: i64, _increment: i64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Raw("AUTO_INCREMENT".into()));
    ts
}
