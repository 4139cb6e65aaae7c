//! Declarative table schemas.
//!
//! A [`TableSchema`] lists a table's columns once, as data, and
//! [`Table::from_schema`] turns it into a registered [`Table`]. Schemas
//! deserialize from TOML (see `[tables.<name>]` in the settings file) or can
//! be built in code.
//!
//! ```toml
//! [tables.users]
//! schema = "dbo"
//!
//! [[tables.users.columns]]
//! name = "id"
//! type = "int"
//! identity = true
//!
//! [[tables.users.columns]]
//! name = "email"
//! type = "nvarchar(200)"
//! nullable = false
//!
//! [[tables.users.columns]]
//! name = "password_hash"
//! type = "varbinary"
//! skip = true
//! ```

use serde::{Deserialize, Serialize};

use super::error::SqlError;
use super::schema::Table;
use super::types::DataType;

/// One table's declared shape.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableSchema {
    pub name: String,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

/// One declared column.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColumnSchema {
    pub name: String,

    /// SQL type spelling, parsed with [`DataType::parse`].
    #[serde(rename = "type")]
    pub data_type: String,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// `IDENTITY(1,1)` / `AUTO_INCREMENT`.
    #[serde(default)]
    pub identity: bool,

    /// Default value as trusted SQL text.
    #[serde(default)]
    pub default: Option<String>,

    /// Excluded from the table.
    #[serde(default)]
    pub skip: bool,
}

fn default_nullable() -> bool {
    true
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            columns: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn column(mut self, column: ColumnSchema) -> Self {
        self.columns.push(column);
        self
    }
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            identity: false,
            default: None,
            skip: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn default_raw(mut self, sql: impl Into<String>) -> Self {
        self.default = Some(sql.into());
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }
}

impl Table {
    /// Build a table from its declaration.
    ///
    /// Columns register in declaration order; skipped columns are left out
    /// entirely, so statements built from the table never mention them.
    pub fn from_schema(schema: &TableSchema) -> Result<Table, SqlError> {
        let mut table = Table::new(schema.name.as_str());
        if let Some(ref s) = schema.schema {
            table = table.with_schema(s.as_str());
        }

        for decl in schema.columns.iter().filter(|c| !c.skip) {
            let data_type = DataType::parse(&decl.data_type).ok_or_else(|| {
                SqlError::config(format!(
                    "column '{}.{}' has unknown type '{}'",
                    schema.name, decl.name, decl.data_type
                ))
            })?;

            let column = table.add_column(decl.name.as_str(), data_type);
            if !decl.nullable {
                column.not_null();
            }
            if let Some(ref default) = decl.default {
                column.default_raw(default.as_str());
            }
            if decl.identity {
                column.identity(1, 1);
            }
        }

        tracing::trace!(
            table = %schema.name,
            columns = table.columns().len(),
            "registered declared table"
        );
        Ok(table)
    }
}
