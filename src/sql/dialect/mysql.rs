//! MySQL dialect.
//!
//! MySQL differences that matter here:
//! - Backtick identifier quoting (`` `name` ``)
//! - `LIMIT start,count` paging
//! - `AUTO_INCREMENT` columns
//! - No OUTPUT clause, no FULL OUTER JOIN, no table hints
//! - UPDATE joins go inline, before `SET`
//! - `MODIFY COLUMN` and kind-specific DROP syntax
//!   (`DROP PRIMARY KEY`, `DROP FOREIGN KEY`, `DROP INDEX`, `DROP CHECK`)
//! - Window functions and `DROP CHECK` only from 8.0

use std::sync::LazyLock;

use super::capability::{Capabilities, Feature};
use super::helpers;
use super::{DropConstraintStyle, DropIndexStyle, Engine, PagingStyle, SqlDialect, UpdateJoinStyle};
use crate::sql::token::{Token, TokenStream};
use crate::sql::types::DataType;

static CAPABILITIES_57: LazyLock<Capabilities> = LazyLock::new(|| {
    Capabilities::new("mysql-5.7")
        .with(Feature::OffsetPaging, true)
        .with(Feature::OutputClause, false)
        .with(Feature::WindowFunctions, false)
        .with(Feature::FullOuterJoin, false)
        .with(Feature::TableHints, false)
        .with(Feature::ClusteredIndex, false)
        .with(Feature::IndexMethod, true)
        .with(Feature::DropCheckConstraint, false)
});

static CAPABILITIES_80: LazyLock<Capabilities> = LazyLock::new(|| {
    Capabilities::new("mysql-8.0")
        .with(Feature::OffsetPaging, true)
        .with(Feature::OutputClause, false)
        .with(Feature::WindowFunctions, true)
        .with(Feature::FullOuterJoin, false)
        .with(Feature::TableHints, false)
        .with(Feature::ClusteredIndex, false)
        .with(Feature::IndexMethod, true)
        .with(Feature::DropCheckConstraint, true)
});

/// Registered MySQL versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlVersion {
    V57,
    V80,
}

/// MySQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql {
    version: MySqlVersion,
}

impl MySql {
    pub const V57: MySql = MySql {
        version: MySqlVersion::V57,
    };
    pub const V80: MySql = MySql {
        version: MySqlVersion::V80,
    };

    pub fn version(&self) -> MySqlVersion {
        self.version
    }
}

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        match self.version {
            MySqlVersion::V57 => "mysql-5.7",
            MySqlVersion::V80 => "mysql-8.0",
        }
    }

    fn engine(&self) -> Engine {
        Engine::MySql
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_mysql(s)
    }

    fn capabilities(&self) -> &'static Capabilities {
        match self.version {
            MySqlVersion::V57 => &CAPABILITIES_57,
            MySqlVersion::V80 => &CAPABILITIES_80,
        }
    }

    fn paging_style(&self) -> PagingStyle {
        PagingStyle::Limit
    }

    fn update_join_style(&self) -> UpdateJoinStyle {
        UpdateJoinStyle::Inline
    }

    fn change_column_keyword(&self) -> Token {
        Token::Modify
    }

    fn drop_constraint_style(&self) -> DropConstraintStyle {
        DropConstraintStyle::Typed
    }

    fn drop_index_style(&self) -> DropIndexStyle {
        DropIndexStyle::AlterTable
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_mysql(name)
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_mysql(dt)
    }

    fn emit_identity(&self, seed: i64, increment: i64) -> TokenStream {
        helpers::emit_identity_mysql(seed, increment)
    }
}
