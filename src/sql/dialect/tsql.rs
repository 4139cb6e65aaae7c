//! SQL Server (T-SQL) dialect.
//!
//! T-SQL differences that matter here:
//! - Square bracket identifier quoting (`[name]`)
//! - `TOP (n)` on 2008; `OFFSET ... FETCH NEXT` from 2012 (requires ORDER BY)
//! - `IDENTITY(seed,increment)` columns
//! - `OUTPUT INSERTED.x` / `OUTPUT DELETED.x`, optionally `INTO` a table
//! - UPDATE joins go in a separate `FROM` clause after `SET`
//! - `ALTER COLUMN` and named `DROP CONSTRAINT`
//! - Table hints (`WITH (NOLOCK)`) and CLUSTERED / NONCLUSTERED indexes
//! - N'...' prefix for Unicode strings

use std::sync::LazyLock;

use super::capability::{Capabilities, Feature};
use super::helpers;
use super::{DropConstraintStyle, DropIndexStyle, Engine, PagingStyle, SqlDialect, UpdateJoinStyle};
use crate::sql::token::{Token, TokenStream};
use crate::sql::types::DataType;

static CAPABILITIES_2008: LazyLock<Capabilities> = LazyLock::new(|| {
    Capabilities::new("mssql-2008")
        .with(Feature::OffsetPaging, false)
        .with(Feature::OutputClause, true)
        .with(Feature::WindowFunctions, true)
        .with(Feature::FullOuterJoin, true)
        .with(Feature::TableHints, true)
        .with(Feature::ClusteredIndex, true)
        .with(Feature::IndexMethod, false)
        .with(Feature::DropCheckConstraint, true)
});

static CAPABILITIES_2012: LazyLock<Capabilities> = LazyLock::new(|| {
    Capabilities::new("mssql-2012")
        .with(Feature::OffsetPaging, true)
        .with(Feature::OutputClause, true)
        .with(Feature::WindowFunctions, true)
        .with(Feature::FullOuterJoin, true)
        .with(Feature::TableHints, true)
        .with(Feature::ClusteredIndex, true)
        .with(Feature::IndexMethod, false)
        .with(Feature::DropCheckConstraint, true)
});

/// Registered SQL Server versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlServerVersion {
    V2008,
    V2012,
}

/// SQL Server dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql {
    version: SqlServerVersion,
}

impl TSql {
    pub const V2008: TSql = TSql {
        version: SqlServerVersion::V2008,
    };
    pub const V2012: TSql = TSql {
        version: SqlServerVersion::V2012,
    };

    pub fn version(&self) -> SqlServerVersion {
        self.version
    }
}

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        match self.version {
            SqlServerVersion::V2008 => "mssql-2008",
            SqlServerVersion::V2012 => "mssql-2012",
        }
    }

    fn engine(&self) -> Engine {
        Engine::SqlServer
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_bracket(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        if !s.is_ascii() {
            helpers::quote_string_unicode(s)
        } else {
            helpers::quote_string_single(s)
        }
    }

    fn capabilities(&self) -> &'static Capabilities {
        match self.version {
            SqlServerVersion::V2008 => &CAPABILITIES_2008,
            SqlServerVersion::V2012 => &CAPABILITIES_2012,
        }
    }

    fn paging_style(&self) -> PagingStyle {
        match self.version {
            SqlServerVersion::V2008 => PagingStyle::Top,
            SqlServerVersion::V2012 => PagingStyle::OffsetFetch,
        }
    }

    fn requires_order_by_for_offset(&self) -> bool {
        true
    }

    fn update_join_style(&self) -> UpdateJoinStyle {
        UpdateJoinStyle::FromClause
    }

    fn change_column_keyword(&self) -> Token {
        Token::Alter
    }

    fn drop_constraint_style(&self) -> DropConstraintStyle {
        DropConstraintStyle::Named
    }

    fn drop_index_style(&self) -> DropIndexStyle {
        DropIndexStyle::OnTable
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_tsql(name)
    }

    fn emit_data_type(&self, dt: &DataType) -> String {
        helpers::emit_data_type_tsql(dt)
    }

    fn emit_identity(&self, seed: i64, increment: i64) -> TokenStream {
        helpers::emit_identity_tsql(seed, increment)
    }
}
