//! Test utilities for rendered SQL.
//!
//! Validates that rendered statements are syntactically correct using
//! sqlparser-rs. Placeholders (`@param0`) parse as variables under both
//! parser dialects.

use sqlparser::dialect::{MsSqlDialect, MySqlDialect};
use sqlparser::parser::Parser;

use super::dialect::{Dialect, Engine, SqlDialect};

/// Validates that a SQL string is syntactically valid for the given dialect.
///
/// # Example
///
/// ```ignore
/// use crate::sql::test_utils::validate_sql;
/// use crate::sql::dialect::Dialect;
///
/// validate_sql("SELECT * FROM [users]", Dialect::SqlServer2012).unwrap();
/// ```
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect.engine() {
        Engine::SqlServer => Box::new(MsSqlDialect {}),
        Engine::MySql => Box::new(MySqlDialect {}),
    };

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {}: {}\nSQL: {}", dialect, e, sql))
}

/// Panics with the parser error if `sql` does not parse.
pub fn assert_valid_sql(sql: &str, dialect: Dialect) {
    if let Err(e) = validate_sql(sql, dialect) {
        panic!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT * FROM [users]", Dialect::SqlServer2012).unwrap();
        validate_sql("SELECT * FROM `users`", Dialect::MySql80).unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC * FORM users", Dialect::MySql57);
        assert!(result.is_err());
    }
}
