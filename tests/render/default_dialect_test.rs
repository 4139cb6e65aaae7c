//! Rendering with a configured process default.
//!
//! The default dialect is process-wide, so this scenario runs in its own
//! test binary with a single test.

use quill::prelude::*;
use quill::sql::{default_dialect, set_default_dialect};

#[test]
fn test_default_dialect_is_set_once() {
    set_default_dialect(Dialect::MySql80).unwrap();
    set_default_dialect(Dialect::MySql80).unwrap();
    assert!(matches!(
        set_default_dialect(Dialect::SqlServer2012),
        Err(SqlError::Config(_))
    ));
    assert_eq!(default_dialect(), Ok(Dialect::MySql80));

    let mut t = Table::new("t");
    t.add_column("id", DataType::Int32);
    let query = Select::new().from(&t).where_(t.col("id").unwrap().eq(1));

    let mut params = Params::new();
    let implicit = query.to_sql_default(&mut params).unwrap();
    let mut params = Params::new();
    let explicit = query.to_sql(Dialect::MySql80, &mut params).unwrap();
    assert_eq!(implicit, explicit);
    assert_eq!(implicit, "SELECT * FROM `t` WHERE (`t`.`id` = @param0)");
}
