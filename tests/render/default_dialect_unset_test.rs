//! Rendering with the process default before one is configured.
//!
//! The default dialect is process-wide, so this scenario runs in its own
//! test binary.

use quill::prelude::*;
use quill::sql::default_dialect;

#[test]
fn test_default_render_without_configuration_fails() {
    let mut t = Table::new("t");
    t.add_column("id", DataType::Int32);
    let query = Select::new().from(&t).where_(t.col("id").unwrap().eq(1));

    assert_eq!(default_dialect(), Err(SqlError::NoDefaultDialect));

    let mut params = Params::new();
    assert_eq!(
        query.to_sql_default(&mut params),
        Err(SqlError::NoDefaultDialect)
    );
    assert!(params.is_empty());
}
