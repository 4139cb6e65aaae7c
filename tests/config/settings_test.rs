//! Settings file loading and default-dialect bootstrap.

use std::fs;
use std::path::PathBuf;

use quill::config::{Settings, SettingsError};
use quill::prelude::*;

const CONFIG: &str = r#"
[render]
dialect = "${QUILL_SETTINGS_TEST_DIALECT}"

[tables.orders]
schema = "shop"

[[tables.orders.columns]]
name = "id"
type = "bigint"
identity = true

[[tables.orders.columns]]
name = "status"
type = "varchar(16)"
nullable = false
default = "'new'"

[[tables.orders.columns]]
name = "scratch"
type = "text"
skip = true
"#;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quill-{}-{}.toml", name, std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_file_and_install_default() {
    std::env::set_var("QUILL_SETTINGS_TEST_DIALECT", "mssql-2012");
    let path = write_config("install", CONFIG);

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.dialect().unwrap(), Some(Dialect::SqlServer2012));
    assert_eq!(
        settings.install_default_dialect().unwrap(),
        Some(Dialect::SqlServer2012)
    );

    let orders = settings.table("orders").unwrap();
    let names: Vec<&str> = orders.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["id", "status"]);

    let mut params = Params::new();
    let sql = Create::new().table(&orders).to_sql_default(&mut params).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE [shop].[orders] ([id] BIGINT IDENTITY(1,1) NOT NULL,[status] NVARCHAR(16) NOT NULL DEFAULT 'new')"
    );

    let insert = Insert::into(&orders).add_pair(&orders.col("status").unwrap(), "paid");
    let sql = insert.to_sql_default(&mut params).unwrap();
    assert_eq!(sql, "INSERT INTO [shop].[orders] ([status]) VALUES (@param0)");

    fs::remove_file(path).unwrap();
}

#[test]
fn test_missing_file() {
    let err = Settings::from_file("/definitely/not/here/quill.toml").unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_malformed_file() {
    let path = write_config("malformed", "[render\ndialect = ");
    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::ParseError(_)));
    fs::remove_file(path).unwrap();
}

#[test]
fn test_unknown_column_type() {
    let path = write_config(
        "badtype",
        "[[tables.t.columns]]\nname = \"shape\"\ntype = \"geometry\"\n",
    );
    let settings = Settings::from_file(&path).unwrap();
    let err = settings.tables().unwrap_err();
    assert!(matches!(err, SettingsError::Sql(SqlError::Config(_))));
    fs::remove_file(path).unwrap();
}
