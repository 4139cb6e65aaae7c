//! INSERT / UPDATE / DELETE through the public API.

use insta::assert_snapshot;
use quill::prelude::*;

fn accounts() -> Table {
    let mut t = Table::new("accounts");
    t.add_column("id", DataType::Int64).identity(1, 1);
    t.add_column("owner", DataType::Varchar(80)).not_null();
    t.add_column("balance", DataType::Decimal(14, 2)).not_null();
    t
}

#[test]
fn test_insert_two_pairs_binds_in_call_order() {
    let a = accounts();
    let insert = Insert::into(&a)
        .add_pair(&a.col("owner").unwrap(), "ada")
        .add_pair(&a.col("balance").unwrap(), 12.5);

    for dialect in Dialect::ALL {
        let mut params = Params::new();
        let sql = insert.to_sql(dialect, &mut params).unwrap();
        let q = |s: &str| dialect.quote_identifier(s);
        assert_eq!(
            sql,
            format!(
                "INSERT INTO {} ({},{}) VALUES (@param0,@param1)",
                q("accounts"),
                q("owner"),
                q("balance")
            )
        );
        assert_eq!(params.values(), vec![&Value::from("ada"), &Value::Float(12.5)]);
    }
}

#[test]
fn test_typed_parameter_keeps_its_type() {
    let a = accounts();
    let insert = Insert::into(&a).add_pair(
        &a.col("owner").unwrap(),
        TypedParam::new("grace", DataType::Char(10)).size(10),
    );

    let mut params = Params::new();
    insert.to_sql(Dialect::SqlServer2012, &mut params).unwrap();
    let param = params.get(0).unwrap();
    assert_eq!(param.name, "@param0");
    assert_eq!(param.data_type, Some(DataType::Char(10)));
    assert_eq!(param.size, Some(10));
}

#[test]
fn test_arithmetic_update() {
    let a = accounts();
    let balance = a.col("balance").unwrap();
    let update = Update::table(&a)
        .set(&balance, balance.clone().sub(25))
        .where_(a.col("id").unwrap().eq(3_i64))
        .where_(balance.clone().gte(25));

    let mut params = Params::new();
    let sql = update.to_sql(Dialect::MySql80, &mut params).unwrap();
    assert_snapshot!(sql, @"UPDATE `accounts` SET `balance` = (`accounts`.`balance` - @param0) WHERE ((`accounts`.`id` = @param1) AND (`accounts`.`balance` >= @param2))");
    assert_eq!(
        params.values(),
        vec![&Value::Int(25), &Value::Int(3), &Value::Int(25)]
    );
}

#[test]
fn test_output_clause_is_gated() {
    let a = accounts();
    let delete = Delete::from(&a)
        .where_(a.col("balance").unwrap().lt(0))
        .output(&a.col("id").unwrap());

    let mut params = Params::new();
    assert_eq!(
        delete.to_sql(Dialect::SqlServer2008, &mut params).unwrap(),
        "DELETE FROM [accounts] OUTPUT DELETED.[id] WHERE ([accounts].[balance] < @param0)"
    );

    for dialect in [Dialect::MySql57, Dialect::MySql80] {
        let mut params = Params::new();
        let err = delete.to_sql(dialect, &mut params).unwrap_err();
        assert_eq!(
            err,
            SqlError::Unsupported {
                operation: "OUTPUT clause".into(),
                dialect
            }
        );
    }
}

#[test]
fn test_truncate_rejects_filter() {
    let a = accounts();
    let mut params = Params::new();

    let sql = Delete::from(&a)
        .truncate()
        .to_sql(Dialect::SqlServer2012, &mut params)
        .unwrap();
    assert_eq!(sql, "TRUNCATE TABLE [accounts]");

    let err = Delete::from(&a)
        .truncate()
        .where_(a.col("id").unwrap().eq(1))
        .to_sql(Dialect::SqlServer2012, &mut params)
        .unwrap_err();
    assert!(matches!(err, SqlError::Config(_)));
}

#[test]
fn test_batch_shares_one_sink() {
    let a = accounts();
    let batch = Batch::new()
        .add(
            Update::table(&a)
                .set(&a.col("balance").unwrap(), 0)
                .where_(a.col("owner").unwrap().eq("ada")),
        )
        .add(Delete::from(&a).where_(a.col("owner").unwrap().eq("bob")));

    let mut params = Params::new();
    let sql = batch.to_sql(Dialect::SqlServer2012, &mut params).unwrap();
    assert_eq!(
        sql,
        "UPDATE [accounts] SET [balance] = @param0 WHERE ([accounts].[owner] = @param1);\nDELETE FROM [accounts] WHERE ([accounts].[owner] = @param2)"
    );
    assert_eq!(
        params.values(),
        vec![&Value::Int(0), &Value::from("ada"), &Value::from("bob")]
    );
}

#[test]
fn test_sequential_renders_continue_numbering() {
    let a = accounts();
    let delete = Delete::from(&a).where_(a.col("id").unwrap().eq(1));

    let mut params = Params::new();
    let first = delete.to_sql(Dialect::MySql57, &mut params).unwrap();
    let second = delete.to_sql(Dialect::MySql57, &mut params).unwrap();
    assert!(first.ends_with("@param0)"));
    assert!(second.ends_with("@param1)"));
    assert_eq!(params.len(), 2);
}
