//! Parameter binding, debug rendering, and concurrent rendering.

use std::sync::Arc;
use std::thread;

use quill::prelude::*;

fn people() -> Table {
    let mut t = Table::new("people");
    t.add_column("id", DataType::Int32);
    t.add_column("name", DataType::Varchar(60));
    t.add_column("photo", DataType::Binary);
    t
}

#[test]
fn test_raw_text_is_passed_through() {
    let p = people();
    let query = Select::new()
        .select_as(Expr::raw("DATEADD(day, 1, GETDATE())"), "tomorrow")
        .from(&p)
        .where_(Expr::raw("1 = 1"));

    let mut params = Params::new();
    let sql = query.to_sql(Dialect::SqlServer2012, &mut params).unwrap();
    assert_eq!(
        sql,
        "SELECT DATEADD(day, 1, GETDATE()) AS [tomorrow] FROM [people] WHERE (1 = 1)"
    );
    assert!(params.is_empty());
}

#[test]
fn test_every_value_kind_is_bound() {
    let p = people();
    let insert = Insert::into(&p)
        .add_pair(&p.col("id").unwrap(), Option::<i32>::None)
        .add_pair(&p.col("name").unwrap(), String::from("Łukasz"))
        .add_pair(&p.col("photo").unwrap(), vec![0xde_u8, 0xad]);

    let mut params = Params::new();
    let sql = insert.to_sql(Dialect::MySql80, &mut params).unwrap();
    assert!(sql.ends_with("VALUES (@param0,@param1,@param2)"), "{}", sql);
    assert_eq!(
        params.values(),
        vec![
            &Value::Null,
            &Value::from("Łukasz"),
            &Value::Bytes(vec![0xde, 0xad])
        ]
    );
}

#[test]
fn test_debug_sql_literals_per_dialect() {
    let p = people();
    let insert = Insert::into(&p)
        .add_pair(&p.col("id").unwrap(), 7)
        .add_pair(&p.col("name").unwrap(), "it's")
        .add_pair(&p.col("photo").unwrap(), vec![0x0f_u8]);

    let sql = insert.to_debug_sql(Dialect::SqlServer2012).unwrap();
    assert!(sql.ends_with("VALUES (7,'it''s',0x0F)"), "{}", sql);
    assert!(!sql.contains("@param"));
}

#[test]
fn test_params_serialize_for_the_execution_layer() {
    let p = people();
    let query = Select::new()
        .from(&p)
        .where_(p.col("id").unwrap().eq(5))
        .where_(p.col("name").unwrap().eq("x"));

    let mut params = Params::new();
    query.to_sql(Dialect::MySql57, &mut params).unwrap();
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json[0]["name"], "@param0");
    assert_eq!(json[1]["name"], "@param1");
    assert_eq!(json.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_concurrent_renders_with_own_sinks() {
    let p = people();
    let query = Arc::new(
        Select::new()
            .select(p.col("name").unwrap())
            .from(&p)
            .where_(p.col("id").unwrap().in_list([1, 2, 3]))
            .order_by(p.col("name").unwrap())
            .skip(10)
            .take(10),
    );

    let mut expected = Params::new();
    let expected_sql = query.to_sql(Dialect::SqlServer2012, &mut expected).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let query = Arc::clone(&query);
            thread::spawn(move || {
                let mut params = Params::new();
                let sql = query.to_sql(Dialect::SqlServer2012, &mut params).unwrap();
                (sql, params)
            })
        })
        .collect();

    for handle in handles {
        let (sql, params) = handle.join().unwrap();
        assert_eq!(sql, expected_sql);
        assert_eq!(params, expected);
    }
}

#[test]
fn test_unknown_dialect_lookup() {
    assert!(matches!(
        Dialect::lookup(Engine::SqlServer, "2019"),
        Err(SqlError::UnknownDialect(_))
    ));
    assert!(matches!(
        "postgres-16".parse::<Dialect>(),
        Err(SqlError::UnknownDialect(_))
    ));
    assert_eq!("mysql-5.7".parse::<Dialect>(), Ok(Dialect::MySql57));
}

#[test]
fn test_failed_render_binds_nothing() {
    let p = people();
    let id = p.col("id").unwrap();
    let query = Select::new()
        .from(&p)
        .where_(id.clone().eq(1))
        .order_by(row_number().over().order_by(id));

    let mut params = Params::new();
    let err = query.to_sql(Dialect::MySql57, &mut params).unwrap_err();
    assert!(err.is_unsupported());
    assert!(params.is_empty());

    let sql = query.to_sql(Dialect::MySql80, &mut params).unwrap();
    assert!(sql.contains("@param0"), "{}", sql);
    assert_eq!(params.len(), 1);
}

#[test]
fn test_failed_batch_rolls_back_earlier_statements() {
    let p = people();
    let batch = Batch::new()
        .add(Select::new().from(&p).where_(p.col("id").unwrap().eq(1)))
        .add(Select::new().from(&p).where_(p.col("name").unwrap().eq("x")).skip(10));

    let mut params = Params::new();
    Delete::from(&p)
        .where_(p.col("id").unwrap().eq(99))
        .to_sql(Dialect::SqlServer2008, &mut params)
        .unwrap();

    let err = batch.to_sql(Dialect::SqlServer2008, &mut params).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(params.values(), vec![&Value::Int(99)]);
}
