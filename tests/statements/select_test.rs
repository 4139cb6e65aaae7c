//! SELECT rendering through the public API.

use insta::assert_snapshot;
use quill::expr::{Comparator, Exists, In};
use quill::prelude::*;

fn customers() -> Table {
    let mut t = Table::new("customers").with_schema("sales");
    t.add_column("id", DataType::Int32).identity(1, 1);
    t.add_column("name", DataType::Varchar(100)).not_null();
    t.add_column("region", DataType::Varchar(20));
    t
}

fn invoices() -> Table {
    let mut t = Table::new("invoices").with_schema("sales");
    t.add_column("id", DataType::Int32);
    t.add_column("customer_id", DataType::Int32);
    t.add_column("amount", DataType::Decimal(12, 2));
    t
}

fn render(node: &impl Render, dialect: Dialect) -> (String, Params) {
    let mut params = Params::new();
    let sql = node.to_sql(dialect, &mut params).unwrap();
    (sql, params)
}

#[test]
fn test_values_never_reach_the_text() {
    let c = customers();
    let secrets = ["x' OR '1'='1", "Zürich", "42.5e3"];
    let query = Select::new()
        .from(&c)
        .where_(c.col("name").unwrap().eq(secrets[0]))
        .where_(c.col("region").unwrap().in_list([secrets[1], secrets[2]]));

    for dialect in Dialect::ALL {
        let (sql, params) = render(&query, dialect);
        for secret in secrets {
            assert!(!sql.contains(secret), "{} leaked into {}", secret, sql);
        }
        assert_eq!(params.len(), 3);
        for (i, param) in params.iter().enumerate() {
            assert_eq!(param.name, format!("@param{}", i));
            assert!(sql.contains(&param.name));
        }
        assert_eq!(
            params.values(),
            vec![
                &Value::from(secrets[0]),
                &Value::from(secrets[1]),
                &Value::from(secrets[2])
            ]
        );
    }
}

#[test]
fn test_empty_clauses_are_omitted() {
    let c = customers();
    let i = invoices();
    let empties = [
        Expr::null(),
        Expr::from(""),
        Expr::raw(""),
        Expr::from(LogicalClause::new()),
        Expr::from(LogicalClause::new().or(Expr::null()).and("")),
    ];

    for empty in empties {
        let query = Select::new()
            .select(c.col("region").unwrap())
            .from(&c)
            .join(&i, empty.clone())
            .where_(empty.clone())
            .group_by(c.col("region").unwrap())
            .having(empty);

        for dialect in Dialect::ALL {
            let (sql, params) = render(&query, dialect);
            assert!(!sql.contains("WHERE"), "{}", sql);
            assert!(!sql.contains("HAVING"), "{}", sql);
            assert!(!sql.contains(" ON "), "{}", sql);
            assert!(params.is_empty());
        }
    }
}

#[test]
fn test_render_is_idempotent() {
    let c = customers();
    let i = invoices();
    let query = Select::new()
        .select(c.col("name").unwrap())
        .select_as(sum(i.col("amount").unwrap()), "total")
        .from(&c)
        .left_join(&i, i.col("customer_id").unwrap().eq(c.col("id").unwrap()))
        .where_(c.col("region").unwrap().eq("EU"))
        .group_by(c.col("name").unwrap())
        .having(sum(i.col("amount").unwrap()).gt(1000))
        .order_by_desc(c.col("name").unwrap())
        .skip(20)
        .take(10);

    for dialect in [Dialect::SqlServer2012, Dialect::MySql57, Dialect::MySql80] {
        let (first_sql, first_params) = render(&query, dialect);
        let (second_sql, second_params) = render(&query, dialect);
        assert_eq!(first_sql, second_sql);
        assert_eq!(first_params, second_params);
    }
}

#[test]
fn test_select_all_after_select() {
    let c = customers();
    let query = Select::new()
        .select(c.col("id").unwrap())
        .select_as(c.col("name").unwrap(), "customer")
        .select_all()
        .from(&c);

    let (sql, _) = render(&query, Dialect::SqlServer2012);
    assert_eq!(sql, "SELECT * FROM [sales].[customers]");
}

#[test]
fn test_or_clause_with_empty_first_operand() {
    let mut t = Table::new("t");
    t.add_column("col", DataType::Int32);

    let clause = LogicalClause::new()
        .or(Expr::null())
        .or(t.col("col").unwrap().eq(1));

    let (sql, params) = render(&clause, Dialect::MySql80);
    assert_eq!(sql, "(`t`.`col` = @param0)");
    assert_eq!(params.values(), vec![&Value::Int(1)]);
}

#[test]
fn test_negation_sits_outside_the_group_parentheses() {
    let c = customers();
    let i = invoices();
    let ids = || Select::new().select(i.col("customer_id").unwrap()).from(&i);

    for dialect in Dialect::ALL {
        let (sql, _) = render(&In::query(c.col("id").unwrap(), ids()).not(), dialect);
        assert!(sql.starts_with('('), "{}", sql);
        assert!(sql.contains(" NOT IN (SELECT "), "{}", sql);

        let (sql, _) = render(&Exists::new(ids()).not(), dialect);
        assert!(sql.starts_with("(NOT EXISTS ("), "{}", sql);

        let (sql, _) = render(
            &c.col("id").unwrap().any(Comparator::Eq, ids()).not(),
            dialect,
        );
        assert!(sql.starts_with("(NOT "), "{}", sql);
        assert!(sql.contains(" = ANY (SELECT "), "{}", sql);

        let (sql, _) = render(
            &c.col("id").unwrap().all(Comparator::Ne, ids()).not(),
            dialect,
        );
        assert!(sql.starts_with("(NOT "), "{}", sql);
        assert!(sql.contains(" <> ALL (SELECT "), "{}", sql);
    }
}

#[test]
fn test_report_query_per_dialect() {
    let c = customers();
    let i = invoices();
    let query = Select::new()
        .select(c.col("name").unwrap())
        .select_as(count(i.col("id").unwrap()), "invoices")
        .from(&c)
        .join(&i, i.col("customer_id").unwrap().eq(c.col("id").unwrap()))
        .where_(c.col("region").unwrap().ne("internal"))
        .group_by(c.col("name").unwrap())
        .order_by(c.col("name").unwrap())
        .take(5);

    let (sql, params) = render(&query, Dialect::SqlServer2008);
    assert_snapshot!(sql, @"SELECT TOP (@param0) [customers].[name],COUNT([invoices].[id]) AS [invoices] FROM [sales].[customers] INNER JOIN [sales].[invoices] ON ([invoices].[customer_id] = [customers].[id]) WHERE ([customers].[region] <> @param1) GROUP BY [customers].[name] ORDER BY [customers].[name] ASC");
    assert_eq!(params.values(), vec![&Value::Int(5), &Value::from("internal")]);

    let (sql, params) = render(&query, Dialect::MySql80);
    assert_snapshot!(sql, @"SELECT `customers`.`name`,COUNT(`invoices`.`id`) AS `invoices` FROM `sales`.`customers` INNER JOIN `sales`.`invoices` ON (`invoices`.`customer_id` = `customers`.`id`) WHERE (`customers`.`region` <> @param0) GROUP BY `customers`.`name` ORDER BY `customers`.`name` ASC LIMIT @param1");
    assert_eq!(params.values(), vec![&Value::from("internal"), &Value::Int(5)]);
}

#[test]
fn test_window_function_gating() {
    let i = invoices();
    let query = Select::new()
        .select_as(
            row_number()
                .over()
                .partition_by(i.col("customer_id").unwrap())
                .order_by_desc(i.col("amount").unwrap()),
            "rank",
        )
        .from(&i);

    let (sql, _) = render(&query, Dialect::SqlServer2012);
    assert!(sql.contains("ROW_NUMBER() OVER (PARTITION BY"), "{}", sql);

    let mut params = Params::new();
    let err = query.to_sql(Dialect::MySql57, &mut params).unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("mysql-5.7"));
}

#[test]
fn test_debug_rendering_inlines_values() {
    let c = customers();
    let query = Select::new()
        .select(c.col("name").unwrap())
        .from(&c)
        .where_(c.col("name").unwrap().like("O'Br%"));

    assert_eq!(
        query.to_debug_sql(Dialect::MySql80).unwrap(),
        "SELECT `customers`.`name` FROM `sales`.`customers` WHERE (`customers`.`name` LIKE 'O''Br%')"
    );
}
