//! CREATE / ALTER through the public API.

use insta::assert_snapshot;
use quill::prelude::*;
use quill::schema::{ConstraintKind, ReferentialAction};

fn products() -> Table {
    let mut t = Table::new("products");
    t.add_column("id", DataType::Int32).identity(100, 5);
    t.add_column("sku", DataType::Char(12)).not_null();
    t.add_column("price", DataType::Decimal(10, 2))
        .not_null()
        .default_raw("0");
    let pk = Constraint::primary_key(&[&t.col("id").unwrap()])
        .unwrap()
        .named("pk_products");
    t.add_constraint(pk).unwrap();
    t
}

fn render(node: &impl Render, dialect: Dialect) -> Result<String, SqlError> {
    let mut params = Params::new();
    node.to_sql(dialect, &mut params)
}

#[test]
fn test_create_schema_with_index() {
    let p = products();
    let create = Create::new().table(&p).index(
        Index::new("ix_products_sku", &p)
            .column(&p.col("sku").unwrap())
            .unique()
            .kind(IndexKind::NonClustered),
    );

    assert_snapshot!(render(&create, Dialect::SqlServer2012).unwrap(), @r"
    CREATE TABLE [products] ([id] INT IDENTITY(100,5) NOT NULL,[sku] NCHAR(12) NOT NULL,[price] DECIMAL(10,2) NOT NULL DEFAULT 0,CONSTRAINT [pk_products] PRIMARY KEY ([id]));
    CREATE UNIQUE NONCLUSTERED INDEX [ix_products_sku] ON [products] ([sku] ASC)
    ");

    assert!(render(&create, Dialect::MySql80).unwrap_err().is_unsupported());
}

#[test]
fn test_drop_constraint_without_kind_on_typed_dialect() {
    let p = products();
    let alter = Alter::table(&p).drop_constraint("fk_unregistered");

    assert_eq!(
        render(&alter, Dialect::SqlServer2012).unwrap(),
        "ALTER TABLE [products] DROP CONSTRAINT [fk_unregistered]"
    );

    for dialect in [Dialect::MySql57, Dialect::MySql80] {
        let err = render(&alter, dialect).unwrap_err();
        assert!(err.is_unsupported(), "{:?}", err);
    }
}

#[test]
fn test_drop_constraint_kind_from_table_or_hint() {
    let p = products();

    let sql = render(&Alter::table(&p).drop_constraint("pk_products"), Dialect::MySql80).unwrap();
    assert_eq!(sql, "ALTER TABLE `products` DROP PRIMARY KEY");

    let sql = render(
        &Alter::table(&p).drop_constraint_of("fk_products_vendor", ConstraintKind::ForeignKey),
        Dialect::MySql57,
    )
    .unwrap();
    assert_eq!(sql, "ALTER TABLE `products` DROP FOREIGN KEY `fk_products_vendor`");

    let check = Alter::table(&p).drop_constraint_of("ck_price", ConstraintKind::Check);
    assert_eq!(
        render(&check, Dialect::MySql80).unwrap(),
        "ALTER TABLE `products` DROP CHECK `ck_price`"
    );
    assert!(render(&check, Dialect::MySql57).unwrap_err().is_unsupported());
}

#[test]
fn test_migration_steps() {
    let mut p = products();
    let mut vendors = Table::new("vendors");
    vendors.add_column("id", DataType::Int32);

    p.add_column("vendor_id", DataType::Int32);
    let fk = Constraint::foreign_key(&[&p.col("vendor_id").unwrap()], &[&vendors.col("id").unwrap()])
        .unwrap()
        .named("fk_products_vendor")
        .on_delete(ReferentialAction::SetNull);

    let alter = Alter::table(&p)
        .add_column(&p.col("vendor_id").unwrap())
        .add_constraint(fk)
        .drop_index("ix_products_sku");

    assert_snapshot!(render(&alter, Dialect::SqlServer2012).unwrap(), @r"
    ALTER TABLE [products] ADD [vendor_id] INT NULL;
    ALTER TABLE [products] ADD CONSTRAINT [fk_products_vendor] FOREIGN KEY ([vendor_id]) REFERENCES [vendors] ([id]) ON DELETE SET NULL;
    DROP INDEX [ix_products_sku] ON [products]
    ");

    assert_snapshot!(render(&alter, Dialect::MySql80).unwrap(), @r"
    ALTER TABLE `products` ADD `vendor_id` INT NULL;
    ALTER TABLE `products` ADD CONSTRAINT `fk_products_vendor` FOREIGN KEY (`vendor_id`) REFERENCES `vendors` (`id`) ON DELETE SET NULL;
    ALTER TABLE `products` DROP INDEX `ix_products_sku`
    ");
}

#[test]
fn test_declared_table_round_trips_into_create() {
    let schema = TableSchema::new("events")
        .column(ColumnSchema::new("id", "bigint").identity())
        .column(ColumnSchema::new("payload", "json"))
        .column(ColumnSchema::new("internal_note", "text").skip());
    let events = Table::from_schema(&schema).unwrap();

    assert_eq!(
        render(&Create::new().table(&events), Dialect::MySql57).unwrap(),
        "CREATE TABLE `events` (`id` BIGINT AUTO_INCREMENT NOT NULL,`payload` JSON NULL)"
    );
}

#[test]
fn test_check_constraints_render_unqualified_literals() {
    let mut p = products();
    p.add_column("active", DataType::Bool);

    let alter = Alter::table(&p)
        .add_constraint(Constraint::check(p.col("active").unwrap()).unwrap())
        .add_constraint(
            Constraint::check(p.col("price").unwrap().gte(0))
                .unwrap()
                .named("ck_price"),
        );

    let mut params = Params::new();
    assert_snapshot!(alter.to_sql(Dialect::MySql80, &mut params).unwrap(), @r"
    ALTER TABLE `products` ADD CHECK (`active`);
    ALTER TABLE `products` ADD CONSTRAINT `ck_price` CHECK ((`price` >= 0))
    ");
    assert!(params.is_empty());
}
