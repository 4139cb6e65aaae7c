//! DDL (Data Definition Language) support.
//!
//! [`Create`] renders CREATE TABLE / CREATE INDEX from the entity model;
//! [`Alter`] renders one ALTER TABLE statement per requested change. Multiple
//! statements are joined by the dialect's statement separator.
//!
//! # Examples
//!
//! ```ignore
//! use quill::sql::ddl::Create;
//! use quill::sql::schema::{Constraint, Index, Table};
//! use quill::sql::types::DataType;
//!
//! let mut users = Table::new("users");
//! users.add_column("id", DataType::Int64).auto_increment();
//! users.add_column("email", DataType::Varchar(255)).not_null();
//! users.add_constraint(Constraint::primary_key(&[&users.col("id")?])?.named("pk_users"))?;
//!
//! let create = Create::new()
//!     .table(&users)
//!     .index(Index::new("ix_users_email", &users).column(&users.col("email")?).unique());
//! println!("{}", create.to_debug_sql(Dialect::SqlServer2012)?);
//! ```

use super::dialect::{DropConstraintStyle, DropIndexStyle, Feature, SqlDialect};
use super::error::SqlError;
use super::render::{Render, Renderer};
use super::schema::{Column, Constraint, ConstraintKind, Index, IndexKind, Table, TableName};
use super::token::{Token, TokenStream};

// =============================================================================
// Shared pieces
// =============================================================================

/// `[name] TYPE [IDENTITY(1,1)] NULL|NOT NULL [DEFAULT expr]`.
///
/// Without `extras` only name, type, and nullability are emitted.
fn column_def(r: &mut Renderer<'_>, column: &Column, extras: bool) -> Result<TokenStream, SqlError> {
    let mut ts = TokenStream::from(r.ident(column.name()));
    ts.space().push(r.data_type(column.data_type()));

    if extras {
        if let Some(identity) = column.identity_spec() {
            ts.space()
                .append(&r.dialect().emit_identity(identity.seed, identity.increment));
        }
    }

    ts.space();
    if !column.is_nullable() {
        ts.keyword(Token::Not);
    }
    ts.push(Token::Null);

    if extras {
        if let Some(default) = column.default_expr().filter(|d| !d.is_empty()) {
            ts.space().keyword(Token::Default).append(&r.ddl_expr(default)?);
        }
    }
    Ok(ts)
}

fn alter_table(table: &TableName) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.keyword(Token::Alter)
        .keyword(Token::Table)
        .push(table.token())
        .space();
    ts
}

fn join_statements(statements: Vec<TokenStream>) -> TokenStream {
    let mut ts = TokenStream::new();
    for (i, statement) in statements.iter().enumerate() {
        if i > 0 {
            ts.push(Token::Separator);
        }
        ts.append(statement);
    }
    ts
}

// =============================================================================
// CREATE TABLE / CREATE INDEX
// =============================================================================

fn create_table(r: &mut Renderer<'_>, table: &Table) -> Result<TokenStream, SqlError> {
    if table.columns().is_empty() {
        return Err(SqlError::config(format!(
            "CREATE TABLE {} has no columns",
            table.name()
        )));
    }

    let mut body = Vec::with_capacity(table.columns().len() + table.constraints().len());
    for column in table.columns() {
        body.push(column_def(r, column, true)?);
    }
    for constraint in table.constraints() {
        body.push(r.node(constraint)?);
    }

    let mut definitions = TokenStream::new();
    definitions.comma_separated(body);

    let mut ts = TokenStream::new();
    ts.keyword(Token::Create)
        .keyword(Token::Table)
        .push(table.table_name().token())
        .space()
        .parens(&definitions);
    Ok(ts)
}

impl Render for Index {
    /// `CREATE [UNIQUE] [CLUSTERED] INDEX ix [USING BTREE] ON t (a ASC, ...)`
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        if self.columns.is_empty() {
            return Err(SqlError::config(format!("index {} has no columns", self.name)));
        }

        let mut ts = TokenStream::new();
        ts.keyword(Token::Create);
        if self.unique {
            ts.keyword(Token::Unique);
        }
        match self.kind {
            IndexKind::Clustered => {
                r.require(Feature::ClusteredIndex, "CLUSTERED index")?;
                ts.keyword(Token::Clustered);
            }
            IndexKind::NonClustered => {
                r.require(Feature::ClusteredIndex, "NONCLUSTERED index")?;
                ts.keyword(Token::NonClustered);
            }
            IndexKind::Default | IndexKind::BTree | IndexKind::Hash => {}
        }
        ts.keyword(Token::Index).push(r.ident(&self.name)).space();

        let method = match self.kind {
            IndexKind::BTree => Some("BTREE"),
            IndexKind::Hash => Some("HASH"),
            _ => None,
        };
        if let Some(method) = method {
            r.require(Feature::IndexMethod, "USING index method")?;
            ts.keyword(Token::Using).push(Token::Raw(method.into())).space();
        }

        let columns = self
            .columns
            .iter()
            .map(|(name, dir)| {
                let mut item = TokenStream::from(r.ident(name));
                item.space().push(dir.token());
                item
            })
            .collect::<Vec<_>>();
        let mut list = TokenStream::new();
        list.comma_separated(columns);

        ts.keyword(Token::On)
            .push(self.table.token())
            .space()
            .parens(&list);
        Ok(ts)
    }
}

/// CREATE TABLE and CREATE INDEX statements for a set of tables.
#[derive(Debug, Clone, Default)]
#[must_use = "DDL statements have no effect until rendered"]
pub struct Create {
    tables: Vec<Table>,
    indexes: Vec<Index>,
}

impl Create {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a CREATE TABLE for the table's current definition.
    pub fn table(mut self, table: &Table) -> Self {
        self.tables.push(table.clone());
        self
    }

    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }
}

impl Render for Create {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut statements = Vec::with_capacity(self.tables.len() + self.indexes.len());
        for table in &self.tables {
            statements.push(create_table(r, table)?);
        }
        for index in &self.indexes {
            statements.push(r.node(index)?);
        }
        Ok(join_statements(statements))
    }

    fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.indexes.is_empty()
    }
}

// =============================================================================
// ALTER TABLE
// =============================================================================

#[derive(Debug, Clone)]
enum Change {
    AddColumn(Column),
    DropColumn(String),
    ChangeColumn(Column),
    AddConstraint(Constraint),
    DropConstraint {
        name: String,
        kind: Option<ConstraintKind>,
    },
    DropIndex(String),
}

/// ALTER TABLE statements against one table.
#[derive(Debug, Clone)]
#[must_use = "DDL statements have no effect until rendered"]
pub struct Alter {
    table: Table,
    changes: Vec<Change>,
}

impl Alter {
    /// Start altering `table`. Its registered constraints are consulted when
    /// a dialect needs to know what kind of constraint is being dropped.
    pub fn table(table: &Table) -> Self {
        Self {
            table: table.clone(),
            changes: Vec::new(),
        }
    }

    pub fn add_column(mut self, column: &Column) -> Self {
        self.changes.push(Change::AddColumn(column.clone()));
        self
    }

    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        self.changes.push(Change::DropColumn(name.into()));
        self
    }

    /// Change a column's type and nullability to the column's current
    /// definition.
    pub fn change_column(mut self, column: &Column) -> Self {
        self.changes.push(Change::ChangeColumn(column.clone()));
        self
    }

    pub fn add_constraint(mut self, constraint: Constraint) -> Self {
        self.changes.push(Change::AddConstraint(constraint));
        self
    }

    /// Drop a constraint by name. On MySQL the kind is looked up among the
    /// table's registered constraints; use [`Alter::drop_constraint_of`]
    /// when it is not registered.
    pub fn drop_constraint(mut self, name: impl Into<String>) -> Self {
        self.changes.push(Change::DropConstraint {
            name: name.into(),
            kind: None,
        });
        self
    }

    pub fn drop_constraint_of(mut self, name: impl Into<String>, kind: ConstraintKind) -> Self {
        self.changes.push(Change::DropConstraint {
            name: name.into(),
            kind: Some(kind),
        });
        self
    }

    pub fn drop_index(mut self, name: impl Into<String>) -> Self {
        self.changes.push(Change::DropIndex(name.into()));
        self
    }

    fn render_change(&self, r: &mut Renderer<'_>, change: &Change) -> Result<TokenStream, SqlError> {
        let table = self.table.table_name();
        let mut ts = alter_table(table);

        match change {
            Change::AddColumn(column) => {
                ts.keyword(Token::Add).append(&column_def(r, column, true)?);
            }
            Change::DropColumn(name) => {
                ts.keyword(Token::Drop)
                    .keyword(Token::Column)
                    .push(r.ident(name));
            }
            Change::ChangeColumn(column) => {
                let keyword = r.dialect().change_column_keyword();
                // MODIFY restates the whole definition; ALTER COLUMN takes
                // only type and nullability.
                let extras = keyword == Token::Modify;
                ts.keyword(keyword)
                    .keyword(Token::Column)
                    .append(&column_def(r, column, extras)?);
            }
            Change::AddConstraint(constraint) => {
                ts.keyword(Token::Add).append(&r.node(constraint)?);
            }
            Change::DropConstraint { name, kind } => {
                ts.keyword(Token::Drop);
                self.render_drop_constraint(r, &mut ts, name, *kind)?;
            }
            Change::DropIndex(name) => match r.dialect().drop_index_style() {
                DropIndexStyle::OnTable => {
                    let mut ts = TokenStream::new();
                    ts.keyword(Token::Drop)
                        .keyword(Token::Index)
                        .push(r.ident(name))
                        .space()
                        .keyword(Token::On)
                        .push(table.token());
                    return Ok(ts);
                }
                DropIndexStyle::AlterTable => {
                    ts.keyword(Token::Drop)
                        .keyword(Token::Index)
                        .push(r.ident(name));
                }
            },
        }
        Ok(ts)
    }

    fn render_drop_constraint(
        &self,
        r: &mut Renderer<'_>,
        ts: &mut TokenStream,
        name: &str,
        kind: Option<ConstraintKind>,
    ) -> Result<(), SqlError> {
        if r.dialect().drop_constraint_style() == DropConstraintStyle::Named {
            ts.keyword(Token::Constraint).push(r.ident(name));
            return Ok(());
        }

        let kind = kind.or_else(|| self.table.constraint(name).map(Constraint::kind));
        match kind {
            None => {
                tracing::debug!(constraint = name, dialect = %r.dialect(), "constraint kind unknown");
                return Err(SqlError::unsupported(
                    "DROP CONSTRAINT without a constraint kind",
                    r.dialect(),
                ));
            }
            Some(ConstraintKind::PrimaryKey) => {
                ts.keyword(Token::Primary).push(Token::Key);
            }
            Some(ConstraintKind::ForeignKey) => {
                ts.keyword(Token::Foreign)
                    .keyword(Token::Key)
                    .push(r.ident(name));
            }
            Some(ConstraintKind::Unique) => {
                ts.keyword(Token::Index).push(r.ident(name));
            }
            Some(ConstraintKind::Check) => {
                r.require(Feature::DropCheckConstraint, "DROP CHECK")?;
                ts.keyword(Token::Check).push(r.ident(name));
            }
        }
        Ok(())
    }
}

impl Render for Alter {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut statements = Vec::with_capacity(self.changes.len());
        for change in &self.changes {
            statements.push(self.render_change(r, change)?);
        }
        Ok(join_statements(statements))
    }

    fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;
    use crate::sql::expr::ExprExt;
    use crate::sql::schema::ReferentialAction;
    use crate::sql::types::DataType;
    use crate::sql::value::{Expr, Params};
    use insta::assert_snapshot;

    fn users() -> Table {
        let mut t = Table::new("users");
        t.add_column("id", DataType::Int32).auto_increment();
        t.add_column("email", DataType::Varchar(200)).not_null();
        t.add_column("created_at", DataType::Timestamp)
            .not_null()
            .default_raw("CURRENT_TIMESTAMP");
        let pk = Constraint::primary_key(&[&t.col("id").unwrap()])
            .unwrap()
            .named("pk_users");
        t.add_constraint(pk).unwrap();
        t
    }

    fn render(node: &impl Render, dialect: Dialect) -> Result<String, SqlError> {
        let mut params = Params::new();
        node.to_sql(dialect, &mut params)
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    #[test]
    fn test_create_table_sql_server() {
        let sql = render(&Create::new().table(&users()), Dialect::SqlServer2012).unwrap();
        assert_snapshot!(sql, @"CREATE TABLE [users] ([id] INT IDENTITY(1,1) NOT NULL,[email] NVARCHAR(200) NOT NULL,[created_at] DATETIME2 NOT NULL DEFAULT CURRENT_TIMESTAMP,CONSTRAINT [pk_users] PRIMARY KEY ([id]))");
    }

    #[test]
    fn test_create_table_mysql() {
        let sql = render(&Create::new().table(&users()), Dialect::MySql80).unwrap();
        assert_snapshot!(sql, @"CREATE TABLE `users` (`id` INT AUTO_INCREMENT NOT NULL,`email` VARCHAR(200) NOT NULL,`created_at` DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,CONSTRAINT `pk_users` PRIMARY KEY (`id`))");
    }

    #[test]
    fn test_create_tables_and_indexes_are_separated() {
        let u = users();
        let create = Create::new()
            .table(&u)
            .index(Index::new("ix_users_email", &u).column(&u.col("email").unwrap()).unique());
        let sql = render(&create, Dialect::SqlServer2012).unwrap();
        let statements: Vec<&str> = sql.split(";\n").collect();
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[1],
            "CREATE UNIQUE INDEX [ix_users_email] ON [users] ([email] ASC)"
        );
    }

    #[test]
    fn test_empty_create_renders_nothing() {
        let create = Create::new();
        assert!(create.is_empty());
        assert_eq!(render(&create, Dialect::MySql80).unwrap(), "");
    }

    #[test]
    fn test_index_options_are_dialect_specific() {
        let u = users();
        let clustered = Index::new("cx_users", &u)
            .column_desc(&u.col("created_at").unwrap())
            .kind(IndexKind::Clustered);
        assert_eq!(
            render(&clustered, Dialect::SqlServer2008).unwrap(),
            "CREATE CLUSTERED INDEX [cx_users] ON [users] ([created_at] DESC)"
        );
        assert!(render(&clustered, Dialect::MySql80).unwrap_err().is_unsupported());

        let hashed = Index::new("ix_email", &u)
            .column(&u.col("email").unwrap())
            .kind(IndexKind::Hash);
        assert_eq!(
            render(&hashed, Dialect::MySql57).unwrap(),
            "CREATE INDEX `ix_email` USING HASH ON `users` (`email` ASC)"
        );
        assert!(render(&hashed, Dialect::SqlServer2012).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_create_with_foreign_key_and_check() {
        let u = users();
        let mut orders = Table::new("orders");
        orders.add_column("id", DataType::Int64).auto_increment();
        orders.add_column("user_id", DataType::Int32).not_null();
        orders.add_column("qty", DataType::Int32).not_null().default_raw("1");
        let fk = Constraint::foreign_key(&[&orders.col("user_id").unwrap()], &[&u.col("id").unwrap()])
            .unwrap()
            .named("fk_orders_users")
            .on_delete(ReferentialAction::Cascade);
        let check = Constraint::check(orders.col("qty").unwrap().gt(Expr::raw("0")))
            .unwrap()
            .named("ck_orders_qty");
        orders.add_constraint(fk).unwrap();
        orders.add_constraint(check).unwrap();

        let mut params = Params::new();
        let sql = Create::new()
            .table(&orders)
            .to_sql(Dialect::MySql80, &mut params)
            .unwrap();
        assert_snapshot!(sql, @"CREATE TABLE `orders` (`id` BIGINT AUTO_INCREMENT NOT NULL,`user_id` INT NOT NULL,`qty` INT NOT NULL DEFAULT 1,CONSTRAINT `fk_orders_users` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE CASCADE,CONSTRAINT `ck_orders_qty` CHECK ((`qty` > 0)))");
        assert!(params.is_empty());
    }

    // =========================================================================
    // ALTER
    // =========================================================================

    #[test]
    fn test_alter_add_and_drop_column() {
        let mut u = users();
        u.add_column("nickname", DataType::Varchar(50));
        let alter = Alter::table(&u)
            .add_column(&u.col("nickname").unwrap())
            .drop_column("legacy_flag");
        assert_eq!(
            render(&alter, Dialect::SqlServer2012).unwrap(),
            "ALTER TABLE [users] ADD [nickname] NVARCHAR(50) NULL;\nALTER TABLE [users] DROP COLUMN [legacy_flag]"
        );
    }

    #[test]
    fn test_alter_change_column_diverges() {
        let mut u = users();
        u.column_mut("email")
            .unwrap()
            .set_type(DataType::Varchar(320))
            .nullable();
        let alter = Alter::table(&u).change_column(&u.col("email").unwrap());
        assert_eq!(
            render(&alter, Dialect::SqlServer2012).unwrap(),
            "ALTER TABLE [users] ALTER COLUMN [email] NVARCHAR(320) NULL"
        );
        assert_eq!(
            render(&alter, Dialect::MySql80).unwrap(),
            "ALTER TABLE `users` MODIFY COLUMN `email` VARCHAR(320) NULL"
        );
    }

    #[test]
    fn test_alter_add_constraint() {
        let u = users();
        let unique = Constraint::unique(&[&u.col("email").unwrap()])
            .unwrap()
            .named("uq_users_email");
        let alter = Alter::table(&u).add_constraint(unique);
        assert_eq!(
            render(&alter, Dialect::MySql57).unwrap(),
            "ALTER TABLE `users` ADD CONSTRAINT `uq_users_email` UNIQUE (`email`)"
        );
    }

    #[test]
    fn test_drop_constraint_named_on_sql_server() {
        let alter = Alter::table(&users()).drop_constraint("anything");
        assert_eq!(
            render(&alter, Dialect::SqlServer2012).unwrap(),
            "ALTER TABLE [users] DROP CONSTRAINT [anything]"
        );
    }

    #[test]
    fn test_drop_constraint_without_kind_fails_on_mysql() {
        let alter = Alter::table(&users()).drop_constraint("fk_unknown");
        let err = render(&alter, Dialect::MySql80).unwrap_err();
        assert_eq!(
            err,
            SqlError::unsupported("DROP CONSTRAINT without a constraint kind", Dialect::MySql80)
        );
    }

    #[test]
    fn test_drop_constraint_typed_on_mysql() {
        let u = users();
        // Kind found among the table's registered constraints.
        let alter = Alter::table(&u).drop_constraint("pk_users");
        assert_eq!(
            render(&alter, Dialect::MySql80).unwrap(),
            "ALTER TABLE `users` DROP PRIMARY KEY"
        );

        let alter = Alter::table(&u)
            .drop_constraint_of("fk_orders_users", ConstraintKind::ForeignKey)
            .drop_constraint_of("uq_email", ConstraintKind::Unique);
        assert_eq!(
            render(&alter, Dialect::MySql57).unwrap(),
            "ALTER TABLE `users` DROP FOREIGN KEY `fk_orders_users`;\nALTER TABLE `users` DROP INDEX `uq_email`"
        );
    }

    #[test]
    fn test_drop_check_is_version_gated() {
        let alter = Alter::table(&users()).drop_constraint_of("ck_age", ConstraintKind::Check);
        assert_eq!(
            render(&alter, Dialect::MySql80).unwrap(),
            "ALTER TABLE `users` DROP CHECK `ck_age`"
        );
        assert!(render(&alter, Dialect::MySql57).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_drop_index() {
        let alter = Alter::table(&users()).drop_index("ix_users_email");
        assert_eq!(
            render(&alter, Dialect::SqlServer2012).unwrap(),
            "DROP INDEX [ix_users_email] ON [users]"
        );
        assert_eq!(
            render(&alter, Dialect::MySql80).unwrap(),
            "ALTER TABLE `users` DROP INDEX `ix_users_email`"
        );
    }
}
