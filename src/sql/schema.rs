//! Entity model: tables, columns, aliases, constraints, and indexes.
//!
//! A [`Table`] owns its columns in declaration order and its constraints.
//! Columns are only created through [`Table::add_column`], so every column
//! has exactly one parent captured at construction.

use std::collections::HashMap;

use inflector::Inflector;

use super::error::SqlError;
use super::query::SortDir;
use super::render::{Render, Renderer};
use super::token::{Token, TokenStream};
use super::types::DataType;
use super::value::Expr;

// =============================================================================
// Table names
// =============================================================================

/// Schema-qualified table name.
///
/// This is the naming handle used wherever only the identity of a table
/// matters: column qualifiers, foreign key targets, OUTPUT INTO targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub(crate) fn token(&self) -> Token {
        Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}

impl Render for TableName {
    fn render(&self, _r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        Ok(self.token().into())
    }
}

impl From<&str> for TableName {
    fn from(name: &str) -> Self {
        TableName::new(name)
    }
}

// =============================================================================
// Tables
// =============================================================================

/// A table and its declared schema.
#[derive(Debug, Clone)]
pub struct Table {
    name: TableName,
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
    constraints: Vec<Constraint>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: TableName::new(name),
            columns: Vec::new(),
            positions: HashMap::new(),
            constraints: Vec::new(),
        }
    }

    /// Table named after a Rust type: the type's own name in table case,
    /// so `OrderLine` becomes `order_lines`.
    pub fn for_type<T: ?Sized>() -> Self {
        Self::new(default_table_name::<T>())
    }

    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.name.schema = Some(schema.into());
        for column in &mut self.columns {
            column.table = self.name.clone();
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.name.schema.as_deref()
    }

    pub fn table_name(&self) -> &TableName {
        &self.name
    }

    /// Declare a column. Re-declaring an existing name replaces its
    /// definition in place and keeps its position.
    pub fn add_column(&mut self, name: impl Into<String>, data_type: DataType) -> &mut Column {
        let name = name.into();
        let column = Column::new(self.name.clone(), name.clone(), data_type);
        let index = match self.positions.get(&name) {
            Some(&i) => {
                self.columns[i] = column;
                i
            }
            None => {
                self.columns.push(column);
                self.positions.insert(name, self.columns.len() - 1);
                self.columns.len() - 1
            }
        };
        &mut self.columns[index]
    }

    /// Look up a registered column.
    pub fn col(&self, name: &str) -> Result<Column, SqlError> {
        self.column(name).cloned().ok_or_else(|| self.not_found(name))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.positions.get(name).map(|&i| &self.columns[i])
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column, SqlError> {
        match self.positions.get(name) {
            Some(&i) => Ok(&mut self.columns[i]),
            None => Err(self.not_found(name)),
        }
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Attach a constraint. Every column it names must be registered here.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<&mut Self, SqlError> {
        for name in constraint.column_names() {
            if !self.positions.contains_key(name) {
                return Err(self.not_found(name));
            }
        }
        self.constraints.push(constraint);
        Ok(self)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Find a constraint by name.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    /// Alias this table, e.g. for self-joins.
    pub fn alias(&self, name: impl Into<String>) -> Result<Alias, SqlError> {
        let mut alias = Alias::new(self, name)?;
        alias.columns = Some(self.columns.iter().map(|c| c.name.clone()).collect());
        Ok(alias)
    }

    /// `table.*`
    pub fn all_columns(&self) -> Expr {
        Expr::node(QualifiedStar {
            qualifier: self.name.name.clone(),
        })
    }

    fn not_found(&self, column: &str) -> SqlError {
        SqlError::ColumnNotFound {
            table: self.name.name.clone(),
            column: column.to_string(),
        }
    }
}

impl Render for Table {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        self.name.render(r)
    }
}

impl From<&Table> for Expr {
    fn from(table: &Table) -> Self {
        Expr::node(table.name.clone())
    }
}

fn default_table_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let short = base.rsplit("::").next().unwrap_or(base);
    short.to_table_case()
}

// =============================================================================
// Columns
// =============================================================================

/// Identity / auto-increment settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub seed: i64,
    pub increment: i64,
}

/// A column declared on a table.
///
/// The parent table and name are fixed at construction; the descriptive
/// fields are adjusted by schema code before CREATE / ALTER rendering.
#[derive(Debug, Clone)]
pub struct Column {
    table: TableName,
    name: String,
    data_type: DataType,
    nullable: bool,
    default: Option<Expr>,
    identity: Option<Identity>,
}

impl Column {
    fn new(table: TableName, name: String, data_type: DataType) -> Self {
        Self {
            table,
            name,
            data_type,
            nullable: true,
            default: None,
            identity: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default_expr(&self) -> Option<&Expr> {
        self.default.as_ref()
    }

    pub fn identity_spec(&self) -> Option<Identity> {
        self.identity
    }

    pub fn set_type(&mut self, data_type: DataType) -> &mut Self {
        self.data_type = data_type;
        self
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn not_null(&mut self) -> &mut Self {
        self.nullable = false;
        self
    }

    /// Default given as trusted, unescaped SQL text (`GETDATE()`, `0`, `'n/a'`).
    pub fn default_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.default = Some(Expr::raw(sql));
        self
    }

    /// Default given as any expression. Plain values are written as
    /// escaped literals, since DDL cannot reference bound parameters.
    pub fn default_value(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.default = Some(expr.into());
        self
    }

    /// Identity column (`IDENTITY(seed,increment)` / `AUTO_INCREMENT`).
    /// Implies NOT NULL.
    pub fn identity(&mut self, seed: i64, increment: i64) -> &mut Self {
        self.identity = Some(Identity { seed, increment });
        self.nullable = false;
        self
    }

    /// Identity column starting at 1 with increment 1.
    pub fn auto_increment(&mut self) -> &mut Self {
        self.identity(1, 1)
    }

    /// Reference to this column qualified by its table.
    pub fn reference(&self) -> ColumnRef {
        ColumnRef::qualified(self.table.name.clone(), self.name.clone())
    }
}

impl Render for Column {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        self.reference().render(r)
    }
}

impl From<&Column> for Expr {
    fn from(column: &Column) -> Self {
        Expr::node(column.reference())
    }
}

impl From<Column> for Expr {
    fn from(column: Column) -> Self {
        Expr::node(column.reference())
    }
}

/// A column reference as it appears in expressions: `qualifier.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    qualifier: Option<String>,
    name: String,
}

impl ColumnRef {
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    /// Bare column name, e.g. a select-list alias used in ORDER BY.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Render for ColumnRef {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        if let Some(qualifier) = self.qualifier.as_ref().filter(|_| r.qualify_columns()) {
            ts.push(r.ident(qualifier)).push(Token::Dot);
        }
        ts.push(r.ident(&self.name));
        Ok(ts)
    }
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Expr::node(column)
    }
}

/// `qualifier.*`
#[derive(Debug, Clone)]
struct QualifiedStar {
    qualifier: String,
}

impl Render for QualifiedStar {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        ts.push(r.ident(&self.qualifier))
            .push(Token::Dot)
            .push(Token::Star);
        Ok(ts)
    }
}

// =============================================================================
// Aliases and sources
// =============================================================================

/// `source AS name`, for tables, subqueries, and select-list expressions.
#[derive(Debug, Clone)]
pub struct Alias {
    source: Expr,
    name: String,
    columns: Option<Vec<String>>,
}

impl Alias {
    /// Pair a source with an alias name.
    ///
    /// An empty name or an empty source is a configuration error.
    pub fn new(source: impl Into<Expr>, name: impl Into<String>) -> Result<Self, SqlError> {
        let source = source.into();
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SqlError::config("alias name must not be empty"));
        }
        if source.is_empty() {
            return Err(SqlError::config(format!(
                "alias '{}' has no source to refer to",
                name
            )));
        }
        Ok(Self {
            source,
            name,
            columns: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column qualified by this alias.
    ///
    /// For an aliased table the column must be registered on the table;
    /// subquery columns cannot be checked and are accepted as given.
    pub fn col(&self, column: &str) -> Result<ColumnRef, SqlError> {
        if let Some(columns) = &self.columns {
            if !columns.iter().any(|c| c == column) {
                return Err(SqlError::ColumnNotFound {
                    table: self.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(ColumnRef::qualified(self.name.clone(), column))
    }

    /// `alias.*`
    pub fn all_columns(&self) -> Expr {
        Expr::node(QualifiedStar {
            qualifier: self.name.clone(),
        })
    }
}

impl Render for Alias {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = r.expr(&self.source)?;
        ts.space()
            .push(Token::As)
            .space()
            .push(r.ident(&self.name));
        Ok(ts)
    }
}

impl From<Alias> for Expr {
    fn from(alias: Alias) -> Self {
        Expr::node(alias)
    }
}

/// Something a FROM or JOIN clause can read from.
///
/// Subqueries are only accepted through an [`Alias`].
#[derive(Debug, Clone)]
pub enum Source {
    Table(TableName),
    Alias(Alias),
}

impl Render for Source {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        match self {
            Source::Table(name) => name.render(r),
            Source::Alias(alias) => alias.render(r),
        }
    }
}

impl From<&Table> for Source {
    fn from(table: &Table) -> Self {
        Source::Table(table.name.clone())
    }
}

impl From<TableName> for Source {
    fn from(name: TableName) -> Self {
        Source::Table(name)
    }
}

impl From<Alias> for Source {
    fn from(alias: Alias) -> Self {
        Source::Alias(alias)
    }
}

impl From<&Alias> for Source {
    fn from(alias: &Alias) -> Self {
        Source::Alias(alias.clone())
    }
}

// =============================================================================
// Constraints
// =============================================================================

/// Constraint category, used where syntax depends on it (MySQL DROP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Unique,
    Check,
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    fn token(&self) -> Token {
        match self {
            ReferentialAction::Cascade => Token::Cascade,
            ReferentialAction::SetNull => Token::SetNull,
            ReferentialAction::SetDefault => Token::SetDefault,
            ReferentialAction::Restrict => Token::Restrict,
            ReferentialAction::NoAction => Token::NoAction,
        }
    }
}

/// Foreign key payload. `target` is only a naming handle; it need not be
/// the same `Table` instance used elsewhere.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub target: TableName,
    pub target_columns: Vec<String>,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

#[derive(Debug, Clone)]
pub enum ConstraintDef {
    PrimaryKey(Vec<String>),
    ForeignKey(ForeignKey),
    Unique(Vec<String>),
    Check(Expr),
}

/// A table constraint, optionally named.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: Option<String>,
    def: ConstraintDef,
}

impl Constraint {
    pub fn primary_key(columns: &[&Column]) -> Result<Self, SqlError> {
        Ok(Self::unnamed(ConstraintDef::PrimaryKey(names(
            "PRIMARY KEY",
            columns,
        )?)))
    }

    pub fn unique(columns: &[&Column]) -> Result<Self, SqlError> {
        Ok(Self::unnamed(ConstraintDef::Unique(names("UNIQUE", columns)?)))
    }

    /// `FOREIGN KEY (columns) REFERENCES target (references)`.
    ///
    /// All referenced columns must belong to the same target table and
    /// pair up one-to-one with `columns`.
    pub fn foreign_key(columns: &[&Column], references: &[&Column]) -> Result<Self, SqlError> {
        let local = names("FOREIGN KEY", columns)?;
        let target_columns = names("REFERENCES", references)?;
        if local.len() != target_columns.len() {
            return Err(SqlError::config(format!(
                "foreign key has {} columns but references {}",
                local.len(),
                target_columns.len()
            )));
        }
        let target = references[0].table().clone();
        if references.iter().any(|c| c.table() != &target) {
            return Err(SqlError::config(
                "foreign key references columns of more than one table",
            ));
        }
        Ok(Self::unnamed(ConstraintDef::ForeignKey(ForeignKey {
            columns: local,
            target,
            target_columns,
            on_delete: None,
            on_update: None,
        })))
    }

    /// `CHECK (condition)`.
    ///
    /// The condition is part of the table definition, so values in it are
    /// written as literals rather than bound, and columns render unqualified.
    pub fn check(condition: impl Into<Expr>) -> Result<Self, SqlError> {
        let condition = condition.into();
        if condition.is_empty() {
            return Err(SqlError::config("CHECK constraint has no condition"));
        }
        Ok(Self::unnamed(ConstraintDef::Check(condition)))
    }

    fn unnamed(def: ConstraintDef) -> Self {
        Self { name: None, def }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// ON DELETE action; ignored for anything but foreign keys.
    #[must_use]
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        if let ConstraintDef::ForeignKey(fk) = &mut self.def {
            fk.on_delete = Some(action);
        }
        self
    }

    /// ON UPDATE action; ignored for anything but foreign keys.
    #[must_use]
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        if let ConstraintDef::ForeignKey(fk) = &mut self.def {
            fk.on_update = Some(action);
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn def(&self) -> &ConstraintDef {
        &self.def
    }

    pub fn kind(&self) -> ConstraintKind {
        match self.def {
            ConstraintDef::PrimaryKey(_) => ConstraintKind::PrimaryKey,
            ConstraintDef::ForeignKey(_) => ConstraintKind::ForeignKey,
            ConstraintDef::Unique(_) => ConstraintKind::Unique,
            ConstraintDef::Check(_) => ConstraintKind::Check,
        }
    }

    fn column_names(&self) -> &[String] {
        match &self.def {
            ConstraintDef::PrimaryKey(cols) | ConstraintDef::Unique(cols) => cols,
            ConstraintDef::ForeignKey(fk) => &fk.columns,
            ConstraintDef::Check(_) => &[],
        }
    }
}

impl Render for Constraint {
    fn render(&self, r: &mut Renderer<'_>) -> Result<TokenStream, SqlError> {
        let mut ts = TokenStream::new();
        if let Some(name) = &self.name {
            ts.keyword(Token::Constraint).push(r.ident(name)).space();
        }

        match &self.def {
            ConstraintDef::PrimaryKey(cols) => {
                ts.keyword(Token::Primary)
                    .keyword(Token::Key)
                    .parens(&ident_list(r, cols));
            }
            ConstraintDef::Unique(cols) => {
                ts.keyword(Token::Unique).parens(&ident_list(r, cols));
            }
            ConstraintDef::ForeignKey(fk) => {
                ts.keyword(Token::Foreign)
                    .keyword(Token::Key)
                    .parens(&ident_list(r, &fk.columns))
                    .space()
                    .keyword(Token::References)
                    .push(fk.target.token())
                    .space()
                    .parens(&ident_list(r, &fk.target_columns));
                if let Some(action) = fk.on_delete {
                    ts.space()
                        .keyword(Token::On)
                        .keyword(Token::Delete)
                        .push(action.token());
                }
                if let Some(action) = fk.on_update {
                    ts.space()
                        .keyword(Token::On)
                        .keyword(Token::Update)
                        .push(action.token());
                }
            }
            ConstraintDef::Check(condition) => {
                ts.keyword(Token::Check).parens(&r.ddl_expr(condition)?);
            }
        }
        Ok(ts)
    }
}

fn names(clause: &str, columns: &[&Column]) -> Result<Vec<String>, SqlError> {
    if columns.is_empty() {
        return Err(SqlError::config(format!("{} needs at least one column", clause)));
    }
    Ok(columns.iter().map(|c| c.name().to_string()).collect())
}

/// `[a],[b]` for bare column names.
pub(crate) fn ident_list(r: &Renderer<'_>, names: &[String]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.comma_separated(names.iter().map(|n| TokenStream::from(r.ident(n))));
    ts
}

// =============================================================================
// Indexes
// =============================================================================

/// Physical index options. Clustering is SQL Server only; BTREE/HASH
/// methods are MySQL only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    #[default]
    Default,
    Clustered,
    NonClustered,
    BTree,
    Hash,
}

/// An index over one or more columns of a table.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until used"]
pub struct Index {
    pub(crate) name: String,
    pub(crate) table: TableName,
    pub(crate) columns: Vec<(String, SortDir)>,
    pub(crate) unique: bool,
    pub(crate) kind: IndexKind,
}

impl Index {
    pub fn new(name: impl Into<String>, table: &Table) -> Self {
        Self {
            name: name.into(),
            table: table.table_name().clone(),
            columns: Vec::new(),
            unique: false,
            kind: IndexKind::Default,
        }
    }

    pub fn column(mut self, column: &Column) -> Self {
        self.columns.push((column.name().to_string(), SortDir::Asc));
        self
    }

    pub fn column_desc(mut self, column: &Column) -> Self {
        self.columns.push((column.name().to_string(), SortDir::Desc));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn kind(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;
    use crate::sql::expr::{func, ExprExt};
    use crate::sql::value::Params;

    fn users() -> Table {
        let mut t = Table::new("users");
        t.add_column("id", DataType::Int32).auto_increment();
        t.add_column("email", DataType::Varchar(200)).not_null();
        t
    }

    struct OrderLine;

    #[test]
    fn test_columns_keep_declaration_order() {
        let mut t = users();
        t.add_column("created_at", DataType::Timestamp);
        t.add_column("email", DataType::Varchar(320));

        let names: Vec<&str> = t.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id", "email", "created_at"]);
        assert_eq!(t.col("email").unwrap().data_type(), &DataType::Varchar(320));
    }

    #[test]
    fn test_column_knows_parent() {
        let t = users().with_schema("dbo");
        let id = t.col("id").unwrap();
        assert_eq!(id.table(), &TableName::new("users").with_schema("dbo"));
        assert!(!id.is_nullable());
        assert_eq!(id.identity_spec(), Some(Identity { seed: 1, increment: 1 }));
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let err = users().col("missing").unwrap_err();
        assert_eq!(
            err,
            SqlError::ColumnNotFound {
                table: "users".into(),
                column: "missing".into()
            }
        );
    }

    #[test]
    fn test_default_table_name_from_type() {
        assert_eq!(Table::for_type::<OrderLine>().name(), "order_lines");
    }

    #[test]
    fn test_column_renders_dotted() {
        let t = users();
        let mut params = Params::new();
        assert_eq!(
            t.col("id").unwrap().to_sql(Dialect::SqlServer2012, &mut params).unwrap(),
            "[users].[id]"
        );
        assert_eq!(
            t.col("id").unwrap().to_sql(Dialect::MySql80, &mut params).unwrap(),
            "`users`.`id`"
        );
    }

    #[test]
    fn test_alias_validation() {
        let t = users();
        assert!(matches!(t.alias(""), Err(SqlError::Config(_))));
        assert!(matches!(Alias::new(Expr::raw(""), "x"), Err(SqlError::Config(_))));

        let u = t.alias("u").unwrap();
        assert!(u.col("email").is_ok());
        assert!(matches!(u.col("nope"), Err(SqlError::ColumnNotFound { .. })));
    }

    #[test]
    fn test_alias_renders_source_and_name() {
        let u = users().with_schema("dbo").alias("u").unwrap();
        let mut params = Params::new();
        assert_eq!(
            u.to_sql(Dialect::SqlServer2012, &mut params).unwrap(),
            "[dbo].[users] AS [u]"
        );
        assert_eq!(
            u.col("id").unwrap().to_sql(Dialect::SqlServer2012, &mut params).unwrap(),
            "[u].[id]"
        );
    }

    #[test]
    fn test_constraint_columns_must_be_registered() {
        let mut t = users();
        let other = {
            let mut o = Table::new("other");
            o.add_column("x", DataType::Int32);
            o
        };
        let pk = Constraint::primary_key(&[&other.col("x").unwrap()]).unwrap();
        assert!(t.add_constraint(pk).is_err());

        let pk = Constraint::primary_key(&[&t.col("id").unwrap()]).unwrap().named("pk_users");
        t.add_constraint(pk).unwrap();
        assert_eq!(
            t.constraint("pk_users").map(|c| c.kind()),
            Some(ConstraintKind::PrimaryKey)
        );
    }

    #[test]
    fn test_foreign_key_renders_target_handle() {
        let u = users();
        let mut orders = Table::new("orders");
        orders.add_column("user_id", DataType::Int32);

        let fk = Constraint::foreign_key(&[&orders.col("user_id").unwrap()], &[&u.col("id").unwrap()])
            .unwrap()
            .named("fk_orders_users")
            .on_delete(ReferentialAction::Cascade);

        let mut params = Params::new();
        assert_eq!(
            fk.to_sql(Dialect::SqlServer2012, &mut params).unwrap(),
            "CONSTRAINT [fk_orders_users] FOREIGN KEY ([user_id]) REFERENCES [users] ([id]) ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_foreign_key_arity_mismatch() {
        let u = users();
        let mut orders = Table::new("orders");
        orders.add_column("user_id", DataType::Int32);
        let err = Constraint::foreign_key(
            &[&orders.col("user_id").unwrap()],
            &[&u.col("id").unwrap(), &u.col("email").unwrap()],
        );
        assert!(matches!(err, Err(SqlError::Config(_))));
    }

    #[test]
    fn test_check_over_bare_column_and_function() {
        let mut t = Table::new("items");
        t.add_column("active", DataType::Bool);
        t.add_column("sku", DataType::Varchar(20));

        let mut params = Params::new();
        let active = Constraint::check(t.col("active").unwrap()).unwrap();
        assert_eq!(
            active.to_sql(Dialect::MySql80, &mut params).unwrap(),
            "CHECK (`active`)"
        );

        let sku_len = func("LENGTH", [t.col("sku").unwrap()]).gt(0);
        let check = Constraint::check(sku_len).unwrap().named("ck_items_sku");
        assert_eq!(
            check.to_sql(Dialect::SqlServer2012, &mut params).unwrap(),
            "CONSTRAINT [ck_items_sku] CHECK ((LEN([sku]) > 0))"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_check_inlines_string_literals() {
        let mut t = Table::new("items");
        t.add_column("state", DataType::Varchar(10));
        let check = Constraint::check(t.col("state").unwrap().ne("it's")).unwrap();

        let mut params = Params::new();
        assert_eq!(
            check.to_sql(Dialect::MySql57, &mut params).unwrap(),
            "CHECK ((`state` <> 'it''s'))"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_check_with_raw_condition_is_parenthesized() {
        let check = Constraint::check(Expr::raw("age >= 0")).unwrap();
        let mut params = Params::new();
        assert_eq!(
            check.to_sql(Dialect::MySql80, &mut params).unwrap(),
            "CHECK (age >= 0)"
        );
    }
}
