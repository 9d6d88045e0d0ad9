use crate::ir::{Expr, Ident, OrderByItem, QualifiedName, Value};

/// A rendered DDL statement, ready for submission. Multi-statement batches
/// (e.g. dropping dependent objects before a table) are joined with `;` into
/// a single `Sql` value so they travel as one unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Sql { sql: String, transactional: bool },
}

impl Statement {
    pub fn sql(&self) -> &str {
        match self {
            Statement::Sql { sql, .. } => sql,
        }
    }
}

/// A compiled DML statement: SQL text with `@a0, @a1, …` markers plus the
/// parameter values in marker order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub columns: Vec<SelectItem>,
    pub from: Option<QualifiedName>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub distinct: bool,
    pub compound: Vec<(CompoundOp, Select)>,
}

impl Select {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            from: Some(QualifiedName::bare(table)),
            where_clause: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            distinct: false,
            compound: Vec::new(),
        }
    }

    pub fn column(mut self, expr: Expr) -> Self {
        self.columns.push(SelectItem { expr, alias: None });
        self
    }

    pub fn filter(mut self, predicate: Expr) -> Self {
        self.where_clause = Some(predicate);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<Ident>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOp {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: QualifiedName,
    pub columns: Vec<Ident>,
    /// One inner vector per row; executemany submits several.
    pub rows: Vec<Vec<Expr>>,
    pub or_ignore: bool,
    /// Columns requested back from the database after the write.
    pub returning: Vec<Ident>,
}

impl Insert {
    pub fn into_table(table: impl Into<String>) -> Self {
        Self {
            table: QualifiedName::bare(table),
            columns: Vec::new(),
            rows: Vec::new(),
            or_ignore: false,
            returning: Vec::new(),
        }
    }

    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = names.into_iter().map(Ident::unquoted).collect();
        self
    }

    pub fn row(mut self, values: Vec<Expr>) -> Self {
        self.rows.push(values);
        self
    }

    pub fn returning<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning = names.into_iter().map(Ident::unquoted).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: QualifiedName,
    pub assignments: Vec<(Ident, Expr)>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: QualifiedName,
    pub where_clause: Option<Expr>,
    pub returning: Vec<Ident>,
}
