use std::collections::BTreeMap;

use super::{DataType, Expr, Ident, QualifiedName, SortOrder, Value};

/// Dialect-specific option bag. Keys are namespaced per dialect, e.g.
/// `spanner.interleave_in`.
pub type DialectOptions = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: QualifiedName,
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKey>,
    pub checks: Vec<CheckConstraint>,
    pub unique_constraints: Vec<UniqueConstraint>,
    pub indexes: Vec<IndexDef>,
    pub extra: DialectOptions,
}

impl Table {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::bare(name),
            columns: Vec::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            unique_constraints: Vec::new(),
            indexes: Vec::new(),
            extra: DialectOptions::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKey {
            columns: columns.into_iter().map(Ident::unquoted).collect(),
        });
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name.value == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: Ident,
    pub data_type: DataType,
    pub not_null: bool,
    pub default: Option<Expr>,
    pub generated: Option<GeneratedColumn>,
    pub extra: DialectOptions,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: Ident::unquoted(name),
            data_type,
            not_null: false,
            default: None,
            generated: None,
            extra: DialectOptions::new(),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn default_expr(mut self, expr: Expr) -> Self {
        self.default = Some(expr);
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A computed column: the generation expression plus whether the value is
/// materialized on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedColumn {
    pub expr: String,
    pub stored: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKey {
    pub columns: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub name: Option<Ident>,
    pub columns: Vec<Ident>,
    pub referenced_table: QualifiedName,
    pub referenced_columns: Vec<Ident>,
    pub extra: DialectOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConstraint {
    pub name: Option<Ident>,
    pub expr: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: Option<Ident>,
    pub columns: Vec<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDef {
    pub name: Ident,
    pub table: QualifiedName,
    pub columns: Vec<IndexColumn>,
    pub unique: bool,
    pub extra: DialectOptions,
}

impl IndexDef {
    pub fn on_table(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: Ident::unquoted(name),
            table: QualifiedName::bare(table),
            columns: Vec::new(),
            unique: false,
            extra: DialectOptions::new(),
        }
    }

    pub fn key_column(mut self, name: impl Into<String>, order: SortOrder) -> Self {
        self.columns.push(IndexColumn {
            name: Ident::unquoted(name),
            order,
        });
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexColumn {
    pub name: Ident,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: QualifiedName,
    pub kind: SequenceKind,
    pub data_type: Option<DataType>,
}

impl Sequence {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: QualifiedName::bare(name),
            kind: SequenceKind::BitReversedPositive,
            data_type: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    BitReversedPositive,
}
