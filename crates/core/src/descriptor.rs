use std::collections::BTreeMap;

use crate::ir::{DataType, DialectOptions, SortOrder};

/// Reflection results are explicit records with named fields; downstream
/// host code consumes them structurally.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub default: Option<String>,
    pub generation_expression: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescriptor {
    pub name: String,
    pub column_names: Vec<String>,
    pub unique: bool,
    pub column_sorting: BTreeMap<String, SortOrder>,
    pub dialect_options: DialectOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDescriptor {
    pub name: String,
    pub referred_schema: Option<String>,
    pub referred_table: String,
    pub referred_columns: Vec<String>,
    pub constrained_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimaryKeyDescriptor {
    pub constrained_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDescriptor {
    pub name: String,
}
