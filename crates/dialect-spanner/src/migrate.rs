//! Column-alteration statements for migration runners. Spanner has no
//! standalone `SET NOT NULL` / `SET DATA TYPE` forms: every `ALTER COLUMN`
//! restates the full column definition, so each helper re-emits the type,
//! nullability, and default together.

use std::fmt::Write;

use bridgeql_core::{Column, DataType, QualifiedName, Result, Statement};

use crate::ddl::{render_ddl_expr, render_qualified_name, sql_statement};
use crate::preparer::render_ident;
use crate::type_compiler::compile_type;

/// Re-emits the column with `NOT NULL` added, keeping its type and default.
pub fn set_not_null(table: &QualifiedName, column: &Column) -> Result<Statement> {
    alter_column(table, column, &column.data_type, true)
}

/// Re-emits the column with `NOT NULL` removed, keeping its type and default.
pub fn drop_not_null(table: &QualifiedName, column: &Column) -> Result<Statement> {
    alter_column(table, column, &column.data_type, false)
}

/// Re-emits the column with a new type, keeping its nullability and default.
pub fn change_type(
    table: &QualifiedName,
    column: &Column,
    new_type: &DataType,
) -> Result<Statement> {
    alter_column(table, column, new_type, column.not_null)
}

pub fn set_default(table: &QualifiedName, column: &Column) -> Result<Statement> {
    let default = match &column.default {
        Some(default) => render_ddl_expr(default)?,
        None => return drop_default(table, column),
    };
    Ok(sql_statement(format!(
        "ALTER TABLE {} ALTER COLUMN {} SET DEFAULT ({default})",
        render_qualified_name(table),
        render_ident(&column.name)
    )))
}

pub fn drop_default(table: &QualifiedName, column: &Column) -> Result<Statement> {
    Ok(sql_statement(format!(
        "ALTER TABLE {} ALTER COLUMN {} DROP DEFAULT",
        render_qualified_name(table),
        render_ident(&column.name)
    )))
}

fn alter_column(
    table: &QualifiedName,
    column: &Column,
    data_type: &DataType,
    not_null: bool,
) -> Result<Statement> {
    let mut sql = format!(
        "ALTER TABLE {} ALTER COLUMN {} {}",
        render_qualified_name(table),
        render_ident(&column.name),
        compile_type(data_type)?
    );
    if not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        write!(sql, " DEFAULT ({})", render_ddl_expr(default)?)
            .expect("writing to String should not fail");
    }
    Ok(sql_statement(sql))
}
