//! GoogleSQL DDL generation. Every emitted statement is independently
//! executable; batches that must travel together (dropping a table with
//! dependents) are joined with `;` into one statement.

use std::fmt::Write;

use bridgeql_core::{
    Expr, GenerateError, Ident, IndexDef, Literal, QualifiedName, Result, Sequence, SequenceKind,
    SortOrder, Statement, Table, Value,
};

use crate::option_keys;
use crate::preparer::render_ident;
use crate::type_compiler::compile_type;

pub fn create_table(table: &Table) -> Result<Statement> {
    if let Some(unique) = table.unique_constraints.first() {
        let name = unique
            .name
            .as_ref()
            .map_or_else(|| "<unnamed>".to_string(), |ident| ident.value.clone());
        return Err(GenerateError::Programming {
            context: "CREATE TABLE".to_string(),
            message: format!(
                "Spanner does not support direct UNIQUE constraints \
                 (constraint `{name}`); declare a unique index instead"
            ),
        }
        .into());
    }

    let mut elements = Vec::new();
    for column in &table.columns {
        elements.push(render_column_definition(column)?);
    }
    for foreign_key in &table.foreign_keys {
        elements.push(render_foreign_key_clause(foreign_key));
    }
    for check in &table.checks {
        elements.push(render_check_clause(check));
    }

    let mut sql = format!("CREATE TABLE {} (", render_qualified_name(&table.name));
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        write!(sql, "\n\t{element}").expect("writing to String should not fail");
    }
    write!(sql, "\n) PRIMARY KEY ({})", render_primary_key_columns(table))
        .expect("writing to String should not fail");

    if let Some(Value::String(parent)) = table.extra.get(option_keys::INTERLEAVE_IN) {
        write!(sql, ",\nINTERLEAVE IN PARENT {}", quote_name(parent))
            .expect("writing to String should not fail");
        if matches!(
            table.extra.get(option_keys::INTERLEAVE_ON_DELETE_CASCADE),
            Some(Value::Bool(true))
        ) {
            sql.push_str(" ON DELETE CASCADE");
        }
    }

    Ok(sql_statement(sql))
}

fn render_primary_key_columns(table: &Table) -> String {
    table.primary_key.as_ref().map_or_else(String::new, |pk| {
        pk.columns
            .iter()
            .map(render_ident)
            .collect::<Vec<_>>()
            .join(", ")
    })
}

fn render_column_definition(column: &bridgeql_core::Column) -> Result<String> {
    let mut sql = format!(
        "{} {}",
        render_ident(&column.name),
        compile_type(&column.data_type)?
    );

    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        write!(sql, " DEFAULT ({})", render_ddl_expr(default)?)
            .expect("writing to String should not fail");
    }
    if matches!(
        column.extra.get(option_keys::ALLOW_COMMIT_TIMESTAMP),
        Some(Value::Bool(true))
    ) {
        sql.push_str(" OPTIONS (allow_commit_timestamp=true)");
    }
    if let Some(generated) = &column.generated {
        write!(sql, " AS ({})", generated.expr).expect("writing to String should not fail");
        if generated.stored {
            sql.push_str(" STORED");
        }
    }

    Ok(sql)
}

fn render_foreign_key_clause(foreign_key: &bridgeql_core::ForeignKey) -> String {
    let mut sql = String::new();

    if let Some(name) = &foreign_key.name {
        write!(sql, "CONSTRAINT {} ", render_ident(name))
            .expect("writing to String should not fail");
    }

    write!(
        sql,
        "FOREIGN KEY ({}) REFERENCES {} ({})",
        render_ident_list(&foreign_key.columns),
        render_qualified_name(&foreign_key.referenced_table),
        render_ident_list(&foreign_key.referenced_columns)
    )
    .expect("writing to String should not fail");

    if matches!(
        foreign_key.extra.get(option_keys::NOT_ENFORCED),
        Some(Value::Bool(true))
    ) {
        sql.push_str(" NOT ENFORCED");
    }

    sql
}

fn render_check_clause(check: &bridgeql_core::CheckConstraint) -> String {
    let mut sql = String::new();

    if let Some(name) = &check.name {
        write!(sql, "CONSTRAINT {} ", render_ident(name))
            .expect("writing to String should not fail");
    }
    write!(sql, "CHECK ({})", check.expr).expect("writing to String should not fail");

    sql
}

/// `CREATE [UNIQUE] [NULL_FILTERED] INDEX n ON t (cols) [STORING (cols)]
/// [, INTERLEAVE IN parent]` with the qualifier order fixed.
pub fn create_index(index: &IndexDef) -> Result<Statement> {
    if index.columns.is_empty() {
        return Err(GenerateError::Programming {
            context: "CREATE INDEX".to_string(),
            message: format!("index `{}` has no key columns", index.name.value),
        }
        .into());
    }

    let mut sql = String::from("CREATE ");
    if index.unique {
        sql.push_str("UNIQUE ");
    }
    if matches!(
        index.extra.get(option_keys::NULL_FILTERED),
        Some(Value::Bool(true))
    ) {
        sql.push_str("NULL_FILTERED ");
    }

    write!(
        sql,
        "INDEX {} ON {} ({})",
        render_ident(&index.name),
        render_qualified_name(&index.table),
        index
            .columns
            .iter()
            .map(render_index_column)
            .collect::<Vec<_>>()
            .join(", ")
    )
    .expect("writing to String should not fail");

    if let Some(Value::String(storing)) = index.extra.get(option_keys::STORING) {
        let stored = storing
            .split(',')
            .map(|column| quote_name(column.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        write!(sql, " STORING ({stored})").expect("writing to String should not fail");
    }
    if let Some(Value::String(parent)) = index.extra.get(option_keys::INTERLEAVE_IN) {
        write!(sql, ", INTERLEAVE IN {}", quote_name(parent))
            .expect("writing to String should not fail");
    }

    Ok(sql_statement(sql))
}

fn render_index_column(column: &bridgeql_core::IndexColumn) -> String {
    match column.order {
        SortOrder::Asc => render_ident(&column.name),
        SortOrder::Desc => format!("{} DESC", render_ident(&column.name)),
    }
}

pub fn drop_index(name: &Ident) -> Statement {
    sql_statement(format!("DROP INDEX {}", render_ident(name)))
}

/// Spanner refuses to drop a table that still has foreign keys or indexes,
/// so the drop is a composite batch: named constraint drops, index drops,
/// then the table itself, in that order.
pub fn drop_table(table: &Table) -> Statement {
    let mut parts = Vec::new();

    for foreign_key in &table.foreign_keys {
        if let Some(name) = &foreign_key.name {
            parts.push(format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                render_qualified_name(&table.name),
                render_ident(name)
            ));
        }
    }
    for index in &table.indexes {
        parts.push(format!("DROP INDEX {}", render_ident(&index.name)));
    }
    parts.push(format!(
        "DROP TABLE {}",
        render_qualified_name(&table.name)
    ));

    sql_statement(parts.join(";"))
}

pub fn create_sequence(sequence: &Sequence) -> Statement {
    let kind = match sequence.kind {
        SequenceKind::BitReversedPositive => "bit_reversed_positive",
    };
    sql_statement(format!(
        "CREATE SEQUENCE {} OPTIONS (sequence_kind = '{kind}')",
        render_qualified_name(&sequence.name)
    ))
}

pub fn drop_sequence(sequence: &Sequence) -> Statement {
    sql_statement(format!(
        "DROP SEQUENCE {}",
        render_qualified_name(&sequence.name)
    ))
}

/// The default expression that draws the next value from a sequence.
pub fn next_sequence_value(sequence: &Sequence) -> Expr {
    Expr::Raw(format!(
        "GET_NEXT_SEQUENCE_VALUE(SEQUENCE {})",
        render_qualified_name(&sequence.name)
    ))
}

/// Precondition probe emitted before CREATE TABLE so a migration runner can
/// skip objects that already exist; any returned row means "skip".
pub fn table_precondition(table_name: &str, schema: Option<&str>) -> Statement {
    sql_statement(format!(
        "SELECT true FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA=\"{}\" AND TABLE_NAME=\"{}\" LIMIT 1",
        schema.unwrap_or(""),
        table_name
    ))
}

/// Renders the expression subset that may appear inside DDL (default
/// expressions). DDL carries no bound parameters, so anything that would
/// need one is rejected.
pub(crate) fn render_ddl_expr(expr: &Expr) -> Result<String> {
    let rendered = match expr {
        Expr::Literal(Literal::String(text)) => format!("'{}'", text.replace('\'', "\\'")),
        Expr::Literal(Literal::Integer(value)) => value.to_string(),
        Expr::Literal(Literal::Float(value)) => value.to_string(),
        Expr::Literal(Literal::Boolean(flag)) => {
            if *flag { "TRUE" } else { "FALSE" }.to_string()
        }
        Expr::Column(ident) => render_ident(ident),
        Expr::Null => "NULL".to_string(),
        Expr::Raw(sql) => sql.clone(),
        Expr::Function {
            name,
            args,
            distinct: _,
            order_by: _,
        } => {
            let args = args
                .iter()
                .map(render_ddl_expr)
                .collect::<Result<Vec<_>>>()?;
            format!("{name}({})", args.join(", "))
        }
        Expr::Paren(inner) => format!("({})", render_ddl_expr(inner)?),
        other => {
            return Err(GenerateError::Programming {
                context: "DDL expression".to_string(),
                message: format!("expression is not valid in DDL: {other:?}"),
            }
            .into())
        }
    };
    Ok(rendered)
}

pub(crate) fn render_qualified_name(name: &QualifiedName) -> String {
    match &name.schema {
        Some(schema) => format!("{}.{}", render_ident(schema), render_ident(&name.name)),
        None => render_ident(&name.name),
    }
}

fn render_ident_list(idents: &[Ident]) -> String {
    idents.iter().map(render_ident).collect::<Vec<_>>().join(", ")
}

fn quote_name(name: &str) -> String {
    crate::preparer::quote(name)
}

pub(crate) fn sql_statement(sql: String) -> Statement {
    Statement::Sql {
        sql,
        transactional: false,
    }
}
