//! Schema reflection. Every operation runs as a single-use strong read
//! through the driver's snapshot path, so reflection never joins or creates
//! a session transaction. A missing object yields empty descriptors rather
//! than an error.

use std::collections::BTreeMap;

use bridgeql_core::{
    ColumnDescriptor, DriverConnection, ForeignKeyDescriptor, GeneratedColumn, IndexDescriptor,
    PrimaryKeyDescriptor, Result, Row, SequenceDescriptor, SortOrder, Value,
};

use crate::introspect_queries;
use crate::option_keys;
use crate::type_compiler::parse_type;

/// Spanner's unnamed default schema.
pub const DEFAULT_SCHEMA: &str = "";

struct ColumnRow {
    name: String,
    spanner_type: String,
    nullable: bool,
    generation_expression: Option<String>,
    default: Option<String>,
}

struct IndexColumnRow {
    index_name: String,
    unique: bool,
    null_filtered: bool,
    parent_table: Option<String>,
    column_name: String,
    ordering: Option<String>,
    key_position: Option<String>,
}

struct ForeignKeyRow {
    constraint_name: String,
    referred_schema: String,
    referred_table: String,
    referred_column: String,
    constrained_column: String,
}

pub fn get_columns(
    driver: &mut dyn DriverConnection,
    table: &str,
    schema: Option<&str>,
) -> Result<Vec<ColumnDescriptor>> {
    let rows = scoped_query(driver, introspect_queries::COLUMNS_QUERY, schema, Some(table))?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let decoded = decode_column_row(row)?;
        columns.push(ColumnDescriptor {
            name: decoded.name,
            data_type: parse_type(&decoded.spanner_type),
            nullable: decoded.nullable,
            default: decoded.default,
            generation_expression: decoded.generation_expression,
        });
    }
    Ok(columns)
}

/// Reflects a generated column into the IR shape the host consumes.
pub fn generated_column_from(descriptor: &ColumnDescriptor) -> Option<GeneratedColumn> {
    descriptor
        .generation_expression
        .as_ref()
        .map(|expr| GeneratedColumn {
            expr: expr.clone(),
            stored: true,
        })
}

pub fn get_indexes(
    driver: &mut dyn DriverConnection,
    table: &str,
    schema: Option<&str>,
) -> Result<Vec<IndexDescriptor>> {
    let rows = scoped_query(driver, introspect_queries::INDEXES_QUERY, schema, Some(table))?;

    // Aggregate in scan order: key columns by ordinal, storing columns
    // (null ordinal) separately.
    let mut order = Vec::new();
    let mut grouped: BTreeMap<String, IndexDescriptor> = BTreeMap::new();
    let mut storing: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for row in &rows {
        let decoded = decode_index_row(row)?;
        if !grouped.contains_key(&decoded.index_name) {
            order.push(decoded.index_name.clone());
            let mut dialect_options = bridgeql_core::DialectOptions::new();
            if decoded.null_filtered {
                dialect_options.insert(option_keys::NULL_FILTERED.to_string(), Value::Bool(true));
            }
            if let Some(parent) = &decoded.parent_table {
                dialect_options.insert(
                    option_keys::INTERLEAVE_IN.to_string(),
                    Value::String(parent.clone()),
                );
            }
            grouped.insert(
                decoded.index_name.clone(),
                IndexDescriptor {
                    name: decoded.index_name.clone(),
                    column_names: Vec::new(),
                    unique: decoded.unique,
                    column_sorting: BTreeMap::new(),
                    dialect_options,
                },
            );
        }

        let descriptor = grouped
            .get_mut(&decoded.index_name)
            .expect("descriptor inserted above");
        if decoded.key_position.is_some() {
            descriptor.column_names.push(decoded.column_name.clone());
            let sorting = match decoded.ordering.as_deref() {
                Some("DESC") => SortOrder::Desc,
                _ => SortOrder::Asc,
            };
            descriptor
                .column_sorting
                .insert(decoded.column_name, sorting);
        } else {
            storing
                .entry(decoded.index_name)
                .or_default()
                .push(decoded.column_name);
        }
    }

    let mut descriptors = Vec::with_capacity(order.len());
    for name in order {
        let mut descriptor = grouped.remove(&name).expect("grouped by name above");
        if let Some(stored) = storing.remove(&name) {
            descriptor.dialect_options.insert(
                option_keys::STORING.to_string(),
                Value::String(stored.join(",")),
            );
        }
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

/// Spanner models unique constraints as unique indexes, so they reflect as
/// the UNIQUE-flagged subset of [`get_indexes`].
pub fn get_unique_constraints(
    driver: &mut dyn DriverConnection,
    table: &str,
    schema: Option<&str>,
) -> Result<Vec<IndexDescriptor>> {
    Ok(get_indexes(driver, table, schema)?
        .into_iter()
        .filter(|descriptor| descriptor.unique)
        .collect())
}

pub fn get_pk_constraint(
    driver: &mut dyn DriverConnection,
    table: &str,
    schema: Option<&str>,
) -> Result<PrimaryKeyDescriptor> {
    let rows = scoped_query(
        driver,
        introspect_queries::PRIMARY_KEY_QUERY,
        schema,
        Some(table),
    )?;

    let mut constrained_columns = Vec::with_capacity(rows.len());
    for row in &rows {
        constrained_columns.push(row.str_value("column_name", introspect_queries::PRIMARY_KEY_QUERY)?);
    }
    Ok(PrimaryKeyDescriptor {
        constrained_columns,
    })
}

pub fn get_foreign_keys(
    driver: &mut dyn DriverConnection,
    table: &str,
    schema: Option<&str>,
) -> Result<Vec<ForeignKeyDescriptor>> {
    let rows = scoped_query(
        driver,
        introspect_queries::FOREIGN_KEYS_QUERY,
        schema,
        Some(table),
    )?;
    let own_schema = schema.unwrap_or(DEFAULT_SCHEMA);

    // Column order within a constraint is not deterministic; callers compare
    // sets. Aggregation preserves scan order.
    let mut order = Vec::new();
    let mut grouped: BTreeMap<String, ForeignKeyDescriptor> = BTreeMap::new();
    for row in &rows {
        let decoded = decode_foreign_key_row(row)?;
        let descriptor = grouped
            .entry(decoded.constraint_name.clone())
            .or_insert_with(|| {
                order.push(decoded.constraint_name.clone());
                let referred_schema = if decoded.referred_schema == own_schema {
                    None
                } else {
                    Some(decoded.referred_schema.clone())
                };
                ForeignKeyDescriptor {
                    name: decoded.constraint_name.clone(),
                    referred_schema,
                    referred_table: decoded.referred_table.clone(),
                    referred_columns: Vec::new(),
                    constrained_columns: Vec::new(),
                }
            });
        if !descriptor
            .referred_columns
            .contains(&decoded.referred_column)
        {
            descriptor.referred_columns.push(decoded.referred_column);
        }
        if !descriptor
            .constrained_columns
            .contains(&decoded.constrained_column)
        {
            descriptor
                .constrained_columns
                .push(decoded.constrained_column);
        }
    }

    Ok(order
        .into_iter()
        .map(|name| grouped.remove(&name).expect("grouped by name above"))
        .collect())
}

pub fn get_schema_names(driver: &mut dyn DriverConnection) -> Result<Vec<String>> {
    let rows = driver.snapshot_query(introspect_queries::SCHEMA_NAMES_QUERY, &[])?;
    rows.rows
        .iter()
        .map(|row| row.str_value("schema_name", introspect_queries::SCHEMA_NAMES_QUERY))
        .collect()
}

pub fn get_table_names(
    driver: &mut dyn DriverConnection,
    schema: Option<&str>,
) -> Result<Vec<String>> {
    let rows = scoped_query(driver, introspect_queries::TABLE_NAMES_QUERY, schema, None)?;
    rows.iter()
        .map(|row| row.str_value("table_name", introspect_queries::TABLE_NAMES_QUERY))
        .collect()
}

pub fn get_view_names(
    driver: &mut dyn DriverConnection,
    schema: Option<&str>,
) -> Result<Vec<String>> {
    let rows = scoped_query(driver, introspect_queries::VIEW_NAMES_QUERY, schema, None)?;
    rows.iter()
        .map(|row| row.str_value("table_name", introspect_queries::VIEW_NAMES_QUERY))
        .collect()
}

pub fn get_view_definition(
    driver: &mut dyn DriverConnection,
    view: &str,
    schema: Option<&str>,
) -> Result<Option<String>> {
    let rows = scoped_query(
        driver,
        introspect_queries::VIEW_DEFINITION_QUERY,
        schema,
        Some(view),
    )?;
    rows.first()
        .map(|row| row.str_value("view_definition", introspect_queries::VIEW_DEFINITION_QUERY))
        .transpose()
}

pub fn has_table(
    driver: &mut dyn DriverConnection,
    table: &str,
    schema: Option<&str>,
) -> Result<bool> {
    let rows = scoped_query(driver, introspect_queries::HAS_TABLE_QUERY, schema, Some(table))?;
    Ok(!rows.is_empty())
}

pub fn has_sequence(
    driver: &mut dyn DriverConnection,
    name: &str,
    schema: Option<&str>,
) -> Result<bool> {
    let rows = scoped_query(
        driver,
        introspect_queries::HAS_SEQUENCE_QUERY,
        schema,
        Some(name),
    )?;
    Ok(!rows.is_empty())
}

pub fn get_sequence_names(
    driver: &mut dyn DriverConnection,
    schema: Option<&str>,
) -> Result<Vec<SequenceDescriptor>> {
    let rows = scoped_query(driver, introspect_queries::SEQUENCE_NAMES_QUERY, schema, None)?;
    rows.iter()
        .map(|row| {
            Ok(SequenceDescriptor {
                name: row.str_value("name", introspect_queries::SEQUENCE_NAMES_QUERY)?,
            })
        })
        .collect()
}

fn scoped_query(
    driver: &mut dyn DriverConnection,
    sql: &str,
    schema: Option<&str>,
    object: Option<&str>,
) -> Result<Vec<Row>> {
    let mut params = vec![Value::String(
        schema.unwrap_or(DEFAULT_SCHEMA).to_string(),
    )];
    if let Some(object) = object {
        params.push(Value::String(object.to_string()));
    }
    Ok(driver.snapshot_query(sql, &params)?.rows)
}

fn decode_column_row(row: &Row) -> Result<ColumnRow> {
    let sql = introspect_queries::COLUMNS_QUERY;
    Ok(ColumnRow {
        name: row.str_value("column_name", sql)?,
        spanner_type: row.str_value("spanner_type", sql)?,
        nullable: row.bool_value("is_nullable", sql)?,
        generation_expression: row.opt_str_value("generation_expression", sql)?,
        default: row.opt_str_value("column_default", sql)?,
    })
}

fn decode_index_row(row: &Row) -> Result<IndexColumnRow> {
    let sql = introspect_queries::INDEXES_QUERY;
    Ok(IndexColumnRow {
        index_name: row.str_value("index_name", sql)?,
        unique: row.bool_value("is_unique", sql)?,
        null_filtered: row.bool_value("is_null_filtered", sql)?,
        parent_table: row.opt_str_value("parent_table_name", sql)?,
        column_name: row.str_value("column_name", sql)?,
        ordering: row.opt_str_value("column_ordering", sql)?,
        key_position: opt_position(row, "ordinal_position", sql)?,
    })
}

/// `ordinal_position` is an INT64 for key columns and NULL for storing
/// columns; it is only tested for presence.
fn opt_position(row: &Row, column: &str, sql: &str) -> Result<Option<String>> {
    match row.value(column, sql)? {
        Value::Null => Ok(None),
        Value::Integer(position) => Ok(Some(position.to_string())),
        Value::String(position) => Ok(Some(position.clone())),
        other => Ok(Some(format!("{other:?}"))),
    }
}

fn decode_foreign_key_row(row: &Row) -> Result<ForeignKeyRow> {
    let sql = introspect_queries::FOREIGN_KEYS_QUERY;
    Ok(ForeignKeyRow {
        constraint_name: row.str_value("constraint_name", sql)?,
        referred_schema: row.str_value("referred_schema", sql)?,
        referred_table: row.str_value("referred_table", sql)?,
        referred_column: row.str_value("referred_column", sql)?,
        constrained_column: row.str_value("constrained_column", sql)?,
    })
}
