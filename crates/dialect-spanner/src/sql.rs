//! DML and SELECT rewriting for GoogleSQL: compound-select keywords, the
//! typed empty-set probe, INSERT OR IGNORE, THEN RETURN, and the named
//! `@a<N>` parameter convention. Constructs Spanner cannot execute are
//! rejected here so they never reach the driver.

use std::fmt::Write;

use bridgeql_core::{
    BinaryOperator, ComparisonOp, CompiledSql, DataType, Delete, Expr, GenerateError, Ident,
    Insert, IsTest, Literal, OrderByItem, Result, Select, SortOrder, Table, UnaryOperator, Update,
    Value,
};

use crate::ddl::render_qualified_name;
use crate::dialect::DIALECT_NAME;
use crate::option_keys;
use crate::preparer::render_ident;
use crate::type_compiler::compile_type;

/// Assigns `@a0, @a1, …` in strict left-to-right order of appearance.
#[derive(Debug, Default)]
struct ParamBinder {
    values: Vec<Value>,
}

impl ParamBinder {
    fn bind(&mut self, value: Value) -> String {
        let marker = format!("@a{}", self.values.len());
        self.values.push(value);
        marker
    }

    fn finish(self, sql: String) -> CompiledSql {
        CompiledSql {
            sql,
            params: self.values,
        }
    }
}

pub fn compile_select(select: &Select) -> Result<CompiledSql> {
    let mut binder = ParamBinder::default();
    let sql = render_select(select, &mut binder)?;
    Ok(binder.finish(sql))
}

fn render_select(select: &Select, binder: &mut ParamBinder) -> Result<String> {
    let mut sql = String::from("SELECT ");
    if select.distinct {
        sql.push_str("DISTINCT ");
    }

    let mut items = Vec::with_capacity(select.columns.len());
    for item in &select.columns {
        let mut rendered = render_expr(&item.expr, binder)?;
        if let Some(alias) = &item.alias {
            write!(rendered, " AS {}", render_ident(alias))
                .expect("writing to String should not fail");
        }
        items.push(rendered);
    }
    sql.push_str(&items.join(", "));

    if let Some(from) = &select.from {
        write!(sql, " FROM {}", render_qualified_name(from))
            .expect("writing to String should not fail");
    }
    if let Some(predicate) = &select.where_clause {
        write!(sql, " WHERE {}", render_expr(predicate, binder)?)
            .expect("writing to String should not fail");
    }
    if !select.group_by.is_empty() {
        // Aliases of composed expressions are not valid GROUP BY references;
        // the composed expression is emitted verbatim.
        let mut terms = Vec::with_capacity(select.group_by.len());
        for term in &select.group_by {
            terms.push(render_expr(term, binder)?);
        }
        write!(sql, " GROUP BY {}", terms.join(", "))
            .expect("writing to String should not fail");
    }
    if let Some(having) = &select.having {
        write!(sql, " HAVING {}", render_expr(having, binder)?)
            .expect("writing to String should not fail");
    }

    for (op, compound) in &select.compound {
        write!(
            sql,
            " {} {}",
            compound_keyword(*op),
            render_select(compound, binder)?
        )
        .expect("writing to String should not fail");
    }

    if !select.order_by.is_empty() {
        write!(sql, " ORDER BY {}", render_order_by(&select.order_by, binder)?)
            .expect("writing to String should not fail");
    }
    if let Some(limit) = &select.limit {
        write!(sql, " LIMIT {}", render_limit_term(limit, binder, "LIMIT")?)
            .expect("writing to String should not fail");
    }
    if let Some(offset) = &select.offset {
        write!(sql, " OFFSET {}", render_limit_term(offset, binder, "OFFSET")?)
            .expect("writing to String should not fail");
    }

    Ok(sql)
}

fn compound_keyword(op: bridgeql_core::CompoundOp) -> &'static str {
    use bridgeql_core::CompoundOp;

    match op {
        CompoundOp::Union => "UNION DISTINCT",
        CompoundOp::UnionAll => "UNION ALL",
        CompoundOp::Intersect => "INTERSECT DISTINCT",
        CompoundOp::IntersectAll => "INTERSECT ALL",
        CompoundOp::Except => "EXCEPT DISTINCT",
        CompoundOp::ExceptAll => "EXCEPT ALL",
    }
}

/// LIMIT/OFFSET must be an integer literal or a bound parameter; anything
/// composed is rejected.
fn render_limit_term(expr: &Expr, binder: &mut ParamBinder, clause: &str) -> Result<String> {
    match expr {
        Expr::Literal(Literal::Integer(value)) => Ok(value.to_string()),
        Expr::Parameter(value @ Value::Integer(_)) => Ok(binder.bind(value.clone())),
        _ => Err(unsupported(
            &format!("composite {clause} expression"),
            "only integer literals and bound parameters are accepted",
        )),
    }
}

pub fn compile_insert(table: &Table, insert: &Insert) -> Result<CompiledSql> {
    let mut binder = ParamBinder::default();
    let sql = render_insert(table, insert, &insert.rows, &mut binder)?;
    Ok(binder.finish(sql))
}

/// The executemany path. When every primary-key column carries a
/// client-supplied value on every row, or an insert-sentinel column does,
/// one multi-row INSERT is emitted; otherwise each row becomes its own
/// statement so returned server-generated keys pair to their source rows.
pub fn compile_insert_many(table: &Table, insert: &Insert) -> Result<Vec<CompiledSql>> {
    if insert.rows.len() <= 1 || is_bulk_safe(table, insert) {
        return Ok(vec![compile_insert(table, insert)?]);
    }

    let mut statements = Vec::with_capacity(insert.rows.len());
    for row in &insert.rows {
        let mut binder = ParamBinder::default();
        let sql = render_insert(table, insert, std::slice::from_ref(row), &mut binder)?;
        statements.push(binder.finish(sql));
    }
    Ok(statements)
}

fn is_bulk_safe(table: &Table, insert: &Insert) -> bool {
    let supplied =
        |name: &Ident| -> bool { insert.columns.iter().any(|column| column == name) };

    if let Some(primary_key) = &table.primary_key {
        if primary_key.columns.iter().all(supplied) {
            return true;
        }
    }

    table.columns.iter().any(|column| {
        matches!(
            column.extra.get(option_keys::INSERT_SENTINEL),
            Some(Value::Bool(true))
        ) && supplied(&column.name)
    })
}

fn render_insert(
    table: &Table,
    insert: &Insert,
    rows: &[Vec<Expr>],
    binder: &mut ParamBinder,
) -> Result<String> {
    let mut sql = String::from("INSERT ");
    if insert.or_ignore {
        sql.push_str("OR IGNORE ");
    }
    write!(
        sql,
        "INTO {} ({})",
        render_qualified_name(&insert.table),
        insert
            .columns
            .iter()
            .map(render_ident)
            .collect::<Vec<_>>()
            .join(", ")
    )
    .expect("writing to String should not fail");

    let mut value_lists = Vec::with_capacity(rows.len());
    for row in rows {
        if row.len() != insert.columns.len() {
            return Err(GenerateError::Programming {
                context: "INSERT".to_string(),
                message: format!(
                    "row has {} values for {} columns",
                    row.len(),
                    insert.columns.len()
                ),
            }
            .into());
        }
        let mut rendered = Vec::with_capacity(row.len());
        for value in row {
            rendered.push(render_expr(value, binder)?);
        }
        value_lists.push(format!("({})", rendered.join(", ")));
    }
    write!(sql, " VALUES {}", value_lists.join(", ")).expect("writing to String should not fail");

    append_then_return(&mut sql, table, &insert.returning);
    Ok(sql)
}

pub fn compile_update(table: &Table, update: &Update) -> Result<CompiledSql> {
    let mut binder = ParamBinder::default();

    let mut sql = format!("UPDATE {} SET ", render_qualified_name(&update.table));
    let mut assignments = Vec::with_capacity(update.assignments.len());
    for (column, value) in &update.assignments {
        assignments.push(format!(
            "{} = {}",
            render_ident(column),
            render_expr(value, &mut binder)?
        ));
    }
    sql.push_str(&assignments.join(", "));

    if let Some(predicate) = &update.where_clause {
        write!(sql, " WHERE {}", render_expr(predicate, &mut binder)?)
            .expect("writing to String should not fail");
    }
    append_then_return(&mut sql, table, &update.returning);

    Ok(binder.finish(sql))
}

pub fn compile_delete(table: &Table, delete: &Delete) -> Result<CompiledSql> {
    let mut binder = ParamBinder::default();

    let mut sql = format!("DELETE FROM {}", render_qualified_name(&delete.table));
    if let Some(predicate) = &delete.where_clause {
        write!(sql, " WHERE {}", render_expr(predicate, &mut binder)?)
            .expect("writing to String should not fail");
    }
    append_then_return(&mut sql, table, &delete.returning);

    Ok(binder.finish(sql))
}

/// Emits `THEN RETURN` in place of RETURNING, dropping columns flagged
/// `exclude_from_returning`. An emptied list omits the clause entirely.
fn append_then_return(sql: &mut String, table: &Table, returning: &[Ident]) {
    let kept = returning
        .iter()
        .filter(|name| {
            table.find_column(&name.value).map_or(true, |column| {
                !matches!(
                    column.extra.get(option_keys::EXCLUDE_FROM_RETURNING),
                    Some(Value::Bool(true))
                )
            })
        })
        .map(render_ident)
        .collect::<Vec<_>>();

    if !kept.is_empty() {
        write!(sql, " THEN RETURN {}", kept.join(", "))
            .expect("writing to String should not fail");
    }
}

/// The probe Spanner accepts for an empty IN-list: a typed SELECT that can
/// never yield a row.
pub fn empty_set_expr(data_type: Option<&DataType>) -> Result<String> {
    let probe_type = match data_type {
        Some(data_type) => compile_type(data_type)?,
        None => "INT64".to_string(),
    };
    Ok(format!(
        "SELECT CAST(1 AS {probe_type}) FROM (SELECT 1) WHERE 1 != 1"
    ))
}

fn render_order_by(items: &[OrderByItem], binder: &mut ParamBinder) -> Result<String> {
    let mut terms = Vec::with_capacity(items.len());
    for item in items {
        let mut term = render_expr(&item.expr, binder)?;
        match item.order {
            Some(SortOrder::Desc) => term.push_str(" DESC"),
            Some(SortOrder::Asc) => term.push_str(" ASC"),
            None => {}
        }
        terms.push(term);
    }
    Ok(terms.join(", "))
}

fn render_expr(expr: &Expr, binder: &mut ParamBinder) -> Result<String> {
    match expr {
        Expr::Literal(literal) => Ok(render_literal(literal)),
        Expr::Column(ident) => Ok(render_ident(ident)),
        Expr::QualifiedColumn { qualifier, name } => {
            Ok(format!("{}.{}", render_ident(qualifier), render_ident(name)))
        }
        Expr::Parameter(value) => Ok(binder.bind(value.clone())),
        Expr::Null => Ok("NULL".to_string()),
        Expr::Raw(sql) => Ok(sql.clone()),
        Expr::BinaryOp { left, op, right } => {
            // GoogleSQL has no infix modulo; MOD is a function.
            if *op == BinaryOperator::Modulo {
                return Ok(format!(
                    "MOD({}, {})",
                    render_expr(left, binder)?,
                    render_expr(right, binder)?
                ));
            }
            Ok(format!(
                "{} {} {}",
                render_expr(left, binder)?,
                render_binary_operator(op),
                render_expr(right, binder)?
            ))
        }
        Expr::UnaryOp { op, expr } => {
            let operand = render_expr(expr, binder)?;
            Ok(match op {
                UnaryOperator::Plus => format!("+{operand}"),
                UnaryOperator::Minus => format!("-{operand}"),
                UnaryOperator::Not => format!("NOT {operand}"),
            })
        }
        Expr::Comparison { left, op, right } => Ok(format!(
            "{} {} {}",
            render_expr(left, binder)?,
            render_comparison(op),
            render_expr(right, binder)?
        )),
        Expr::And(left, right) => Ok(format!(
            "{} AND {}",
            render_expr(left, binder)?,
            render_expr(right, binder)?
        )),
        Expr::Or(left, right) => Ok(format!(
            "{} OR {}",
            render_expr(left, binder)?,
            render_expr(right, binder)?
        )),
        Expr::Not(inner) => Ok(format!("NOT {}", render_expr(inner, binder)?)),
        Expr::Is { expr, test } => Ok(format!(
            "{} {}",
            render_expr(expr, binder)?,
            render_is_test(test)
        )),
        Expr::IsDistinctFrom { .. } => Err(unsupported(
            "IS DISTINCT FROM",
            "rewrite the comparison with explicit NULL handling",
        )),
        Expr::Like {
            expr,
            pattern,
            escape,
            negated,
        } => {
            if escape.is_some() {
                return Err(unsupported(
                    "LIKE ... ESCAPE",
                    "Spanner LIKE accepts no ESCAPE clause",
                ));
            }
            Ok(format!(
                "{} {} {}",
                render_expr(expr, binder)?,
                if *negated { "NOT LIKE" } else { "LIKE" },
                render_expr(pattern, binder)?
            ))
        }
        Expr::Between {
            expr,
            low,
            high,
            negated,
        } => Ok(format!(
            "{} {} {} AND {}",
            render_expr(expr, binder)?,
            if *negated { "NOT BETWEEN" } else { "BETWEEN" },
            render_expr(low, binder)?,
            render_expr(high, binder)?
        )),
        Expr::In {
            expr,
            list,
            negated,
            element_type,
        } => render_in(expr, list, *negated, element_type.as_ref(), binder),
        Expr::Paren(inner) => Ok(format!("({})", render_expr(inner, binder)?)),
        Expr::Tuple(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                rendered.push(render_expr(item, binder)?);
            }
            Ok(format!("({})", rendered.join(", ")))
        }
        Expr::Function {
            name,
            args,
            distinct,
            order_by,
        } => {
            let mut rendered = Vec::with_capacity(args.len());
            for arg in args {
                rendered.push(render_expr(arg, binder)?);
            }
            let mut body = rendered.join(", ");
            if *distinct {
                body = format!("DISTINCT {body}");
            }
            // GoogleSQL places ORDER BY inside the aggregate call.
            if !order_by.is_empty() {
                write!(body, " ORDER BY {}", render_order_by(order_by, binder)?)
                    .expect("writing to String should not fail");
            }
            Ok(format!("{name}({body})"))
        }
        Expr::Cast { expr, data_type } => Ok(format!(
            "CAST({} AS {})",
            render_expr(expr, binder)?,
            compile_type(data_type)?
        )),
        Expr::Case {
            operand,
            when_clauses,
            else_clause,
        } => {
            let mut sql = String::from("CASE");
            if let Some(operand) = operand {
                write!(sql, " {}", render_expr(operand, binder)?)
                    .expect("writing to String should not fail");
            }
            for (condition, outcome) in when_clauses {
                write!(
                    sql,
                    " WHEN {} THEN {}",
                    render_expr(condition, binder)?,
                    render_expr(outcome, binder)?
                )
                .expect("writing to String should not fail");
            }
            if let Some(fallback) = else_clause {
                write!(sql, " ELSE {}", render_expr(fallback, binder)?)
                    .expect("writing to String should not fail");
            }
            sql.push_str(" END");
            Ok(sql)
        }
    }
}

/// IN lists are rendered with literal substitution: bound parameters inside
/// the list become inline literals, and an empty list becomes the typed
/// empty-set probe.
fn render_in(
    expr: &Expr,
    list: &[Expr],
    negated: bool,
    element_type: Option<&DataType>,
    binder: &mut ParamBinder,
) -> Result<String> {
    let keyword = if negated { "NOT IN" } else { "IN" };
    let subject = render_expr(expr, binder)?;

    if list.is_empty() {
        return Ok(format!(
            "{subject} {keyword} ({})",
            empty_set_expr(element_type)?
        ));
    }

    let mut rendered = Vec::with_capacity(list.len());
    for element in list {
        match element {
            Expr::Parameter(value) => rendered.push(render_value_literal(value)),
            other => rendered.push(render_expr(other, binder)?),
        }
    }
    Ok(format!("{subject} {keyword} ({})", rendered.join(", ")))
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::String(text) => quote_string_literal(text),
        Literal::Integer(value) => value.to_string(),
        Literal::Float(value) => value.to_string(),
        Literal::Boolean(true) => "TRUE".to_string(),
        Literal::Boolean(false) => "FALSE".to_string(),
    }
}

fn render_value_literal(value: &Value) -> String {
    match value {
        Value::String(text) => quote_string_literal(text),
        Value::Integer(number) => number.to_string(),
        Value::Float(number) => number.to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Bytes(bytes) => {
            let mut rendered = String::from("b'");
            for byte in bytes {
                write!(rendered, "\\x{byte:02x}").expect("writing to String should not fail");
            }
            rendered.push('\'');
            rendered
        }
        Value::Null => "NULL".to_string(),
    }
}

fn quote_string_literal(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn render_binary_operator(op: &BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Modulo => unreachable!("modulo renders as the MOD function"),
        BinaryOperator::StringConcat => "||",
        BinaryOperator::BitwiseAnd => "&",
        BinaryOperator::BitwiseOr => "|",
        BinaryOperator::BitwiseXor => "^",
    }
}

fn render_comparison(op: &ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Equal => "=",
        ComparisonOp::NotEqual => "!=",
        ComparisonOp::GreaterThan => ">",
        ComparisonOp::GreaterThanOrEqual => ">=",
        ComparisonOp::LessThan => "<",
        ComparisonOp::LessThanOrEqual => "<=",
    }
}

fn render_is_test(test: &IsTest) -> &'static str {
    match test {
        IsTest::Null => "IS NULL",
        IsTest::NotNull => "IS NOT NULL",
        IsTest::True => "IS TRUE",
        IsTest::NotTrue => "IS NOT TRUE",
        IsTest::False => "IS FALSE",
        IsTest::NotFalse => "IS NOT FALSE",
    }
}

fn unsupported(feature: &str, message: &str) -> bridgeql_core::Error {
    GenerateError::UnsupportedFeature {
        feature: feature.to_string(),
        message: message.to_string(),
        dialect: DIALECT_NAME.to_string(),
    }
    .into()
}
