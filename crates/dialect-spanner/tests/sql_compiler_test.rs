use bridgeql_core::{
    Column, ComparisonOp, CompoundOp, DataType, Delete, Error, Expr, GenerateError, Ident,
    QualifiedName, Select, Update, Value,
};
use bridgeql_dialect_spanner::{
    compile_delete, compile_select, compile_update, empty_set_expr, option_keys,
};
use bridgeql_testkit::singers_table;

fn name_filter(select: Select) -> Select {
    select.filter(Expr::Comparison {
        left: Box::new(Expr::column("name")),
        op: ComparisonOp::Equal,
        right: Box::new(Expr::param(Value::String("Marc".to_string()))),
    })
}

#[test]
fn parameters_are_numbered_left_to_right() {
    let select = Select::from_table("singers")
        .column(Expr::column("singer_id"))
        .filter(Expr::And(
            Box::new(Expr::Comparison {
                left: Box::new(Expr::column("name")),
                op: ComparisonOp::Equal,
                right: Box::new(Expr::param(Value::String("Marc".to_string()))),
            }),
            Box::new(Expr::Comparison {
                left: Box::new(Expr::column("singer_id")),
                op: ComparisonOp::GreaterThan,
                right: Box::new(Expr::param(Value::Integer(10))),
            }),
        ));

    let compiled = compile_select(&select).expect("select should compile");
    assert_eq!(
        compiled.sql,
        "SELECT singer_id FROM singers WHERE name = @a0 AND singer_id > @a1"
    );
    assert_eq!(
        compiled.params,
        vec![Value::String("Marc".to_string()), Value::Integer(10)]
    );
}

#[test]
fn compound_selects_spell_out_distinct() {
    let cases = [
        (CompoundOp::Union, "UNION DISTINCT"),
        (CompoundOp::UnionAll, "UNION ALL"),
        (CompoundOp::Intersect, "INTERSECT DISTINCT"),
        (CompoundOp::IntersectAll, "INTERSECT ALL"),
        (CompoundOp::Except, "EXCEPT DISTINCT"),
        (CompoundOp::ExceptAll, "EXCEPT ALL"),
    ];

    for (op, keyword) in cases {
        let mut select = Select::from_table("singers").column(Expr::column("name"));
        select.compound.push((
            op,
            Select::from_table("former_singers").column(Expr::column("name")),
        ));

        let compiled = compile_select(&select).expect("compound select should compile");
        assert_eq!(
            compiled.sql,
            format!("SELECT name FROM singers {keyword} SELECT name FROM former_singers"),
        );
    }
}

#[test]
fn limit_accepts_literals_and_parameters_only() {
    let mut select = Select::from_table("singers").column(Expr::column("name"));
    select.limit = Some(Expr::integer(10));
    select.offset = Some(Expr::param(Value::Integer(5)));

    let compiled = compile_select(&select).expect("select should compile");
    assert_eq!(
        compiled.sql,
        "SELECT name FROM singers LIMIT 10 OFFSET @a0"
    );
    assert_eq!(compiled.params, vec![Value::Integer(5)]);

    let mut composite = Select::from_table("singers").column(Expr::column("name"));
    composite.limit = Some(Expr::BinaryOp {
        left: Box::new(Expr::integer(5)),
        op: bridgeql_core::BinaryOperator::Add,
        right: Box::new(Expr::integer(5)),
    });
    let error = compile_select(&composite).expect_err("composite LIMIT must be refused");
    assert!(matches!(
        error,
        Error::Generate(GenerateError::UnsupportedFeature { .. })
    ));
}

#[test]
fn empty_in_list_becomes_typed_probe() {
    let select = Select::from_table("singers")
        .column(Expr::column("name"))
        .filter(Expr::In {
            expr: Box::new(Expr::column("singer_id")),
            list: Vec::new(),
            negated: false,
            element_type: Some(DataType::Text),
        });

    let compiled = compile_select(&select).expect("select should compile");
    assert_eq!(
        compiled.sql,
        "SELECT name FROM singers WHERE singer_id IN \
         (SELECT CAST(1 AS STRING(MAX)) FROM (SELECT 1) WHERE 1 != 1)"
    );

    assert_eq!(
        empty_set_expr(None).expect("default probe should render"),
        "SELECT CAST(1 AS INT64) FROM (SELECT 1) WHERE 1 != 1"
    );
}

#[test]
fn in_list_parameters_are_inlined_as_literals() {
    let select = Select::from_table("singers")
        .column(Expr::column("name"))
        .filter(Expr::In {
            expr: Box::new(Expr::column("name")),
            list: vec![
                Expr::param(Value::String("Marc".to_string())),
                Expr::param(Value::String("O'Brien".to_string())),
            ],
            negated: true,
            element_type: None,
        });

    let compiled = compile_select(&select).expect("select should compile");
    assert_eq!(
        compiled.sql,
        "SELECT name FROM singers WHERE name NOT IN ('Marc', 'O\\'Brien')"
    );
    assert!(
        compiled.params.is_empty(),
        "IN-list parameters should be inlined, got {:?}",
        compiled.params
    );
}

#[test]
fn like_escape_and_is_distinct_from_are_refused() {
    let escaped = Select::from_table("singers")
        .column(Expr::column("name"))
        .filter(Expr::Like {
            expr: Box::new(Expr::column("name")),
            pattern: Box::new(Expr::string("M%")),
            escape: Some(Box::new(Expr::string("\\"))),
            negated: false,
        });
    let error = compile_select(&escaped).expect_err("LIKE ESCAPE must be refused");
    assert!(
        error.to_string().contains("ESCAPE"),
        "error should name the ESCAPE clause: {error}"
    );

    let distinct = Select::from_table("singers")
        .column(Expr::column("name"))
        .filter(Expr::IsDistinctFrom {
            left: Box::new(Expr::column("name")),
            right: Box::new(Expr::Null),
            negated: false,
        });
    let error = compile_select(&distinct).expect_err("IS DISTINCT FROM must be refused");
    assert!(matches!(
        error,
        Error::Generate(GenerateError::UnsupportedFeature { .. })
    ));
}

#[test]
fn modulo_renders_as_mod_function() {
    let select = Select::from_table("singers")
        .column(Expr::BinaryOp {
            left: Box::new(Expr::column("singer_id")),
            op: bridgeql_core::BinaryOperator::Modulo,
            right: Box::new(Expr::integer(2)),
        });

    let compiled = compile_select(&select).expect("select should compile");
    assert_eq!(compiled.sql, "SELECT MOD(singer_id, 2) FROM singers");
}

#[test]
fn update_and_delete_render_then_return() {
    let table = singers_table();

    let update = Update {
        table: QualifiedName::bare("singers"),
        assignments: vec![(
            Ident::unquoted("name"),
            Expr::param(Value::String("Cher".to_string())),
        )],
        where_clause: Some(Expr::Comparison {
            left: Box::new(Expr::column("singer_id")),
            op: ComparisonOp::Equal,
            right: Box::new(Expr::param(Value::Integer(7))),
        }),
        returning: vec![Ident::unquoted("name")],
    };
    let compiled = compile_update(&table, &update).expect("update should compile");
    assert_eq!(
        compiled.sql,
        "UPDATE singers SET name = @a0 WHERE singer_id = @a1 THEN RETURN name"
    );

    let delete = Delete {
        table: QualifiedName::bare("singers"),
        where_clause: name_filter(Select::from_table("singers")).where_clause,
        returning: vec![Ident::unquoted("singer_id")],
    };
    let compiled = compile_delete(&table, &delete).expect("delete should compile");
    assert_eq!(
        compiled.sql,
        "DELETE FROM singers WHERE name = @a0 THEN RETURN singer_id"
    );
}

#[test]
fn excluded_columns_drop_out_of_then_return() {
    let table = singers_table().column(
        Column::new("search_terms", DataType::Text)
            .option(option_keys::EXCLUDE_FROM_RETURNING, Value::Bool(true)),
    );

    let delete = Delete {
        table: QualifiedName::bare("singers"),
        where_clause: None,
        returning: vec![
            Ident::unquoted("singer_id"),
            Ident::unquoted("search_terms"),
        ],
    };
    let compiled = compile_delete(&table, &delete).expect("delete should compile");
    assert_eq!(
        compiled.sql,
        "DELETE FROM singers THEN RETURN singer_id",
        "excluded columns should be filtered out"
    );

    let only_excluded = Delete {
        table: QualifiedName::bare("singers"),
        where_clause: None,
        returning: vec![Ident::unquoted("search_terms")],
    };
    let compiled = compile_delete(&table, &only_excluded).expect("delete should compile");
    assert_eq!(
        compiled.sql, "DELETE FROM singers",
        "an emptied returning list should omit THEN RETURN entirely"
    );
}
