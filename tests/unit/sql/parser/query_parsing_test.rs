use tracesql::tracesql::sql::ast::*;
use tracesql::tracesql::sql::error::SqlError;
use tracesql::tracesql::sql::parser::TraceSqlParser;

#[test]
fn test_simple_select_all() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT * FROM event");

    assert!(result.is_ok());
    let query = result.unwrap();

    match query {
        TraceQuery::Select(SelectStatement {
            fields,
            from,
            where_clause,
            order_by,
            limit,
        }) => {
            assert_eq!(fields.len(), 1);
            assert!(matches!(fields[0], SelectField::Wildcard));
            assert_eq!(from.as_deref(), Some("event"));
            assert!(where_clause.is_none());
            assert!(order_by.is_none());
            assert!(limit.is_none());
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_select_specific_columns() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT name, iteration, subtest FROM event");

    assert!(result.is_ok());
    let query = result.unwrap();

    match query {
        TraceQuery::Select(SelectStatement { fields, from, .. }) => {
            assert_eq!(fields.len(), 3);
            assert_eq!(from.as_deref(), Some("event"));

            for field in &fields {
                assert!(matches!(field, SelectField::Expression { .. }));
            }
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_select_with_alias() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT duration AS dur, name AS benchmark FROM event");

    assert!(result.is_ok());
    let query = result.unwrap();

    match query {
        TraceQuery::Select(SelectStatement { fields, .. }) => {
            assert_eq!(fields.len(), 2);

            if let SelectField::Expression { alias, .. } = &fields[0] {
                assert_eq!(alias.as_deref(), Some("dur"));
            }

            if let SelectField::Expression { alias, .. } = &fields[1] {
                assert_eq!(alias.as_deref(), Some("benchmark"));
            }
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_include_module_dotted_name() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("INCLUDE MODULE chrome.jetstream_3");

    assert!(result.is_ok());
    match result.unwrap() {
        TraceQuery::IncludeModule { name } => assert_eq!(name, "chrome.jetstream_3"),
        _ => panic!("Expected IncludeModule statement"),
    }
}

#[test]
fn test_script_include_then_select() {
    let parser = TraceSqlParser::new();
    let result = parser.parse_script(
        "INCLUDE MODULE chrome.jetstream_3;
         SELECT name, top_level_name, iteration, subtest, dur
         FROM chrome_jetstream_3_measure
         ORDER BY name, iteration, subtest;",
    );

    assert!(result.is_ok());
    let statements = result.unwrap();
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0], TraceQuery::IncludeModule { .. }));

    match &statements[1] {
        TraceQuery::Select(SelectStatement {
            fields, order_by, ..
        }) => {
            assert_eq!(fields.len(), 5);
            let order_by = order_by.as_ref().unwrap();
            assert_eq!(order_by.len(), 3);
            for item in order_by {
                assert!(matches!(item.direction, OrderDirection::Asc));
            }
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_order_by_directions() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT name FROM event ORDER BY duration DESC, name ASC");

    let query = result.unwrap();
    match query {
        TraceQuery::Select(SelectStatement { order_by, .. }) => {
            let order_by = order_by.unwrap();
            assert_eq!(order_by.len(), 2);
            assert!(matches!(order_by[0].direction, OrderDirection::Desc));
            assert!(matches!(order_by[1].direction, OrderDirection::Asc));
            assert_eq!(order_by[0].expr, Expr::Column("duration".to_string()));
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_where_clause_and_limit() {
    let parser = TraceSqlParser::new();
    let result =
        parser.parse("SELECT name FROM event WHERE subtest != 'First' AND duration > 0 LIMIT 10");

    let query = result.unwrap();
    match query {
        TraceQuery::Select(SelectStatement {
            where_clause,
            limit,
            ..
        }) => {
            assert_eq!(limit, Some(10));
            match where_clause.unwrap() {
                Expr::BinaryOp { op, left, .. } => {
                    assert_eq!(op, BinaryOperator::And);
                    assert!(matches!(
                        *left,
                        Expr::BinaryOp {
                            op: BinaryOperator::NotEqual,
                            ..
                        }
                    ));
                }
                other => panic!("Expected AND expression, got {:?}", other),
            }
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_function_call_with_arguments() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT format('%.5f', score) AS score FROM scores");

    let query = result.unwrap();
    match query {
        TraceQuery::Select(SelectStatement { fields, .. }) => match &fields[0] {
            SelectField::Expression { expr, alias } => {
                assert_eq!(alias.as_deref(), Some("score"));
                match expr {
                    Expr::Function { name, args } => {
                        assert_eq!(name, "format");
                        assert_eq!(args.len(), 2);
                        assert_eq!(
                            args[0],
                            Expr::Literal(LiteralValue::String("%.5f".to_string()))
                        );
                        assert_eq!(args[1], Expr::Column("score".to_string()));
                    }
                    other => panic!("Expected function call, got {:?}", other),
                }
            }
            other => panic!("Expected expression field, got {:?}", other),
        },
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_from_less_scalar_select() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT format('%.5f', chrome_jetstream_3_score()) AS score;");

    let query = result.unwrap();
    match query {
        TraceQuery::Select(SelectStatement { fields, from, .. }) => {
            assert!(from.is_none());
            assert_eq!(fields.len(), 1);
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_string_literal_quote_escape() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT name FROM event WHERE name = 'it''s'");

    let query = result.unwrap();
    match query {
        TraceQuery::Select(SelectStatement { where_clause, .. }) => {
            match where_clause.unwrap() {
                Expr::BinaryOp { right, .. } => {
                    assert_eq!(
                        *right,
                        Expr::Literal(LiteralValue::String("it's".to_string()))
                    );
                }
                other => panic!("Expected comparison, got {:?}", other),
            }
        }
        _ => panic!("Expected Select query"),
    }
}

#[test]
fn test_parse_error_reports_position() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT name FRM event");

    match result {
        Err(SqlError::ParseError { position, .. }) => assert!(position.is_some()),
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_unclosed_string_literal_fails() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT 'unterminated FROM event");
    assert!(matches!(result, Err(SqlError::ParseError { .. })));
}

#[test]
fn test_include_module_requires_name() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("INCLUDE MODULE ;");
    assert!(matches!(result, Err(SqlError::ParseError { .. })));
}

#[test]
fn test_parse_rejects_multiple_statements() {
    let parser = TraceSqlParser::new();
    let result = parser.parse("SELECT name FROM event; SELECT id FROM event");
    assert!(matches!(result, Err(SqlError::ParseError { .. })));
}

#[test]
fn test_line_comments_are_skipped() {
    let parser = TraceSqlParser::new();
    let result = parser.parse(
        "-- measure rows in fixture order
         SELECT name FROM event -- trailing note",
    );
    assert!(result.is_ok());
}
