use crate::unit::common::jetstream_events;
use tracesql::tracesql::sql::ast::{
    BinaryOperator, Expr, LiteralValue, SelectField, SelectStatement,
};
use tracesql::tracesql::sql::context::QueryContext;
use tracesql::tracesql::sql::error::SqlError;
use tracesql::tracesql::sql::execution::types::{DataType, FieldValue};
use tracesql::tracesql::sql::execution::view::ViewEvaluator;
use tracesql::tracesql::sql::module::{Module, ModuleRegistry, TableDef};
use tracesql::tracesql::store::EventStore;

#[test]
fn test_measure_table_projects_and_renames() {
    let store = EventStore::load(jetstream_events());
    let registry = ModuleRegistry::with_stdlib();
    let mut ctx = QueryContext::new(&store, &registry);
    ctx.include("chrome.jetstream_3").unwrap();

    let measure = ViewEvaluator::materialize(&ctx, "chrome_jetstream_3_measure").unwrap();
    assert_eq!(measure.len(), 142);

    let names: Vec<&str> = measure.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["name", "top_level_name", "iteration", "subtest", "dur"]
    );
    assert_eq!(measure.columns[4].data_type, DataType::Integer);
}

#[test]
fn test_unknown_table_fails_with_schema_error() {
    let store = EventStore::load(Vec::new());
    let registry = ModuleRegistry::with_stdlib();
    let ctx = QueryContext::new(&store, &registry);

    // Without INCLUDE MODULE the derived table is not in scope
    match ViewEvaluator::materialize(&ctx, "chrome_jetstream_3_measure") {
        Err(SqlError::SchemaError { .. }) => {}
        other => panic!("Expected SchemaError, got {:?}", other),
    }
}

#[test]
fn test_where_clause_filters_rows() {
    let store = EventStore::load(jetstream_events());
    let registry = ModuleRegistry::with_stdlib();
    let mut ctx = QueryContext::new(&store, &registry);
    ctx.include("chrome.jetstream_3").unwrap();

    let stmt = SelectStatement {
        fields: vec![SelectField::Expression {
            expr: Expr::Column("name".to_string()),
            alias: None,
        }],
        from: Some("chrome_jetstream_3_measure".to_string()),
        where_clause: Some(Expr::BinaryOp {
            left: Box::new(Expr::Column("subtest".to_string())),
            op: BinaryOperator::Equal,
            right: Box::new(Expr::Literal(LiteralValue::String("First".to_string()))),
        }),
        order_by: None,
        limit: None,
    };

    let result = ViewEvaluator::run_select(&ctx, &stmt).unwrap();
    // One First row per benchmark; WSL has none
    assert_eq!(result.len(), 14);
    for row in &result.rows {
        assert!(!matches!(&row[0], FieldValue::String(s) if s == "WSL"));
    }
}

#[test]
fn test_wildcard_requires_from_table() {
    let store = EventStore::load(Vec::new());
    let registry = ModuleRegistry::new();
    let ctx = QueryContext::new(&store, &registry);

    let stmt = SelectStatement {
        fields: vec![SelectField::Wildcard],
        from: None,
        where_clause: None,
        order_by: None,
        limit: None,
    };
    assert!(matches!(
        ViewEvaluator::run_select(&ctx, &stmt),
        Err(SqlError::SchemaError { .. })
    ));
}

#[test]
fn test_wildcard_expands_source_columns() {
    let store = EventStore::load(jetstream_events());
    let registry = ModuleRegistry::new();
    let ctx = QueryContext::new(&store, &registry);

    let stmt = SelectStatement {
        fields: vec![SelectField::Wildcard],
        from: Some("event".to_string()),
        where_clause: None,
        order_by: None,
        limit: Some(3),
    };
    let result = ViewEvaluator::run_select(&ctx, &stmt).unwrap();
    assert_eq!(result.columns.len(), 6);
    assert_eq!(result.len(), 3);
}

#[test]
fn test_cyclic_view_definitions_fail() {
    let store = EventStore::load(Vec::new());
    let mut registry = ModuleRegistry::new();
    registry.register(
        Module::new("loop.views")
            .with_table(
                "view_a",
                TableDef::Select(SelectStatement::projection("view_b", &[("x", None)])),
            )
            .with_table(
                "view_b",
                TableDef::Select(SelectStatement::projection("view_a", &[("x", None)])),
            ),
    );
    let mut ctx = QueryContext::new(&store, &registry);
    ctx.include("loop.views").unwrap();

    match ViewEvaluator::materialize(&ctx, "view_a") {
        Err(SqlError::CyclicDependencyError { chain }) => {
            assert_eq!(chain, vec!["view_a", "view_b", "view_a"]);
        }
        other => panic!("Expected CyclicDependencyError, got {:?}", other),
    }
}

#[test]
fn test_view_over_view_resolves_through_scope() {
    let store = EventStore::load(jetstream_events());
    let mut registry = ModuleRegistry::new();
    registry.register(
        Module::new("layered.views")
            .with_table(
                "span_durations",
                TableDef::Select(SelectStatement::projection(
                    "event",
                    &[("name", None), ("duration", Some("dur"))],
                )),
            )
            .with_table(
                "span_names",
                TableDef::Select(SelectStatement::projection("span_durations", &[("name", None)])),
            ),
    );
    let mut ctx = QueryContext::new(&store, &registry);
    ctx.include("layered.views").unwrap();

    let result = ViewEvaluator::materialize(&ctx, "span_names").unwrap();
    assert_eq!(result.len(), 142);
    assert_eq!(result.columns.len(), 1);
}

#[test]
fn test_materialization_is_deterministic() {
    let store = EventStore::load(jetstream_events());
    let registry = ModuleRegistry::with_stdlib();
    let mut ctx = QueryContext::new(&store, &registry);
    ctx.include("chrome.jetstream_3").unwrap();

    let first = ViewEvaluator::materialize(&ctx, "chrome_jetstream_3_benchmark_score").unwrap();
    let second = ViewEvaluator::materialize(&ctx, "chrome_jetstream_3_benchmark_score").unwrap();
    assert_eq!(first, second);
}
