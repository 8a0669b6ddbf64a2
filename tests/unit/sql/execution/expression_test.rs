use tracesql::tracesql::sql::ast::{BinaryOperator, Expr, LiteralValue, UnaryOperator};
use tracesql::tracesql::sql::context::QueryContext;
use tracesql::tracesql::sql::error::SqlError;
use tracesql::tracesql::sql::execution::expression::ExpressionEvaluator;
use tracesql::tracesql::sql::execution::types::{FieldValue, RowRef, RowSet};
use tracesql::tracesql::sql::module::ModuleRegistry;
use tracesql::tracesql::store::EventStore;

fn lit(value: i64) -> Expr {
    Expr::Literal(LiteralValue::Integer(value))
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

fn sample_row() -> RowSet {
    RowSet::from_rows(
        vec!["name".to_string(), "dur".to_string(), "ratio".to_string()],
        vec![vec![
            FieldValue::String("Air".to_string()),
            FieldValue::Integer(30_374_000),
            FieldValue::Float(0.5),
        ]],
    )
    .unwrap()
}

fn with_context<T>(f: impl FnOnce(&QueryContext) -> T) -> T {
    let store = EventStore::load(Vec::new());
    let registry = ModuleRegistry::with_stdlib();
    let ctx = QueryContext::new(&store, &registry);
    f(&ctx)
}

#[test]
fn test_column_reference() {
    let rowset = sample_row();
    with_context(|ctx| {
        let value =
            ExpressionEvaluator::evaluate(&Expr::Column("name".to_string()), &rowset.row(0), ctx)
                .unwrap();
        assert_eq!(value, FieldValue::String("Air".to_string()));
    });
}

#[test]
fn test_unknown_column_fails_with_schema_error() {
    let rowset = sample_row();
    with_context(|ctx| {
        let result =
            ExpressionEvaluator::evaluate(&Expr::Column("missing".to_string()), &rowset.row(0), ctx);
        match result {
            Err(SqlError::SchemaError { column, .. }) => {
                assert_eq!(column.as_deref(), Some("missing"));
            }
            other => panic!("Expected SchemaError, got {:?}", other),
        }
    });
}

#[test]
fn test_integer_arithmetic() {
    with_context(|ctx| {
        let row = RowRef::empty();
        let sum = ExpressionEvaluator::evaluate(&binary(lit(40), BinaryOperator::Add, lit(2)), &row, ctx)
            .unwrap();
        assert_eq!(sum, FieldValue::Integer(42));

        // Integer division truncates
        let quotient =
            ExpressionEvaluator::evaluate(&binary(lit(7), BinaryOperator::Divide, lit(2)), &row, ctx)
                .unwrap();
        assert_eq!(quotient, FieldValue::Integer(3));
    });
}

#[test]
fn test_mixed_arithmetic_promotes_to_float() {
    with_context(|ctx| {
        let expr = binary(
            lit(5_000_000),
            BinaryOperator::Divide,
            Expr::Literal(LiteralValue::Float(1_000_000.0)),
        );
        let value = ExpressionEvaluator::evaluate(&expr, &RowRef::empty(), ctx).unwrap();
        assert_eq!(value, FieldValue::Float(5.0));
    });
}

#[test]
fn test_division_by_zero_fails() {
    with_context(|ctx| {
        let result = ExpressionEvaluator::evaluate(
            &binary(lit(1), BinaryOperator::Divide, lit(0)),
            &RowRef::empty(),
            ctx,
        );
        assert!(matches!(result, Err(SqlError::DataError { .. })));
    });
}

#[test]
fn test_null_propagates_through_arithmetic_and_comparison() {
    with_context(|ctx| {
        let row = RowRef::empty();
        let null = Expr::Literal(LiteralValue::Null);

        let sum = ExpressionEvaluator::evaluate(
            &binary(lit(1), BinaryOperator::Add, null.clone()),
            &row,
            ctx,
        )
        .unwrap();
        assert_eq!(sum, FieldValue::Null);

        let cmp = ExpressionEvaluator::evaluate(
            &binary(lit(1), BinaryOperator::Equal, null),
            &row,
            ctx,
        )
        .unwrap();
        assert_eq!(cmp, FieldValue::Null);
    });
}

#[test]
fn test_string_comparison_is_byte_wise() {
    with_context(|ctx| {
        let expr = binary(
            Expr::Literal(LiteralValue::String("WSL".to_string())),
            BinaryOperator::LessThan,
            Expr::Literal(LiteralValue::String("base64-SP".to_string())),
        );
        let value = ExpressionEvaluator::evaluate(&expr, &RowRef::empty(), ctx).unwrap();
        assert_eq!(value, FieldValue::Boolean(true));
    });
}

#[test]
fn test_comparing_incompatible_types_fails() {
    with_context(|ctx| {
        let expr = binary(
            Expr::Literal(LiteralValue::String("Air".to_string())),
            BinaryOperator::Equal,
            lit(1),
        );
        let result = ExpressionEvaluator::evaluate(&expr, &RowRef::empty(), ctx);
        assert!(matches!(result, Err(SqlError::TypeMismatchError { .. })));
    });
}

#[test]
fn test_unary_operators() {
    with_context(|ctx| {
        let row = RowRef::empty();
        let negated = ExpressionEvaluator::evaluate(
            &Expr::UnaryOp {
                op: UnaryOperator::Minus,
                expr: Box::new(lit(7)),
            },
            &row,
            ctx,
        )
        .unwrap();
        assert_eq!(negated, FieldValue::Integer(-7));

        let inverted = ExpressionEvaluator::evaluate(
            &Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr: Box::new(Expr::Literal(LiteralValue::Boolean(false))),
            },
            &row,
            ctx,
        )
        .unwrap();
        assert_eq!(inverted, FieldValue::Boolean(true));
    });
}

#[test]
fn test_predicate_semantics() {
    let rowset = sample_row();
    with_context(|ctx| {
        let keep = binary(
            Expr::Column("dur".to_string()),
            BinaryOperator::GreaterThan,
            lit(0),
        );
        assert!(ExpressionEvaluator::evaluate_predicate(&keep, &rowset.row(0), ctx).unwrap());

        // NULL predicate drops the row
        let null = Expr::Literal(LiteralValue::Null);
        assert!(!ExpressionEvaluator::evaluate_predicate(&null, &rowset.row(0), ctx).unwrap());

        // Non-boolean predicate is a type mismatch
        let numeric = lit(1);
        assert!(matches!(
            ExpressionEvaluator::evaluate_predicate(&numeric, &rowset.row(0), ctx),
            Err(SqlError::TypeMismatchError { .. })
        ));
    });
}

#[test]
fn test_format_function_conversions() {
    with_context(|ctx| {
        let row = RowRef::empty();
        let expr = Expr::Function {
            name: "format".to_string(),
            args: vec![
                Expr::Literal(LiteralValue::String("%s scored %.5f (%d runs, 100%%)".to_string())),
                Expr::Literal(LiteralValue::String("Air".to_string())),
                Expr::Literal(LiteralValue::Float(513.209324)),
                lit(10),
            ],
        };
        let value = ExpressionEvaluator::evaluate(&expr, &row, ctx).unwrap();
        assert_eq!(
            value,
            FieldValue::String("Air scored 513.20932 (10 runs, 100%)".to_string())
        );
    });
}

#[test]
fn test_format_function_argument_errors() {
    with_context(|ctx| {
        let row = RowRef::empty();

        // Too few arguments for the conversions
        let missing = Expr::Function {
            name: "format".to_string(),
            args: vec![Expr::Literal(LiteralValue::String("%d and %d".to_string())), lit(1)],
        };
        assert!(matches!(
            ExpressionEvaluator::evaluate(&missing, &row, ctx),
            Err(SqlError::DataError { .. })
        ));

        // Non-numeric argument for %f
        let wrong_type = Expr::Function {
            name: "format".to_string(),
            args: vec![
                Expr::Literal(LiteralValue::String("%.5f".to_string())),
                Expr::Literal(LiteralValue::String("Air".to_string())),
            ],
        };
        assert!(matches!(
            ExpressionEvaluator::evaluate(&wrong_type, &row, ctx),
            Err(SqlError::TypeMismatchError { .. })
        ));
    });
}

#[test]
fn test_unknown_function_fails_with_not_found() {
    with_context(|ctx| {
        let expr = Expr::Function {
            name: "no_such_function".to_string(),
            args: Vec::new(),
        };
        let result = ExpressionEvaluator::evaluate(&expr, &RowRef::empty(), ctx);
        match result {
            Err(SqlError::NotFoundError { name, .. }) => assert_eq!(name, "no_such_function"),
            other => panic!("Expected NotFoundError, got {:?}", other),
        }
    });
}

#[test]
fn test_module_scalar_function_rejects_arguments() {
    let store = EventStore::load(Vec::new());
    let registry = ModuleRegistry::with_stdlib();
    let mut ctx = QueryContext::new(&store, &registry);
    ctx.include("chrome.jetstream_3").unwrap();

    let expr = Expr::Function {
        name: "chrome_jetstream_3_score".to_string(),
        args: vec![lit(1)],
    };
    let result = ExpressionEvaluator::evaluate(&expr, &RowRef::empty(), &ctx);
    assert!(matches!(result, Err(SqlError::DataError { .. })));
}
