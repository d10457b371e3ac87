//! Tests for tie expression parsing and evaluation

use approx::assert_relative_eq;
use specfit_rs::parameters::{EvaluationContext, Expression, ExpressionError, ParameterContext};
use specfit_rs::{Kwargs, SpecFitError, SpectralModel};
use std::collections::HashMap;

#[test]
fn test_expression_against_a_table() {
    let model = SpectralModel::gaussian(Kwargs::new().with("npeaks", 2)).unwrap();
    let names = model.parinfo().name_index();
    let values = [2.0, -1.0, 0.5, 1.0, 3.0, 0.25];
    let context = ParameterContext::new(&values, &names);

    let expr = Expression::parse("AMPLITUDE0 * exp(-(SHIFT1 - SHIFT0)^2 / 8)").unwrap();
    assert_relative_eq!(expr.evaluate(&context).unwrap(), 2.0 * (-2.0f64).exp());

    let expr = Expression::parse("max(WIDTH0, WIDTH1, p[3])").unwrap();
    assert_eq!(expr.evaluate(&context).unwrap(), 1.0);

    let (indices, referenced) = Expression::parse("p[4] + 2 * SHIFT0 - p[4]")
        .unwrap()
        .references();
    assert_eq!(indices, vec![4]);
    assert_eq!(referenced, vec!["SHIFT0".to_string()]);
}

#[test]
fn test_operator_precedence() {
    let vars: HashMap<String, f64> = HashMap::new();
    let cases = [
        ("1 + 2 * 3", 7.0),
        ("(1 + 2) * 3", 9.0),
        ("10 - 4 - 3", 3.0),
        ("2 ^ 3 ^ 2", 512.0),
        ("-2 ^ 2", -4.0),
        ("12 / 3 / 2", 2.0),
        ("sqrt(16) + abs(-3)", 7.0),
        ("log10(1000)", 3.0),
    ];
    for (input, expected) in cases {
        let value = Expression::parse(input).unwrap().evaluate(&vars).unwrap();
        assert_relative_eq!(value, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_expression_errors() {
    let mut vars = HashMap::new();
    vars.insert("a".to_string(), 1.0);

    assert!(matches!(
        Expression::parse("a +"),
        Err(ExpressionError::ParseError { .. })
    ));
    assert!(matches!(
        Expression::parse("b").unwrap().evaluate(&vars),
        Err(ExpressionError::UndefinedVariable { .. })
    ));
    assert!(matches!(
        Expression::parse("a / 0").unwrap().evaluate(&vars),
        Err(ExpressionError::DivisionByZero)
    ));
    assert!(matches!(
        Expression::parse("p[0]").unwrap().evaluate(&vars),
        Err(ExpressionError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        Expression::parse("erf(a)").unwrap().evaluate(&vars),
        Err(ExpressionError::UndefinedFunction { .. })
    ));

    // Expression errors surface through the crate error type
    let err: SpecFitError = ExpressionError::DivisionByZero.into();
    assert!(matches!(err, SpecFitError::Expression(_)));
}

/// A context exposing every value under its index only.
struct IndexOnly(Vec<f64>);

impl EvaluationContext for IndexOnly {
    fn by_index(&self, index: usize) -> Result<f64, ExpressionError> {
        self.0
            .get(index)
            .copied()
            .ok_or(ExpressionError::IndexOutOfRange {
                index,
                len: self.0.len(),
            })
    }

    fn by_name(&self, name: &str) -> Result<f64, ExpressionError> {
        Err(ExpressionError::UndefinedVariable {
            name: name.to_string(),
        })
    }
}

#[test]
fn test_custom_context() {
    let context = IndexOnly(vec![1.0, 2.0, 3.0]);
    let expr = Expression::parse("p[0] + p[1] * p[2]").unwrap();
    assert_eq!(expr.evaluate(&context).unwrap(), 7.0);
}
