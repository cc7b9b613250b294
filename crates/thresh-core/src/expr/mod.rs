//! Restricted formula evaluator
//!
//! Formulas are parsed into a small expression tree and evaluated against a
//! namespace of columns plus a fixed registry of numeric built-ins. There is
//! no assignment and no access to anything outside those two tables.

pub mod builtins;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod value;

pub use error::{EvalError, EvalResult};
pub use eval::ExpressionEvaluator;
pub use parser::{parse, Expr};
pub use value::{FormulaResult, Namespace, Value};

use crate::error::{Error, Result};

/// Names in `namespace` that would shadow a built-in, in registry order
pub fn conflicting_names(namespace: &Namespace) -> Vec<String> {
    builtins::names()
        .filter(|name| namespace.contains_key(*name))
        .map(str::to_string)
        .collect()
}

/// Evaluate `expression` against `namespace` and the built-in registry
pub fn evaluate(namespace: &Namespace, expression: &str) -> Result<Value> {
    let names = conflicting_names(namespace);
    if !names.is_empty() {
        return Err(Error::NameConflict { names });
    }

    parse(expression)
        .and_then(|expr| ExpressionEvaluator::new(namespace).evaluate(&expr))
        .map_err(|source| {
            tracing::error!("+++ Error while attempting to evaluate '{}' +++", expression);
            Error::Eval {
                expression: expression.to_string(),
                source,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_against_namespace() {
        let mut ns = Namespace::new();
        ns.insert("x".to_string(), Value::Array(vec![1.0, 4.0]));
        assert_eq!(
            evaluate(&ns, "sqrt(x) * 2").unwrap(),
            Value::Array(vec![2.0, 4.0])
        );
    }

    #[test]
    fn test_column_shadowing_builtin_is_rejected() {
        let mut ns = Namespace::new();
        ns.insert("sin".to_string(), Value::Array(vec![1.0]));
        ns.insert("x".to_string(), Value::Array(vec![1.0]));
        ns.insert("pi".to_string(), Value::Array(vec![3.0]));

        let err = evaluate(&ns, "x + 1").unwrap_err();
        match err {
            Error::NameConflict { names } => assert_eq!(names, vec!["sin", "pi"]),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_eval_error_keeps_source() {
        let err = evaluate(&Namespace::new(), "missing * 2").unwrap_err();
        match err {
            Error::Eval { expression, source } => {
                assert_eq!(expression, "missing * 2");
                assert_eq!(source, EvalError::UnknownName("missing".to_string()));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_deeply_nested_formula_is_an_error() {
        let formula = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        let err = evaluate(&Namespace::new(), &formula).unwrap_err();
        assert!(matches!(
            err,
            Error::Eval {
                source: EvalError::Syntax { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_syntax_error_surfaces_as_eval_error() {
        let err = evaluate(&Namespace::new(), "1 +").unwrap_err();
        assert!(matches!(
            err,
            Error::Eval {
                source: EvalError::Syntax { .. },
                ..
            }
        ));
    }
}
