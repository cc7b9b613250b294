//! Runtime values produced and consumed by the formula evaluator.

use crate::expr::builtins::Builtin;
use crate::expr::error::{EvalError, EvalResult};
use indexmap::IndexMap;
use std::fmt;

/// Names visible to a formula, in binding order
pub type Namespace = IndexMap<String, Value>;

/// A value flowing through expression evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Python-style `None`; as a formula result it deletes the column
    None,
    Bool(bool),
    Number(f64),
    Array(Vec<f64>),
    /// String literal, only meaningful as a subscript key
    Str(String),
    /// Nested name -> value mapping (the `__aliases` object)
    Table(IndexMap<String, Value>),
    /// A callable built-in
    Function(Builtin),
    /// The catch-all numeric-library handle (`np`)
    Module,
}

impl Value {
    /// Short kind name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Str(_) => "str",
            Value::Table(_) => "table",
            Value::Function(_) => "function",
            Value::Module => "module",
        }
    }

    /// Truthiness: arrays are true only when non-empty and all non-zero
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Array(values) => !values.is_empty() && values.iter().all(|v| *v != 0.0),
            Value::Str(s) => !s.is_empty(),
            Value::Table(entries) => !entries.is_empty(),
            Value::Function(_) | Value::Module => true,
        }
    }

    /// Scalar numeric view; bools count as 0/1
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Flatten a numeric value into an array; scalars become length 1
    pub fn into_array(self, context: &str) -> EvalResult<Vec<f64>> {
        match self {
            Value::Array(values) => Ok(values),
            other => match other.as_number() {
                Some(n) => Ok(vec![n]),
                None => Err(EvalError::TypeError(format!(
                    "{} expects a numeric value, got {}",
                    context,
                    other.type_name()
                ))),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Array(values) => {
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Table(entries) => {
                let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
                write!(f, "{{{}}}", keys.join(", "))
            }
            Value::Function(builtin) => write!(f, "<function {}>", builtin.name()),
            Value::Module => write!(f, "<module np>"),
        }
    }
}

/// What a formula does to its target column
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaResult {
    /// Insert or overwrite the column with these values
    Assign(Vec<f64>),
    /// Remove the column from the output
    Deleted,
}

impl TryFrom<Value> for FormulaResult {
    type Error = EvalError;

    fn try_from(value: Value) -> EvalResult<Self> {
        match value {
            Value::None => Ok(FormulaResult::Deleted),
            Value::Array(values) => Ok(FormulaResult::Assign(values)),
            other => match other.as_number() {
                Some(n) => Ok(FormulaResult::Assign(vec![n])),
                None => Err(EvalError::TypeError(format!(
                    "a column can't be built from a {}",
                    other.type_name()
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_truthiness() {
        assert!(Value::Array(vec![1.0, 2.0]).truthy());
        assert!(!Value::Array(vec![1.0, 0.0]).truthy());
        assert!(!Value::Array(vec![]).truthy());
        assert!(!Value::None.truthy());
        assert!(Value::Number(-0.5).truthy());
    }

    #[test]
    fn test_formula_result_from_none_is_deletion() {
        assert_eq!(FormulaResult::try_from(Value::None), Ok(FormulaResult::Deleted));
    }

    #[test]
    fn test_formula_result_keeps_empty_and_zero_values() {
        assert_eq!(
            FormulaResult::try_from(Value::Array(vec![])),
            Ok(FormulaResult::Assign(vec![]))
        );
        assert_eq!(
            FormulaResult::try_from(Value::Number(0.0)),
            Ok(FormulaResult::Assign(vec![0.0]))
        );
        assert_eq!(
            FormulaResult::try_from(Value::Bool(true)),
            Ok(FormulaResult::Assign(vec![1.0]))
        );
    }

    #[test]
    fn test_formula_result_rejects_tables() {
        let result = FormulaResult::try_from(Value::Table(IndexMap::new()));
        assert!(matches!(result, Err(EvalError::TypeError(_))));
    }
}
