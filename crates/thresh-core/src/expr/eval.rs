//! Expression evaluation implementation.

use crate::expr::builtins::{self, python_mod};
use crate::expr::error::{EvalError, EvalResult};
use crate::expr::parser::{BinaryOp, CompareOp, Expr, UnaryOp};
use crate::expr::value::{Namespace, Value};

/// Evaluator for a parsed expression over a namespace
pub struct ExpressionEvaluator<'a> {
    namespace: &'a Namespace,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(namespace: &'a Namespace) -> Self {
        Self { namespace }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::None => Ok(Value::None),

            Expr::List(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let value = self.evaluate(item)?;
                    out.push(value.as_number().ok_or_else(|| {
                        EvalError::TypeError(format!(
                            "list elements must be numbers, got {}",
                            value.type_name()
                        ))
                    })?);
                }
                Ok(Value::Array(out))
            }

            Expr::Name(name) => self.lookup(name),

            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOp::Neg => map_numeric("unary -", value, |v| -v),
                    UnaryOp::Pos => map_numeric("unary +", value, |v| v),
                }
            }

            Expr::Binary { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary_op(*op, left, right)
            }

            Expr::Compare { first, rest } => self.evaluate_comparison(first, rest),

            // Python semantics: yield the deciding operand
            Expr::And(left, right) => {
                let left = self.evaluate(left)?;
                if !left.truthy() {
                    return Ok(left);
                }
                self.evaluate(right)
            }
            Expr::Or(left, right) => {
                let left = self.evaluate(left)?;
                if left.truthy() {
                    return Ok(left);
                }
                self.evaluate(right)
            }
            Expr::Not(operand) => Ok(Value::Bool(!self.evaluate(operand)?.truthy())),

            Expr::Call { function, args } => {
                let callee = self.evaluate(function)?;
                let Value::Function(builtin) = callee else {
                    return Err(EvalError::TypeError(format!(
                        "'{}' object is not callable",
                        callee.type_name()
                    )));
                };
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<EvalResult<Vec<Value>>>()?;
                builtin.call(args)
            }

            Expr::Index { target, index } => {
                let target = self.evaluate(target)?;
                let index = self.evaluate(index)?;
                evaluate_index(target, index)
            }

            Expr::Attribute { target, name } => match self.evaluate(target)? {
                Value::Module => builtins::numpy_attribute(name)
                    .ok_or_else(|| EvalError::UnknownAttribute(name.clone())),
                other => Err(EvalError::TypeError(format!(
                    "'{}' object has no attribute '{}'",
                    other.type_name(),
                    name
                ))),
            },
        }
    }

    /// Columns first, then the registry; the two never overlap
    fn lookup(&self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.namespace.get(name) {
            return Ok(value.clone());
        }
        builtins::lookup(name).ok_or_else(|| EvalError::UnknownName(name.to_string()))
    }

    fn evaluate_comparison(&self, first: &Expr, rest: &[(CompareOp, Expr)]) -> EvalResult<Value> {
        let mut left = self.evaluate(first)?;
        let mut result: Option<Value> = None;
        for (op, right) in rest {
            let right = self.evaluate(right)?;
            let outcome = compare(*op, &left, &right)?;
            result = Some(match result {
                None => outcome,
                Some(previous) => logical_and(previous, outcome)?,
            });
            left = right;
        }
        Ok(result.unwrap_or(Value::Bool(true)))
    }
}

fn evaluate_binary_op(op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
    let f: fn(f64, f64) -> f64 = match op {
        BinaryOp::Add => |a, b| a + b,
        BinaryOp::Sub => |a, b| a - b,
        BinaryOp::Mul => |a, b| a * b,
        BinaryOp::Div => |a, b| a / b,
        BinaryOp::FloorDiv => |a, b| (a / b).floor(),
        BinaryOp::Mod => python_mod,
        BinaryOp::Pow => f64::powf,
    };
    zip_numeric(op.as_str(), left, right, f)
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> EvalResult<Value> {
    // `x == None` is an identity test, never elementwise
    if matches!(left, Value::None) || matches!(right, Value::None) {
        let same = matches!((left, right), (Value::None, Value::None));
        return match op {
            CompareOp::Eq => Ok(Value::Bool(same)),
            CompareOp::Ne => Ok(Value::Bool(!same)),
            _ => Err(EvalError::TypeError(
                "ordering comparison with None".to_string(),
            )),
        };
    }

    let test: fn(f64, f64) -> bool = match op {
        CompareOp::Eq => |a, b| a == b,
        CompareOp::Ne => |a, b| a != b,
        CompareOp::Lt => |a, b| a < b,
        CompareOp::Le => |a, b| a <= b,
        CompareOp::Gt => |a, b| a > b,
        CompareOp::Ge => |a, b| a >= b,
    };
    let result = zip_numeric("comparison", left.clone(), right.clone(), |a, b| {
        if test(a, b) {
            1.0
        } else {
            0.0
        }
    })?;
    Ok(match result {
        Value::Number(n) => Value::Bool(n != 0.0),
        other => other,
    })
}

fn logical_and(left: Value, right: Value) -> EvalResult<Value> {
    match (&left, &right) {
        (Value::Array(_), _) | (_, Value::Array(_)) => zip_numeric("and", left, right, |a, b| {
            if a != 0.0 && b != 0.0 {
                1.0
            } else {
                0.0
            }
        }),
        _ => Ok(Value::Bool(left.truthy() && right.truthy())),
    }
}

fn evaluate_index(target: Value, index: Value) -> EvalResult<Value> {
    match (target, index) {
        (Value::Table(entries), Value::Str(key)) => entries
            .get(&key)
            .cloned()
            .ok_or(EvalError::UnknownKey(key)),
        (Value::Array(values), index) => {
            let i = index.as_number().filter(|n| n.fract() == 0.0).ok_or_else(|| {
                EvalError::TypeError(format!(
                    "array indices must be integers, got {}",
                    index.type_name()
                ))
            })? as i64;
            let len = values.len();
            let resolved = if i < 0 { i + len as i64 } else { i };
            if resolved < 0 || resolved >= len as i64 {
                return Err(EvalError::IndexOutOfRange { index: i, len });
            }
            Ok(Value::Number(values[resolved as usize]))
        }
        (target, index) => Err(EvalError::TypeError(format!(
            "'{}' object can't be subscripted with {}",
            target.type_name(),
            index.type_name()
        ))),
    }
}

fn scalar_operand(context: &str, value: &Value) -> EvalResult<f64> {
    value.as_number().ok_or_else(|| {
        EvalError::TypeError(format!(
            "unsupported operand type for {}: {}",
            context,
            value.type_name()
        ))
    })
}

/// Apply `f` to every element of a numeric value
pub(crate) fn map_numeric(
    context: &str,
    value: Value,
    f: impl Fn(f64) -> f64,
) -> EvalResult<Value> {
    match value {
        Value::Array(values) => Ok(Value::Array(values.into_iter().map(f).collect())),
        other => Ok(Value::Number(f(scalar_operand(context, &other)?))),
    }
}

/// Combine two numeric values elementwise, broadcasting scalars and length-1 arrays
pub(crate) fn zip_numeric(
    context: &str,
    left: Value,
    right: Value,
    f: impl Fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Array(a), Value::Array(b)) => {
            let out = match (a.len(), b.len()) {
                (l, r) if l == r => a.iter().zip(&b).map(|(x, y)| f(*x, *y)).collect(),
                (1, _) => b.iter().map(|y| f(a[0], *y)).collect(),
                (_, 1) => a.iter().map(|x| f(*x, b[0])).collect(),
                (left, right) => return Err(EvalError::ShapeMismatch { left, right }),
            };
            Ok(Value::Array(out))
        }
        (Value::Array(a), right) => {
            let y = scalar_operand(context, &right)?;
            Ok(Value::Array(a.into_iter().map(|x| f(x, y)).collect()))
        }
        (left, Value::Array(b)) => {
            let x = scalar_operand(context, &left)?;
            Ok(Value::Array(b.into_iter().map(|y| f(x, y)).collect()))
        }
        (left, right) => Ok(Value::Number(f(
            scalar_operand(context, &left)?,
            scalar_operand(context, &right)?,
        ))),
    }
}
