//! Boolean checks run against the final namespace

use crate::error::Result;
use crate::expr::{self, Namespace, Value};

/// Result of evaluating one assertion statement
#[derive(Debug, Clone, PartialEq)]
pub struct AssertOutcome {
    pub statement: String,
    pub value: Value,
    pub passed: bool,
}

/// Outcomes of every statement, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssertReport {
    pub outcomes: Vec<AssertOutcome>,
}

impl AssertReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Process exit code: 1 if any statement is false
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Evaluate each statement against `namespace`; evaluation errors abort the run
pub fn run_assertions<S: AsRef<str>>(namespace: &Namespace, statements: &[S]) -> Result<AssertReport> {
    let mut report = AssertReport::default();
    for statement in statements {
        let statement = statement.as_ref();
        let value = expr::evaluate(namespace, statement)?;
        let passed = value.truthy();
        tracing::debug!(statement, passed, "assertion evaluated");
        report.outcomes.push(AssertOutcome {
            statement: statement.to_string(),
            value,
            passed,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn namespace() -> Namespace {
        let mut ns = Namespace::new();
        ns.insert("x".to_string(), Value::Array(vec![1.0, 2.0, 3.0]));
        ns
    }

    #[test]
    fn test_all_true() {
        let report = run_assertions(&namespace(), &["mean(x) == 2", "x > 0"]).unwrap();
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.outcomes.len(), 2);
    }

    #[test]
    fn test_any_false_sets_exit_code() {
        let report = run_assertions(&namespace(), &["x > 1", "1 == 1"]).unwrap();
        assert!(!report.outcomes[0].passed);
        assert!(report.outcomes[1].passed);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_no_statements_pass() {
        let report = run_assertions::<&str>(&Namespace::new(), &[]).unwrap();
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_evaluation_error_is_fatal() {
        let err = run_assertions(&namespace(), &["x > 0", "y > 0"]).unwrap_err();
        assert!(matches!(err, Error::Eval { .. }));
    }
}
