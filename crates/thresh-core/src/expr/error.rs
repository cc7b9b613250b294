//! Error types for expression evaluation.

use thiserror::Error;

/// Result type for parsing and evaluating expressions
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Errors that can occur while parsing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The expression text is not well formed
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// A name that is neither a column nor a built-in
    #[error("name '{0}' is not defined")]
    UnknownName(String),

    /// Attribute lookup on the numeric-library handle failed
    #[error("'np' has no attribute '{0}'")]
    UnknownAttribute(String),

    /// Subscript key not present in a nested table
    #[error("key '{0}' not found")]
    UnknownKey(String),

    /// Operand or argument of the wrong kind
    #[error("type error: {0}")]
    TypeError(String),

    /// Wrong number of function arguments
    #[error("{function}() takes {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Arrays of incompatible lengths in an elementwise operation
    #[error("operands could not be broadcast together with lengths {left} and {right}")]
    ShapeMismatch { left: usize, right: usize },

    /// Array index outside its bounds
    #[error("index {index} is out of bounds for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Argument value outside the function's domain
    #[error("{function}(): {message}")]
    InvalidArgument { function: String, message: String },
}

impl EvalError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        EvalError::Syntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(function: &str, message: impl Into<String>) -> Self {
        EvalError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
