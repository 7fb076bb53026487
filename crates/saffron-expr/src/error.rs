//! Error types for expression parsing and evaluation.

use thiserror::Error;

/// Errors surfaced by the expression evaluator.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The expression text could not be parsed.
    #[error("invalid expression '{expression}': {reason}")]
    Parse { expression: String, reason: String },

    /// The expression parsed but could not be evaluated in this context.
    #[error("cannot evaluate '{expression}': {reason}")]
    Evaluation {
        expression: String,
        #[source]
        reason: EvalError,
    },
}

/// Evaluation failure detail, independent of the source text.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum EvalError {
    /// A variable name is not bound in the context.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A function name is not registered in the context.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A function was invoked with the wrong number of arguments.
    #[error("function '{name}' expects {expected} arguments, got {got}")]
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },
}

impl EvalError {
    /// Attach the literal expression text for diagnostics.
    pub fn with_expression(self, expression: impl Into<String>) -> Error {
        Error::Evaluation {
            expression: expression.into(),
            reason: self,
        }
    }
}

/// Result type for expression operations.
pub type Result<T> = std::result::Result<T, Error>;
