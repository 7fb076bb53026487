//! Function definitions for the evaluator.
//!
//! The function table maps a name to a closed set of definitions: the
//! builtins plus a `Custom` variant carrying a user closure. Keeping the set
//! closed (rather than open subclassing) makes "which functions are active"
//! straightforward to inspect and debug.

use std::sync::Arc;

use rand::Rng;

use crate::error::EvalError;

/// A function callable from expressions.
#[derive(Clone)]
#[non_exhaustive]
pub enum FunctionDef {
    /// `random()` — uniform value in [0, 1). Side-effecting: repeated
    /// evaluation of the same AST node yields different values by design.
    Random,
    /// `min(a, b)`.
    Min,
    /// `max(a, b)`.
    Max,
    /// `if(cond, then, else)` — truthy when `cond > 0.5`. The threshold is a
    /// domain-language convention; preserve it exactly.
    If,
    /// `abs(x)`.
    Abs,
    /// `sqrt(x)`.
    Sqrt,
    /// `pow(base, exp)`.
    Pow,
    /// User-registered function.
    Custom {
        name: String,
        /// Required argument count; `None` accepts any.
        arity: Option<usize>,
        body: Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>,
    },
}

impl FunctionDef {
    /// The name this function registers under.
    pub fn name(&self) -> &str {
        match self {
            FunctionDef::Random => "random",
            FunctionDef::Min => "min",
            FunctionDef::Max => "max",
            FunctionDef::If => "if",
            FunctionDef::Abs => "abs",
            FunctionDef::Sqrt => "sqrt",
            FunctionDef::Pow => "pow",
            FunctionDef::Custom { name, .. } => name,
        }
    }

    /// Required argument count, if fixed.
    pub fn arity(&self) -> Option<usize> {
        match self {
            FunctionDef::Random => Some(0),
            FunctionDef::Min | FunctionDef::Max | FunctionDef::Pow => Some(2),
            FunctionDef::If => Some(3),
            FunctionDef::Abs | FunctionDef::Sqrt => Some(1),
            FunctionDef::Custom { arity, .. } => *arity,
        }
    }

    /// Build a custom function with a fixed arity.
    pub fn custom(
        name: impl Into<String>,
        arity: usize,
        body: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        FunctionDef::Custom {
            name: name.into(),
            arity: Some(arity),
            body: Arc::new(body),
        }
    }

    /// Invoke with already-evaluated arguments; checks arity first.
    pub(crate) fn call(&self, args: &[f64]) -> Result<f64, EvalError> {
        if let Some(expected) = self.arity()
            && args.len() != expected
        {
            return Err(EvalError::WrongArity {
                name: self.name().to_string(),
                expected,
                got: args.len(),
            });
        }

        Ok(match self {
            FunctionDef::Random => rand::thread_rng().r#gen::<f64>(),
            FunctionDef::Min => args[0].min(args[1]),
            FunctionDef::Max => args[0].max(args[1]),
            FunctionDef::If => {
                if args[0] > 0.5 {
                    args[1]
                } else {
                    args[2]
                }
            }
            FunctionDef::Abs => args[0].abs(),
            FunctionDef::Sqrt => args[0].sqrt(),
            FunctionDef::Pow => args[0].powf(args[1]),
            FunctionDef::Custom { body, .. } => body(args),
        })
    }
}

impl std::fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionDef::Custom { name, arity, .. } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("arity", arity)
                .finish(),
            builtin => write!(f, "{}", builtin.name()),
        }
    }
}

/// The default function table registered into every fresh context.
pub(crate) fn default_functions() -> Vec<FunctionDef> {
    vec![
        FunctionDef::Random,
        FunctionDef::Min,
        FunctionDef::Max,
        FunctionDef::If,
        FunctionDef::Abs,
        FunctionDef::Sqrt,
        FunctionDef::Pow,
    ]
}
