//! # saffron-expr
//!
//! Arithmetic expression parsing and evaluation for netlist parameters.
//!
//! Supports expressions like:
//! - `rload / 2 + 100` - variables bound in an evaluation context
//! - `1.5k * scale` - numeric literals with engineering suffixes
//! - `if(mc, random(), 0.5)` - builtin and user-registered functions
//!
//! Parsing and evaluation are independently callable: [`parse_expression`]
//! builds an immutable [`Expr`], [`eval::evaluate`] runs one against an
//! [`ExpressionContext`]. The [`Evaluator`] ties both together with a shared
//! [`AstCache`] so identical expression strings are parsed once per process.

pub mod ast;
pub mod cache;
pub mod context;
pub mod error;
pub mod eval;
pub mod functions;
pub mod parser;

mod evaluator;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use cache::AstCache;
pub use context::ExpressionContext;
pub use error::{Error, EvalError, Result};
pub use evaluator::Evaluator;
pub use functions::FunctionDef;
pub use parser::parse_expression;
