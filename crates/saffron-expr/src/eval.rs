//! AST evaluation.

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::context::ExpressionContext;
use crate::error::EvalError;

/// Evaluate an expression AST against a context.
///
/// Deterministic for a fixed context except where the AST calls a
/// side-effecting function such as `random`.
pub fn evaluate(expr: &Expr, ctx: &ExpressionContext) -> Result<f64, EvalError> {
    match expr {
        Expr::Number(v) => Ok(*v),
        Expr::Variable(name) => ctx
            .variable(name)
            .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
        Expr::Unary { op, operand } => {
            let v = evaluate(operand, ctx)?;
            Ok(match op {
                UnaryOp::Neg => -v,
            })
        }
        Expr::Binary { op, left, right } => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            Ok(match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => l / r,
                BinaryOp::Pow => l.powf(r),
            })
        }
        Expr::Call { name, args } => {
            let def = ctx
                .function(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
            let values: Vec<f64> = args
                .iter()
                .map(|a| evaluate(a, ctx))
                .collect::<Result<_, _>>()?;
            def.call(&values)
        }
    }
}
