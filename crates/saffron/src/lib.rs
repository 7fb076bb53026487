//! # Saffron
//!
//! A SPICE netlist front end written in Rust.
//!
//! Saffron turns netlist text into a validated, typed model and evaluates
//! the arithmetic expressions embedded in parameter values:
//! - rule-driven tokenizer with configurable token rules
//! - grammar-driven recursive descent parser producing a parse tree
//! - table-driven translation into the typed netlist model
//! - expression evaluator with variables, custom functions, and scoped
//!   contexts
//!
//! ## Quick Start
//!
//! ```rust
//! use saffron::prelude::*;
//!
//! let netlist = saffron::parse_netlist(
//!     "Voltage Divider\nV1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.end\n",
//! )
//! .unwrap();
//! println!("'{}' has {} statements", netlist.title, netlist.statements.len());
//!
//! let mut evaluator = Evaluator::new();
//! evaluator.set_variable("rload", 1e3);
//! assert_eq!(evaluator.evaluate_double("rload/2").unwrap(), 500.0);
//! ```
//!
//! Saffron does not simulate: the parsed model is handed to an external
//! reader through the [`reader`] boundary.

pub mod reader;

// Re-export core crates
pub use saffron_core as core;
pub use saffron_expr as expr;
pub use saffron_parser as parser;

// ============================================================================
// Convenient re-exports from saffron_core
// ============================================================================

pub use saffron_core::{
    // Model
    Netlist,
    Parameter,
    ParameterCollection,
    Statement,
    // Numeric helpers
    parse_value,
};

// ============================================================================
// Convenient re-exports from saffron_parser
// ============================================================================

pub use saffron_parser::{
    // Errors
    Error as ParseError,
    // Grammar
    Grammar,
    // Configuration
    LexerOptions,
    // Parse tree
    ParseTree,
    Token,
    TokenKind,
    // Lexer building blocks
    TokenRule,
    TokenRuleSet,
    // Main parse functions
    parse_netlist,
    parse_netlist_with,
};

// ============================================================================
// Convenient re-exports from saffron_expr
// ============================================================================

pub use saffron_expr::{
    AstCache,
    // Errors
    Error as EvalError,
    // Evaluation
    Evaluator,
    Expr,
    ExpressionContext,
    FunctionDef,
    parse_expression,
};

// ============================================================================
// Reader boundary
// ============================================================================

pub use reader::{Diagnostics, NameGenerator, NetlistReader, ReadingContext};

/// Prelude module containing commonly used types.
///
/// ```rust
/// use saffron::prelude::*;
/// ```
pub mod prelude {
    // Model
    pub use crate::{Netlist, Parameter, ParameterCollection, Statement};

    // Parsing
    pub use crate::{LexerOptions, parse_netlist, parse_netlist_with};

    // Expressions
    pub use crate::{Evaluator, FunctionDef, parse_expression};

    // Reader boundary
    pub use crate::{NetlistReader, ReadingContext};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_circuit() {
        let netlist = "Test\nV1 1 0 DC 5\nR1 1 0 1k\n.op\n.end\n";
        let result = parse_netlist(netlist);
        assert!(result.is_ok());
    }

    #[test]
    fn test_model_round_trips_through_clone() {
        let netlist = parse_netlist("Test\nR1 1 0 1k\n.end\n").unwrap();
        let copy = netlist.clone();
        assert_eq!(netlist, copy);
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let mut evaluator = Evaluator::new();
        evaluator.set_variable("a", 0.1);
        assert!((evaluator.evaluate_double("a+1").unwrap() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_pipeline_feeds_evaluator() {
        // Expression parameters flow from the parsed model into the evaluator
        let netlist = parse_netlist("Test\nR1 out 0 {rload*2}\n.end\n").unwrap();
        let Statement::Component { params, .. } = &netlist.statements[0] else {
            panic!("expected component");
        };
        let Parameter::Expression(text) = params.get(2).unwrap() else {
            panic!("expected expression");
        };

        let mut evaluator = Evaluator::new();
        evaluator.set_variable("rload", 1e3);
        assert_eq!(evaluator.evaluate_double(text).unwrap(), 2000.0);
    }
}
