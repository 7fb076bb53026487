//! Error types for the netlist parsing pipeline.

use thiserror::Error;

/// Errors that can occur while turning netlist text into a model.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// No token rule matched at the current scan position.
    #[error("lex error at line {line}, offset {offset}: no rule matches '{snippet}'")]
    Lexer {
        line: usize,
        offset: usize,
        snippet: String,
    },

    /// No grammar alternative matched the lookahead token.
    #[error("parse error at line {line}: expected {expected}, found '{found}'")]
    Parse {
        line: usize,
        expected: String,
        found: String,
    },

    /// A translation rule received a child shape it does not recognize.
    ///
    /// This is a contract violation between the grammar and the translator
    /// tables, not a user input error; the two have drifted out of sync.
    #[error("translation rule for symbol '{symbol}' received an unexpected child shape")]
    Translation { symbol: String },

    /// The grammar references a symbol that was never defined.
    #[error("grammar references undefined symbol '{symbol}'")]
    Grammar { symbol: String },
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, Error>;
