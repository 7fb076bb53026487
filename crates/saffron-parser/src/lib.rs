//! # saffron-parser
//!
//! SPICE netlist front end: a rule-driven lexer, a grammar-driven recursive
//! descent parser, and a table-driven translator that turns the parse tree
//! into the typed model from `saffron-core`.
//!
//! ```
//! let netlist = saffron_parser::parse_netlist(
//!     "Voltage Divider\nV1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.end\n",
//! )
//! .unwrap();
//!
//! assert_eq!(netlist.title, "Voltage Divider");
//! assert_eq!(netlist.statements.len(), 4);
//! ```
//!
//! The pipeline stages are independently usable: [`Lexer`] produces tokens
//! from a [`TokenRuleSet`], [`parse`] builds a [`ParseTree`] from any
//! [`Grammar`] start symbol, and [`translate`] maps the tree onto the model.

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod translate;

pub use error::{Error, Result};
pub use grammar::{Element, Grammar, spice_grammar};
pub use lexer::{
    Lexer, LexerOptions, LexerState, RuleDirective, Token, TokenKind, TokenRule, TokenRuleSet,
    spice_rules, splice_continuations,
};
pub use parser::{NodeId, ParseTree, parse};
pub use translate::{Translator, translate};

use std::sync::OnceLock;

use saffron_core::Netlist;

/// Parse netlist text with default options (title line, case-insensitive
/// keywords).
pub fn parse_netlist(text: &str) -> Result<Netlist> {
    parse_netlist_with(text, &LexerOptions::default())
}

/// Parse netlist text: tokenize, splice continuation lines, parse against
/// the netlist grammar, and translate into the model.
pub fn parse_netlist_with(text: &str, options: &LexerOptions) -> Result<Netlist> {
    let lexer = Lexer::new(default_rules(), options.clone());
    let tokens = lexer.tokenize(text)?;
    let tokens = splice_continuations(tokens);
    log::debug!("lexed {} tokens", tokens.len());

    let tree = parse(default_grammar(), &tokens, "netlist", options)?;
    translate(&tree)
}

/// The default SPICE rule set, built once per process.
fn default_rules() -> &'static TokenRuleSet {
    static RULES: OnceLock<TokenRuleSet> = OnceLock::new();
    RULES.get_or_init(spice_rules)
}

/// The default netlist grammar, built once per process.
fn default_grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(spice_grammar)
}
