//! Grammar-as-data.
//!
//! A [`Grammar`] maps symbol names to ordered alternatives; each alternative
//! is a sequence of [`Element`]s. The table is immutable after construction
//! and shared read-only across parses, so grammars can be swapped or extended
//! (custom statement types, test fixtures) without touching the parser
//! engine.

use indexmap::IndexMap;

use crate::lexer::TokenKind;

/// One element of a production.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Element {
    /// Match one token of the given kind.
    Terminal(TokenKind),
    /// Match a Word or DotCommand token with this exact lexeme
    /// (case-insensitively when `ignore_case` is set).
    Keyword(&'static str),
    /// Expand a named non-terminal.
    Symbol(&'static str),
    /// Match the sequence if it can start here, otherwise match empty.
    Optional(Vec<Element>),
    /// Greedily repeat the sequence while it can start.
    ZeroOrMore(Vec<Element>),
    /// Like `ZeroOrMore`, but fails on zero repetitions.
    OneOrMore(Vec<Element>),
    /// Match the first branch that can start with the lookahead.
    Choice(Vec<Vec<Element>>),
}

/// An immutable symbol table: name → ordered alternatives.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    symbols: IndexMap<&'static str, Vec<Vec<Element>>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a symbol. Alternatives are tried in the given order; authors
    /// must keep them disjoint on their first token (the parser commits to
    /// the first alternative that can start with the lookahead).
    pub fn define(&mut self, name: &'static str, alternatives: Vec<Vec<Element>>) {
        self.symbols.insert(name, alternatives);
    }

    pub fn alternatives(&self, name: &str) -> Option<&[Vec<Element>]> {
        self.symbols.get(name).map(|alts| alts.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Symbol names in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.symbols.keys().copied()
    }
}

/// The netlist surface grammar.
///
/// A netlist is an optional title line followed by lines (statements or
/// blanks) and EOF. Statements: component lines, `.model` lines,
/// `.subckt ... .ends` blocks, generic dot-control lines, and `*` comment
/// lines. Parameter lists are left-factored so every decision point is
/// disjoint on its first token; continuation lines are spliced before
/// parsing, never here.
pub fn spice_grammar() -> Grammar {
    use Element::{Keyword, Optional, OneOrMore, Symbol, Terminal, ZeroOrMore};
    use TokenKind::*;

    let mut grammar = Grammar::new();

    grammar.define(
        "netlist",
        vec![vec![
            Optional(vec![Terminal(Title), Symbol("eol")]),
            Symbol("lines"),
            Terminal(Eof),
        ]],
    );
    grammar.define("lines", vec![vec![ZeroOrMore(vec![Symbol("line")])]]);
    grammar.define(
        "line",
        vec![vec![Symbol("statement")], vec![Terminal(Newline)]],
    );
    grammar.define(
        "statement",
        vec![
            vec![Symbol("comment_line")],
            vec![Symbol("subckt")],
            vec![Symbol("model")],
            vec![Symbol("control")],
            vec![Symbol("component")],
        ],
    );
    grammar.define(
        "comment_line",
        vec![vec![Terminal(Comment), Symbol("eol")]],
    );
    grammar.define(
        "component",
        vec![vec![Terminal(Word), Symbol("parameters"), Symbol("eol")]],
    );
    grammar.define(
        "model",
        vec![vec![
            Keyword(".model"),
            Symbol("name"),
            Symbol("parameters"),
            Symbol("eol"),
        ]],
    );
    grammar.define(
        "control",
        vec![vec![
            Terminal(DotCommand),
            Symbol("parameters"),
            Symbol("eol"),
        ]],
    );
    grammar.define(
        "subckt",
        vec![vec![
            Keyword(".subckt"),
            Symbol("name"),
            Symbol("parameters"),
            Symbol("eol"),
            Symbol("lines"),
            Terminal(Ends),
            Optional(vec![Symbol("name")]),
            Symbol("eol"),
        ]],
    );
    grammar.define(
        "name",
        vec![
            vec![Terminal(Word)],
            vec![Terminal(Identifier)],
            vec![Terminal(Value)],
        ],
    );
    grammar.define("parameters", vec![vec![ZeroOrMore(vec![Symbol("parameter")])]]);
    grammar.define(
        "parameter",
        vec![
            vec![Terminal(Word), Symbol("param_tail")],
            vec![Terminal(Identifier), Symbol("assign_tail")],
            vec![Terminal(Value)],
            vec![Terminal(Expression)],
            vec![Terminal(String)],
            vec![Terminal(Reference)],
        ],
    );
    grammar.define(
        "param_tail",
        vec![
            vec![Terminal(Equal), Symbol("pvalue")],
            vec![
                Terminal(LParen),
                Symbol("paren_content"),
                Terminal(RParen),
            ],
            vec![],
        ],
    );
    grammar.define(
        "assign_tail",
        vec![vec![Terminal(Equal), Symbol("pvalue")], vec![]],
    );
    grammar.define(
        "paren_content",
        vec![
            vec![Symbol("parameter"), Symbol("paren_rest")],
            vec![],
        ],
    );
    grammar.define(
        "paren_rest",
        vec![
            vec![OneOrMore(vec![Terminal(Comma), Symbol("parameter")])],
            vec![Symbol("parameters")],
        ],
    );
    grammar.define(
        "pvalue",
        vec![
            vec![Terminal(Value)],
            vec![Terminal(Word)],
            vec![Terminal(Identifier)],
            vec![Terminal(Expression)],
            vec![Terminal(String)],
        ],
    );
    grammar.define("eol", vec![vec![Terminal(Newline)], vec![]]);

    grammar
}
