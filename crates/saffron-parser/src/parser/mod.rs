//! Recursive descent parser driven by a [`Grammar`].
//!
//! Alternative selection uses a single token of lookahead: the first
//! alternative whose first element can start with the current token is
//! committed to, with no backtracking afterwards. When no alternative can
//! start, a nullable alternative matches empty; otherwise the parse fails
//! with the offending token, the expected symbol, and its line.

mod tree;

pub use tree::{NodeId, ParseNode, ParseNodeKind, ParseTree};

use crate::error::{Error, Result};
use crate::grammar::{Element, Grammar};
use crate::lexer::{LexerOptions, Token, TokenKind};

/// Parse a token sequence against `grammar`, rooted at `start`.
///
/// The token slice must be non-empty (the lexer always appends EOF). Tokens
/// beyond what `start` derives are left unconsumed, which permits parsing
/// fragments such as a single parameter in tests.
pub fn parse(
    grammar: &Grammar,
    tokens: &[Token],
    start: &'static str,
    options: &LexerOptions,
) -> Result<ParseTree> {
    if tokens.is_empty() {
        return Err(Error::Parse {
            line: 1,
            expected: start.to_string(),
            found: "end of input".to_string(),
        });
    }

    let mut session = ParseSession {
        grammar,
        tokens,
        pos: 0,
        tree: ParseTree::new(),
        ignore_case: options.ignore_case,
    };
    session.parse_symbol(start, None)?;
    log::trace!(
        "parsed {} tokens into {} nodes",
        session.pos,
        session.tree.len()
    );
    Ok(session.tree)
}

struct ParseSession<'g, 't> {
    grammar: &'g Grammar,
    tokens: &'t [Token],
    pos: usize,
    tree: ParseTree,
    ignore_case: bool,
}

impl<'g, 't> ParseSession<'g, 't> {
    fn peek(&self) -> &'t Token {
        let tokens = self.tokens;
        tokens.get(self.pos).unwrap_or(&tokens[tokens.len() - 1])
    }

    fn parse_symbol(&mut self, name: &'static str, parent: Option<NodeId>) -> Result<NodeId> {
        let grammar = self.grammar;
        let alternatives = grammar.alternatives(name).ok_or_else(|| Error::Grammar {
            symbol: name.to_string(),
        })?;

        let token = self.peek();
        let chosen = alternatives
            .iter()
            .find(|alt| self.seq_can_start(alt, token))
            .or_else(|| alternatives.iter().find(|alt| self.seq_nullable(alt)))
            .ok_or_else(|| self.unexpected(name))?;

        let node = self.tree.add_nonterminal(name, parent);
        self.parse_sequence(chosen, node)?;
        Ok(node)
    }

    fn parse_sequence(&mut self, elements: &'g [Element], parent: NodeId) -> Result<()> {
        for element in elements {
            self.parse_element(element, parent)?;
        }
        Ok(())
    }

    fn parse_element(&mut self, element: &'g Element, parent: NodeId) -> Result<()> {
        match element {
            Element::Terminal(kind) => {
                let token = self.peek();
                if token.kind != *kind {
                    return Err(self.unexpected(describe_kind(*kind)));
                }
                let token = token.clone();
                self.tree.add_terminal(token, parent);
                self.pos += 1;
                Ok(())
            }
            Element::Keyword(text) => {
                let token = self.peek();
                if !self.keyword_matches(token, text) {
                    return Err(self.unexpected(format!("'{text}'")));
                }
                let token = token.clone();
                self.tree.add_terminal(token, parent);
                self.pos += 1;
                Ok(())
            }
            Element::Symbol(name) => {
                self.parse_symbol(name, Some(parent))?;
                Ok(())
            }
            Element::Optional(inner) => {
                if self.seq_can_start(inner, self.peek()) {
                    self.parse_sequence(inner, parent)
                } else {
                    Ok(())
                }
            }
            Element::ZeroOrMore(inner) => {
                while self.seq_can_start(inner, self.peek()) {
                    let before = self.pos;
                    self.parse_sequence(inner, parent)?;
                    if self.pos == before {
                        break;
                    }
                }
                Ok(())
            }
            Element::OneOrMore(inner) => {
                if !self.seq_can_start(inner, self.peek()) {
                    return Err(self.unexpected(format!("at least one {}", describe(inner))));
                }
                loop {
                    let before = self.pos;
                    self.parse_sequence(inner, parent)?;
                    if self.pos == before || !self.seq_can_start(inner, self.peek()) {
                        break;
                    }
                }
                Ok(())
            }
            Element::Choice(branches) => {
                let token = self.peek();
                if let Some(branch) = branches.iter().find(|b| self.seq_can_start(b, token)) {
                    return self.parse_sequence(branch, parent);
                }
                if branches.iter().any(|b| self.seq_nullable(b)) {
                    return Ok(());
                }
                Err(self.unexpected("one of the choice branches"))
            }
        }
    }

    fn keyword_matches(&self, token: &Token, text: &str) -> bool {
        if token.kind != TokenKind::Word && token.kind != TokenKind::DotCommand {
            return false;
        }
        if self.ignore_case {
            token.text.eq_ignore_ascii_case(text)
        } else {
            token.text == text
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        let token = self.peek();
        let found = if token.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            token.text.clone()
        };
        Error::Parse {
            line: token.line,
            expected: expected.into(),
            found,
        }
    }

    // --- lookahead -------------------------------------------------------

    /// Can this sequence begin with `token`? Leading nullable elements are
    /// looked through.
    fn seq_can_start(&self, elements: &[Element], token: &Token) -> bool {
        let mut visiting = Vec::new();
        self.seq_can_start_inner(elements, token, &mut visiting)
    }

    fn seq_can_start_inner(
        &self,
        elements: &[Element],
        token: &Token,
        visiting: &mut Vec<&'static str>,
    ) -> bool {
        for element in elements {
            match self.element_start(element, token, visiting) {
                Start::Yes => return true,
                Start::No => return false,
                Start::Nullable => continue,
            }
        }
        false
    }

    fn element_start(
        &self,
        element: &Element,
        token: &Token,
        visiting: &mut Vec<&'static str>,
    ) -> Start {
        match element {
            Element::Terminal(kind) => {
                if token.kind == *kind {
                    Start::Yes
                } else {
                    Start::No
                }
            }
            Element::Keyword(text) => {
                if self.keyword_matches(token, text) {
                    Start::Yes
                } else {
                    Start::No
                }
            }
            Element::Symbol(name) => {
                // A symbol already on the stack cannot contribute a new start
                if visiting.contains(name) {
                    return Start::No;
                }
                let Some(alternatives) = self.grammar.alternatives(name) else {
                    return Start::No;
                };
                visiting.push(name);
                let starts = alternatives
                    .iter()
                    .any(|alt| self.seq_can_start_inner(alt, token, visiting));
                visiting.pop();
                if starts {
                    Start::Yes
                } else if self.symbol_nullable(name) {
                    Start::Nullable
                } else {
                    Start::No
                }
            }
            Element::Optional(inner) | Element::ZeroOrMore(inner) => {
                if self.seq_can_start_inner(inner, token, visiting) {
                    Start::Yes
                } else {
                    Start::Nullable
                }
            }
            Element::OneOrMore(inner) => {
                if self.seq_can_start_inner(inner, token, visiting) {
                    Start::Yes
                } else if self.seq_nullable(inner) {
                    Start::Nullable
                } else {
                    Start::No
                }
            }
            Element::Choice(branches) => {
                if branches
                    .iter()
                    .any(|b| self.seq_can_start_inner(b, token, visiting))
                {
                    Start::Yes
                } else if branches.iter().any(|b| self.seq_nullable(b)) {
                    Start::Nullable
                } else {
                    Start::No
                }
            }
        }
    }

    /// Can this sequence derive the empty string?
    fn seq_nullable(&self, elements: &[Element]) -> bool {
        let mut visiting = Vec::new();
        self.seq_nullable_inner(elements, &mut visiting)
    }

    fn seq_nullable_inner(&self, elements: &[Element], visiting: &mut Vec<&'static str>) -> bool {
        elements
            .iter()
            .all(|element| self.element_nullable(element, visiting))
    }

    fn element_nullable(&self, element: &Element, visiting: &mut Vec<&'static str>) -> bool {
        match element {
            Element::Terminal(_) | Element::Keyword(_) => false,
            Element::Symbol(name) => {
                if visiting.contains(name) {
                    return false;
                }
                let Some(alternatives) = self.grammar.alternatives(name) else {
                    return false;
                };
                visiting.push(name);
                let nullable = alternatives
                    .iter()
                    .any(|alt| self.seq_nullable_inner(alt, visiting));
                visiting.pop();
                nullable
            }
            Element::Optional(_) | Element::ZeroOrMore(_) => true,
            Element::OneOrMore(inner) => self.seq_nullable_inner(inner, visiting),
            Element::Choice(branches) => branches
                .iter()
                .any(|branch| self.seq_nullable_inner(branch, visiting)),
        }
    }

    fn symbol_nullable(&self, name: &'static str) -> bool {
        self.seq_nullable(&[Element::Symbol(name)])
    }
}

enum Start {
    Yes,
    No,
    Nullable,
}

fn describe_kind(kind: TokenKind) -> String {
    format!("{kind:?}")
}

fn describe(elements: &[Element]) -> String {
    match elements.first() {
        Some(Element::Terminal(kind)) => describe_kind(*kind),
        Some(Element::Keyword(text)) => format!("'{text}'"),
        Some(Element::Symbol(name)) => name.to_string(),
        Some(other) => format!("{other:?}"),
        None => "nothing".to_string(),
    }
}
