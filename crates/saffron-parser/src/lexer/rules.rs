//! Token rule definitions.
//!
//! A [`TokenRule`] couples an anchored pattern with a priority, an optional
//! state guard, and an action. The action decides what the lexer does with a
//! match: emit a token, skip the lexeme, or pass the position to the next
//! rule. Actions may mutate the shared [`LexerState`], which is how newline
//! rules maintain the line counter.

use regex::Regex;

use super::{LexerState, TokenKind};

/// What the lexer should do with a rule match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDirective {
    /// Push a token and advance past the lexeme.
    Emit,
    /// Advance past the lexeme without emitting (whitespace, inline comments).
    Skip,
    /// Decline the match; the lexer tries the next rule at this position.
    Pass,
}

type Guard = fn(&LexerState) -> bool;
type Action = Box<dyn Fn(&mut LexerState, &str) -> RuleDirective + Send + Sync>;

/// One declarative tokenization rule.
pub struct TokenRule {
    name: &'static str,
    kind: TokenKind,
    pattern: Regex,
    priority: u32,
    guard: Option<Guard>,
    action: Option<Action>,
}

impl TokenRule {
    /// Build a rule from an (unanchored) pattern. Lower priority numbers are
    /// tried first; ties fall back to declaration order. The default action
    /// emits a token.
    ///
    /// Panics on an invalid pattern; rule sets are static configuration and a
    /// bad pattern is a programming error, not an input error.
    pub fn new(name: &'static str, kind: TokenKind, pattern: &str, priority: u32) -> Self {
        let anchored = format!(r"\A(?:{pattern})");
        let pattern = Regex::new(&anchored)
            .unwrap_or_else(|e| panic!("invalid pattern for token rule '{name}': {e}"));
        Self {
            name,
            kind,
            pattern,
            priority,
            guard: None,
            action: None,
        }
    }

    /// Restrict the rule to states accepted by `guard`.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Replace the default emit action.
    pub fn with_action(
        mut self,
        action: impl Fn(&mut LexerState, &str) -> RuleDirective + Send + Sync + 'static,
    ) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub(crate) fn applies(&self, state: &LexerState) -> bool {
        self.guard.is_none_or(|guard| guard(state))
    }

    /// Anchored match at the start of `text`.
    pub(crate) fn matches<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }

    pub(crate) fn run_action(&self, state: &mut LexerState, lexeme: &str) -> RuleDirective {
        match &self.action {
            Some(action) => action(state, lexeme),
            None => RuleDirective::Emit,
        }
    }
}

impl std::fmt::Debug for TokenRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// An immutable, priority-ordered rule set.
#[derive(Debug, Default)]
pub struct TokenRuleSet {
    rules: Vec<TokenRule>,
}

impl TokenRuleSet {
    /// Sorts the rules by priority; the sort is stable, so rules with equal
    /// priority keep their declaration order.
    pub fn new(mut rules: Vec<TokenRule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The default SPICE netlist rule set.
pub fn spice_rules() -> TokenRuleSet {
    TokenRuleSet::new(vec![
        TokenRule::new("title", TokenKind::Title, r"[^\r\n]+", 10)
            .with_guard(|state| state.awaiting_title)
            .with_action(|state, _| {
                state.awaiting_title = false;
                RuleDirective::Emit
            }),
        TokenRule::new("whitespace", TokenKind::Whitespace, r"[ \t\r]+", 20)
            .with_action(|_, _| RuleDirective::Skip),
        TokenRule::new("newline", TokenKind::Newline, r"\r?\n", 30).with_action(|state, _| {
            state.line += 1;
            state.at_line_start = true;
            state.awaiting_title = false;
            RuleDirective::Emit
        }),
        // '*' opens a comment only in the first column of a line
        TokenRule::new("comment", TokenKind::Comment, r"\*[^\r\n]*", 40)
            .with_guard(|state| state.at_line_start),
        TokenRule::new("inline-comment", TokenKind::Whitespace, r";[^\r\n]*", 50)
            .with_action(|_, _| RuleDirective::Skip),
        // '+' in the first column is a continuation marker; it must win over
        // the signed-value rule there
        TokenRule::new("continuation", TokenKind::Plus, r"\+", 60)
            .with_guard(|state| state.at_line_start),
        // '.ends' before the generic dot-command rule
        TokenRule::new("ends", TokenKind::Ends, r"\.(?i:ends)\b", 70),
        TokenRule::new(
            "dot-command",
            TokenKind::DotCommand,
            r"\.[a-zA-Z_][a-zA-Z0-9_]*",
            80,
        ),
        TokenRule::new("expression", TokenKind::Expression, r"\{[^{}]*\}", 90),
        TokenRule::new(
            "string",
            TokenKind::String,
            r#""(?:[^"\\\r\n]|\\.)*""#,
            100,
        ),
        TokenRule::new(
            "reference",
            TokenKind::Reference,
            r"@[a-zA-Z0-9_]+(?:\[[^\]\r\n]*\])?",
            110,
        ),
        TokenRule::new("comma", TokenKind::Comma, r",", 120),
        TokenRule::new("equal", TokenKind::Equal, r"=", 121),
        TokenRule::new("lparen", TokenKind::LParen, r"\(", 122),
        TokenRule::new("rparen", TokenKind::RParen, r"\)", 123),
        TokenRule::new(
            "value",
            TokenKind::Value,
            r"[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[a-zA-Z0-9]*",
            130,
        ),
        // Extended identifiers need at least one character outside the word
        // alphabet; plain words fall through to the word rule
        TokenRule::new(
            "identifier",
            TokenKind::Identifier,
            r"[a-zA-Z0-9_]+[.:#%\[\]\-][a-zA-Z0-9_.:#%\[\]\-]*",
            135,
        ),
        TokenRule::new("word", TokenKind::Word, r"[a-zA-Z][a-zA-Z0-9_]*", 140),
        TokenRule::new("plus", TokenKind::Plus, r"\+", 160),
        TokenRule::new("minus", TokenKind::Minus, r"-", 170),
        TokenRule::new("dot", TokenKind::Dot, r"\.", 180),
    ])
}
