//! Rule-driven netlist lexer.
//!
//! The lexer scans input text against a [`TokenRuleSet`]: at each offset the
//! rules are tried in ascending priority order (declaration order breaks
//! ties) with anchored matching, and the first rule that matches decides what
//! happens next via its action directive. Rule sets are immutable after
//! construction and safely shared across threads; all mutable scan state
//! lives in a per-call [`LexerState`].

mod rules;

pub use rules::{RuleDirective, TokenRule, TokenRuleSet, spice_rules};

use crate::error::{Error, Result};

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenKind {
    /// Opaque first-line title (only with `has_title_line`).
    Title,
    /// End of line.
    Newline,
    /// End of input; appended exactly once per tokenize call.
    Eof,
    /// Full-line comment starting with `*`.
    Comment,
    /// Whitespace; skipped, never emitted.
    Whitespace,
    LParen,
    RParen,
    Comma,
    Dot,
    Plus,
    Minus,
    Equal,
    /// Plain word: `R1`, `out`, `DC`.
    Word,
    /// Extended identifier: `net.a`, `in-b`.
    Identifier,
    /// Quoted string.
    String,
    /// Numeric literal, optionally suffixed: `1k`, `1e-12`.
    Value,
    /// Brace-delimited arithmetic expression span: `{w*2}`.
    Expression,
    /// Device/parameter reference: `@m1[vth]`.
    Reference,
    /// `.ends` block terminator; lexed separately so the subcircuit body
    /// repetition terminates on kind alone.
    Ends,
    /// Generic dot command: `.tran`, `.model`.
    DotCommand,
}

/// A classified, positioned lexical unit.
///
/// Immutable once produced, except for the line-number correction applied to
/// continuation lines by [`splice_continuations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based source line.
    pub line: usize,
    /// Byte offset into the source text.
    pub offset: usize,
}

/// Mutable scan state shared with rule actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerState {
    /// Current line counter; rule actions increment it on newlines.
    pub line: usize,
    /// True at the start of a physical line (whitespace does not clear it).
    pub at_line_start: bool,
    /// True until the title line has been consumed (or the first newline).
    pub awaiting_title: bool,
}

impl LexerState {
    pub fn new(has_title_line: bool) -> Self {
        Self {
            line: 1,
            at_line_start: true,
            awaiting_title: has_title_line,
        }
    }
}

/// Lexer configuration.
///
/// `ignore_case` is consumed by the parser's keyword comparison, not by
/// pattern matching itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerOptions {
    /// Treat the first physical line as an opaque title token.
    pub has_title_line: bool,
    /// Compare grammar keywords case-insensitively.
    pub ignore_case: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            has_title_line: true,
            ignore_case: true,
        }
    }
}

/// Scans text into tokens using a borrowed rule set.
#[derive(Debug)]
pub struct Lexer<'r> {
    rules: &'r TokenRuleSet,
    options: LexerOptions,
}

impl<'r> Lexer<'r> {
    pub fn new(rules: &'r TokenRuleSet, options: LexerOptions) -> Self {
        Self { rules, options }
    }

    /// Tokenize the full input. Each call starts from a fresh state.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let state = LexerState::new(self.options.has_title_line);
        self.tokenize_from(text, state).map(|(tokens, _)| tokens)
    }

    /// Tokenize starting from an explicit state; returns the final state so
    /// callers can observe counters mutated by rule actions.
    pub fn tokenize_from(
        &self,
        text: &str,
        mut state: LexerState,
    ) -> Result<(Vec<Token>, LexerState)> {
        let mut tokens = Vec::new();
        let mut offset = 0;

        'scan: while offset < text.len() {
            let rest = &text[offset..];
            for rule in self.rules.iter() {
                if !rule.applies(&state) {
                    continue;
                }
                let Some(lexeme) = rule.matches(rest) else {
                    continue;
                };
                // Zero-length matches cannot advance the scan
                if lexeme.is_empty() {
                    continue;
                }

                let line = state.line;
                match rule.run_action(&mut state, lexeme) {
                    RuleDirective::Emit => {
                        let kind = rule.kind();
                        tokens.push(Token {
                            kind,
                            text: lexeme.to_string(),
                            line,
                            offset,
                        });
                        if kind != TokenKind::Newline {
                            state.at_line_start = false;
                        }
                        offset += lexeme.len();
                        continue 'scan;
                    }
                    RuleDirective::Skip => {
                        offset += lexeme.len();
                        continue 'scan;
                    }
                    RuleDirective::Pass => continue,
                }
            }

            return Err(Error::Lexer {
                line: state.line,
                offset,
                snippet: snippet(rest),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            line: state.line,
            offset,
        });
        log::trace!("lexed {} tokens", tokens.len());
        Ok((tokens, state))
    }
}

/// Splice continuation lines into their logical statement.
///
/// A NEWLINE followed by a line-start PLUS is removed, and every token on the
/// continuation line has its line number rewritten to the logical statement's
/// first line, so diagnostics point at the statement rather than the physical
/// continuation.
pub fn splice_continuations(tokens: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut statement_line: Option<usize> = None;
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i].kind == TokenKind::Newline
            && tokens
                .get(i + 1)
                .is_some_and(|next| next.kind == TokenKind::Plus)
        {
            i += 2;
            continue;
        }

        let mut token = tokens[i].clone();
        match token.kind {
            TokenKind::Newline | TokenKind::Title => statement_line = None,
            _ => match statement_line {
                None => statement_line = Some(token.line),
                Some(line) => token.line = line,
            },
        }
        out.push(token);
        i += 1;
    }

    out
}

fn snippet(rest: &str) -> String {
    let end = rest
        .char_indices()
        .take(16)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    rest[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let rules = spice_rules();
        let lexer = Lexer::new(&rules, LexerOptions::default());
        lexer.tokenize(input).unwrap()
    }

    fn lex_untitled(input: &str) -> Vec<Token> {
        let rules = spice_rules();
        let options = LexerOptions {
            has_title_line: false,
            ..LexerOptions::default()
        };
        let lexer = Lexer::new(&rules, options);
        lexer.tokenize(input).unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_input_yields_single_eof() {
        let tokens = lex("");
        assert_eq!(kinds(&tokens), vec![TokenKind::Eof]);
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn test_empty_rule_set_fails_on_nonempty_input() {
        let rules = TokenRuleSet::new(vec![]);
        let lexer = Lexer::new(&rules, LexerOptions::default());
        let err = lexer.tokenize("x").unwrap_err();
        assert!(matches!(err, Error::Lexer { line: 1, offset: 0, .. }));
        // Empty input still yields the EOF token
        assert_eq!(lexer.tokenize("").unwrap().len(), 1);
    }

    #[test]
    fn test_custom_rules_line_counting() {
        let rules = TokenRuleSet::new(vec![
            TokenRule::new("text", TokenKind::Word, "[a-zA-Z0-9]*", 10),
            TokenRule::new("newline", TokenKind::Newline, "\n", 20).with_action(|state, _| {
                state.line += 1;
                RuleDirective::Emit
            }),
        ]);
        let lexer = Lexer::new(
            &rules,
            LexerOptions {
                has_title_line: false,
                ignore_case: true,
            },
        );
        let mut initial = LexerState::new(false);
        initial.line = 0;

        let (tokens, state) = lexer.tokenize_from("Line1\nLine2\n", initial).unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(state.line, 2);
    }

    #[test]
    fn test_simple_resistor_line() {
        let tokens = lex_untitled("R1 1 0 1k");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Value,
                TokenKind::Value,
                TokenKind::Value,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].text, "R1");
        assert_eq!(tokens[3].text, "1k");
    }

    #[test]
    fn test_title_line_is_opaque() {
        let tokens = lex("R1 is not a component here\nR1 1 0 1k\n");
        assert_eq!(tokens[0].kind, TokenKind::Title);
        assert_eq!(tokens[0].text, "R1 is not a component here");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::Word);
    }

    #[test]
    fn test_comment_at_line_start_only() {
        let tokens = lex_untitled("* a comment\nR1 1 0 1k\n");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "* a comment");
    }

    #[test]
    fn test_inline_comment_skipped() {
        let tokens = lex_untitled("R1 1 0 1k ; trailing note\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Value,
                TokenKind::Value,
                TokenKind::Value,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dot_commands_and_ends() {
        let tokens = lex_untitled(".tran 1u 10m\n.ends\n");
        assert_eq!(tokens[0].kind, TokenKind::DotCommand);
        assert_eq!(tokens[0].text, ".tran");
        let ends = tokens.iter().find(|t| t.kind == TokenKind::Ends).unwrap();
        assert_eq!(ends.text, ".ends");
    }

    #[test]
    fn test_ends_matching_is_case_insensitive() {
        let tokens = lex_untitled(".ENDS\n");
        assert_eq!(tokens[0].kind, TokenKind::Ends);
    }

    #[test]
    fn test_expression_span() {
        let tokens = lex_untitled("R1 1 0 {rload*2}\n");
        assert_eq!(tokens[3].kind, TokenKind::Expression);
        assert_eq!(tokens[3].text, "{rload*2}");
    }

    #[test]
    fn test_assignment_tokens() {
        let tokens = lex_untitled("M1 d g s b nch w=2u l=0.18u\n");
        let equals: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Equal)
            .collect();
        assert_eq!(equals.len(), 2);
    }

    #[test]
    fn test_vector_reference_tokens() {
        let tokens = lex_untitled("v(out,0)");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::LParen,
                TokenKind::Word,
                TokenKind::Comma,
                TokenKind::Value,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_scientific_and_suffixed_values() {
        let tokens = lex_untitled("C1 1 0 1e-12\nC2 1 0 4.7u\n");
        assert!(tokens.iter().any(|t| t.text == "1e-12"));
        assert!(tokens.iter().any(|t| t.text == "4.7u"));
    }

    #[test]
    fn test_negative_value_mid_line() {
        let tokens = lex_untitled("V1 1 0 -5\n");
        assert!(
            tokens
                .iter()
                .any(|t| t.kind == TokenKind::Value && t.text == "-5")
        );
    }

    #[test]
    fn test_extended_identifier() {
        let tokens = lex_untitled("R1 net.a net-b 1k\n");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "net.a");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].text, "net-b");
    }

    #[test]
    fn test_quoted_string_and_reference() {
        let tokens = lex_untitled(".include \"models.lib\"\n.print @m1[vth]\n");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::String));
        let reference = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Reference)
            .unwrap();
        assert_eq!(reference.text, "@m1[vth]");
    }

    #[test]
    fn test_crlf_is_one_newline() {
        let tokens = lex_untitled("R1 1 0 1k\r\nR2 1 0 1k\n");
        let newlines = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Newline)
            .count();
        assert_eq!(newlines, 2);
        assert_eq!(tokens.last().unwrap().line, 3);
    }

    #[test]
    fn test_line_numbers() {
        let tokens = lex_untitled("R1 1 0 1k\nC1 1 0 1u\n");
        let c1 = tokens.iter().find(|t| t.text == "C1").unwrap();
        assert_eq!(c1.line, 2);
    }

    #[test]
    fn test_unmatched_character_fails() {
        let rules = spice_rules();
        let lexer = Lexer::new(&rules, LexerOptions::default());
        let err = lexer.tokenize("Title\n&bad\n").unwrap_err();
        match err {
            Error::Lexer { line, snippet, .. } => {
                assert_eq!(line, 2);
                assert!(snippet.starts_with('&'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_splice_continuations() {
        let tokens = lex_untitled("R1 1\n+ 0 1k\nC1 1 0 1u\n");
        let spliced = splice_continuations(tokens);

        // The continuation newline and marker are gone
        let texts: Vec<_> = spliced
            .iter()
            .take_while(|t| t.kind != TokenKind::Newline)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, vec!["R1", "1", "0", "1k"]);

        // Spliced tokens report the statement's first line
        let one_k = spliced.iter().find(|t| t.text == "1k").unwrap();
        assert_eq!(one_k.line, 1);
        // The following statement keeps its own (physical) line
        let c1 = spliced.iter().find(|t| t.text == "C1").unwrap();
        assert_eq!(c1.line, 3);
    }

    #[test]
    fn test_splice_handles_repeated_continuations() {
        let tokens = lex_untitled("X1 a\n+ b\n+ c sub1\n");
        let spliced = splice_continuations(tokens);
        let words: Vec<_> = spliced
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Word | TokenKind::Value))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(words, vec!["X1", "a", "b", "c", "sub1"]);
        assert!(spliced.iter().all(|t| t.kind != TokenKind::Plus));
    }
}
