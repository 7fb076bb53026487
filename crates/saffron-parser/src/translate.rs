//! Parse-tree to model translation.
//!
//! Translation is table-driven: each grammar symbol maps to a rule function
//! that receives the node's already-translated children and returns one typed
//! value. Traversal is post-order, so rules reason about typed child values,
//! never raw sub-trees. A rule that receives a child shape it does not
//! recognize reports [`Error::Translation`]: the grammar and translator
//! tables have drifted out of sync, which is fatal by design.

use std::collections::HashMap;

use saffron_core::{Netlist, Parameter, ParameterCollection, Statement};

use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parser::ParseTree;

/// Intermediate typed value produced for each parse-tree node.
#[derive(Debug, Clone)]
enum Translated {
    Netlist(Netlist),
    Statements(Vec<Statement>),
    Statement(Statement),
    Params(ParameterCollection),
    Param(Parameter),
    /// Comma-joined vector elements from a `paren_rest` node.
    VectorTail(Vec<Parameter>),
    /// Assignment right-hand side from a tail node.
    AssignTail(Parameter),
    /// Bracket content from a `param_tail` node.
    BracketTail(ParameterCollection),
    /// Structural terminal (newline, comma, keyword, ...).
    Raw(Token),
    Empty,
}

type RuleFn = fn(&'static str, Vec<Translated>) -> Result<Translated>;

/// Symbol-keyed translation rule table.
pub struct Translator {
    rules: HashMap<&'static str, RuleFn>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    pub fn new() -> Self {
        let mut rules: HashMap<&'static str, RuleFn> = HashMap::new();
        rules.insert("netlist", rule_netlist);
        rules.insert("lines", rule_lines);
        rules.insert("line", rule_line);
        rules.insert("statement", rule_statement);
        rules.insert("comment_line", rule_comment_line);
        rules.insert("component", rule_component);
        rules.insert("model", rule_model);
        rules.insert("control", rule_control);
        rules.insert("subckt", rule_subckt);
        rules.insert("name", rule_passthrough_param);
        rules.insert("parameters", rule_parameters);
        rules.insert("parameter", rule_parameter);
        rules.insert("param_tail", rule_param_tail);
        rules.insert("assign_tail", rule_assign_tail);
        rules.insert("paren_content", rule_paren_content);
        rules.insert("paren_rest", rule_paren_rest);
        rules.insert("pvalue", rule_passthrough_param);
        rules.insert("eol", rule_empty);
        Self { rules }
    }

    /// Translate a tree rooted at the `netlist` symbol.
    pub fn translate(&self, tree: &ParseTree) -> Result<Netlist> {
        match self.translate_node(tree, tree.root())? {
            Translated::Netlist(netlist) => {
                log::debug!("translated netlist with {} statements", netlist.statements.len());
                Ok(netlist)
            }
            _ => Err(self.shape_error(tree, tree.root())),
        }
    }

    /// Translate a fragment tree rooted at a parameter-producing symbol.
    pub fn translate_parameter(&self, tree: &ParseTree) -> Result<Parameter> {
        match self.translate_node(tree, tree.root())? {
            Translated::Param(param) => Ok(param),
            _ => Err(self.shape_error(tree, tree.root())),
        }
    }

    fn translate_node(&self, tree: &ParseTree, id: usize) -> Result<Translated> {
        if let Some(token) = tree.token(id) {
            return Ok(translate_terminal(token));
        }

        let symbol = tree.symbol(id).ok_or_else(|| Error::Translation {
            symbol: "<unknown>".to_string(),
        })?;
        let children = tree
            .children(id)
            .iter()
            .map(|&child| self.translate_node(tree, child))
            .collect::<Result<Vec<_>>>()?;

        let rule = self.rules.get(symbol).ok_or_else(|| Error::Translation {
            symbol: symbol.to_string(),
        })?;
        rule(symbol, children)
    }

    fn shape_error(&self, tree: &ParseTree, id: usize) -> Error {
        Error::Translation {
            symbol: tree.symbol(id).unwrap_or("<terminal>").to_string(),
        }
    }
}

/// Translate a netlist parse tree into the typed model.
pub fn translate(tree: &ParseTree) -> Result<Netlist> {
    Translator::new().translate(tree)
}

/// Leaf parameters are inferred from the token kind; structural tokens pass
/// through as raw values for the rules to ignore.
fn translate_terminal(token: &Token) -> Translated {
    match token.kind {
        TokenKind::Word => Translated::Param(Parameter::Word(token.text.clone())),
        TokenKind::Identifier | TokenKind::Reference => {
            Translated::Param(Parameter::Identifier(token.text.clone()))
        }
        TokenKind::String => Translated::Param(Parameter::Identifier(unquote(&token.text))),
        TokenKind::Value => Translated::Param(Parameter::Value(token.text.clone())),
        TokenKind::Expression => {
            Translated::Param(Parameter::Expression(strip_braces(&token.text)))
        }
        _ => Translated::Raw(token.clone()),
    }
}

fn unquote(text: &str) -> String {
    text.trim_matches('"').to_string()
}

fn strip_braces(text: &str) -> String {
    text.trim_start_matches('{')
        .trim_end_matches('}')
        .trim()
        .to_string()
}

fn shape(symbol: &'static str) -> Error {
    Error::Translation {
        symbol: symbol.to_string(),
    }
}

// --- rules ---------------------------------------------------------------

fn rule_netlist(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut title = String::new();
    let mut statements = Vec::new();
    for child in children {
        match child {
            Translated::Raw(token) if token.kind == TokenKind::Title => title = token.text,
            Translated::Statements(list) => statements = list,
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(Translated::Netlist(Netlist { title, statements }))
}

fn rule_lines(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut statements = Vec::new();
    for child in children {
        match child {
            Translated::Statement(statement) => statements.push(statement),
            Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(Translated::Statements(statements))
}

fn rule_line(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    for child in children {
        match child {
            Translated::Statement(statement) => return Ok(Translated::Statement(statement)),
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(Translated::Empty)
}

fn rule_statement(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    for child in children {
        if let Translated::Statement(statement) = child {
            return Ok(Translated::Statement(statement));
        }
    }
    Err(shape(symbol))
}

fn rule_comment_line(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    for child in children {
        if let Translated::Raw(token) = &child
            && token.kind == TokenKind::Comment
        {
            let text = token.text.strip_prefix('*').unwrap_or(&token.text);
            return Ok(Translated::Statement(Statement::Comment {
                text: text.to_string(),
            }));
        }
    }
    Err(shape(symbol))
}

fn rule_component(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let (name, params) = name_and_params(symbol, children)?;
    Ok(Translated::Statement(Statement::Component { name, params }))
}

fn rule_model(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let (name, params) = name_and_params(symbol, children)?;
    Ok(Translated::Statement(Statement::Model { name, params }))
}

fn rule_control(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut name = None;
    let mut params = ParameterCollection::new();
    for child in children {
        match child {
            Translated::Raw(token) if token.kind == TokenKind::DotCommand => {
                name = Some(token.text[1..].to_string());
            }
            Translated::Params(collection) => params = collection,
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    let name = name.ok_or_else(|| shape(symbol))?;
    Ok(Translated::Statement(Statement::Control { name, params }))
}

fn rule_subckt(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut name = None;
    let mut params = ParameterCollection::new();
    let mut statements = Vec::new();
    for child in children {
        match child {
            // The first parameter leaf is the subcircuit name; a trailing
            // name after .ends is ignored
            Translated::Param(param) if name.is_none() => name = Some(param.text().to_string()),
            Translated::Param(_) => {}
            Translated::Params(collection) => params = collection,
            Translated::Statements(list) => statements = list,
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    let name = name.ok_or_else(|| shape(symbol))?;
    Ok(Translated::Statement(Statement::Subcircuit {
        name,
        params,
        statements,
    }))
}

fn rule_passthrough_param(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    for child in children {
        if let Translated::Param(param) = child {
            return Ok(Translated::Param(param));
        }
    }
    Err(shape(symbol))
}

fn rule_parameters(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut params = ParameterCollection::new();
    for child in children {
        match child {
            Translated::Param(param) => params.push(param),
            Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(Translated::Params(params))
}

fn rule_parameter(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut head: Option<Parameter> = None;
    let mut result: Option<Parameter> = None;
    for child in children {
        match child {
            Translated::Param(param) if head.is_none() => head = Some(param),
            Translated::AssignTail(value) => {
                let name = head.take().ok_or_else(|| shape(symbol))?;
                result = Some(Parameter::Assignment {
                    name: name.text().to_string(),
                    value: Box::new(value),
                });
            }
            Translated::BracketTail(params) => {
                let name = head.take().ok_or_else(|| shape(symbol))?;
                result = Some(Parameter::Bracket {
                    name: name.text().to_string(),
                    params,
                });
            }
            Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    match (result, head) {
        (Some(param), _) => Ok(Translated::Param(param)),
        (None, Some(param)) => Ok(Translated::Param(param)),
        (None, None) => Err(shape(symbol)),
    }
}

fn rule_param_tail(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut result = Translated::Empty;
    for child in children {
        match child {
            Translated::Param(value) => result = Translated::AssignTail(value),
            Translated::Params(params) => result = Translated::BracketTail(params),
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(result)
}

fn rule_assign_tail(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut result = Translated::Empty;
    for child in children {
        match child {
            Translated::Param(value) => result = Translated::AssignTail(value),
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(result)
}

fn rule_paren_content(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    let mut head: Option<Parameter> = None;
    let mut rest: Option<Translated> = None;
    for child in children {
        match child {
            Translated::Param(param) if head.is_none() => head = Some(param),
            tail @ (Translated::VectorTail(_) | Translated::Params(_)) => rest = Some(tail),
            Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }

    let Some(head) = head else {
        // Empty parentheses
        return Ok(Translated::Params(ParameterCollection::new()));
    };

    match rest {
        Some(Translated::VectorTail(tail)) => {
            // Comma-joined content collapses into a single vector child
            let mut elements = vec![head];
            elements.extend(tail);
            let mut params = ParameterCollection::new();
            params.push(Parameter::Vector(elements));
            Ok(Translated::Params(params))
        }
        Some(Translated::Params(tail)) => {
            let mut params = ParameterCollection::new();
            params.push(head);
            for param in &tail {
                params.push(param.clone());
            }
            Ok(Translated::Params(params))
        }
        None => {
            let mut params = ParameterCollection::new();
            params.push(head);
            Ok(Translated::Params(params))
        }
        _ => Err(shape(symbol)),
    }
}

fn rule_paren_rest(symbol: &'static str, children: Vec<Translated>) -> Result<Translated> {
    // The space-separated branch produces a ready collection
    if let Some(params) = children.iter().find_map(|child| match child {
        Translated::Params(params) => Some(params.clone()),
        _ => None,
    }) {
        return Ok(Translated::Params(params));
    }

    // Otherwise this is the comma-joined branch
    let mut elements = Vec::new();
    for child in children {
        match child {
            Translated::Param(param) => elements.push(param),
            Translated::Raw(_) | Translated::Empty => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok(Translated::VectorTail(elements))
}

fn rule_empty(_symbol: &'static str, _children: Vec<Translated>) -> Result<Translated> {
    Ok(Translated::Empty)
}

fn name_and_params(
    symbol: &'static str,
    children: Vec<Translated>,
) -> Result<(String, ParameterCollection)> {
    let mut name = None;
    let mut params = ParameterCollection::new();
    for child in children {
        match child {
            Translated::Param(param) if name.is_none() => name = Some(param.text().to_string()),
            Translated::Params(collection) => params = collection,
            Translated::Raw(_) | Translated::Empty | Translated::Param(_) => {}
            _ => return Err(shape(symbol)),
        }
    }
    Ok((name.ok_or_else(|| shape(symbol))?, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::spice_grammar;
    use crate::lexer::{Lexer, LexerOptions, spice_rules, splice_continuations};
    use crate::parser::parse;

    fn options() -> LexerOptions {
        LexerOptions {
            has_title_line: false,
            ..LexerOptions::default()
        }
    }

    fn parse_fragment(input: &str, start: &'static str) -> ParseTree {
        let rules = spice_rules();
        let tokens = Lexer::new(&rules, options()).tokenize(input).unwrap();
        let tokens = splice_continuations(tokens);
        parse(&spice_grammar(), &tokens, start, &options()).unwrap()
    }

    fn translate_param(input: &str) -> Parameter {
        Translator::new()
            .translate_parameter(&parse_fragment(input, "parameter"))
            .unwrap()
    }

    #[test]
    fn test_single_parameters() {
        assert_eq!(translate_param("out"), Parameter::Word("out".into()));
        assert_eq!(translate_param("1k"), Parameter::Value("1k".into()));
        assert_eq!(
            translate_param("{w*2}"),
            Parameter::Expression("w*2".into())
        );
        assert_eq!(
            translate_param("net.a"),
            Parameter::Identifier("net.a".into())
        );
    }

    #[test]
    fn test_assignment_parameter() {
        assert_eq!(
            translate_param("w=2u"),
            Parameter::Assignment {
                name: "w".into(),
                value: Box::new(Parameter::Value("2u".into())),
            }
        );
    }

    #[test]
    fn test_bracket_with_vector() {
        // v(out,0) is a bracket whose single child is a 2-element vector
        let param = translate_param("v(out,0)");
        match param {
            Parameter::Bracket { name, params } => {
                assert_eq!(name, "v");
                assert_eq!(params.len(), 1);
                match params.get(0).unwrap() {
                    Parameter::Vector(elements) => {
                        assert_eq!(elements.len(), 2);
                        assert_eq!(elements[0], Parameter::Word("out".into()));
                        assert_eq!(elements[1], Parameter::Value("0".into()));
                    }
                    other => panic!("expected vector, got {other:?}"),
                }
            }
            other => panic!("expected bracket, got {other:?}"),
        }
    }

    #[test]
    fn test_bracket_with_params() {
        let param = translate_param("d(is=1e-14 n=1.05)");
        match param {
            Parameter::Bracket { name, params } => {
                assert_eq!(name, "d");
                assert_eq!(params.len(), 2);
                assert!(params.named("is").is_some());
                assert_eq!(params.named("n").unwrap().numeric(), Some(1.05));
            }
            other => panic!("expected bracket, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_bracket() {
        let param = translate_param("d()");
        match param {
            Parameter::Bracket { name, params } => {
                assert_eq!(name, "d");
                assert!(params.is_empty());
            }
            other => panic!("expected bracket, got {other:?}"),
        }
    }

    #[test]
    fn test_single_element_bracket_is_not_vector() {
        let param = translate_param("v(out)");
        match param {
            Parameter::Bracket { name, params } => {
                assert_eq!(name, "v");
                assert_eq!(params.len(), 1);
                assert_eq!(params.get(0).unwrap(), &Parameter::Word("out".into()));
            }
            other => panic!("expected bracket, got {other:?}"),
        }
    }

    #[test]
    fn test_translation_is_deterministic() {
        let input = "R1 1 0 {rload*2} w=1u v(out,0)\n";
        let first = translate(&parse_fragment(input, "netlist")).unwrap();
        let second = translate(&parse_fragment(input, "netlist")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_symbol_is_translation_error() {
        use crate::grammar::{Element, Grammar};
        use crate::lexer::TokenKind;

        // A grammar symbol the translator table does not know
        let mut grammar = Grammar::new();
        grammar.define("mystery", vec![vec![Element::Terminal(TokenKind::Word)]]);
        let rules = spice_rules();
        let tokens = Lexer::new(&rules, options()).tokenize("abc").unwrap();
        let tree = parse(&grammar, &tokens, "mystery", &options()).unwrap();

        let err = Translator::new().translate(&tree).unwrap_err();
        assert_eq!(
            err,
            Error::Translation {
                symbol: "mystery".to_string()
            }
        );
    }
}
