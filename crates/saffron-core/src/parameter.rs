//! Statement parameters.
//!
//! Every statement in a netlist carries an ordered list of parameters.
//! Positional parameters (`1 0 1k`) and named ones (`w=2u`) live in the same
//! collection; they are distinguished by variant, not by position.

use serde::{Deserialize, Serialize};

use crate::units::parse_value;

/// A single statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Parameter {
    /// Plain word: element names, node names, keywords (`out`, `DC`).
    Word(String),
    /// Extended identifier: quoted strings, `@dev[param]` references, and
    /// other lexemes outside the plain-word alphabet.
    Identifier(String),
    /// Numeric literal, kept as source text (`1k`, `4.7u`, `1e-12`).
    Value(String),
    /// Arithmetic expression span, braces stripped (`w*2`).
    Expression(String),
    /// Comma-separated scalars: the `out,0` in `v(out,0)`.
    Vector(Vec<Parameter>),
    /// Named parenthesized group: `d(is=1e-14 n=1.05)` or `v(out,0)`.
    Bracket {
        name: String,
        params: ParameterCollection,
    },
    /// Name/value pair: `w=2u`, `temp={27+dt}`.
    Assignment {
        name: String,
        value: Box<Parameter>,
    },
}

impl Parameter {
    /// The parameter's source text: the lexeme for leaf parameters, the name
    /// for brackets and assignments.
    pub fn text(&self) -> &str {
        match self {
            Parameter::Word(s)
            | Parameter::Identifier(s)
            | Parameter::Value(s)
            | Parameter::Expression(s) => s,
            Parameter::Bracket { name, .. } | Parameter::Assignment { name, .. } => name,
            Parameter::Vector(_) => "",
        }
    }

    /// Numeric value of a `Value` parameter, applying engineering suffixes.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Parameter::Value(s) => parse_value(s),
            _ => None,
        }
    }
}

/// Ordered parameter list; insertion order is significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterCollection {
    params: Vec<Parameter>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, param: Parameter) {
        self.params.push(param);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.params.iter()
    }

    /// Positional (non-assignment) parameters in order.
    pub fn positional(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| !matches!(p, Parameter::Assignment { .. }))
    }

    /// Look up the value of a named (assignment) parameter,
    /// case-insensitively. The last assignment wins.
    pub fn named(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().rev().find_map(|p| match p {
            Parameter::Assignment { name: n, value } if n.eq_ignore_ascii_case(name) => {
                Some(value.as_ref())
            }
            _ => None,
        })
    }
}

impl FromIterator<Parameter> for ParameterCollection {
    fn from_iter<T: IntoIterator<Item = Parameter>>(iter: T) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parameter::Word(s) | Parameter::Identifier(s) | Parameter::Value(s) => {
                write!(f, "{s}")
            }
            Parameter::Expression(s) => write!(f, "{{{s}}}"),
            Parameter::Vector(elems) => {
                let parts: Vec<String> = elems.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
            Parameter::Bracket { name, params } => write!(f, "{name}({params})"),
            Parameter::Assignment { name, value } => write!(f, "{name}={value}"),
        }
    }
}

impl std::fmt::Display for ParameterCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParameterCollection {
        let mut params = ParameterCollection::new();
        params.push(Parameter::Word("out".into()));
        params.push(Parameter::Value("1k".into()));
        params.push(Parameter::Assignment {
            name: "w".into(),
            value: Box::new(Parameter::Value("2u".into())),
        });
        params
    }

    #[test]
    fn test_positional_skips_assignments() {
        let params = sample();
        let positional: Vec<_> = params.positional().collect();
        assert_eq!(positional.len(), 2);
        assert_eq!(positional[0].text(), "out");
    }

    #[test]
    fn test_named_lookup_case_insensitive() {
        let params = sample();
        let value = params.named("W").expect("named lookup failed");
        assert_eq!(value.numeric(), Some(2e-6));
        assert!(params.named("l").is_none());
    }

    #[test]
    fn test_named_lookup_last_wins() {
        let mut params = sample();
        params.push(Parameter::Assignment {
            name: "w".into(),
            value: Box::new(Parameter::Value("5u".into())),
        });
        assert_eq!(params.named("w").unwrap().numeric(), Some(5.0 * 1e-6));
    }

    #[test]
    fn test_numeric_on_non_value_is_none() {
        assert_eq!(Parameter::Word("1k".into()).numeric(), None);
        assert_eq!(Parameter::Value("1k".into()).numeric(), Some(1000.0));
    }

    #[test]
    fn test_display_round_trip_shapes() {
        let bracket = Parameter::Bracket {
            name: "v".into(),
            params: [Parameter::Vector(vec![
                Parameter::Word("out".into()),
                Parameter::Value("0".into()),
            ])]
            .into_iter()
            .collect(),
        };
        assert_eq!(bracket.to_string(), "v(out,0)");

        let assign = Parameter::Assignment {
            name: "temp".into(),
            value: Box::new(Parameter::Expression("27+dt".into())),
        };
        assert_eq!(assign.to_string(), "temp={27+dt}");
    }
}
