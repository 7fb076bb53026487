//! Netlist and statement types.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterCollection;

/// A parsed netlist: title line plus ordered statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    /// Title from the first physical line (empty when the source has none).
    pub title: String,
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

impl Netlist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            statements: Vec::new(),
        }
    }
}

/// One netlist statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Statement {
    /// Component instance line (`R1 1 0 1k`).
    Component {
        name: String,
        params: ParameterCollection,
    },
    /// `.model` definition (`.model switch sw(ron=1 roff=1e6)`).
    Model {
        name: String,
        params: ParameterCollection,
    },
    /// Generic dot-control line (`.tran 1u 10m`, `.end`). The name is stored
    /// without the leading dot.
    Control {
        name: String,
        params: ParameterCollection,
    },
    /// `.subckt name ports... <body> .ends` block.
    Subcircuit {
        name: String,
        params: ParameterCollection,
        statements: Vec<Statement>,
    },
    /// Full-line comment (`* stage 1 bias`), leading `*` stripped.
    Comment { text: String },
}

impl Statement {
    /// Statement name; the comment text for comment lines.
    pub fn name(&self) -> &str {
        match self {
            Statement::Component { name, .. }
            | Statement::Model { name, .. }
            | Statement::Control { name, .. }
            | Statement::Subcircuit { name, .. } => name,
            Statement::Comment { text } => text,
        }
    }

    /// The statement's parameters; comments have none.
    pub fn params(&self) -> Option<&ParameterCollection> {
        match self {
            Statement::Component { params, .. }
            | Statement::Model { params, .. }
            | Statement::Control { params, .. }
            | Statement::Subcircuit { params, .. } => Some(params),
            Statement::Comment { .. } => None,
        }
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Component { name, params } => {
                write!(f, "{name}")?;
                if !params.is_empty() {
                    write!(f, " {params}")?;
                }
                Ok(())
            }
            Statement::Model { name, params } => {
                write!(f, ".model {name}")?;
                if !params.is_empty() {
                    write!(f, " {params}")?;
                }
                Ok(())
            }
            Statement::Control { name, params } => {
                write!(f, ".{name}")?;
                if !params.is_empty() {
                    write!(f, " {params}")?;
                }
                Ok(())
            }
            Statement::Subcircuit {
                name,
                params,
                statements,
            } => {
                write!(f, ".subckt {name}")?;
                if !params.is_empty() {
                    write!(f, " {params}")?;
                }
                for stmt in statements {
                    write!(f, "\n{stmt}")?;
                }
                write!(f, "\n.ends {name}")
            }
            Statement::Comment { text } => write!(f, "*{text}"),
        }
    }
}

impl std::fmt::Display for Netlist {
    /// Renders the netlist back to source form. Continuation splicing and
    /// whitespace are not preserved; the output is a normalized equivalent.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.title.is_empty() {
            writeln!(f, "{}", self.title)?;
        }
        for stmt in &self.statements {
            writeln!(f, "{stmt}")?;
        }
        Ok(())
    }
}
