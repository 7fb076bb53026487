//! The reader boundary.
//!
//! Downstream consumers ("readers") walk the parsed [`Netlist`] and build
//! their own entities from it - simulator devices, schematic objects,
//! documentation. This module defines the narrow contract they consume: a
//! [`ReadingContext`] carrying a name generator, a warning/error sink, and
//! the expression evaluator.

use std::collections::HashMap;

use saffron_core::Netlist;
use saffron_expr::Evaluator;

/// A consumer of parsed netlists.
pub trait NetlistReader {
    type Output;

    /// Read a netlist, producing entities and recording diagnostics in the
    /// context.
    fn read(&self, netlist: &Netlist, context: &mut ReadingContext) -> Self::Output;
}

/// Generates unique names for nodes and objects a reader synthesizes.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    counters: HashMap<String, usize>,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique name for a prefix: `next("net")` yields `net1`, `net2`...
    pub fn next(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{prefix}{counter}")
    }
}

/// Accumulated reader diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl Diagnostics {
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("{message}");
        self.errors.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Everything a reader needs while walking a netlist.
#[derive(Debug, Clone, Default)]
pub struct ReadingContext {
    names: NameGenerator,
    diagnostics: Diagnostics,
    evaluator: Evaluator,
}

impl ReadingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context around a pre-configured evaluator (variables bound,
    /// custom functions registered).
    pub fn with_evaluator(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            ..Self::default()
        }
    }

    pub fn names(&mut self) -> &mut NameGenerator {
        &mut self.names
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut Evaluator {
        &mut self.evaluator
    }

    /// Evaluate expression text against the context's evaluator.
    pub fn evaluate_double(&self, text: &str) -> saffron_expr::Result<f64> {
        self.evaluator.evaluate_double(text)
    }

    /// Evaluate a parameter expression, degrading gracefully: a failure is
    /// recorded as one warning and `None` is returned so the reader can
    /// continue with the rest of the netlist.
    pub fn evaluate_or_warn(&mut self, text: &str) -> Option<f64> {
        match self.evaluator.evaluate_double(text) {
            Ok(value) => Some(value),
            Err(err) => {
                self.diagnostics.warn(err.to_string());
                None
            }
        }
    }

    /// Child context for a nested scope (subcircuit expansion): snapshots the
    /// evaluator's variables and functions, shares its AST cache, and keeps
    /// the accumulated diagnostics and name counters.
    pub fn create_child(&self, scope: impl Into<String>) -> Self {
        Self {
            names: self.names.clone(),
            diagnostics: self.diagnostics.clone(),
            evaluator: self.evaluator.create_child(scope),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saffron_core::Statement;

    #[test]
    fn test_name_generator_counts_per_prefix() {
        let mut names = NameGenerator::new();
        assert_eq!(names.next("net"), "net1");
        assert_eq!(names.next("net"), "net2");
        assert_eq!(names.next("dev"), "dev1");
    }

    #[test]
    fn test_evaluate_or_warn_degrades_gracefully() {
        let mut context = ReadingContext::new();
        context.evaluator_mut().set_variable("w", 2.0);

        assert_eq!(context.evaluate_or_warn("w*3"), Some(6.0));
        assert_eq!(context.evaluate_or_warn("unbound*3"), None);
        assert_eq!(context.evaluate_or_warn("also_unbound"), None);

        // One warning per unsettable parameter; reading continues
        assert_eq!(context.diagnostics().warnings().len(), 2);
        assert!(!context.diagnostics().has_errors());
    }

    #[test]
    fn test_child_scope_snapshots_evaluator() {
        let mut context = ReadingContext::new();
        context.evaluator_mut().set_variable("R", 100.0);

        let child = context.create_child("x1");
        context.evaluator_mut().set_variable("R", 1.0);
        assert_eq!(child.evaluate_double("R").unwrap(), 100.0);
    }

    #[test]
    fn test_reader_trait_object() {
        struct CountingReader;

        impl NetlistReader for CountingReader {
            type Output = usize;

            fn read(&self, netlist: &Netlist, context: &mut ReadingContext) -> usize {
                netlist
                    .statements
                    .iter()
                    .filter(|s| matches!(s, Statement::Component { .. }))
                    .inspect(|_| {
                        context.names().next("entity");
                    })
                    .count()
            }
        }

        let netlist =
            saffron_parser::parse_netlist("Title\nR1 1 0 1k\nC1 1 0 1u\n.end\n").unwrap();
        let mut context = ReadingContext::new();
        assert_eq!(CountingReader.read(&netlist, &mut context), 2);
    }
}
