//! Evaluation contexts with hierarchical (parent/child) scoping.

use std::collections::HashMap;

use crate::functions::{FunctionDef, default_functions};

/// Variable bindings and function registrations visible to an evaluation.
///
/// A child context is created by *snapshotting* the parent's variable and
/// function tables. Mutations to the parent after the child exists are not
/// observed by the child, and vice versa; the parent link is the parent's
/// name, kept for diagnostics only, never consulted during lookup.
#[derive(Debug, Clone)]
pub struct ExpressionContext {
    name: String,
    parent: Option<String>,
    variables: HashMap<String, f64>,
    functions: HashMap<String, FunctionDef>,
}

impl ExpressionContext {
    /// Root context with the default function table registered.
    pub fn new(name: impl Into<String>) -> Self {
        let mut functions = HashMap::new();
        for def in default_functions() {
            functions.insert(def.name().to_lowercase(), def);
        }
        Self {
            name: name.into(),
            parent: None,
            variables: HashMap::new(),
            functions,
        }
    }

    /// Root context with an empty function table.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            variables: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the context this one was snapshotted from, if any.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Bind a variable, replacing any previous binding.
    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }

    /// Look up a variable binding.
    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    /// All bound variable names, sorted for stable output.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Register a function under its own name (case-insensitive).
    pub fn register_function(&mut self, def: FunctionDef) {
        self.functions.insert(def.name().to_lowercase(), def);
    }

    /// Look up a function by name (case-insensitive).
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    /// All registered function names, sorted for stable output.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot this context into a child scope.
    pub fn create_child(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(self.name.clone()),
            variables: self.variables.clone(),
            functions: self.functions.clone(),
        }
    }
}

impl Default for ExpressionContext {
    fn default() -> Self {
        Self::new("root")
    }
}
