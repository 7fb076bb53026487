//! The public evaluator: a context plus a shared AST cache.

use std::sync::Arc;

use crate::cache::AstCache;
use crate::context::ExpressionContext;
use crate::error::Result;
use crate::eval::evaluate;
use crate::functions::FunctionDef;

/// Evaluates expression text against an owned context, caching parsed ASTs.
///
/// Child evaluators created with [`create_child`](Evaluator::create_child)
/// snapshot the context (subcircuit-local scoping) while sharing the AST
/// cache, so identical expression strings are parsed once per process even
/// across sweep and Monte-Carlo variants evaluated in parallel.
#[derive(Debug, Clone)]
pub struct Evaluator {
    context: ExpressionContext,
    cache: Arc<AstCache>,
}

impl Evaluator {
    /// Root evaluator with a fresh cache and the default function table.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(AstCache::new()))
    }

    /// Root evaluator sharing an existing cache.
    pub fn with_cache(cache: Arc<AstCache>) -> Self {
        Self {
            context: ExpressionContext::new("root"),
            cache,
        }
    }

    /// The underlying context.
    pub fn context(&self) -> &ExpressionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ExpressionContext {
        &mut self.context
    }

    /// The shared AST cache.
    pub fn cache(&self) -> &Arc<AstCache> {
        &self.cache
    }

    /// Bind a variable in this evaluator's context.
    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        self.context.set_variable(name, value);
    }

    /// All bound variable names, sorted.
    pub fn variable_names(&self) -> Vec<String> {
        self.context.variable_names()
    }

    /// Register a function in this evaluator's context.
    pub fn register_function(&mut self, def: FunctionDef) {
        self.context.register_function(def);
    }

    /// Parse (or fetch from cache) and evaluate expression text.
    pub fn evaluate_double(&self, text: &str) -> Result<f64> {
        let ast = self.cache.get_or_parse(text)?;
        evaluate(&ast, &self.context).map_err(|reason| reason.with_expression(text))
    }

    /// Snapshot this evaluator into a child scope sharing the AST cache.
    pub fn create_child(&self, name: impl Into<String>) -> Self {
        Self {
            context: self.context.create_child(name),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
