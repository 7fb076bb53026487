//! Shared AST cache keyed by expression source text.
//!
//! Parameter sweeps and Monte-Carlo runs evaluate the same expression strings
//! against many contexts, often from several threads. The cache holds one
//! parsed `Arc<Expr>` per distinct source text with insert-if-absent
//! semantics: concurrent parses of the same text race harmlessly and one
//! winning entry is retained. The cache is injected into each [`Evaluator`]
//! rather than living as an ambient global.
//!
//! [`Evaluator`]: crate::Evaluator

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ast::Expr;
use crate::error::Result;
use crate::parser::parse_expression;

/// Concurrency-safe cache of parsed expression ASTs.
#[derive(Debug, Default)]
pub struct AstCache {
    entries: RwLock<HashMap<String, Arc<Expr>>>,
}

impl AstCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached AST for `text`, parsing it on a miss.
    ///
    /// Parse failures are not cached; every call with invalid text reports
    /// the error afresh.
    pub fn get_or_parse(&self, text: &str) -> Result<Arc<Expr>> {
        if let Some(ast) = self.entries.read().expect("ast cache poisoned").get(text) {
            return Ok(Arc::clone(ast));
        }

        // Parse outside the lock; a concurrent winner is kept.
        let parsed = Arc::new(parse_expression(text)?);
        let mut entries = self.entries.write().expect("ast cache poisoned");
        let entry = entries
            .entry(text.to_string())
            .or_insert_with(|| {
                log::trace!("ast cache insert: '{text}'");
                parsed
            });
        Ok(Arc::clone(entry))
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("ast cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        self.entries.write().expect("ast cache poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_ast() {
        let cache = AstCache::new();
        let first = cache.get_or_parse("a + 1").unwrap();
        let second = cache.get_or_parse("a + 1").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_texts_are_distinct_entries() {
        let cache = AstCache::new();
        cache.get_or_parse("a + 1").unwrap();
        cache.get_or_parse("a+1").unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_parse_failures_not_cached() {
        let cache = AstCache::new();
        assert!(cache.get_or_parse("1 +").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = AstCache::new();
        cache.get_or_parse("1").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(AstCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        cache.get_or_parse("w * 2 + 1").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 1);
    }
}
