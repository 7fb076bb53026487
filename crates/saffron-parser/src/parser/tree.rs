//! Arena-backed parse tree.
//!
//! Nodes live in a flat arena; parents own their children by index and each
//! node keeps a non-owning parent handle used only for upward traversal in
//! diagnostics, never for lifetime management.

use crate::lexer::Token;

/// Index of a node within its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub enum ParseNodeKind {
    /// Expansion of a grammar symbol.
    NonTerminal { symbol: &'static str },
    /// Leaf retaining its source token (lexeme and position).
    Terminal { token: Token },
}

#[derive(Debug, Clone)]
pub struct ParseNode {
    kind: ParseNodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl ParseNode {
    pub fn kind(&self) -> &ParseNodeKind {
        &self.kind
    }
}

/// The concrete syntax tree for one parse call. Node 0 is the root.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_nonterminal(
        &mut self,
        symbol: &'static str,
        parent: Option<NodeId>,
    ) -> NodeId {
        self.add_node(ParseNodeKind::NonTerminal { symbol }, parent)
    }

    pub(crate) fn add_terminal(&mut self, token: Token, parent: NodeId) -> NodeId {
        self.add_node(ParseNodeKind::Terminal { token }, Some(parent))
    }

    fn add_node(&mut self, kind: ParseNodeKind, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(ParseNode {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> Option<&ParseNode> {
        self.nodes.get(id)
    }

    /// Symbol name if `id` is a non-terminal node.
    pub fn symbol(&self, id: NodeId) -> Option<&'static str> {
        match self.nodes.get(id)?.kind {
            ParseNodeKind::NonTerminal { symbol } => Some(symbol),
            ParseNodeKind::Terminal { .. } => None,
        }
    }

    /// Token if `id` is a terminal node.
    pub fn token(&self, id: NodeId) -> Option<&Token> {
        match &self.nodes.get(id)?.kind {
            ParseNodeKind::Terminal { token } => Some(token),
            ParseNodeKind::NonTerminal { .. } => None,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Non-owning upward handle.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn word(text: &str) -> Token {
        Token {
            kind: TokenKind::Word,
            text: text.to_string(),
            line: 1,
            offset: 0,
        }
    }

    #[test]
    fn test_arena_links() {
        let mut tree = ParseTree::new();
        let root = tree.add_nonterminal("netlist", None);
        let stmt = tree.add_nonterminal("component", Some(root));
        let leaf = tree.add_terminal(word("R1"), stmt);

        assert_eq!(tree.root(), root);
        assert_eq!(tree.children(root), &[stmt]);
        assert_eq!(tree.children(stmt), &[leaf]);
        assert_eq!(tree.parent(leaf), Some(stmt));
        assert_eq!(tree.parent(stmt), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.symbol(stmt), Some("component"));
        assert_eq!(tree.token(leaf).unwrap().text, "R1");
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_terminal_has_no_symbol() {
        let mut tree = ParseTree::new();
        let root = tree.add_nonterminal("netlist", None);
        let leaf = tree.add_terminal(word("R1"), root);
        assert_eq!(tree.symbol(leaf), None);
        assert_eq!(tree.token(root), None);
    }
}
