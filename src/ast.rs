use crate::builder::Builder;
use crate::symbol::{sym, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Toplevel { stmts: Vec<Node> },
    Block { stmts: Vec<Node> },
    Name { name: Symbol },
    List { items: Vec<Node> },
    Call { target: Symbol, args: Box<Node> },
}

impl Node {
    /// Node kind as one of the predefined symbols.
    pub fn tag(&self) -> Symbol {
        match self {
            Node::Toplevel { .. } => sym::TOPLEVEL,
            Node::Block { .. } => sym::BLOCK,
            Node::Name { .. } => sym::NAME,
            Node::List { .. } => sym::LIST,
            Node::Call { .. } => sym::CALL,
        }
    }

    pub fn stmts(&self) -> Option<&[Node]> {
        match self {
            Node::Toplevel { stmts } | Node::Block { stmts } => Some(stmts),
            _ => None,
        }
    }
}

/// Builds owned [`Node`] trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct AstBuilder;

impl Builder for AstBuilder {
    type Node = Node;

    fn make_toplevel(&mut self) -> Node {
        Node::Toplevel { stmts: vec![] }
    }

    fn make_block(&mut self) -> Node {
        Node::Block { stmts: vec![] }
    }

    fn append_to_block(&mut self, block: &mut Node, node: Node) {
        match block {
            Node::Toplevel { stmts } | Node::Block { stmts } => stmts.push(node),
            _ => panic!("append_to_block: not a block: {:?}", block),
        }
    }

    fn make_name(&mut self, name: Symbol) -> Node {
        Node::Name { name }
    }

    fn make_list(&mut self) -> Node {
        Node::List { items: vec![] }
    }

    fn append_to_list(&mut self, list: &mut Node, node: Node) {
        match list {
            Node::List { items } => items.push(node),
            _ => panic!("append_to_list: not a list: {:?}", list),
        }
    }

    fn make_call(&mut self, target: Symbol, args: Node) -> Node {
        debug_assert!(matches!(args, Node::List { .. }));
        Node::Call {
            target,
            args: Box::new(args),
        }
    }
}
