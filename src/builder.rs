use crate::symbol::Symbol;

/// Constructs syntax tree nodes on behalf of the parser.
///
/// The parser decides what to build and in which order; the builder decides
/// what a node is. Operations cannot fail from the parser's point of view. A
/// builder that cannot honor a call should panic.
pub trait Builder {
    type Node;

    /// Root of a whole program. Statements are added with
    /// [`append_to_block`](Builder::append_to_block).
    fn make_toplevel(&mut self) -> Self::Node;

    fn make_block(&mut self) -> Self::Node;

    fn append_to_block(&mut self, block: &mut Self::Node, node: Self::Node);

    /// Reference to a bare name.
    fn make_name(&mut self, name: Symbol) -> Self::Node;

    /// Empty list, used for call arguments.
    fn make_list(&mut self) -> Self::Node;

    fn append_to_list(&mut self, list: &mut Self::Node, node: Self::Node);

    /// Call of `target`. `args` was built by [`make_list`](Builder::make_list).
    fn make_call(&mut self, target: Symbol, args: Self::Node) -> Self::Node;
}
