//! The parse tree: a flat `Vec<ExprNode>` arena addressed by `u32` index rather than a pointer
//! graph, so the tree, the session arena, and the checker's node-by-node pass all share the same
//! cheap, `Copy` handle.

use crate::types::{SelValue, Type};

pub const NIL: NodeId = NodeId(u32::MAX);

/// Index into an [`Ast`]'s node vector. `NIL` stands in for "no child" (e.g. the tail of the last
/// `ArgList` cons cell, or a parse failure).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn is_nil(self) -> bool {
        self == NIL
    }

    fn new(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Neg,
    Paren,
    Func,
    ArgList,
    Literal,
    Const,
}

/// A literal payload. Stored out-of-band from [`SelValue`] for non-`Copy`-friendly ownership of
/// the string literal's backing text, which lives in the session arena alongside the AST.
#[derive(Copy, Clone, Debug)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    Uint(u32),
    Float(f32),
    /// Byte range into the originating source text, owned by the session arena.
    Str { start: u32, end: u32 },
}

/// One node of the parse tree.
///
/// Binary operators and `Paren`/`Neg` use `lhs`/`rhs`; `Func` uses `lhs` for the callee name range
/// (via `name_start`/`name_end`) and `rhs` for the head of its `ArgList`; `ArgList` uses `lhs` for
/// the head expression and `rhs` for the tail (`NIL` when exhausted).
#[derive(Clone, Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub lhs: NodeId,
    pub rhs: NodeId,
    pub literal: Option<Literal>,
    /// Byte range of the identifier naming a `Func`/`Const` node, into the source text.
    pub name: Option<(u32, u32)>,
    /// Filled in by the checker; `Type::Error` until then.
    pub ty: Type,
    pub qualifier: Qualifier,
}

impl ExprNode {
    fn unchecked(kind: ExprKind, lhs: NodeId, rhs: NodeId) -> Self {
        Self {
            kind,
            lhs,
            rhs,
            literal: None,
            name: None,
            ty: Type::Error,
            qualifier: Qualifier::None,
        }
    }
}

/// The constness qualifier a checked node carries. `Pure` only ever labels a built-in registry
/// entry itself, never a tree node post-check; tree nodes end up `None` or `Const`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Qualifier {
    None,
    Const,
    Pure,
}

impl Qualifier {
    /// `Const` iff both operands are `Const`; otherwise `None`. Used for binary/unary ops.
    pub fn meet(a: Qualifier, b: Qualifier) -> Qualifier {
        if a == Qualifier::Const && b == Qualifier::Const {
            Qualifier::Const
        } else {
            Qualifier::None
        }
    }
}

/// A flat arena of [`ExprNode`]s backing one parsed expression tree.
#[derive(Default, Debug)]
pub struct Ast {
    nodes: Vec<ExprNode>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: ExprNode) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn binary(&mut self, kind: ExprKind, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.push(ExprNode::unchecked(kind, lhs, rhs))
    }

    pub fn unary(&mut self, kind: ExprKind, operand: NodeId) -> NodeId {
        self.push(ExprNode::unchecked(kind, operand, NIL))
    }

    pub fn literal(&mut self, literal: Literal, ty: Type) -> NodeId {
        let mut node = ExprNode::unchecked(ExprKind::Literal, NIL, NIL);
        node.literal = Some(literal);
        node.ty = ty;
        node.qualifier = Qualifier::Const;
        self.push(node)
    }

    pub fn const_ident(&mut self, name: (u32, u32)) -> NodeId {
        let mut node = ExprNode::unchecked(ExprKind::Const, NIL, NIL);
        node.name = Some(name);
        self.push(node)
    }

    /// `args` is `NIL` for an empty argument list.
    pub fn func_call(&mut self, name: (u32, u32), args: NodeId) -> NodeId {
        let mut node = ExprNode::unchecked(ExprKind::Func, NIL, args);
        node.name = Some(name);
        self.push(node)
    }

    /// Builds the right-leaning `ArgList` cons chain for `exprs`, head first.
    pub fn arg_list(&mut self, exprs: &[NodeId]) -> NodeId {
        let mut tail = NIL;
        for &expr in exprs.iter().rev() {
            tail = self.binary(ExprKind::ArgList, expr, tail);
        }
        tail
    }

    pub fn get(&self, id: NodeId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut ExprNode {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks an `ArgList` chain rooted at `id` (or `NIL` for empty) into a flat list of argument
    /// node ids, head to tail.
    pub fn arg_list_items(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut items = Vec::new();
        while !id.is_nil() {
            let node = self.get(id);
            debug_assert_eq!(node.kind, ExprKind::ArgList);
            items.push(node.lhs);
            id = node.rhs;
        }
        items
    }
}

/// Resolves a `(start, end)` byte range against the source text it was recorded from.
pub fn slice<'a>(src: &'a str, range: (u32, u32)) -> &'a str {
    &src[range.0 as usize..range.1 as usize]
}

/// A compile-time-constant literal's runtime payload, used by the checker to fold a literal node
/// straight to a [`SelValue`] without re-lexing.
pub fn literal_value(literal: Literal) -> SelValue {
    match literal {
        Literal::Bool(b) => SelValue { b },
        Literal::Int(i) => SelValue { i },
        Literal::Uint(u) => SelValue { u },
        Literal::Float(f) => SelValue { f },
        Literal::Str { .. } => SelValue::nil(), // str literals resolve through `slice`, not this.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arg_list_round_trips() {
        let mut ast = Ast::new();
        let a = ast.literal(Literal::Int(1), Type::Int);
        let b = ast.literal(Literal::Int(2), Type::Int);
        let c = ast.literal(Literal::Int(3), Type::Int);
        let list = ast.arg_list(&[a, b, c]);
        assert_eq!(ast.arg_list_items(list), vec![a, b, c]);
    }

    #[test]
    fn empty_arg_list_is_nil() {
        let mut ast = Ast::new();
        let list = ast.arg_list(&[]);
        assert!(list.is_nil());
        assert!(ast.arg_list_items(list).is_empty());
    }

    #[test]
    fn qualifier_meet_requires_both_const() {
        assert_eq!(Qualifier::meet(Qualifier::Const, Qualifier::Const), Qualifier::Const);
        assert_eq!(Qualifier::meet(Qualifier::Const, Qualifier::None), Qualifier::None);
        assert_eq!(Qualifier::meet(Qualifier::None, Qualifier::None), Qualifier::None);
    }
}
