//! Bytecode generator (spec §4.4): one post-order walk over an already-checked tree, appending
//! opcodes to a [`CodeBuffer`].

use crate::ast::{slice, Ast, ExprKind, Literal, NodeId, Qualifier};
use crate::builtins;
use crate::opcode::{CodeBuffer, OpKind};
use crate::types::{SelValue, StrView, Type};

/// A compiled, checked program: owns its bytecode and remembers enough about its origin to
/// re-evaluate and memoise (spec §3's `ExeExpr`).
#[derive(Debug)]
pub struct ExeExpr<'src> {
    pub code: CodeBuffer,
    pub result_type: Type,
    pub qualifier: Qualifier,
    /// Debug-only: the source text this program was compiled from.
    pub source: &'src str,
    pub(crate) cached: Option<SelValue>,
}

impl<'src> ExeExpr<'src> {
    pub fn is_const(&self) -> bool {
        self.qualifier == Qualifier::Const
    }
}

/// Compiles the checked tree rooted at `root`. `src` must be the arena-owned text the tree was
/// checked against; any string literal the program pushes holds a pointer into it, so `src` must
/// outlive the returned [`ExeExpr`].
pub fn compile<'src>(ast: &Ast, root: NodeId, src: &'src str) -> ExeExpr<'src> {
    let mut code = CodeBuffer::new();
    compile_node(ast, root, src, &mut code);
    let node = ast.get(root);
    ExeExpr { code, result_type: node.ty, qualifier: node.qualifier, source: src, cached: None }
}

fn compile_node(ast: &Ast, id: NodeId, src: &str, code: &mut CodeBuffer) {
    let node = ast.get(id);
    match node.kind {
        ExprKind::Literal => push_literal(node.literal.expect("Literal node carries a literal"), node.ty, src, code),
        ExprKind::Const => {
            let name = slice(src, node.name.expect("Const node carries a name"));
            let entry = builtins::find_const(name).expect("checked tree only names real constants");
            code.push_push(entry.ty, &entry.value.to_ne_bytes());
        }
        ExprKind::Paren => compile_node(ast, node.lhs, src, code),
        ExprKind::Neg => {
            compile_node(ast, node.lhs, src, code);
            code.push_arith(OpKind::Neg, node.ty);
        }
        ExprKind::Add | ExprKind::Sub | ExprKind::Mul | ExprKind::Div | ExprKind::Rem => {
            compile_node(ast, node.lhs, src, code);
            compile_node(ast, node.rhs, src, code);
            code.push_arith(arith_opcode(node.kind), node.ty);
        }
        ExprKind::Func => {
            let name = slice(src, node.name.expect("Func node carries a name"));
            let (index, _entry) = builtins::find_func(name).expect("checked tree only names real functions");
            for arg in ast.arg_list_items(node.rhs) {
                compile_node(ast, arg, src, code);
            }
            code.push_func(node.ty, index);
        }
        ExprKind::ArgList => unreachable!("ArgList is walked by its owning Func node"),
    }
}

fn arith_opcode(kind: ExprKind) -> OpKind {
    match kind {
        ExprKind::Add => OpKind::Add,
        ExprKind::Sub => OpKind::Sub,
        ExprKind::Mul => OpKind::Mul,
        ExprKind::Div => OpKind::Div,
        ExprKind::Rem => OpKind::Rem,
        _ => unreachable!(),
    }
}

fn push_literal(literal: Literal, ty: Type, src: &str, code: &mut CodeBuffer) {
    match literal {
        Literal::Bool(b) => code.push_push(Type::Bool, &(b as i32).to_ne_bytes()),
        Literal::Int(i) => code.push_push(Type::Int, &i.to_ne_bytes()),
        Literal::Uint(u) => code.push_push(Type::Uint, &u.to_ne_bytes()),
        Literal::Float(f) => code.push_push(Type::Float, &f.to_ne_bytes()),
        Literal::Str { start, end } => {
            let view = StrView::from_str(slice(src, (start, end)));
            code.push_push(ty, bytemuck::bytes_of(&view));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::check::check;
    use crate::parser::parse;

    fn compile_src(src: &str) -> ExeExpr<'_> {
        let mut ast = Ast::new();
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src).unwrap();
        compile(&ast, root, src)
    }

    #[test]
    fn literal_push_has_matching_argsize() {
        let exe = compile_src("1.5");
        let bytes = exe.code.as_bytes();
        assert_eq!(bytes[0], OpKind::Push as u8);
        assert_eq!(bytes[2], Type::Float.size() as u8);
    }

    #[test]
    fn binary_expression_emits_children_then_operator() {
        let exe = compile_src("1 + 2");
        let bytes = exe.code.as_bytes();
        // push(int), push(int), add(int) -> three 4-byte headers, two with 4-byte immediates.
        assert_eq!(bytes.len(), 4 + 4 + 4 + 4); // header+imm, header+imm, header(no imm)
        assert_eq!(bytes[0], OpKind::Push as u8);
        assert_eq!(bytes[8], OpKind::Push as u8);
        assert_eq!(bytes[16], OpKind::Add as u8);
    }

    #[test]
    fn func_call_emits_args_then_func_opcode_with_index() {
        let exe = compile_src("sin(0.0)");
        let bytes = exe.code.as_bytes();
        // push(float immediate) then func header + 4-byte index.
        assert_eq!(bytes[8], OpKind::Func as u8);
        let (_, entry) = builtins::find_func("sin").unwrap();
        assert_eq!(entry.result, Type::Float);
    }

    #[test]
    fn program_records_result_type_and_qualifier() {
        let exe = compile_src("1.0 + time()");
        assert_eq!(exe.result_type, Type::Float);
        assert_eq!(exe.qualifier, Qualifier::None);
    }

    #[test]
    fn const_program_is_marked_const() {
        let exe = compile_src("1 + 2");
        assert!(exe.is_const());
    }
}
