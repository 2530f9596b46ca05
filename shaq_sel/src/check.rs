//! Type-and-name checker (spec §4.3): one post-order walk assigning `(Type, Qualifier)` to every
//! node, resolving identifiers against the built-in registry.

use thiserror::Error;

use crate::ast::{slice, Ast, ExprKind, NodeId, Qualifier};
use crate::builtins;
use crate::types::Type;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),
    #[error("unknown function {0:?}")]
    UnknownFunction(String),
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArgCount { name: String, expected: usize, got: usize },
    #[error("{name} argument {index} expects {expected}, got {got}")]
    ArgType { name: String, index: usize, expected: Type, got: Type },
    #[error("{op} requires matching operand types, got {lhs} and {rhs}")]
    OperandMismatch { op: &'static str, lhs: Type, rhs: Type },
    #[error("{op} is not supported on type {ty}")]
    UnsupportedOperand { op: &'static str, ty: Type },
    #[error("unary negation requires int or float, got {0}")]
    BadNegateOperand(Type),
}

/// Checks the tree rooted at `root`, writing `(Type, Qualifier)` into every visited node.
pub fn check(ast: &mut Ast, root: NodeId, src: &str) -> Result<(Type, Qualifier), CheckError> {
    check_node(ast, root, src)
}

fn check_node(ast: &mut Ast, id: NodeId, src: &str) -> Result<(Type, Qualifier), CheckError> {
    let kind = ast.get(id).kind;
    let (ty, qualifier) = match kind {
        ExprKind::Literal => {
            let node = ast.get(id);
            (node.ty, node.qualifier)
        }
        ExprKind::Const => {
            let name_range = ast.get(id).name.expect("Const node always carries a name");
            let name = slice(src, name_range);
            match builtins::find_const(name) {
                Some(entry) => (entry.ty, Qualifier::Const),
                None => return Err(CheckError::UnknownIdentifier(name.to_owned())),
            }
        }
        ExprKind::Paren => {
            let inner = ast.get(id).lhs;
            check_node(ast, inner, src)?
        }
        ExprKind::Neg => {
            let operand = ast.get(id).lhs;
            let (ty, qualifier) = check_node(ast, operand, src)?;
            if ty != Type::Int && ty != Type::Float {
                return Err(CheckError::BadNegateOperand(ty));
            }
            (ty, qualifier)
        }
        ExprKind::Add | ExprKind::Sub | ExprKind::Mul | ExprKind::Div => {
            let op = op_name(kind);
            let (lhs_id, rhs_id) = (ast.get(id).lhs, ast.get(id).rhs);
            let (lhs_ty, lhs_q) = check_node(ast, lhs_id, src)?;
            let (rhs_ty, rhs_q) = check_node(ast, rhs_id, src)?;
            if lhs_ty != rhs_ty {
                return Err(CheckError::OperandMismatch { op, lhs: lhs_ty, rhs: rhs_ty });
            }
            if !lhs_ty.supports_arithmetic() {
                return Err(CheckError::UnsupportedOperand { op, ty: lhs_ty });
            }
            (lhs_ty, Qualifier::meet(lhs_q, rhs_q))
        }
        ExprKind::Rem => {
            let (lhs_id, rhs_id) = (ast.get(id).lhs, ast.get(id).rhs);
            let (lhs_ty, lhs_q) = check_node(ast, lhs_id, src)?;
            let (rhs_ty, rhs_q) = check_node(ast, rhs_id, src)?;
            if lhs_ty != rhs_ty {
                return Err(CheckError::OperandMismatch { op: "%", lhs: lhs_ty, rhs: rhs_ty });
            }
            if !lhs_ty.supports_remainder() {
                return Err(CheckError::UnsupportedOperand { op: "%", ty: lhs_ty });
            }
            (lhs_ty, Qualifier::meet(lhs_q, rhs_q))
        }
        ExprKind::Func => {
            let name_range = ast.get(id).name.expect("Func node always carries a name");
            let name = slice(src, name_range).to_owned();
            let Some((_, entry)) = builtins::find_func(&name) else {
                return Err(CheckError::UnknownFunction(name));
            };
            let arg_ids = ast.arg_list_items(ast.get(id).rhs);
            if arg_ids.len() != entry.args.len() {
                return Err(CheckError::ArgCount {
                    name,
                    expected: entry.args.len(),
                    got: arg_ids.len(),
                });
            }
            let mut all_const = true;
            for (index, (&arg_id, &expected)) in arg_ids.iter().zip(entry.args).enumerate() {
                let (arg_ty, arg_q) = check_node(ast, arg_id, src)?;
                if arg_ty != expected {
                    return Err(CheckError::ArgType { name, index, expected, got: arg_ty });
                }
                all_const &= arg_q == Qualifier::Const;
            }
            let qualifier = if entry.pure_ && all_const { Qualifier::Const } else { Qualifier::None };
            (entry.result, qualifier)
        }
        ExprKind::ArgList => unreachable!("ArgList is walked by its owning Func node"),
    };
    let node = ast.get_mut(id);
    node.ty = ty;
    node.qualifier = qualifier;
    Ok((ty, qualifier))
}

fn op_name(kind: ExprKind) -> &'static str {
    match kind {
        ExprKind::Add => "+",
        ExprKind::Sub => "-",
        ExprKind::Mul => "*",
        ExprKind::Div => "/",
        ExprKind::Rem => "%",
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn check_src(src: &str) -> Result<(Type, Qualifier), CheckError> {
        let mut ast = Ast::new();
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src)
    }

    #[test]
    fn scalar_arithmetic_is_const() {
        let (ty, q) = check_src("1 + 2 * 3").unwrap();
        assert_eq!(ty, Type::Int);
        assert_eq!(q, Qualifier::Const);
    }

    #[test]
    fn integer_remainder_type_checks() {
        let (ty, q) = check_src("7 % 2").unwrap();
        assert_eq!(ty, Type::Int);
        assert_eq!(q, Qualifier::Const);
    }

    #[test]
    fn remainder_on_float_is_rejected() {
        assert!(matches!(check_src("1.0 % 2.0"), Err(CheckError::UnsupportedOperand { op: "%", .. })));
    }

    #[test]
    fn mismatched_operand_types_rejected() {
        assert!(matches!(
            check_src("1 + 1.0"),
            Err(CheckError::OperandMismatch { op: "+", .. })
        ));
    }

    #[test]
    fn pure_function_of_const_args_folds_to_const() {
        let (ty, q) = check_src("sin(radians(90.0))").unwrap();
        assert_eq!(ty, Type::Float);
        assert_eq!(q, Qualifier::Const);
    }

    #[test]
    fn impure_call_breaks_constness_transitively() {
        let (ty, q) = check_src("1.0 + time()").unwrap();
        assert_eq!(ty, Type::Float);
        assert_eq!(q, Qualifier::None);
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        assert_eq!(check_src("not_a_thing"), Err(CheckError::UnknownIdentifier("not_a_thing".to_owned())));
    }

    #[test]
    fn unknown_function_is_an_error() {
        assert!(matches!(check_src("not_a_fn(1.0)"), Err(CheckError::UnknownFunction(_))));
    }

    #[test]
    fn wrong_arg_count_is_an_error() {
        assert!(matches!(check_src("sin(1.0, 2.0)"), Err(CheckError::ArgCount { .. })));
    }

    #[test]
    fn named_constant_resolves() {
        let (ty, q) = check_src("PI").unwrap();
        assert_eq!(ty, Type::Float);
        assert_eq!(q, Qualifier::Const);
    }

    #[test]
    fn rgba_constructor_type_checks() {
        let (ty, q) = check_src("rgba(0xFF8000FF)").unwrap();
        assert_eq!(ty, Type::Vec4);
        assert_eq!(q, Qualifier::Const);
    }
}
