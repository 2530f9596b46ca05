//! SEL: the Shader Expression Language. Lexer, parser, type/name checker, bytecode compiler, and
//! stack VM for the small typed expression language that drives Shaq's per-frame uniform values
//! (spec §1–§4).
//!
//! This crate is deliberately decoupled from rendering and windowing: every native built-in that
//! needs host state takes a `&mut dyn `[`host::HostContext`]` rather than reaching for process
//! globals, so `shaq_host`/`shaq_render` can implement that trait however they like.

pub mod ast;
pub mod builtins;
pub mod check;
pub mod codegen;
pub mod host;
pub mod lexer;
pub mod opcode;
pub mod parser;
pub mod token;
pub mod types;
pub mod vm;

#[cfg(test)]
mod test_host;

use thiserror::Error;

use ast::{Ast, NodeId, Qualifier};
use codegen::ExeExpr;
use types::Type;

/// The union of every stage's failure mode, for callers (`shaq_project`'s uniform/attribute
/// compilation) that just want to log-and-skip on any compile error (spec §4.9, §7).
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    #[error(transparent)]
    Check(#[from] check::CheckError),
}

/// Runs the lex → parse → check pipeline over one expression, returning the root node id. The
/// tree itself is left in `ast`; call [`codegen::compile`] next to get an [`ExeExpr`].
pub fn parse_and_check<'src>(
    ast: &mut Ast,
    src: &'src str,
) -> Result<(NodeId, Type, Qualifier), CompileError> {
    let root = parser::parse(ast, src)?;
    let (ty, qualifier) = check::check(ast, root, src)?;
    Ok((root, ty, qualifier))
}

/// Convenience wrapper: lex, parse, check, and compile one expression end to end.
pub fn compile_expr<'src>(src: &'src str) -> Result<ExeExpr<'src>, CompileError> {
    let mut ast = Ast::new();
    let (root, _, _) = parse_and_check(&mut ast, src)?;
    Ok(codegen::compile(&ast, root, src))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_expr_round_trips_scalar_arithmetic() {
        let mut exe = compile_expr("1.0 + 2.0 * 3.0").unwrap();
        let mut host = test_host::FakeHost::default();
        let mut machine = vm::Vm::new();
        let v = machine.eval(&mut exe, &mut host, false).unwrap();
        assert_eq!(unsafe { v.f }, 7.0);
    }

    #[test]
    fn compile_expr_surfaces_parse_errors() {
        assert!(matches!(compile_expr("()"), Err(CompileError::Parse(_))));
    }

    #[test]
    fn compile_expr_surfaces_check_errors() {
        assert!(matches!(compile_expr("1 + 1.0"), Err(CompileError::Check(_))));
    }
}
