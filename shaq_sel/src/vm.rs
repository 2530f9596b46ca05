//! Stack virtual machine (spec §4.5): interprets a compiled [`crate::codegen::ExeExpr`] against a
//! fixed byte stack, memoising `Const`-qualified programs after their first evaluation.
//!
//! DESIGN NOTES §9 asks for a plain struct with an explicit `&mut` borrow rather than the
//! original's process-global static stack; the "process-wide" contract in spec §4.5 is satisfied
//! by the main loop owning exactly one live [`Vm`], not by a `static`.

use thiserror::Error;

use crate::ast::Qualifier;
use crate::builtins::{self, ArgReader};
use crate::codegen::ExeExpr;
use crate::host::HostContext;
use crate::opcode::OpKind;
use crate::types::{SelValue, Type};

/// The VM's byte stack is fixed at 16 KiB, matching spec §4.5.
pub const STACK_SIZE: usize = 16 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("VM stack overflow: program needs more than {STACK_SIZE} bytes")]
    StackOverflow,
    #[error("stack imbalance: expected sp == {expected}, got {got}")]
    StackImbalance { expected: usize, got: usize },
    #[error("integer division by zero")]
    DivisionByZero,
}

/// A single-threaded interpreter over a fixed byte stack. One instance is owned by the main loop
/// and threaded through every `sel_eval` call for the duration of the session.
pub struct Vm {
    stack: Box<[u8; STACK_SIZE]>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        Self { stack: Box::new([0; STACK_SIZE]) }
    }

    /// Evaluates `exe` against `host`, threading host state into every native built-in call
    /// (REDESIGN FLAGS, spec §4.5). A cached `Const` program short-circuits unless `force` is set
    /// (used by the attribute evaluator during project parse and the scheduler's texture probe).
    pub fn eval(
        &mut self,
        exe: &mut ExeExpr<'_>,
        host: &mut dyn HostContext,
        force: bool,
    ) -> Result<SelValue, RuntimeError> {
        if !force && exe.qualifier == Qualifier::Const {
            if let Some(cached) = exe.cached {
                return Ok(cached);
            }
        }

        let code = exe.code.as_bytes();
        let mut pc = 0usize;
        let mut sp = 0usize;

        while pc < code.len() {
            let kind = OpKind::from_u8(code[pc]);
            let ty = Type::from_u8(code[pc + 1]);
            let argsize = code[pc + 2] as usize;
            pc += 4;

            match kind {
                OpKind::Push => {
                    self.push_bytes(&mut sp, &code[pc..pc + argsize])?;
                    pc += argsize;
                }
                OpKind::Neg => {
                    let size = ty.size();
                    let operand = self.pop_bytes(&mut sp, size).to_vec();
                    let value = unsafe { SelValue::from_bytes(ty, &operand) };
                    let result = neg(ty, value);
                    let mut out = Vec::with_capacity(size);
                    unsafe { result.write_bytes(ty, &mut out) };
                    self.push_bytes(&mut sp, &out)?;
                }
                OpKind::Add | OpKind::Sub | OpKind::Mul | OpKind::Div | OpKind::Rem => {
                    let size = ty.size();
                    let rhs_bytes = self.pop_bytes(&mut sp, size).to_vec();
                    let lhs_bytes = self.pop_bytes(&mut sp, size).to_vec();
                    let lhs = unsafe { SelValue::from_bytes(ty, &lhs_bytes) };
                    let rhs = unsafe { SelValue::from_bytes(ty, &rhs_bytes) };
                    let result = arith(kind, ty, lhs, rhs)?;
                    let mut out = Vec::with_capacity(size);
                    unsafe { result.write_bytes(ty, &mut out) };
                    self.push_bytes(&mut sp, &out)?;
                }
                OpKind::Func => {
                    let index = u32::from_ne_bytes(code[pc..pc + 4].try_into().unwrap());
                    pc += 4;
                    let entry = builtins::func_by_index(index);
                    let arg_bytes: usize = entry.args.iter().map(|t| t.size()).sum();
                    // Arguments are consumed by lowering `sp`; their bytes stay readable for the
                    // native call (spec §4.5's "does not actually shrink the stack" wording).
                    sp -= arg_bytes;
                    let mut reader = ArgReader::new(&self.stack[sp..sp + arg_bytes]);
                    let result = (entry.call)(host, &mut reader);
                    let mut out = Vec::with_capacity(entry.result.size());
                    unsafe { result.write_bytes(entry.result, &mut out) };
                    self.push_bytes(&mut sp, &out)?;
                }
            }
        }

        let expected = exe.result_type.size();
        if sp != expected {
            return Err(RuntimeError::StackImbalance { expected, got: sp });
        }
        let result = unsafe { SelValue::from_bytes(exe.result_type, &self.stack[sp - expected..sp]) };
        if exe.qualifier == Qualifier::Const {
            exe.cached = Some(result);
        }
        Ok(result)
    }

    fn push_bytes(&mut self, sp: &mut usize, bytes: &[u8]) -> Result<(), RuntimeError> {
        if *sp + bytes.len() > STACK_SIZE {
            return Err(RuntimeError::StackOverflow);
        }
        self.stack[*sp..*sp + bytes.len()].copy_from_slice(bytes);
        *sp += bytes.len();
        Ok(())
    }

    fn pop_bytes(&mut self, sp: &mut usize, size: usize) -> &[u8] {
        *sp -= size;
        &self.stack[*sp..*sp + size]
    }
}

fn neg(ty: Type, v: SelValue) -> SelValue {
    unsafe {
        match ty {
            Type::Int => SelValue { i: v.i.wrapping_neg() },
            Type::Float => SelValue { f: -v.f },
            _ => unreachable!("checker only allows Neg on int/float"),
        }
    }
}

fn arith(kind: OpKind, ty: Type, lhs: SelValue, rhs: SelValue) -> Result<SelValue, RuntimeError> {
    unsafe {
        Ok(match (kind, ty) {
            (OpKind::Add, Type::Int) => SelValue { i: lhs.i.wrapping_add(rhs.i) },
            (OpKind::Sub, Type::Int) => SelValue { i: lhs.i.wrapping_sub(rhs.i) },
            (OpKind::Mul, Type::Int) => SelValue { i: lhs.i.wrapping_mul(rhs.i) },
            (OpKind::Div, Type::Int) => {
                if rhs.i == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                SelValue { i: lhs.i.wrapping_div(rhs.i) }
            }
            (OpKind::Rem, Type::Int) => {
                if rhs.i == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                SelValue { i: lhs.i.wrapping_rem(rhs.i) }
            }

            (OpKind::Add, Type::Uint) => SelValue { u: lhs.u.wrapping_add(rhs.u) },
            (OpKind::Sub, Type::Uint) => SelValue { u: lhs.u.wrapping_sub(rhs.u) },
            (OpKind::Mul, Type::Uint) => SelValue { u: lhs.u.wrapping_mul(rhs.u) },
            (OpKind::Div, Type::Uint) => {
                if rhs.u == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                SelValue { u: lhs.u.wrapping_div(rhs.u) }
            }
            (OpKind::Rem, Type::Uint) => {
                if rhs.u == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                SelValue { u: lhs.u.wrapping_rem(rhs.u) }
            }

            (OpKind::Add, Type::Float) => SelValue { f: lhs.f + rhs.f },
            (OpKind::Sub, Type::Float) => SelValue { f: lhs.f - rhs.f },
            (OpKind::Mul, Type::Float) => SelValue { f: lhs.f * rhs.f },
            // Division by zero is not trapped for floats: propagates Inf/NaN per IEEE-754.
            (OpKind::Div, Type::Float) => SelValue { f: lhs.f / rhs.f },

            (OpKind::Add, Type::Vec2) => SelValue { vec2: lhs.vec2 + rhs.vec2 },
            (OpKind::Sub, Type::Vec2) => SelValue { vec2: lhs.vec2 - rhs.vec2 },
            (OpKind::Mul, Type::Vec2) => SelValue { vec2: lhs.vec2 * rhs.vec2 },
            (OpKind::Div, Type::Vec2) => SelValue { vec2: lhs.vec2 / rhs.vec2 },

            (OpKind::Add, Type::Vec3) => SelValue { vec3: lhs.vec3 + rhs.vec3 },
            (OpKind::Sub, Type::Vec3) => SelValue { vec3: lhs.vec3 - rhs.vec3 },
            (OpKind::Mul, Type::Vec3) => SelValue { vec3: lhs.vec3 * rhs.vec3 },
            (OpKind::Div, Type::Vec3) => SelValue { vec3: lhs.vec3 / rhs.vec3 },

            (OpKind::Add, Type::Vec4) => SelValue { vec4: lhs.vec4 + rhs.vec4 },
            (OpKind::Sub, Type::Vec4) => SelValue { vec4: lhs.vec4 - rhs.vec4 },
            (OpKind::Mul, Type::Vec4) => SelValue { vec4: lhs.vec4 * rhs.vec4 },
            (OpKind::Div, Type::Vec4) => SelValue { vec4: lhs.vec4 / rhs.vec4 },

            _ => unreachable!("checker only allows arithmetic on scalar/vector types"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Ast;
    use crate::check::check;
    use crate::codegen::compile;
    use crate::parser::parse;
    use crate::test_host::FakeHost;

    fn eval_src(vm: &mut Vm, host: &mut FakeHost, src: &str) -> SelValue {
        let mut ast = Ast::new();
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src).unwrap();
        let mut exe = compile(&ast, root, src);
        vm.eval(&mut exe, host, false).unwrap()
    }

    #[test]
    fn scalar_arithmetic_evaluates() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let v = eval_src(&mut vm, &mut host, "1.0 + 2.0 * 3.0");
        assert_eq!(unsafe { v.f }, 7.0);
    }

    #[test]
    fn precedence_and_unary_minus() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let v = eval_src(&mut vm, &mut host, "-3 + 2 * 4");
        assert_eq!(unsafe { v.i }, 5);
    }

    #[test]
    fn integer_remainder() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let v = eval_src(&mut vm, &mut host, "5 % 2");
        assert_eq!(unsafe { v.i }, 1);
    }

    #[test]
    fn pure_function_folding_within_one_ulp() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let v = eval_src(&mut vm, &mut host, "sin(radians(30.0))");
        let f = unsafe { v.f };
        assert!((f - 0.5).abs() < 1e-6, "{f}");
    }

    #[test]
    fn const_program_memoises_bit_identical_results() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let mut ast = Ast::new();
        let root = parse(&mut ast, "1.0 + 2.0").unwrap();
        check(&mut ast, root, "1.0 + 2.0").unwrap();
        let mut exe = compile(&ast, root, "1.0 + 2.0");
        let a = vm.eval(&mut exe, &mut host, false).unwrap();
        let b = vm.eval(&mut exe, &mut host, false).unwrap();
        assert_eq!(unsafe { a.f.to_bits() }, unsafe { b.f.to_bits() });
    }

    #[test]
    fn non_const_program_observes_host_state_changes() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let mut ast = Ast::new();
        let src = "time() + 1.0";
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src).unwrap();
        let mut exe = compile(&ast, root, src);
        let a = vm.eval(&mut exe, &mut host, false).unwrap();
        host.clock += 1.0;
        let b = vm.eval(&mut exe, &mut host, false).unwrap();
        assert_ne!(unsafe { a.f }, unsafe { b.f });
    }

    #[test]
    fn stack_balances_after_eval() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let mut ast = Ast::new();
        let src = "vec3(1.0, 2.0, 3.0)";
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src).unwrap();
        let mut exe = compile(&ast, root, src);
        let v = vm.eval(&mut exe, &mut host, false).unwrap();
        assert_eq!(unsafe { v.vec3 }, glam::Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn integer_division_by_zero_is_a_runtime_error() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let mut ast = Ast::new();
        let src = "1 / 0";
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src).unwrap();
        let mut exe = compile(&ast, root, src);
        assert_eq!(vm.eval(&mut exe, &mut host, false), Err(RuntimeError::DivisionByZero));
    }

    #[test]
    fn float_division_by_zero_propagates_infinity() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let v = eval_src(&mut vm, &mut host, "1.0 / 0.0");
        assert!(unsafe { v.f }.is_infinite());
    }

    #[test]
    fn rgba_constructor_unpacks_hex() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let v = eval_src(&mut vm, &mut host, "rgba(0xFF8000FF)");
        let c = unsafe { v.vec4 };
        assert!((c.x - 1.0).abs() < 1e-6);
        assert!((c.y - 0.5019).abs() < 1.0 / 255.0);
        assert!((c.z - 0.0).abs() < 1e-6);
        assert!((c.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn force_recompute_bypasses_cache() {
        let mut vm = Vm::new();
        let mut host = FakeHost::default();
        let mut ast = Ast::new();
        let src = "1 + 1";
        let root = parse(&mut ast, src).unwrap();
        check(&mut ast, root, src).unwrap();
        let mut exe = compile(&ast, root, src);
        vm.eval(&mut exe, &mut host, false).unwrap();
        // Forcing recompute must not panic even though the value is already cached.
        let v = vm.eval(&mut exe, &mut host, true).unwrap();
        assert_eq!(unsafe { v.i }, 2);
    }
}
