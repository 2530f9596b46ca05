//! Recursive-descent parser (spec §4.2).
//!
//! ```text
//! expr      := add
//! add       := mul (('+'|'-') mul)*
//! mul       := unary (('*'|'/'|'%') unary)*
//! unary     := '-' unary | atom
//! atom      := '(' add ')' | IDENT '(' arglist ')' | IDENT | literal
//! arglist   := ε | add (',' add)*
//! ```

use thiserror::Error;

use crate::ast::{Ast, ExprKind, Literal, NodeId};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::types::Type;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character(s) {0:?}")]
    UnexpectedChars(String),
    #[error("unexpected end of expression")]
    UnexpectedEof,
    #[error("expected {expected}, found {found:?}")]
    Expected { expected: &'static str, found: String },
    #[error("trailing input after expression: {0:?}")]
    TrailingInput(String),
    #[error("empty parenthesised expression")]
    EmptyParens,
    #[error("malformed integer literal {0:?}")]
    BadIntLiteral(String),
    #[error("malformed float literal {0:?}")]
    BadFloatLiteral(String),
}

/// Parses a complete SEL expression; the whole input must be consumed (EOF follows the tree).
pub fn parse(ast: &mut Ast, src: &str) -> Result<NodeId, ParseError> {
    let mut parser = Parser { ast, src, lexer: Lexer::new(src) };
    let root = parser.parse_add()?;
    let trailing = parser.lexer.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(ParseError::TrailingInput(trailing.text.to_owned()));
    }
    Ok(root)
}

struct Parser<'a, 'src> {
    ast: &'a mut Ast,
    src: &'src str,
    lexer: Lexer<'src>,
}

impl<'a, 'src> Parser<'a, 'src> {
    fn span(&self, text: &'src str) -> (u32, u32) {
        let base = self.src.as_ptr() as usize;
        let start = text.as_ptr() as usize - base;
        (start as u32, (start + text.len()) as u32)
    }

    fn bump(&mut self) -> Token<'src> {
        self.lexer.next()
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'src>, ParseError> {
        let tok = self.bump();
        if tok.kind == kind {
            Ok(tok)
        } else if tok.kind == TokenKind::Eof {
            Err(ParseError::UnexpectedEof)
        } else {
            Err(ParseError::Expected { expected, found: tok.text.to_owned() })
        }
    }

    fn parse_add(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_mul()?;
        loop {
            let kind = match self.lexer.peek().kind {
                TokenKind::Plus => ExprKind::Add,
                TokenKind::Minus => ExprKind::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_mul()?;
            lhs = self.ast.binary(kind, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_mul(&mut self) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let kind = match self.lexer.peek().kind {
                TokenKind::Star => ExprKind::Mul,
                TokenKind::Slash => ExprKind::Div,
                TokenKind::Percent => ExprKind::Rem,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = self.ast.binary(kind, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        if self.lexer.peek().kind == TokenKind::Minus {
            self.bump();
            let operand = self.parse_unary()?;
            return Ok(self.ast.unary(ExprKind::Neg, operand));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<NodeId, ParseError> {
        let tok = self.bump();
        match tok.kind {
            TokenKind::LParen => {
                if self.lexer.peek().kind == TokenKind::RParen {
                    return Err(ParseError::EmptyParens);
                }
                let inner = self.parse_add()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(self.ast.unary(ExprKind::Paren, inner))
            }
            TokenKind::Ident => {
                let name = self.span(tok.text);
                if self.lexer.peek().kind == TokenKind::LParen {
                    self.bump();
                    let args = self.parse_arg_list()?;
                    self.expect(TokenKind::RParen, "')'")?;
                    Ok(self.ast.func_call(name, args))
                } else {
                    Ok(self.ast.const_ident(name))
                }
            }
            TokenKind::Bool => {
                let value = tok.text == "true";
                Ok(self.ast.literal(Literal::Bool(value), Type::Bool))
            }
            TokenKind::Int => parse_int_literal(self.ast, tok.text, false),
            TokenKind::Uint => parse_int_literal(self.ast, tok.text, true),
            TokenKind::Float => {
                let value: f32 = tok
                    .text
                    .parse()
                    .map_err(|_| ParseError::BadFloatLiteral(tok.text.to_owned()))?;
                Ok(self.ast.literal(Literal::Float(value), Type::Float))
            }
            TokenKind::Str => {
                let range = self.span(tok.text);
                Ok(self.ast.literal(Literal::Str { start: range.0, end: range.1 }, Type::Str))
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof),
            TokenKind::Error => Err(ParseError::UnexpectedChars(tok.text.to_owned())),
            _ => Err(ParseError::Expected { expected: "an expression", found: tok.text.to_owned() }),
        }
    }

    fn parse_arg_list(&mut self) -> Result<NodeId, ParseError> {
        if self.lexer.peek().kind == TokenKind::RParen {
            return Ok(self.ast.arg_list(&[]));
        }
        let mut items = vec![self.parse_add()?];
        while self.lexer.peek().kind == TokenKind::Comma {
            self.bump();
            items.push(self.parse_add()?);
        }
        Ok(self.ast.arg_list(&items))
    }
}

fn parse_int_literal(ast: &mut Ast, text: &str, uint: bool) -> Result<NodeId, ParseError> {
    let body = if uint { &text[..text.len() - 1] } else { text };
    let (digits, radix) = if let Some(hex) = body.strip_prefix("0x") {
        (hex, 16)
    } else {
        (body, 10)
    };
    if uint {
        let value = u32::from_str_radix(digits, radix)
            .map_err(|_| ParseError::BadIntLiteral(text.to_owned()))?;
        Ok(ast.literal(Literal::Uint(value), Type::Uint))
    } else {
        let value = i64::from_str_radix(digits, radix)
            .map_err(|_| ParseError::BadIntLiteral(text.to_owned()))?;
        Ok(ast.literal(Literal::Int(value as i32), Type::Int))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_kinds(ast: &Ast, id: NodeId) -> Vec<ExprKind> {
        let mut out = Vec::new();
        fn walk(ast: &Ast, id: NodeId, out: &mut Vec<ExprKind>) {
            if id.is_nil() {
                return;
            }
            let node = ast.get(id);
            out.push(node.kind);
            walk(ast, node.lhs, out);
            walk(ast, node.rhs, out);
        }
        walk(ast, id, &mut out);
        out
    }

    #[test]
    fn precedence_multiplies_before_adds() {
        let mut ast = Ast::new();
        let root = parse(&mut ast, "1 + 2 * 3").unwrap();
        assert_eq!(ast.get(root).kind, ExprKind::Add);
        let rhs = ast.get(root).rhs;
        assert_eq!(ast.get(rhs).kind, ExprKind::Mul);
    }

    #[test]
    fn left_associative_subtraction() {
        let mut ast = Ast::new();
        // "1 - 2 - 3" must parse as "(1 - 2) - 3", not "1 - (2 - 3)".
        let root = parse(&mut ast, "1 - 2 - 3").unwrap();
        assert_eq!(ast.get(root).kind, ExprKind::Sub);
        let lhs = ast.get(root).lhs;
        assert_eq!(ast.get(lhs).kind, ExprKind::Sub);
    }

    #[test]
    fn unary_minus_binds_tighter_than_mul() {
        let mut ast = Ast::new();
        let root = parse(&mut ast, "-1 * 2").unwrap();
        assert_eq!(ast.get(root).kind, ExprKind::Mul);
        assert_eq!(ast.get(ast.get(root).lhs).kind, ExprKind::Neg);
    }

    #[test]
    fn function_call_with_args() {
        let mut ast = Ast::new();
        let root = parse(&mut ast, "clamp(1, 0, 2)").unwrap();
        assert_eq!(ast.get(root).kind, ExprKind::Func);
        let args = ast.arg_list_items(ast.get(root).rhs);
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn empty_call_is_allowed() {
        let mut ast = Ast::new();
        let root = parse(&mut ast, "time()").unwrap();
        assert!(ast.get(root).rhs.is_nil());
    }

    #[test]
    fn empty_parens_is_an_error() {
        let mut ast = Ast::new();
        assert_eq!(parse(&mut ast, "()"), Err(ParseError::EmptyParens));
    }

    #[test]
    fn trailing_tokens_are_an_error() {
        let mut ast = Ast::new();
        assert!(matches!(parse(&mut ast, "1 + 2 3"), Err(ParseError::TrailingInput(_))));
    }

    #[test]
    fn unknown_identifier_parses_fine_checker_rejects_later() {
        let mut ast = Ast::new();
        assert!(parse(&mut ast, "not_a_real_name").is_ok());
    }

    #[test]
    fn full_tree_shape_for_nested_expression() {
        let mut ast = Ast::new();
        let root = parse(&mut ast, "(1 + 2) * 3").unwrap();
        use ExprKind::*;
        assert_eq!(node_kinds(&ast, root), vec![Mul, Paren, Add, Literal, Literal, Literal]);
    }
}
