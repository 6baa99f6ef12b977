//! Expression parsing using precedence climbing.

use super::{ParseResult, Parser};
use crate::ast::{
    ArrayExpr, AssignExpr, BinaryExpr, BinaryOp, CallExpr, Expr, GetExpr, Literal, MapExpr,
    SetExpr, UnaryExpr, UnaryOp,
};
use crate::token::TokenKind;

// ═══════════════════════════════════════════════════════════════════════════
// Precedence Levels
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
enum Precedence {
    Lowest = 0,
    Compare, // == != < <= > >=
    Sum,     // + -
    Product, // * /
}

impl Precedence {
    fn from_token(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => Precedence::Compare,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Star | TokenKind::Slash => Precedence::Product,
            _ => Precedence::Lowest,
        }
    }
}

fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        _ => return None,
    })
}

impl<'a> Parser<'a> {
    // ═══════════════════════════════════════════════════════════════════════
    // Expression Entry Point
    // ═══════════════════════════════════════════════════════════════════════

    /// Assignment is the lowest level and associates to the right.
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr> {
        let target = self.parse_expr_prec(Precedence::Lowest)?;
        if !self.eat(&TokenKind::Assign) {
            return Ok(target);
        }
        let value = self.parse_expr()?;
        let span = target.span().to(&value.span());
        Ok(match target {
            Expr::Get(get) => {
                let GetExpr { object, name, .. } = *get;
                Expr::Set(Box::new(SetExpr {
                    object,
                    name,
                    value,
                    span,
                }))
            }
            target => Expr::Assign(Box::new(AssignExpr {
                target,
                value,
                span,
            })),
        })
    }

    fn parse_expr_prec(&mut self, min_prec: Precedence) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let prec = Precedence::from_token(&self.current.kind);
            if prec <= min_prec {
                break;
            }
            let Some(op) = binary_op(&self.current.kind) else {
                break;
            };
            self.next_token();
            let right = self.parse_expr_prec(prec)?;
            let span = left.span().to(&right.span());
            left = Expr::Binary(Box::new(BinaryExpr {
                op,
                left,
                right,
                span,
            }));
        }

        Ok(left)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Prefix / Postfix
    // ═══════════════════════════════════════════════════════════════════════

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = match self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.current.span;
        self.next_token();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary(Box::new(UnaryExpr {
            op,
            span: start.to(&operand.span()),
            operand,
        })))
    }

    /// Calls and property accesses.
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.cur_is(&TokenKind::LParen) {
                self.next_token();
                let args = self.parse_expr_list(&TokenKind::RParen)?;
                let span = expr.span().to(&self.prev_span);
                expr = Expr::Call(Box::new(CallExpr {
                    callee: expr,
                    args,
                    span,
                }));
            } else if self.cur_is(&TokenKind::Dot) {
                self.next_token();
                let name = self.parse_ident()?;
                let span = expr.span().to(&name.span);
                expr = Expr::Get(Box::new(GetExpr {
                    object: expr,
                    name,
                    span,
                }));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_expr_list(&mut self, close: &TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        if !self.cur_is(close) {
            loop {
                items.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ═══════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let span = self.current.span;
        let expr = match &self.current.kind {
            TokenKind::Ident(_) => return self.parse_ident().map(Expr::Variable),
            TokenKind::Number(n) => Expr::Literal(Literal::Number(*n, span)),
            TokenKind::String(s) => Expr::Literal(Literal::String(s.clone(), span)),
            TokenKind::True => Expr::Literal(Literal::Bool(true, span)),
            TokenKind::False => Expr::Literal(Literal::Bool(false, span)),
            TokenKind::Null => Expr::Literal(Literal::Null(span)),
            TokenKind::This => Expr::This(span),
            TokenKind::LParen => {
                self.next_token();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.next_token();
                let elems = self.parse_expr_list(&TokenKind::RBracket)?;
                return Ok(Expr::Array(ArrayExpr {
                    elems,
                    span: span.to(&self.prev_span),
                }));
            }
            TokenKind::LBrace => return self.parse_map_literal(),
            _ => return Err(self.unexpected("expression")),
        };
        self.next_token();
        Ok(expr)
    }

    /// `{k: v, ...}`; a bare identifier key stands for its name as a string.
    fn parse_map_literal(&mut self) -> ParseResult<Expr> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();
        if !self.cur_is(&TokenKind::RBrace) {
            loop {
                let key = match &self.current.kind {
                    TokenKind::Ident(name) if self.peek_is(&TokenKind::Colon) => {
                        let key = Expr::Literal(Literal::String(name.clone(), self.current.span));
                        self.next_token();
                        key
                    }
                    _ => self.parse_expr()?,
                };
                self.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                entries.push((key, value));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RBrace)?;
        Ok(Expr::Map(MapExpr {
            entries,
            span: start.to(&end),
        }))
    }
}
