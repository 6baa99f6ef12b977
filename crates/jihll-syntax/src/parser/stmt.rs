//! Statement parsing.

use super::{ParseResult, Parser};
use crate::ast::{
    Block, ClassDecl, Expr, FunctionDecl, IfStmt, ImportStmt, PrintStmt, ReturnStmt, SpawnExpr,
    Stmt, TryStmt, WhileStmt,
};
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(super) fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match &self.current.kind {
            TokenKind::Class => self.parse_class_decl().map(Stmt::Class),
            TokenKind::Fun => self.parse_function_decl().map(Stmt::Function),
            TokenKind::Print => self.parse_print_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Import => self.parse_import_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::Spawn => self.parse_spawn_stmt(),
            TokenKind::For | TokenKind::In => {
                Err(self.error(&format!("'{}' is reserved", self.current.kind.name())))
            }
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    /// Statements up to (not including) any of `stops` or end of input.
    fn parse_stmts_until(&mut self, stops: &[TokenKind]) -> ParseResult<Block> {
        let start = self.current.span;
        let mut stmts = Vec::new();
        while !self.at_eof() && !stops.iter().any(|k| self.cur_is(k)) {
            stmts.push(self.parse_stmt()?);
        }
        let span = match stmts.last() {
            Some(last) => start.to(&last.span()),
            None => start,
        };
        Ok(Block { stmts, span })
    }

    /// Statements closed by a block dot, which is consumed.
    fn parse_block(&mut self) -> ParseResult<Block> {
        let mut block = self.parse_stmts_until(&[TokenKind::BlockDot])?;
        let end = self.expect(&TokenKind::BlockDot)?;
        block.span = block.span.to(&end);
        Ok(block)
    }

    pub(super) fn parse_function_decl(&mut self) -> ParseResult<FunctionDecl> {
        let start = self.expect(&TokenKind::Fun)?;
        let name = self.parse_ident()?;
        let mut params = Vec::new();
        if !self.cur_is(&TokenKind::Colon) {
            loop {
                params.push(self.parse_ident()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(FunctionDecl {
            name,
            params,
            span: start.to(&body.span),
            body,
        })
    }

    fn parse_class_decl(&mut self) -> ParseResult<ClassDecl> {
        let start = self.expect(&TokenKind::Class)?;
        let name = self.parse_ident()?;
        self.expect(&TokenKind::Colon)?;

        let mut methods = Vec::new();
        while !self.cur_is(&TokenKind::BlockDot) && !self.at_eof() {
            if !self.cur_is(&TokenKind::Fun) {
                return Err(self.unexpected("'fun' in class body"));
            }
            methods.push(self.parse_function_decl()?);
        }
        let end = self.expect(&TokenKind::BlockDot)?;
        Ok(ClassDecl {
            name,
            methods,
            span: start.to(&end),
        })
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::Print)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Print(PrintStmt {
            span: start.to(&value.span()),
            value,
        }))
    }

    /// `if cond: then [else: other] .`
    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::If)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let then_block = self.parse_stmts_until(&[TokenKind::Else, TokenKind::BlockDot])?;
        let else_block = if self.eat(&TokenKind::Else) {
            self.expect(&TokenKind::Colon)?;
            Some(self.parse_stmts_until(&[TokenKind::BlockDot])?)
        } else {
            None
        };
        let end = self.expect(&TokenKind::BlockDot)?;
        Ok(Stmt::If(Box::new(IfStmt {
            cond,
            then_block,
            else_block,
            span: start.to(&end),
        })))
    }

    fn parse_while_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::While)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(Stmt::While(Box::new(WhileStmt {
            cond,
            span: start.to(&body.span),
            body,
        })))
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::Return)?;
        let ends_here = [
            TokenKind::BlockDot,
            TokenKind::Else,
            TokenKind::Catch,
            TokenKind::Eof,
        ]
        .iter()
        .any(|k| self.cur_is(k));
        let value = if ends_here {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let span = match &value {
            Some(v) => start.to(&v.span()),
            None => start,
        };
        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    fn parse_import_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::Import)?;
        let path = self.parse_expr()?;
        Ok(Stmt::Import(ImportStmt {
            span: start.to(&path.span()),
            path,
        }))
    }

    /// `try: body catch name: handler .`; the body runs up to `catch`.
    fn parse_try_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::Try)?;
        self.expect(&TokenKind::Colon)?;
        let body = self.parse_stmts_until(&[TokenKind::Catch])?;
        self.expect(&TokenKind::Catch)?;
        let error_var = self.parse_ident()?;
        self.expect(&TokenKind::Colon)?;
        let handler = self.parse_block()?;
        Ok(Stmt::Try(Box::new(TryStmt {
            body,
            error_var,
            span: start.to(&handler.span),
            handler,
        })))
    }

    fn parse_spawn_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.expect(&TokenKind::Spawn)?;
        let call = self.parse_expr()?;
        Ok(Stmt::Expr(Expr::Spawn(Box::new(SpawnExpr {
            span: start.to(&call.span()),
            call,
        }))))
    }
}
