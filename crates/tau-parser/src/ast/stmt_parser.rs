//! Statement parsing functions for Tau.

use bumpalo::collections::Vec as BVec;
use tau_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::stmt::*;
use crate::ast::{ArrayCellExpr, Expr, ExprInfo, IdExpr};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a block.
    ///
    /// Grammar: `'{' { var_decl | statement } [ return ] '}'`
    ///
    /// Declarations may appear anywhere in the block but are gathered into
    /// the block's declaration list. A `return` must be the block's last item.
    pub fn parse_compound(&mut self) -> Result<&'ast CompoundStmt<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::LeftBrace)?.span;
        let mut decls = BVec::new_in(self.arena);
        let mut stmts = BVec::new_in(self.arena);

        loop {
            match self.peek().kind {
                TokenKind::RightBrace => break,
                TokenKind::Var => decls.push(self.parse_var_decl()?),
                TokenKind::Return => {
                    stmts.push(self.parse_return()?);
                    break;
                }
                _ => stmts.push(self.parse_statement()?),
            }
        }

        let end_span = self.expect(TokenKind::RightBrace)?.span;
        Ok(self.arena.alloc(CompoundStmt::new(
            decls.into_bump_slice(),
            stmts.into_bump_slice(),
            start_span.merge(end_span),
        )))
    }

    /// Parse a statement.
    ///
    /// Grammar: `if | while | print | call | assignment | compound`
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        match self.peek().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Call => self.parse_call_stmt(),
            TokenKind::Identifier => self.parse_assign(),
            TokenKind::LeftBrace => Ok(Stmt::Compound(self.parse_compound()?)),
            _ => Err(self.error_here(ParseErrorKind::ExpectedStatement, "statement")),
        }
    }

    /// Grammar: `'if' expr compound [ 'else' compound ]`
    fn parse_if(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::If)?.span;
        let condition = self.parse_expr(0)?;
        let then_branch = self.parse_compound()?;
        let else_branch = if self.eat(TokenKind::Else).is_some() {
            Some(self.parse_compound()?)
        } else {
            None
        };
        let end_span = else_branch.map_or(then_branch.span, |b| b.span);

        Ok(Stmt::If(self.arena.alloc(IfStmt {
            condition,
            then_branch,
            else_branch,
            span: start_span.merge(end_span),
        })))
    }

    /// Grammar: `'while' expr compound`
    fn parse_while(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::While)?.span;
        let condition = self.parse_expr(0)?;
        let body = self.parse_compound()?;

        Ok(Stmt::While(self.arena.alloc(WhileStmt {
            condition,
            body,
            span: start_span.merge(body.span),
        })))
    }

    /// Grammar: `'print' expr`
    fn parse_print(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::Print)?.span;
        let value = self.parse_expr(0)?;

        Ok(Stmt::Print(self.arena.alloc(PrintStmt {
            value,
            span: start_span.merge(value.span()),
        })))
    }

    /// Grammar: `'call' ID '(' args ')'`
    fn parse_call_stmt(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::Call)?.span;
        let callee = self.parse_ident()?;
        let call = self.parse_call_rest(callee)?;

        Ok(Stmt::Call(self.arena.alloc(CallStmt {
            call,
            span: start_span.merge(call.span),
        })))
    }

    /// Grammar: `'return' [ expr ]`
    ///
    /// A bare `return` is recognised by the closing brace that must follow it.
    fn parse_return(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::Return)?.span;
        let value = if self.check(TokenKind::RightBrace) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        let span = value.map_or(start_span, |v| start_span.merge(v.span()));

        Ok(Stmt::Return(self.arena.alloc(ReturnStmt::new(value, span))))
    }

    /// Grammar: `ID [ '[' expr ']' ] '=' expr`
    fn parse_assign(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let ident = self.parse_ident()?;
        let target = if self.eat(TokenKind::LeftBracket).is_some() {
            let index = self.parse_expr(0)?;
            let end_span = self.expect(TokenKind::RightBracket)?.span;
            let span = ident.span.merge(end_span);
            Expr::ArrayCell(self.arena.alloc(ArrayCellExpr {
                array: ident,
                index,
                span,
                info: ExprInfo::default(),
            }))
        } else {
            Expr::Id(self.arena.alloc(IdExpr {
                ident,
                info: ExprInfo::default(),
            }))
        };

        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr(0)?;

        Ok(Stmt::Assign(self.arena.alloc(AssignStmt {
            target,
            value,
            span: target.span().merge(value.span()),
        })))
    }
}
