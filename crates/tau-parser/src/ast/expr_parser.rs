//! Expression parsing using Pratt parsing (precedence climbing).

use bumpalo::collections::Vec as BVec;
use tau_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::expr::*;
use crate::ast::{BinaryOp, ExprInfo, Ident, UnaryOp};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse an expression with a minimum binding power.
    ///
    /// Only operators whose left binding power is at least `min_bp` are
    /// consumed; callers pass 0 for a full expression.
    pub fn parse_expr(&mut self, min_bp: u8) -> Result<Expr<'ast>, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(op) = BinaryOp::from_token(self.peek().kind) {
            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }

            self.advance();
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(self.arena.alloc(BinaryExpr {
                op,
                left: lhs,
                right: rhs,
                span,
                info: ExprInfo::default(),
            }));
        }

        Ok(lhs)
    }

    /// Parse a prefix operator application or a primary expression.
    fn parse_prefix(&mut self) -> Result<Expr<'ast>, ParseError> {
        if let Some(op) = UnaryOp::from_token(self.peek().kind) {
            let op_span = self.advance().span;
            let operand = self.parse_expr(UnaryOp::BINDING_POWER)?;
            return Ok(Expr::Unary(self.arena.alloc(UnaryExpr {
                op,
                operand,
                span: op_span.merge(operand.span()),
                info: ExprInfo::default(),
            })));
        }
        self.parse_primary()
    }

    /// Grammar: `INT | 'true' | 'false' | ID [ '(' args ')' | '[' expr ']' ] | '(' expr ')'`
    fn parse_primary(&mut self) -> Result<Expr<'ast>, ParseError> {
        let token = self.peek();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                let value = token.lexeme.parse::<i64>().map_err(|e| {
                    ParseError::new(ParseErrorKind::InvalidToken, token.span, e.to_string())
                })?;
                Ok(Expr::IntLiteral(self.arena.alloc(IntLiteral {
                    value,
                    span: token.span,
                    info: ExprInfo::default(),
                })))
            }

            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expr::BoolLiteral(self.arena.alloc(BoolLiteral {
                    value: token.kind == TokenKind::True,
                    span: token.span,
                    info: ExprInfo::default(),
                })))
            }

            TokenKind::Identifier => {
                let ident = self.parse_ident()?;
                if self.check(TokenKind::LeftParen) {
                    Ok(Expr::Call(self.parse_call_rest(ident)?))
                } else if self.eat(TokenKind::LeftBracket).is_some() {
                    let index = self.parse_expr(0)?;
                    let end_span = self.expect(TokenKind::RightBracket)?.span;
                    let span = ident.span.merge(end_span);
                    Ok(Expr::ArrayCell(self.arena.alloc(ArrayCellExpr {
                        array: ident,
                        index,
                        span,
                        info: ExprInfo::default(),
                    })))
                } else {
                    Ok(Expr::Id(self.arena.alloc(IdExpr {
                        ident,
                        info: ExprInfo::default(),
                    })))
                }
            }

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(TokenKind::RightParen)?;
                Ok(inner)
            }

            _ => Err(self.error_here(ParseErrorKind::ExpectedExpression, "expression")),
        }
    }

    /// Parse the argument list of a call whose callee was already consumed.
    ///
    /// Grammar: `'(' [ expr { ',' expr } ] ')'`
    pub(super) fn parse_call_rest(
        &mut self,
        callee: Ident<'ast>,
    ) -> Result<&'ast CallExpr<'ast>, ParseError> {
        self.expect(TokenKind::LeftParen)?;
        let mut args = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            args.push(self.parse_expr(0)?);
            while self.eat(TokenKind::Comma).is_some() {
                args.push(self.parse_expr(0)?);
            }
        }
        let end_span = self.expect(TokenKind::RightParen)?.span;
        let span = callee.span.merge(end_span);

        Ok(self.arena.alloc(CallExpr {
            callee,
            args: args.into_bump_slice(),
            span,
            info: ExprInfo::default(),
        }))
    }
}
