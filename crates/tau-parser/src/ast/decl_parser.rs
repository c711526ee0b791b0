//! Declaration parsing: the program, functions, parameters, `var`
//! declarations and type annotations.

use bumpalo::collections::Vec as BVec;
use tau_core::{ParseError, ParseErrorKind};

use super::parser::Parser;
use crate::ast::{FuncDecl, Ident, Param, Program, TypeExpr, TypeKind, VarDecl};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a complete program.
    ///
    /// Grammar: `function { function } EOF`
    pub fn parse_program(&mut self) -> Result<&'ast Program<'ast>, ParseError> {
        let start_span = self.peek().span;
        let mut functions = BVec::new_in(self.arena);

        loop {
            if !self.check(TokenKind::Func) {
                return Err(self.error_here(ParseErrorKind::ExpectedDeclaration, "'func'"));
            }
            functions.push(self.parse_function()?);
            if self.is_eof() {
                break;
            }
        }

        let span = start_span.merge(self.previous_span());
        Ok(self.arena.alloc(Program::new(functions.into_bump_slice(), span)))
    }

    /// Parse a function declaration.
    ///
    /// Grammar: `'func' ID '(' [ param { ',' param } ] ')' ':' type compound`
    pub fn parse_function(&mut self) -> Result<&'ast FuncDecl<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::Func)?.span;
        let name = self.parse_ident()?;

        self.expect(TokenKind::LeftParen)?;
        let mut params = BVec::new_in(self.arena);
        if !self.check(TokenKind::RightParen) {
            params.push(self.parse_param()?);
            while self.eat(TokenKind::Comma).is_some() {
                params.push(self.parse_param()?);
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Colon)?;
        let ret = self.parse_type()?;
        let body = self.parse_compound()?;

        let span = start_span.merge(body.span);
        Ok(self.arena.alloc(FuncDecl::new(
            name,
            params.into_bump_slice(),
            ret,
            body,
            span,
        )))
    }

    /// Grammar: `ID ':' type`
    fn parse_param(&mut self) -> Result<&'ast Param<'ast>, ParseError> {
        let name = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;
        let type_expr = self.parse_type()?;
        let span = name.span.merge(type_expr.span);
        Ok(self.arena.alloc(Param::new(name, type_expr, span)))
    }

    /// Grammar: `'var' ID ':' type`
    pub(super) fn parse_var_decl(&mut self) -> Result<&'ast VarDecl<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::Var)?.span;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Colon)?;
        let type_expr = self.parse_type()?;
        let span = start_span.merge(type_expr.span);
        Ok(self.arena.alloc(VarDecl::new(name, type_expr, span)))
    }

    /// Parse a type annotation.
    ///
    /// Grammar: `'int' | 'bool' | 'void' | '[' [ INT ] ']' type`
    pub fn parse_type(&mut self) -> Result<&'ast TypeExpr<'ast>, ParseError> {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Int => TypeKind::Int,
            TokenKind::Bool => TypeKind::Bool,
            TokenKind::Void => TypeKind::Void,
            TokenKind::LeftBracket => return self.parse_array_type(),
            _ => return Err(self.error_here(ParseErrorKind::ExpectedType, "type")),
        };
        self.advance();
        Ok(self.arena.alloc(TypeExpr::new(kind, token.span)))
    }

    fn parse_array_type(&mut self) -> Result<&'ast TypeExpr<'ast>, ParseError> {
        let start_span = self.expect(TokenKind::LeftBracket)?.span;
        let size = match self.eat(TokenKind::IntLiteral) {
            Some(token) => Some(token.lexeme.parse::<usize>().map_err(|e| {
                ParseError::new(
                    ParseErrorKind::ExpectedType,
                    token.span,
                    format!("invalid array size: {e}"),
                )
            })?),
            None => None,
        };
        self.expect(TokenKind::RightBracket)?;
        let element = self.parse_type()?;
        let span = start_span.merge(element.span);
        Ok(self
            .arena
            .alloc(TypeExpr::new(TypeKind::Array { element, size }, span)))
    }

    pub(super) fn parse_ident(&mut self) -> Result<Ident<'ast>, ParseError> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.error_here(ParseErrorKind::ExpectedIdentifier, "identifier"));
        }
        let token = self.advance();
        Ok(Ident::new(token.lexeme, token.span))
    }
}
