//! Function headers (`id(...)`, `unary op(...)`, `binary op [prec](...)`),
//! `func`/`operator` definitions, `native` declarations, and the top-level
//! item dispatch the driver pulls from.

use std::io::Read;

use common::ast::function::{
    FunctionDecl, FunctionDef, TopLevelItem, MAX_PRECEDENCE, MIN_PRECEDENCE,
};
use common::error::ErrorType;
use lexer::token::Token;

use crate::core::Parser;

impl<R: Read> Parser<R> {
    /// `id '(' id* ')'` | `'unary' op '(' id ')'` | `'binary' op number? '(' id id ')'`.
    ///
    /// A `binary` header's precedence, if given, is installed into the
    /// table immediately — before the body is parsed — so that a recursive
    /// definition using the new operator parses at its own precedence.
    fn parse_header(&mut self) -> Result<FunctionDecl, Vec<ErrorType>> {
        match self.current_token().clone() {
            Token::UNARY => {
                self.advance();
                let op = self.parse_operator_char()?;
                self.expect_char('(', "expected '(' after unary operator")?;
                let arg = self.parse_identifier_name()?;
                self.expect_char(')', "expected ')' after unary operator argument")?;
                Ok(FunctionDecl::unary(op, arg))
            }
            Token::BINARY => {
                self.advance();
                let op = self.parse_operator_char()?;

                let precedence = match self.current_token().clone() {
                    Token::NUMBER(value) => {
                        self.advance();
                        let value = value as i32;
                        if !(MIN_PRECEDENCE..=MAX_PRECEDENCE).contains(&value) {
                            return Err(vec![ErrorType::SyntaxError {
                                message: format!(
                                    "invalid precedence: {value} (must be between {MIN_PRECEDENCE} and {MAX_PRECEDENCE})"
                                ),
                            }]);
                        }
                        self.precedence.set(op, value);
                        value
                    }
                    _ => {
                        self.precedence.set_default(op);
                        common::ast::function::DEFAULT_PRECEDENCE
                    }
                };

                self.expect_char('(', "expected '(' after binary operator")?;
                let lhs = self.parse_identifier_name()?;
                let rhs = self.parse_identifier_name()?;
                self.expect_char(')', "expected ')' after binary operator arguments")?;
                Ok(FunctionDecl::binary(op, precedence, lhs, rhs))
            }
            Token::IDENTIFIER(name) => {
                self.advance();
                self.expect_char('(', "expected '(' after function name")?;
                let mut args = Vec::new();
                while let Token::IDENTIFIER(_) = self.current_token() {
                    args.push(self.parse_identifier_name()?);
                }
                self.expect_char(')', "expected ')' after parameter list")?;
                Ok(FunctionDecl::named(name, args))
            }
            other => Err(vec![ErrorType::SyntaxError {
                message: format!("expected a function header, found {other:?}"),
            }]),
        }
    }

    /// Called after consuming `func` or `operator`.
    pub fn parse_function_definition(&mut self) -> Result<FunctionDef, Vec<ErrorType>> {
        let decl = self.parse_header()?;
        let body = self.parse_expression()?;
        Ok(FunctionDef { decl, body })
    }

    /// Called after consuming `native`.
    pub fn parse_native(&mut self) -> Result<FunctionDecl, Vec<ErrorType>> {
        self.parse_header()
    }

    /// Wraps a bare expression in the anonymous zero-argument function the
    /// driver submits to the JIT for immediate evaluation.
    pub fn parse_top_level_expression(&mut self) -> Result<FunctionDef, Vec<ErrorType>> {
        let body = self.parse_expression()?;
        Ok(FunctionDef { decl: FunctionDecl::anonymous(), body })
    }

    /// Pulls and classifies one top-level item, or `None` at end of input.
    /// A stray `;` is consumed and reported as `None` so the driver's loop
    /// can advance without special-casing it.
    pub fn parse_top_level_item(&mut self) -> Result<Option<TopLevelItem>, Vec<ErrorType>> {
        match self.current_token().clone() {
            Token::EOF => Ok(None),
            Token::CHAR(';') => {
                self.advance();
                Ok(None)
            }
            Token::FUNC | Token::OPERATOR => {
                self.advance();
                let def = self.parse_function_definition()?;
                self.skip_trailing_semicolon();
                Ok(Some(TopLevelItem::Definition(def)))
            }
            Token::NATIVE => {
                self.advance();
                let decl = self.parse_native()?;
                self.skip_trailing_semicolon();
                Ok(Some(TopLevelItem::Declaration(decl)))
            }
            _ => {
                let def = self.parse_top_level_expression()?;
                self.skip_trailing_semicolon();
                Ok(Some(TopLevelItem::Definition(def)))
            }
        }
    }

    fn skip_trailing_semicolon(&mut self) {
        if self.at_char(';') {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ast::core::Expr;
    use common::ast::function::DeclKind;

    #[test]
    fn named_header_collects_its_arguments() {
        let mut parser = Parser::new("func avg(x y) (x + y) * 0.5".as_bytes());
        let item = parser.parse_top_level_item().unwrap().unwrap();
        match item {
            TopLevelItem::Definition(def) => {
                assert_eq!(def.decl.kind, DeclKind::Named);
                assert_eq!(def.decl.args, vec!["x".to_string(), "y".to_string()]);
            }
            other => panic!("expected a definition, got {other:?}"),
        }
    }

    #[test]
    fn binary_header_installs_its_precedence_before_the_body_parses() {
        let mut parser = Parser::new("binary : 1 (x y) y".as_bytes());
        let item = parser.parse_top_level_item().unwrap().unwrap();
        match item {
            TopLevelItem::Definition(def) => {
                assert_eq!(def.decl.precedence, Some(1));
                assert_eq!(def.decl.name, "binary:");
            }
            other => panic!("expected a definition, got {other:?}"),
        }
    }

    #[test]
    fn a_bare_expression_is_wrapped_anonymously() {
        let mut parser = Parser::new("1 + 2".as_bytes());
        let item = parser.parse_top_level_item().unwrap().unwrap();
        match item {
            TopLevelItem::Definition(def) => {
                assert_eq!(def.decl.name, common::ast::function::ANONYMOUS_EXPR_NAME);
                assert!(matches!(def.body, Expr::Binary { op: '+', .. }));
            }
            other => panic!("expected a definition, got {other:?}"),
        }
    }

    #[test]
    fn an_out_of_range_binary_precedence_is_a_parse_error() {
        let mut parser = Parser::new("binary : 200 (x y) y".as_bytes());
        assert!(parser.parse_top_level_item().is_err());
    }

    #[test]
    fn native_declarations_do_not_parse_a_body() {
        let mut parser = Parser::new("native printd(x)".as_bytes());
        let item = parser.parse_top_level_item().unwrap().unwrap();
        assert!(matches!(item, TopLevelItem::Declaration(_)));
    }
}
