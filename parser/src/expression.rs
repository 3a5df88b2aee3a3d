//! Expression grammar: precedence-climbing binary operators, prefix unary
//! operators, and the primary forms (literals, calls, `when`, `while`,
//! `var`, parenthesized sub-expressions).

use std::io::Read;

use common::ast::core::Expr;
use common::error::ErrorType;
use lexer::token::Token;

use crate::core::Parser;

impl<R: Read> Parser<R> {
    /// Parses a complete expression, including user operators at whatever
    /// precedence they currently hold in the table.
    pub fn parse_expression(&mut self) -> Result<Expr, Vec<ErrorType>> {
        let lhs = self.parse_unary()?;
        self.parse_binary_rhs(0, lhs)
    }

    /// Precedence climbing: consumes operators at precedence `>= min_prec`,
    /// recursing with a raised threshold whenever the next operator binds
    /// tighter than the one just consumed, so that a higher-precedence
    /// successor is absorbed into the right-hand side instead of the left.
    fn parse_binary_rhs(&mut self, min_prec: i32, mut lhs: Expr) -> Result<Expr, Vec<ErrorType>> {
        loop {
            let op = match self.current_operator_char() {
                Some(c) => c,
                None => return Ok(lhs),
            };
            let op_prec = match self.precedence.get(op) {
                Some(p) if p >= min_prec => p,
                _ => return Ok(lhs),
            };

            self.advance();
            let mut rhs = self.parse_unary()?;

            if let Some(next_c) = self.current_operator_char() {
                if let Some(next_prec) = self.precedence.get(next_c) {
                    if next_prec > op_prec {
                        rhs = self.parse_binary_rhs(op_prec + 1, rhs)?;
                    }
                }
            }

            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) };
        }
    }

    /// The character of the current token if it is a single-character
    /// token with a registered precedence; `None` otherwise (including for
    /// an unregistered character, which is not treated as an operator).
    fn current_operator_char(&self) -> Option<char> {
        match self.current_token() {
            Token::CHAR(c) => Some(*c),
            _ => None,
        }
    }

    /// A token that is `(`, `,`, or not a single-character token at all is
    /// never a unary operator; fall through to a primary expression.
    /// Otherwise the token is consumed as a prefix operator and the body is
    /// parsed as another unary expression, allowing chained prefix ops.
    fn parse_unary(&mut self) -> Result<Expr, Vec<ErrorType>> {
        let op = match self.current_token() {
            Token::CHAR(c) if *c != '(' && *c != ',' => *c,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary { op, operand: Box::new(operand) })
    }

    fn parse_primary(&mut self) -> Result<Expr, Vec<ErrorType>> {
        match self.current_token().clone() {
            Token::NUMBER(value) => {
                self.advance();
                Ok(Expr::NumberLit(value))
            }
            Token::IDENTIFIER(_) => self.parse_identifier_expr(),
            Token::CHAR('(') => self.parse_paren_expr(),
            Token::WHEN => self.parse_if_expr(),
            Token::WHILE => self.parse_loop_expr(),
            Token::VAR => self.parse_var_def_expr(),
            other => Err(vec![ErrorType::SyntaxError {
                message: format!("unexpected token in expression: {other:?}"),
            }]),
        }
    }

    /// A bare identifier is a `VarRef`; one followed by `(` is a `Call`
    /// with comma-separated arguments.
    fn parse_identifier_expr(&mut self) -> Result<Expr, Vec<ErrorType>> {
        let name = match self.current_token().clone() {
            Token::IDENTIFIER(name) => name,
            other => {
                return Err(vec![ErrorType::SyntaxError {
                    message: format!("expected identifier, found {other:?}"),
                }])
            }
        };
        self.advance();

        if !self.at_char('(') {
            return Ok(Expr::VarRef(name));
        }
        self.advance();

        let mut args = Vec::new();
        if !self.at_char(')') {
            loop {
                args.push(self.parse_expression()?);
                if self.at_char(',') {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect_char(')', "expected ')' to close call arguments")?;
        Ok(Expr::Call { callee: name, args })
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, Vec<ErrorType>> {
        self.expect_char('(', "expected '('")?;
        let inner = self.parse_expression()?;
        self.expect_char(')', "expected ')' to close parenthesized expression")?;
        Ok(inner)
    }

    /// `when cond then then-branch otherwise else-branch`.
    fn parse_if_expr(&mut self) -> Result<Expr, Vec<ErrorType>> {
        self.expect(Token::WHEN, "expected 'when'")?;
        let cond = self.parse_expression()?;
        self.expect(Token::THEN, "expected 'then' after 'when' condition")?;
        let then_branch = self.parse_expression()?;
        self.expect(Token::OTHERWISE, "expected 'otherwise' after 'then' branch")?;
        let else_branch = self.parse_expression()?;
        Ok(Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    /// `while cond for var = init (step step-expr)? do body`.
    fn parse_loop_expr(&mut self) -> Result<Expr, Vec<ErrorType>> {
        self.expect(Token::WHILE, "expected 'while'")?;
        let cond = self.parse_expression()?;
        self.expect(Token::FOR, "expected 'for' after loop condition")?;
        let var = self.parse_identifier_name()?;
        self.expect_char('=', "expected '=' after loop variable")?;
        let init = self.parse_expression()?;

        let step = if *self.current_token() == Token::STEP {
            self.advance();
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        self.expect(Token::DO, "expected 'do' before loop body")?;
        let body = self.parse_expression()?;

        Ok(Expr::Loop { var, init: Box::new(init), cond: Box::new(cond), step, body: Box::new(body) })
    }

    /// `var name (= init)? (, name (= init)?)* in body`.
    fn parse_var_def_expr(&mut self) -> Result<Expr, Vec<ErrorType>> {
        self.expect(Token::VAR, "expected 'var'")?;

        let mut bindings = Vec::new();
        loop {
            let name = self.parse_identifier_name()?;
            let init = if self.at_char('=') {
                self.advance();
                Some(self.parse_expression()?)
            } else {
                None
            };
            bindings.push((name, init));

            if self.at_char(',') {
                self.advance();
                continue;
            }
            break;
        }

        self.expect(Token::IN, "expected 'in' after 'var' bindings")?;
        let body = self.parse_expression()?;
        Ok(Expr::VarDef { bindings, body: Box::new(body) })
    }

    pub(crate) fn parse_identifier_name(&mut self) -> Result<String, Vec<ErrorType>> {
        match self.current_token().clone() {
            Token::IDENTIFIER(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(vec![ErrorType::SyntaxError {
                message: format!("expected identifier, found {other:?}"),
            }]),
        }
    }

    /// Consumes the current token as a single-character operator symbol,
    /// used when parsing `unary`/`binary` headers where the operator may
    /// not yet hold a precedence-table entry.
    pub(crate) fn parse_operator_char(&mut self) -> Result<char, Vec<ErrorType>> {
        match self.current_token().clone() {
            Token::CHAR(c) => {
                self.advance();
                Ok(c)
            }
            other => Err(vec![ErrorType::SyntaxError {
                message: format!("expected an operator character, found {other:?}"),
            }]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_precedence_binds_tighter_on_the_right() {
        // `*` (40) binds tighter than `+` (20): 1 + 2 * 3 == 1 + (2 * 3)
        let mut parser = Parser::new("1 + 2 * 3".as_bytes());
        let expr = parser.parse_expression().unwrap();
        match expr {
            Expr::Binary { op: '+', lhs, rhs } => {
                assert!(matches!(*lhs, Expr::NumberLit(v) if v == 1.0));
                assert!(matches!(*rhs, Expr::Binary { op: '*', .. }));
            }
            other => panic!("expected a '+' binary node, got {other:?}"),
        }
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        // `-` and `+` are both 20: 1 - 2 + 3 == (1 - 2) + 3
        let mut parser = Parser::new("1 - 2 + 3".as_bytes());
        let expr = parser.parse_expression().unwrap();
        match expr {
            Expr::Binary { op: '+', lhs, .. } => {
                assert!(matches!(*lhs, Expr::Binary { op: '-', .. }));
            }
            other => panic!("expected a '+' binary node, got {other:?}"),
        }
    }

    #[test]
    fn chained_unary_operators_nest_right_to_left() {
        let mut parser = Parser::new("---5".as_bytes());
        let expr = parser.parse_expression().unwrap();
        match expr {
            Expr::Unary { op: '-', operand } => match *operand {
                Expr::Unary { op: '-', operand } => {
                    assert!(matches!(*operand, Expr::Unary { op: '-', .. }));
                }
                other => panic!("expected a nested unary, got {other:?}"),
            },
            other => panic!("expected a unary node, got {other:?}"),
        }
    }

    #[test]
    fn call_arguments_are_comma_separated_expressions() {
        let mut parser = Parser::new("avg(1, 2 + 3)".as_bytes());
        let expr = parser.parse_expression().unwrap();
        match expr {
            Expr::Call { callee, args } => {
                assert_eq!(callee, "avg");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected a call node, got {other:?}"),
        }
    }

    #[test]
    fn when_then_otherwise_is_fully_mandatory() {
        let mut parser = Parser::new("when n < 2 then 1 otherwise n".as_bytes());
        let expr = parser.parse_expression().unwrap();
        assert!(matches!(expr, Expr::If { .. }));
    }

    #[test]
    fn var_def_supports_multiple_shadowed_bindings() {
        let mut parser = Parser::new("var x = 1, y in x + y".as_bytes());
        let expr = parser.parse_expression().unwrap();
        match expr {
            Expr::VarDef { bindings, .. } => {
                assert_eq!(bindings.len(), 2);
                assert!(bindings[0].1.is_some());
                assert!(bindings[1].1.is_none());
            }
            other => panic!("expected a var-def node, got {other:?}"),
        }
    }
}
