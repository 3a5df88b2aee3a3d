//! A recursive-descent parser with Pratt-style precedence climbing over
//! the lexer's token stream, producing the shared `Expr` AST and function
//! declarations the IR generator consumes.

pub mod core;
pub mod declaration;
pub mod expression;

pub use crate::core::Parser;
