//! Function declarations and definitions, including the operator-function
//! name mangling convention (§3 of the design: `unary@` / `binary@`).

use crate::ast::core::Expr;

/// The lowest valid user-operator precedence.
pub const MIN_PRECEDENCE: i32 = 1;
/// The highest valid user-operator precedence.
pub const MAX_PRECEDENCE: i32 = 100;
/// The precedence a `binary` declaration gets when none is given.
pub const DEFAULT_PRECEDENCE: i32 = 30;

/// How a function header was introduced, carried alongside the mangled
/// name so the parser can validate arity without re-deriving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// A plain `id(...)` header.
    Named,
    /// A `unary OP(arg)` header.
    Unary,
    /// A `binary OP [prec](a, b)` header.
    Binary,
}

/// A function's name and ordered argument names, plus the precedence a
/// `binary` header may have declared.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub args: Vec<String>,
    pub kind: DeclKind,
    /// Only set for `DeclKind::Binary`; the precedence to install.
    pub precedence: Option<i32>,
}

impl FunctionDecl {
    pub fn named(name: String, args: Vec<String>) -> Self {
        Self { name, args, kind: DeclKind::Named, precedence: None }
    }

    pub fn unary(op: char, arg: String) -> Self {
        Self { name: unary_name(op), args: vec![arg], kind: DeclKind::Unary, precedence: None }
    }

    pub fn binary(op: char, precedence: i32, lhs: String, rhs: String) -> Self {
        Self {
            name: binary_name(op),
            args: vec![lhs, rhs],
            kind: DeclKind::Binary,
            precedence: Some(precedence),
        }
    }

    /// The synthetic zero-argument declaration a bare top-level expression
    /// is wrapped in.
    pub fn anonymous() -> Self {
        Self::named(ANONYMOUS_EXPR_NAME.to_string(), Vec::new())
    }
}

/// A `FunctionDecl` plus its body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub decl: FunctionDecl,
    pub body: Expr,
}

/// The name under which a user unary operator's implementation is stored.
pub fn unary_name(op: char) -> String {
    format!("unary{op}")
}

/// The name under which a user binary operator's implementation is stored.
pub fn binary_name(op: char) -> String {
    format!("binary{op}")
}

/// The synthetic function name a bare top-level expression is compiled under.
pub const ANONYMOUS_EXPR_NAME: &str = "__anonymous_top_level_expr";

/// One unit of work pulled off the token stream by the driver's
/// read-parse-codegen loop. A bare expression is already wrapped in its
/// anonymous `FunctionDef` by the time the parser hands it back, so the
/// driver only ever has two shapes to dispatch on.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelItem {
    /// A `func`/`operator` definition, or a bare expression wrapped under
    /// `ANONYMOUS_EXPR_NAME`.
    Definition(FunctionDef),
    /// A `native` forward declaration.
    Declaration(FunctionDecl),
}
