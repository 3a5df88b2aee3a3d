//! The expression AST and the double-dispatch `Visitor` contract over it.
//!
//! Every node owns its children outright (no shared ownership, no cycles);
//! a `Box<Expr>` is how we write "exclusively owned child" in Rust where the
//! teacher's C++ ancestor writes `std::unique_ptr<Expression>`.

/// A single expression node. The language has no statement form — control
/// flow (`If`, `Loop`) and binding (`VarDef`) are all expressions with a
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A binary64 literal.
    NumberLit(f64),
    /// A reference to a variable by name.
    VarRef(String),
    /// A call to a named function with ordered arguments.
    Call { callee: String, args: Vec<Expr> },
    /// A one-character prefix operator applied to its operand.
    Unary { op: char, operand: Box<Expr> },
    /// A one-character infix operator. `op == '='` is assignment and
    /// requires `lhs` to be a `VarRef`.
    Binary { op: char, lhs: Box<Expr>, rhs: Box<Expr> },
    /// `when cond then then_branch otherwise else_branch`.
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `while cond for var = init (step step)? do body`.
    Loop {
        var: String,
        init: Box<Expr>,
        cond: Box<Expr>,
        step: Option<Box<Expr>>,
        body: Box<Expr>,
    },
    /// An ordered list of shadowed `(name, initializer)` bindings over a body.
    VarDef {
        bindings: Vec<(String, Option<Expr>)>,
        body: Box<Expr>,
    },
}

impl Expr {
    /// Double-dispatches to the matching `Visitor` method.
    ///
    /// Rust has no virtual-call double dispatch, so this is the
    /// tagged-union-plus-pattern-match encoding of the same idea: the
    /// `match` below *is* the vtable.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expr::NumberLit(value) => visitor.visit_number(*value),
            Expr::VarRef(name) => visitor.visit_var_ref(name),
            Expr::Call { callee, args } => visitor.visit_call(callee, args),
            Expr::Unary { op, operand } => visitor.visit_unary(*op, operand),
            Expr::Binary { op, lhs, rhs } => visitor.visit_binary(*op, lhs, rhs),
            Expr::If { cond, then_branch, else_branch } => {
                visitor.visit_if(cond, then_branch, else_branch)
            }
            Expr::Loop { var, init, cond, step, body } => {
                visitor.visit_loop(var, init, cond, step.as_deref(), body)
            }
            Expr::VarDef { bindings, body } => visitor.visit_var_def(bindings, body),
        }
    }
}

/// Visitor capability over `Expr`, plus the side-channel `register_decl`
/// that lets a `native` declaration be registered without being emitted.
pub trait Visitor {
    type Output;

    fn visit_number(&mut self, value: f64) -> Self::Output;
    fn visit_var_ref(&mut self, name: &str) -> Self::Output;
    fn visit_call(&mut self, callee: &str, args: &[Expr]) -> Self::Output;
    fn visit_unary(&mut self, op: char, operand: &Expr) -> Self::Output;
    fn visit_binary(&mut self, op: char, lhs: &Expr, rhs: &Expr) -> Self::Output;
    fn visit_if(&mut self, cond: &Expr, then_branch: &Expr, else_branch: &Expr) -> Self::Output;
    fn visit_loop(
        &mut self,
        var: &str,
        init: &Expr,
        cond: &Expr,
        step: Option<&Expr>,
        body: &Expr,
    ) -> Self::Output;
    fn visit_var_def(&mut self, bindings: &[(String, Option<Expr>)], body: &Expr) -> Self::Output;

    /// Registers a native or not-yet-emitted declaration without visiting it.
    fn register_decl(&mut self, decl: &crate::ast::function::FunctionDecl);
}
