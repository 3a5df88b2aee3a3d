//! Lowers the shared `Expr` AST into SSA-form IR against a backend
//! `integration::Environment`: scoped symbol environments, control-flow
//! lowering for `when`/`while`, mutable variables via stack allocation, and
//! forward-reference resolution through a function-declaration cache.

pub mod core;
pub mod expression;

pub use crate::core::IrGenerator;
