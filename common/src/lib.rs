//! Shared types used by every stage of the pipeline: the expression AST,
//! function declarations, the pipeline-wide error type, and a handful of
//! naming constants for generated IR.

pub mod ast;
pub mod constants;
pub mod error;
