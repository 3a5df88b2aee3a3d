//! The backend bridge: a thin adapter over the IR builder, optimizer,
//! object emitter, and JIT that `ir` and the root driver treat as a fixed
//! external collaborator (§4.5/§4.6 of the design this crate implements).

pub mod environment;
pub mod jit;
pub mod object;
pub mod optimizer;

pub use environment::Environment;
pub use jit::JitEngine;
pub use object::emit_object_file;
pub use optimizer::optimize_function;
