//! The fixed per-function optimization pipeline run after every function
//! body is emitted and verified: promote stack slots to SSA registers,
//! then instruction-combine, reassociate, global-value-number, and
//! simplify the CFG. Running this per function (rather than as a
//! module-level pass) is correct because SSA is local to a function.

use common::error::ErrorType;
use safe_llvm::ir::core::FunctionTag;

use crate::environment::Environment;

pub fn optimize_function(env: &Environment, function: FunctionTag) -> Result<(), ErrorType> {
    let pools = env.resource_pools();
    let mut pools =
        pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;

    pools
        .run_function_pass_pipeline(function)
        .map_err(|message| ErrorType::DevError { message: format!("optimization pipeline failed: {message}") })
}
