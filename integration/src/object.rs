//! Object-file emission for the default host target, the non-interactive
//! counterpart to `jit::JitEngine` in compile mode.

use std::path::Path;

use common::error::ErrorType;

use crate::environment::Environment;

/// Retargets `env`'s module to the host triple, sets its data layout, and
/// writes it to `output_path` via the backend's emission pass.
pub fn emit_object_file(env: &Environment, output_path: &Path) -> Result<(), ErrorType> {
    let pools = env.resource_pools();
    let mut pools =
        pools.lock().map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;

    let triple = pools
        .host_target_triple()
        .ok_or_else(|| ErrorType::HostError { message: "failed to resolve host target triple".to_string() })?;

    pools
        .set_module_target(env.module(), &triple)
        .map_err(|message| ErrorType::HostError { message: format!("failed to set module target: {message}") })?;

    pools
        .write_object_file(env.module(), &triple, output_path)
        .map_err(|message| ErrorType::HostError { message: format!("object emission failed: {message}") })
}
