//! A translation unit's LLVM resources: one context, one module, one
//! builder, and the resource pool that mediates every operation on them.
//!
//! A fresh `Environment` is created for each module the driver starts
//! (see the root crate's `Session`): the REPL rotates to a new one after
//! every definition is submitted to the JIT, so that forward references
//! resolve through the JIT's global symbol table rather than through
//! module-local linkage.

use std::sync::{Arc, Mutex};

use common::error::ErrorType;
use safe_llvm::ir::core::{BuilderTag, ContextTag, ModuleTag, ResourcePools};

/// Owns the live LLVM context/module/builder triple for one translation
/// unit, plus the shared pool that every tag-returning operation on them
/// goes through.
#[derive(Clone)]
pub struct Environment {
    resource_pools: Arc<Mutex<ResourcePools>>,
    context: ContextTag,
    module: ModuleTag,
    builder: BuilderTag,
}

impl Environment {
    /// Creates a fresh context, module, and builder under a new resource
    /// pool.
    pub fn new(module_name: &str) -> Result<Self, ErrorType> {
        let resource_pools = Arc::new(Mutex::new(ResourcePools::new()));
        let mut pools = resource_pools
            .lock()
            .map_err(|_| ErrorType::HostError { message: "resource pool mutex poisoned".to_string() })?;

        let context = pools
            .create_context()
            .ok_or_else(|| ErrorType::HostError { message: "failed to create LLVM context".to_string() })?;
        let module = pools
            .create_module(module_name, context)
            .ok_or_else(|| ErrorType::HostError { message: "failed to create LLVM module".to_string() })?;
        let builder = pools
            .create_builder(context)
            .ok_or_else(|| ErrorType::HostError { message: "failed to create IR builder".to_string() })?;

        drop(pools);
        Ok(Self { resource_pools, context, module, builder })
    }

    pub fn resource_pools(&self) -> Arc<Mutex<ResourcePools>> {
        Arc::clone(&self.resource_pools)
    }

    pub fn context(&self) -> ContextTag {
        self.context
    }

    pub fn module(&self) -> ModuleTag {
        self.module
    }

    pub fn builder(&self) -> BuilderTag {
        self.builder
    }
}
