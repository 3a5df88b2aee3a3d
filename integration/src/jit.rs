//! The JIT half of the backend bridge: module submission under a resource
//! tracker, symbol lookup, and resource removal, exactly the three
//! capabilities §4.5 asks for plus the convenience of resolving a looked-up
//! symbol straight to a callable `binary64`-returning thunk.

use common::error::ErrorType;
use safe_llvm::jit::{Jit as SafeJit, ResourceTrackerTag};

use crate::environment::Environment;

/// A thin wrapper over the backend's JIT engine. One `JitEngine` lives for
/// the whole REPL session; `Environment`s (and the modules they own) are
/// submitted and discarded across it.
pub struct JitEngine {
    inner: SafeJit,
}

impl JitEngine {
    pub fn new() -> Result<Self, ErrorType> {
        let inner = SafeJit::create()
            .map_err(|message| ErrorType::HostError { message: format!("failed to start JIT: {message}") })?;
        Ok(Self { inner })
    }

    /// Hands `env`'s module and context to the JIT, which takes ownership.
    /// The returned tracker is later passed to `remove` to unload it.
    pub fn submit(&mut self, env: Environment) -> Result<ResourceTrackerTag, ErrorType> {
        self.inner
            .add_module(env.module(), env.context(), env.resource_pools())
            .map_err(|message| ErrorType::HostError { message: format!("JIT module submission failed: {message}") })
    }

    /// The address of a JIT-resident symbol, or `None` if it is not (yet)
    /// resolvable.
    pub fn lookup_address(&self, name: &str) -> Option<usize> {
        self.inner.lookup(name)
    }

    /// `lookup_address`, cast to the one signature every function in this
    /// language shares: zero or more `binary64` arguments in, one out. Only
    /// the anonymous top-level thunk (always zero-argument) is invoked this
    /// way, so the niladic signature is all that is needed here.
    ///
    /// # Safety
    /// The caller must only call this on a symbol known to have been
    /// generated with the `() -> f64` signature, which the driver
    /// guarantees for `ANONYMOUS_EXPR_NAME`.
    pub unsafe fn get_function_address(&self, name: &str) -> Option<extern "C" fn() -> f64> {
        self.lookup_address(name).map(|addr| std::mem::transmute::<usize, extern "C" fn() -> f64>(addr))
    }

    /// Unloads a previously submitted module, freeing its symbols.
    pub fn remove(&mut self, tracker: ResourceTrackerTag) -> Result<(), ErrorType> {
        self.inner
            .remove_module(tracker)
            .map_err(|message| ErrorType::HostError { message: format!("failed to unload JIT module: {message}") })
    }
}
