//! Caches every `FunctionDecl` seen so far (defined, declared `native`, or
//! only forward-referenced by a call) so that a call site can be emitted
//! before its callee's body has been parsed. This is the Rust-side
//! equivalent of the tutorial's global `FunctionProtos` map of prototypes.

use std::collections::HashMap;

use common::ast::function::FunctionDecl;

/// Records every function header the front end has registered, independent
/// of whether a body has been generated for it yet.
#[derive(Debug, Clone, Default)]
pub struct FunctionCache {
    decls: HashMap<String, FunctionDecl>,
}

impl FunctionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or overwrites `decl`, keyed by its mangled name.
    pub fn register(&mut self, decl: FunctionDecl) {
        self.decls.insert(decl.name.clone(), decl);
    }

    /// The declaration registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&FunctionDecl> {
        self.decls.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_registered_declaration_is_retrievable_by_name() {
        let mut cache = FunctionCache::new();
        cache.register(FunctionDecl::named("avg".to_string(), vec!["x".to_string(), "y".to_string()]));
        let decl = cache.get("avg").expect("avg should be registered");
        assert_eq!(decl.args.len(), 2);
    }

    #[test]
    fn an_unregistered_name_is_absent() {
        let cache = FunctionCache::new();
        assert!(cache.get("fac").is_none());
    }
}
