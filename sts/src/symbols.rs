//! Tracks which generated value each in-scope variable name is currently
//! bound to.
//!
//! Scoping here is save-and-restore, not a stack of scope frames: entering a
//! binding construct (`VarDef`, a loop's induction variable, a function's
//! parameters) remembers whatever the name was previously bound to (if
//! anything), installs the new binding, and restores the old one on exit.
//! This mirrors the original tutorial's `ValuesByName` map directly rather
//! than introducing a scope-stack abstraction the design never asked for.

use std::collections::HashMap;

/// A symbol table over a single generated value type `T` (an IR value
/// handle in practice, kept generic here so this crate stays free of any
/// backend dependency).
#[derive(Debug, Clone)]
pub struct SymbolEnvironment<T> {
    bindings: HashMap<String, T>,
}

impl<T> Default for SymbolEnvironment<T> {
    fn default() -> Self {
        Self { bindings: HashMap::new() }
    }
}

impl<T: Clone> SymbolEnvironment<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.bindings.get(name)
    }

    /// Binds `name` to `value` unconditionally, returning whatever it was
    /// previously bound to so the caller can restore it later with `restore`.
    pub fn shadow(&mut self, name: &str, value: T) -> Option<T> {
        self.bindings.insert(name.to_string(), value)
    }

    /// Restores `name` to `prior` (the value `shadow` returned), or removes
    /// the binding entirely if `prior` is `None`.
    pub fn restore(&mut self, name: &str, prior: Option<T>) {
        match prior {
            Some(value) => {
                self.bindings.insert(name.to_string(), value);
            }
            None => {
                self.bindings.remove(name);
            }
        }
    }

    /// Removes every binding. Used between top-level definitions: each
    /// function's parameters live only for the duration of its body.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadow_then_restore_recovers_the_outer_binding() {
        let mut env = SymbolEnvironment::new();
        env.shadow("x", 1);
        let prior = env.shadow("x", 2);
        assert_eq!(env.get("x"), Some(&2));
        env.restore("x", prior);
        assert_eq!(env.get("x"), Some(&1));
    }

    #[test]
    fn restoring_a_fresh_binding_removes_it() {
        let mut env: SymbolEnvironment<i32> = SymbolEnvironment::new();
        let prior = env.shadow("y", 10);
        assert_eq!(prior, None);
        env.restore("y", prior);
        assert_eq!(env.get("y"), None);
    }
}
