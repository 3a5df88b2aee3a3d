//! The operator precedence table consulted by the parser's precedence
//! climbing. Builtin operators are seeded at construction; a `binary`
//! declaration installs or overrides an entry at parse time, which is how a
//! later declaration in the same source can change how earlier-declared
//! operators of the same spelling associate — matching the `BinopPrecedence`
//! global map the design calls for.

use std::collections::HashMap;

use common::ast::function::{DEFAULT_PRECEDENCE, MAX_PRECEDENCE, MIN_PRECEDENCE};

/// Maps a binary operator spelling to its precedence. Consulted by the
/// parser on every `parse_binary_rhs` iteration.
#[derive(Debug, Clone)]
pub struct PrecedenceTable {
    table: HashMap<char, i32>,
}

impl Default for PrecedenceTable {
    fn default() -> Self {
        let mut table = HashMap::new();
        table.insert('<', 10);
        table.insert('+', 20);
        table.insert('-', 20);
        table.insert('*', 40);
        Self { table }
    }
}

impl PrecedenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The precedence of `op`, or `None` if it is not a known binary operator.
    pub fn get(&self, op: char) -> Option<i32> {
        self.table.get(&op).copied()
    }

    /// Installs or overrides `op`'s precedence, clamping to the valid range.
    pub fn set(&mut self, op: char, precedence: i32) {
        let clamped = precedence.clamp(MIN_PRECEDENCE, MAX_PRECEDENCE);
        self.table.insert(op, clamped);
    }

    /// Installs `op` at the precedence a `binary` header gets when it
    /// declares no explicit one.
    pub fn set_default(&mut self, op: char) {
        self.set(op, DEFAULT_PRECEDENCE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_seeded() {
        let table = PrecedenceTable::new();
        assert_eq!(table.get('*'), Some(40));
        assert_eq!(table.get('+'), Some(20));
        assert_eq!(table.get('?'), None);
    }

    #[test]
    fn a_later_declaration_overrides_an_earlier_one() {
        let mut table = PrecedenceTable::new();
        table.set('+', 5);
        assert_eq!(table.get('+'), Some(5));
    }

    #[test]
    fn out_of_range_precedence_is_clamped() {
        let mut table = PrecedenceTable::new();
        table.set('|', 9001);
        assert_eq!(table.get('|'), Some(MAX_PRECEDENCE));
    }
}
