//! Symbol and precedence tracking shared between the parser and the IR
//! generator: the live operator precedence table, the variable binding
//! environment, and the function declaration cache used to resolve forward
//! references.

pub mod functions;
pub mod precedence;
pub mod symbols;

pub use functions::FunctionCache;
pub use precedence::PrecedenceTable;
pub use symbols::SymbolEnvironment;
