//! Symbol tables owned by scope-bearing nodes.
//!
//! `Program` owns the global function and variable tables and every `Scope`
//! may own a variable table for its block. Tables are plain name-keyed maps;
//! deciding what goes into them is left to the semantic passes.

pub mod entry;
pub mod table;

pub use entry::{FunctionEntry, VariableEntry};
pub use table::{DeclarationResult, SymTable};
