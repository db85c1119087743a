//! Symbol table population.
//!
//! The tables themselves live on `Program` and `Scope` nodes in the core
//! crate; this module decides what goes into them.

pub mod collector;

pub use collector::{collect_symbols, SymbolCollection};
