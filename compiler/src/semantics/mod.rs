//! Semantic analysis facade.
//!
//! Passes are listed in the order a driver usually runs them: verify the
//! structure the parser built, fill the symbol tables, then annotate
//! expression types. Formatting and constant evaluation can run at any
//! point.

pub mod display;
pub mod eval;
pub mod symbols;
pub mod typeck;
pub mod verify;

pub use display::{format_tree, FormatOptions, TreeFormatter};
pub use eval::{constant_conditions, ConstEvaluator, ConstValue};
pub use symbols::{collect_symbols, SymbolCollection};
pub use typeck::{annotate_types, SemanticDiagnostic, SemanticErrorCode, TypeAnnotator};
pub use verify::{verify_tree, StructureVerifier};
