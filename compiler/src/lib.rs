//! Semantic passes over the SmallC syntax tree.
//!
//! Every pass here is written against `smallc_core::Visitor` or the tree's
//! navigation API. Read-only passes take `&Ast`; the passes that record
//! results into the tree collect first and apply through the `Ast` mutators
//! afterwards.

pub mod semantics;

pub use semantics::{
    annotate_types, collect_symbols, format_tree, verify_tree, ConstEvaluator, ConstValue,
    FormatOptions, SemanticDiagnostic, SemanticErrorCode, StructureVerifier, TreeFormatter,
    TypeAnnotator,
};
