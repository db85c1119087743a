//! Core crate entry point.
//!
//! This crate holds the SmallC syntax tree: node kinds and their arena,
//! the builder operations the parser drives, per-scope symbol tables and the
//! visitor protocol every later compiler pass is written against.

pub mod ast;
pub mod config;
pub mod diag;
pub mod symbols;

pub use ast::{Ast, NodeId, NodeKind, Visitor};
pub use config::{AstConfig, SpellingPolicy};
pub use diag::{AstError, AstResult, Location};
