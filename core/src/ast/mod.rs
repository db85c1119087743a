//! SmallC abstract syntax tree.
//!
//! The submodules organise node identity (`ids`, `arena`), operator and
//! type values, node payloads, the `Ast` arena with its structural
//! operations, the builder constructors and the visitor protocol.
//! Re-exports at this level give downstream crates a single import path.

pub mod arena;
pub mod builder;
pub mod ids;
pub mod nodes;
pub mod ops;
pub mod tree;
pub mod types;
pub mod visit;

pub use arena::Arena;
pub use ids::NodeId;
pub use nodes::*;
pub use ops::{BinaryOp, UnaryOp};
pub use tree::{Ast, Node};
pub use types::{PrimitiveKind, TypeShape};
pub use visit::{unhandled, Visitor};
