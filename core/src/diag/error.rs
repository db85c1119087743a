//! Error payloads returned by tree construction and traversal.
//!
//! Builder misuse, out-of-range access and unhandled dispatch all surface
//! as an `AstError` so callers (usually the parser's diagnostic stream)
//! decide how to report them.

use thiserror::Error;

use crate::ast::{NodeId, PrimitiveKind};

pub type AstResult<T> = Result<T, AstError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstError {
    #[error("{what} index {index} out of bounds for {node:?} ({len} entries)")]
    IndexOutOfBounds {
        node: NodeId,
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{node:?} is a {actual} node, expected {expected}")]
    KindMismatch {
        node: NodeId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unrecognized {category} spelling `{spelling}`")]
    UnrecognizedSpelling {
        category: &'static str,
        spelling: String,
    },

    #[error("invalid {kind} literal `{literal}`")]
    InvalidLiteral { kind: &'static str, literal: String },

    #[error("operation `{operation}` has no handler for {kind} node {node:?}")]
    UnhandledNode {
        operation: &'static str,
        kind: &'static str,
        node: NodeId,
    },

    #[error("{0:?} does not exist or has been released")]
    UnknownNode(NodeId),

    #[error("{0:?} has no parent")]
    Detached(NodeId),

    #[error("{child:?} is already owned by {parent:?}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("{child:?} fills a required slot of {parent:?} and can only be replaced")]
    RequiredSlot { parent: NodeId, child: NodeId },

    #[error("{node:?} is already annotated as {existing}, cannot annotate as {requested}")]
    AnnotationConflict {
        node: NodeId,
        existing: PrimitiveKind,
        requested: PrimitiveKind,
    },
}
