//! Value-level view of SmallC types.
//!
//! Type nodes in the tree (`PrimitiveType`, `ArrayType`) carry locations and
//! ownership; `PrimitiveKind` and `TypeShape` are the plain values passes
//! compare and store in symbol tables.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Bool,
    Void,
}

impl PrimitiveKind {
    /// Map a type name to its kind; `None` when unrecognized.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        match spelling {
            "int" | "Int" => Some(PrimitiveKind::Int),
            "bool" | "Bool" => Some(PrimitiveKind::Bool),
            "void" | "Void" => Some(PrimitiveKind::Void),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "int",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Void => "void",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural description of a type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    /// Element kind and element count; a count of 0 means unspecified.
    Array(PrimitiveKind, u32),
}

impl TypeShape {
    pub fn element(self) -> PrimitiveKind {
        match self {
            TypeShape::Primitive(kind) | TypeShape::Array(kind, _) => kind,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, TypeShape::Array(..))
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Primitive(kind) => write!(f, "{kind}"),
            TypeShape::Array(kind, 0) => write!(f, "{kind}[]"),
            TypeShape::Array(kind, size) => write!(f, "{kind}[{size}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_shapes_compare_structurally() {
        let five = TypeShape::Array(PrimitiveKind::Int, 5);
        assert_eq!(five, TypeShape::Array(PrimitiveKind::Int, 5));
        assert_ne!(five, TypeShape::Array(PrimitiveKind::Int, 6));
        assert_ne!(five, TypeShape::Array(PrimitiveKind::Bool, 5));
        assert_ne!(five, TypeShape::Primitive(PrimitiveKind::Int));
    }

    #[test]
    fn type_names_map_to_kinds() {
        assert_eq!(PrimitiveKind::from_spelling("int"), Some(PrimitiveKind::Int));
        assert_eq!(PrimitiveKind::from_spelling("Bool"), Some(PrimitiveKind::Bool));
        assert_eq!(PrimitiveKind::from_spelling("void"), Some(PrimitiveKind::Void));
        assert_eq!(PrimitiveKind::from_spelling("float"), None);
    }

    #[test]
    fn shapes_render_like_declarations() {
        assert_eq!(TypeShape::Array(PrimitiveKind::Bool, 0).to_string(), "bool[]");
        assert_eq!(TypeShape::Array(PrimitiveKind::Int, 4).to_string(), "int[4]");
    }
}
