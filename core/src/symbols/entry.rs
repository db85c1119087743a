//! Entry records stored in symbol tables.

use crate::ast::{PrimitiveKind, TypeShape};

/// Declared type of a variable or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariableEntry {
    pub kind: PrimitiveKind,
    pub is_array: bool,
    /// Element count for arrays; 0 when unspecified or scalar.
    pub size: u32,
}

impl VariableEntry {
    pub fn scalar(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            is_array: false,
            size: 0,
        }
    }

    pub fn array(kind: PrimitiveKind, size: u32) -> Self {
        Self {
            kind,
            is_array: true,
            size,
        }
    }

    pub fn shape(&self) -> TypeShape {
        if self.is_array {
            TypeShape::Array(self.kind, self.size)
        } else {
            TypeShape::Primitive(self.kind)
        }
    }
}

impl From<TypeShape> for VariableEntry {
    fn from(shape: TypeShape) -> Self {
        match shape {
            TypeShape::Primitive(kind) => Self::scalar(kind),
            TypeShape::Array(kind, size) => Self::array(kind, size),
        }
    }
}

/// Function signature: return kind plus ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionEntry {
    pub return_type: PrimitiveKind,
    pub params: Vec<VariableEntry>,
}

impl FunctionEntry {
    pub fn new(return_type: PrimitiveKind, params: Vec<VariableEntry>) -> Self {
        Self {
            return_type,
            params,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
