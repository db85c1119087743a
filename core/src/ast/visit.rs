//! Double dispatch over the closed set of node kinds.
//!
//! A pass implements `Visitor` and overrides one handler per node kind it
//! supports. `Ast::visit` resolves the node's kind with an exhaustive match
//! and calls exactly one handler, passing the concrete payload. Handlers a
//! pass does not override fail with `AstError::UnhandledNode`, so an
//! unexpected tree shape surfaces as an error instead of being skipped.
//!
//! Traversal order is up to the pass: a handler decides whether and when to
//! visit members, usually through `Ast::visit` on the ids its payload holds
//! or through `Ast::walk_children`.

use log::trace;

use super::ids::NodeId;
use super::nodes::{
    Argument, ArrayDecl, ArrayType, AssignStmt, BinaryExpr, BoolConstant, BoolExpr, CallExpr,
    ExprStmt, FunctionDecl, Identifier, IfStmt, IntConstant, IntExpr, NodeKind, Parameter,
    PrimitiveType, Program, ReferenceExpr, ReturnStmt, ScalarDecl, Scope, UnaryExpr, WhileStmt,
};
use super::tree::Ast;
use crate::diag::{AstError, AstResult};

/// Error for a handler a pass does not implement.
pub fn unhandled<V, T>(visitor: &V, ast: &Ast, id: NodeId) -> AstResult<T>
where
    V: Visitor + ?Sized,
{
    Err(AstError::UnhandledNode {
        operation: visitor.operation(),
        kind: ast.kind(id)?.name(),
        node: id,
    })
}

macro_rules! visitor {
    ($($variant:ident => $method:ident),* $(,)?) => {
        /// A pass over the tree with one handler per node kind.
        pub trait Visitor {
            type Output;

            /// Name reported when a handler is missing.
            fn operation(&self) -> &'static str;

            $(
                fn $method(
                    &mut self,
                    ast: &Ast,
                    id: NodeId,
                    node: &$variant,
                ) -> AstResult<Self::Output> {
                    let _ = node;
                    unhandled(self, ast, id)
                }
            )*
        }

        impl Ast {
            /// Dispatch `visitor` to the handler for the kind of `id`.
            pub fn visit<V>(&self, id: NodeId, visitor: &mut V) -> AstResult<V::Output>
            where
                V: Visitor + ?Sized,
            {
                let kind = self.kind(id)?;
                trace!("{}: visiting {} {:?}", visitor.operation(), kind.name(), id);
                match kind {
                    $(NodeKind::$variant(node) => visitor.$method(self, id, node),)*
                }
            }
        }
    };
}

visitor!(
    Program => visit_program,
    PrimitiveType => visit_primitive_type,
    ArrayType => visit_array_type,
    Identifier => visit_identifier,
    Parameter => visit_parameter,
    UnaryExpr => visit_unary_expr,
    BinaryExpr => visit_binary_expr,
    BoolExpr => visit_bool_expr,
    IntExpr => visit_int_expr,
    BoolConstant => visit_bool_constant,
    IntConstant => visit_int_constant,
    Argument => visit_argument,
    CallExpr => visit_call_expr,
    ReferenceExpr => visit_reference_expr,
    ScalarDecl => visit_scalar_decl,
    ArrayDecl => visit_array_decl,
    FunctionDecl => visit_function_decl,
    ExprStmt => visit_expr_stmt,
    AssignStmt => visit_assign_stmt,
    IfStmt => visit_if_stmt,
    WhileStmt => visit_while_stmt,
    ReturnStmt => visit_return_stmt,
    Scope => visit_scope,
);

impl Ast {
    /// Visit every child of `id` in order, collecting the handler results.
    pub fn walk_children<V>(&self, id: NodeId, visitor: &mut V) -> AstResult<Vec<V::Output>>
    where
        V: Visitor + ?Sized,
    {
        self.children(id)?
            .iter()
            .map(|child| self.visit(*child, visitor))
            .collect()
    }
}
