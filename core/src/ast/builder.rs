//! Node constructors used by the parser.
//!
//! Trees are built bottom-up: members are created first and handed to the
//! constructor of their owner, which takes ownership of them. Each
//! constructor checks that members have the kind the owner requires and are
//! not owned elsewhere, so a completed node never violates the shape its
//! narrowing accessors rely on.

use super::ids::NodeId;
use super::nodes::{
    Argument, ArrayDecl, ArrayType, AssignStmt, BinaryExpr, BoolConstant, BoolExpr, CallExpr,
    ExprStmt, FunctionDecl, Identifier, IfStmt, IntConstant, IntExpr, NodeCategory, NodeData,
    NodeKind, Parameter, PrimitiveType, Program, ReferenceExpr, ReturnStmt, ScalarDecl, Scope,
    UnaryExpr, WhileStmt,
};
use super::ops::{BinaryOp, UnaryOp};
use super::tree::Ast;
use super::types::PrimitiveKind;
use crate::diag::{AstError, AstResult, Location};

impl Ast {
    /// Allocate `kind` and take ownership of `members`, in order.
    fn build(
        &mut self,
        kind: impl Into<NodeKind>,
        location: Location,
        members: &[NodeId],
    ) -> AstResult<NodeId> {
        for (position, member) in members.iter().enumerate() {
            if let Some(owner) = self.node(*member)?.parent {
                return Err(AstError::AlreadyAttached {
                    child: *member,
                    parent: owner,
                });
            }
            if let Some(previous) = members[..position].iter().find(|id| *id == member) {
                return Err(AstError::AlreadyAttached {
                    child: *member,
                    parent: *previous,
                });
            }
        }

        let id = self.alloc(kind.into(), location);
        for member in members {
            self.link(id, *member)?;
        }
        Ok(id)
    }

    fn expect<T: NodeData>(&self, id: NodeId) -> AstResult<()> {
        self.get_as::<T>(id).map(|_| ())
    }

    fn expect_expr(&self, id: NodeId) -> AstResult<()> {
        self.expect_category(id, NodeCategory::Expression, "expression")
            .map(|_| ())
    }

    fn expect_stmt(&self, id: NodeId) -> AstResult<()> {
        self.expect_category(id, NodeCategory::Statement, "statement")
            .map(|_| ())
    }

    /// Create an empty program. Call `set_root` once the tree is complete.
    pub fn program(&mut self, location: Location) -> NodeId {
        self.alloc(Program::default().into(), location)
    }

    pub fn primitive_type(&mut self, kind: PrimitiveKind, location: Location) -> NodeId {
        self.alloc(PrimitiveType { kind }.into(), location)
    }

    pub fn array_type(&mut self, element: NodeId, size: u32, location: Location) -> AstResult<NodeId> {
        self.expect::<PrimitiveType>(element)?;
        self.build(ArrayType { element, size }, location, &[element])
    }

    pub fn identifier(&mut self, name: impl Into<String>, location: Location) -> NodeId {
        self.alloc(Identifier { name: name.into() }.into(), location)
    }

    pub fn parameter(&mut self, type_node: NodeId, ident: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_category(type_node, NodeCategory::Type, "type")?;
        self.expect::<Identifier>(ident)?;
        self.build(Parameter { type_node, ident }, location, &[type_node, ident])
    }

    pub fn unary_expr(&mut self, op: UnaryOp, operand: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_expr(operand)?;
        let node = UnaryExpr {
            op,
            operand,
            annotation: None,
        };
        self.build(node, location, &[operand])
    }

    pub fn binary_expr(
        &mut self,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        location: Location,
    ) -> AstResult<NodeId> {
        self.expect_expr(left)?;
        self.expect_expr(right)?;
        let node = BinaryExpr {
            op,
            left,
            right,
            annotation: None,
        };
        self.build(node, location, &[left, right])
    }

    pub fn bool_expr(&mut self, value: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_expr(value)?;
        let node = BoolExpr {
            value,
            annotation: None,
        };
        self.build(node, location, &[value])
    }

    pub fn int_expr(&mut self, value: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_expr(value)?;
        let node = IntExpr {
            value,
            annotation: None,
        };
        self.build(node, location, &[value])
    }

    /// Boolean literal; accepts `true` and `false`.
    pub fn bool_constant(&mut self, literal: &str, location: Location) -> AstResult<NodeId> {
        let value = match literal {
            "true" => true,
            "false" => false,
            _ => {
                return Err(AstError::InvalidLiteral {
                    kind: "boolean",
                    literal: literal.to_string(),
                })
            }
        };
        let node = BoolConstant {
            literal: literal.to_string(),
            value,
            annotation: None,
        };
        Ok(self.alloc(node.into(), location))
    }

    /// Integer literal. Range checks against `int` are left to later passes.
    pub fn int_constant(&mut self, literal: &str, location: Location) -> AstResult<NodeId> {
        let value = literal
            .parse::<i64>()
            .map_err(|_| AstError::InvalidLiteral {
                kind: "integer",
                literal: literal.to_string(),
            })?;
        let node = IntConstant {
            literal: literal.to_string(),
            value,
            annotation: None,
        };
        Ok(self.alloc(node.into(), location))
    }

    pub fn argument(&mut self, expr: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_expr(expr)?;
        let node = Argument {
            expr,
            annotation: None,
        };
        self.build(node, location, &[expr])
    }

    pub fn call_expr(&mut self, callee: NodeId, args: Vec<NodeId>, location: Location) -> AstResult<NodeId> {
        self.expect::<Identifier>(callee)?;
        for arg in &args {
            self.expect::<Argument>(*arg)?;
        }
        let mut members = vec![callee];
        members.extend(args.iter().copied());
        let node = CallExpr {
            callee,
            args,
            annotation: None,
        };
        self.build(node, location, &members)
    }

    pub fn reference_expr(
        &mut self,
        ident: NodeId,
        index: Option<NodeId>,
        location: Location,
    ) -> AstResult<NodeId> {
        self.expect::<Identifier>(ident)?;
        if let Some(index) = index {
            self.expect_expr(index)?;
        }
        let members: Vec<NodeId> = std::iter::once(ident).chain(index).collect();
        let node = ReferenceExpr {
            ident,
            index,
            annotation: None,
        };
        self.build(node, location, &members)
    }

    pub fn scalar_decl(&mut self, type_node: NodeId, ident: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect::<PrimitiveType>(type_node)?;
        self.expect::<Identifier>(ident)?;
        let node = ScalarDecl {
            type_node,
            ident,
            global: false,
        };
        self.build(node, location, &[type_node, ident])
    }

    pub fn array_decl(&mut self, type_node: NodeId, ident: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect::<ArrayType>(type_node)?;
        self.expect::<Identifier>(ident)?;
        let node = ArrayDecl {
            type_node,
            ident,
            global: false,
        };
        self.build(node, location, &[type_node, ident])
    }

    /// Function declaration; a missing body makes it a prototype.
    pub fn function_decl(
        &mut self,
        return_type: NodeId,
        ident: NodeId,
        params: Vec<NodeId>,
        body: Option<NodeId>,
        location: Location,
    ) -> AstResult<NodeId> {
        self.expect::<PrimitiveType>(return_type)?;
        self.expect::<Identifier>(ident)?;
        for param in &params {
            self.expect::<Parameter>(*param)?;
        }
        if let Some(body) = body {
            self.expect::<Scope>(body)?;
        }
        let mut members = vec![return_type, ident];
        members.extend(params.iter().copied());
        members.extend(body);
        let node = FunctionDecl {
            return_type,
            ident,
            params,
            body,
            prototype: body.is_none(),
            global: false,
        };
        self.build(node, location, &members)
    }

    pub fn expr_stmt(&mut self, expr: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_expr(expr)?;
        self.build(ExprStmt { expr }, location, &[expr])
    }

    pub fn assign_stmt(&mut self, target: NodeId, value: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect::<ReferenceExpr>(target)?;
        self.expect_expr(value)?;
        self.build(AssignStmt { target, value }, location, &[target, value])
    }

    pub fn if_stmt(
        &mut self,
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
        location: Location,
    ) -> AstResult<NodeId> {
        self.expect_expr(cond)?;
        self.expect_stmt(then_branch)?;
        if let Some(branch) = else_branch {
            self.expect_stmt(branch)?;
        }
        let mut members = vec![cond, then_branch];
        members.extend(else_branch);
        let node = IfStmt {
            cond,
            then_branch,
            else_branch,
            has_else: else_branch.is_some(),
        };
        self.build(node, location, &members)
    }

    pub fn while_stmt(&mut self, cond: NodeId, body: NodeId, location: Location) -> AstResult<NodeId> {
        self.expect_expr(cond)?;
        self.expect_stmt(body)?;
        self.build(WhileStmt { cond, body }, location, &[cond, body])
    }

    pub fn return_stmt(&mut self, value: Option<NodeId>, location: Location) -> AstResult<NodeId> {
        if let Some(value) = value {
            self.expect_expr(value)?;
        }
        let members: Vec<NodeId> = value.into_iter().collect();
        self.build(ReturnStmt { value }, location, &members)
    }

    /// Empty block. Declarations go in with `add_decl`, statements with
    /// `add_child`.
    pub fn scope(&mut self, location: Location) -> NodeId {
        self.alloc(Scope::default().into(), location)
    }
}
