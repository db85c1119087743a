//! Structural verification of a built tree.
//!
//! The builder and the typed setters reject malformed members, and
//! `Ast::replace` holds a replacement to the rule of the slot it fills.
//! `add_child` stays generic though, and flags such as `has_else` can be
//! set independently, so a pass that rewrites the tree can still break the
//! shape later phases rely on. The verifier re-checks the ownership
//! records and the per-kind member rules and reports every violation as a
//! `MalformedTree` diagnostic.

use log::debug;

use smallc_core::ast::NodeCategory;
use smallc_core::{Ast, AstResult, NodeId, NodeKind};

use crate::semantics::typeck::diagnostics::{
    DiagnosticSink, SemanticDiagnostic, SemanticErrorCode,
};

/// Check the subtree rooted at `root` and return the violations found.
pub fn verify_tree(ast: &Ast, root: NodeId) -> AstResult<Vec<SemanticDiagnostic>> {
    let mut verifier = StructureVerifier::new();
    verifier.verify(ast, root)?;
    Ok(verifier.finish())
}

#[derive(Debug, Default)]
pub struct StructureVerifier {
    sink: DiagnosticSink,
}

impl StructureVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verify(&mut self, ast: &Ast, root: NodeId) -> AstResult<()> {
        let expected_root = ast.root_of(root)?;
        let nodes = ast.descendants(root)?;
        for id in &nodes {
            self.check_links(ast, *id)?;
            if ast.root_of(*id)? != expected_root {
                self.report(ast, *id, format!("{id:?} does not share the root of {root:?}"))?;
            }
            self.check_shape(ast, *id)?;
        }
        debug!(
            "verified {} node(s) under {root:?}, {} violation(s)",
            nodes.len(),
            self.sink.len()
        );
        Ok(())
    }

    pub fn finish(self) -> Vec<SemanticDiagnostic> {
        self.sink.into_vec()
    }

    fn report(&mut self, ast: &Ast, id: NodeId, message: String) -> AstResult<()> {
        let location = ast.location(id)?;
        self.sink.push(message, location, SemanticErrorCode::MalformedTree);
        Ok(())
    }

    fn check_links(&mut self, ast: &Ast, id: NodeId) -> AstResult<()> {
        let node = ast.node(id)?;
        let children = node.children();
        for (position, child) in children.iter().enumerate() {
            if ast.parent(*child)? != Some(id) {
                self.report(ast, *child, format!("{child:?} does not name {id:?} as its parent"))?;
            }
            if children[..position].contains(child) {
                self.report(ast, id, format!("{child:?} is listed twice under {id:?}"))?;
            }
        }
        let members = node.kind().members();
        for member in &members {
            if !children.contains(member) {
                self.report(ast, id, format!("member {member:?} is missing from the children of {id:?}"))?;
            }
        }
        if !matches!(node.kind(), NodeKind::Program(_) | NodeKind::Scope(_)) {
            for child in children.iter().filter(|child| !members.contains(child)) {
                self.report(ast, id, format!("{child:?} is not a member of {id:?}"))?;
            }
        }
        Ok(())
    }

    fn check_shape(&mut self, ast: &Ast, id: NodeId) -> AstResult<()> {
        match ast.kind(id)? {
            NodeKind::Program(_) => {
                for child in ast.children(id)? {
                    self.expect_category(ast, id, *child, NodeCategory::Declaration, "top-level item")?;
                }
            }
            NodeKind::ArrayType(array) => {
                self.expect_kind(ast, id, array.element(), "PrimitiveType", "array element type")?;
            }
            NodeKind::Parameter(param) => {
                self.expect_category(ast, id, param.type_node(), NodeCategory::Type, "parameter type")?;
                self.expect_kind(ast, id, param.ident(), "Identifier", "parameter name")?;
            }
            NodeKind::UnaryExpr(expr) => {
                self.expect_category(ast, id, expr.operand(), NodeCategory::Expression, "operand")?;
            }
            NodeKind::BinaryExpr(expr) => {
                self.expect_category(ast, id, expr.left(), NodeCategory::Expression, "left operand")?;
                self.expect_category(ast, id, expr.right(), NodeCategory::Expression, "right operand")?;
            }
            NodeKind::BoolExpr(expr) => {
                self.expect_category(ast, id, expr.value(), NodeCategory::Expression, "wrapped value")?;
            }
            NodeKind::IntExpr(expr) => {
                self.expect_category(ast, id, expr.value(), NodeCategory::Expression, "wrapped value")?;
            }
            NodeKind::Argument(arg) => {
                self.expect_category(ast, id, arg.expr(), NodeCategory::Expression, "argument value")?;
            }
            NodeKind::CallExpr(call) => {
                self.expect_kind(ast, id, call.callee(), "Identifier", "callee")?;
                for arg in call.args() {
                    self.expect_kind(ast, id, *arg, "Argument", "call argument")?;
                }
            }
            NodeKind::ReferenceExpr(reference) => {
                self.expect_kind(ast, id, reference.ident(), "Identifier", "referenced name")?;
                if let Some(index) = reference.index() {
                    self.expect_category(ast, id, index, NodeCategory::Expression, "index")?;
                }
            }
            NodeKind::ScalarDecl(decl) => {
                self.expect_kind(ast, id, decl.type_node(), "PrimitiveType", "scalar type")?;
                self.expect_kind(ast, id, decl.ident(), "Identifier", "declared name")?;
            }
            NodeKind::ArrayDecl(decl) => {
                self.expect_kind(ast, id, decl.type_node(), "ArrayType", "array type")?;
                self.expect_kind(ast, id, decl.ident(), "Identifier", "declared name")?;
            }
            NodeKind::FunctionDecl(func) => {
                self.expect_kind(ast, id, func.return_type(), "PrimitiveType", "return type")?;
                self.expect_kind(ast, id, func.ident(), "Identifier", "function name")?;
                for param in func.params() {
                    self.expect_kind(ast, id, *param, "Parameter", "parameter")?;
                }
                if let Some(body) = func.body() {
                    self.expect_kind(ast, id, body, "Scope", "function body")?;
                }
                if func.is_prototype() != func.body().is_none() {
                    self.report(ast, id, format!("prototype flag of {id:?} disagrees with its body"))?;
                }
            }
            NodeKind::ExprStmt(stmt) => {
                self.expect_category(ast, id, stmt.expr(), NodeCategory::Expression, "statement expression")?;
            }
            NodeKind::AssignStmt(stmt) => {
                self.expect_kind(ast, id, stmt.target(), "ReferenceExpr", "assignment target")?;
                self.expect_category(ast, id, stmt.value(), NodeCategory::Expression, "assigned value")?;
            }
            NodeKind::IfStmt(stmt) => {
                self.expect_category(ast, id, stmt.cond(), NodeCategory::Expression, "condition")?;
                self.expect_category(ast, id, stmt.then_branch(), NodeCategory::Statement, "then branch")?;
                if let Some(branch) = stmt.else_branch() {
                    self.expect_category(ast, id, branch, NodeCategory::Statement, "else branch")?;
                    if !stmt.has_else() {
                        self.report(ast, id, format!("{id:?} has an else branch but no else flag"))?;
                    }
                }
            }
            NodeKind::WhileStmt(stmt) => {
                self.expect_category(ast, id, stmt.cond(), NodeCategory::Expression, "condition")?;
                self.expect_category(ast, id, stmt.body(), NodeCategory::Statement, "loop body")?;
            }
            NodeKind::ReturnStmt(stmt) => {
                if let Some(value) = stmt.value() {
                    self.expect_category(ast, id, value, NodeCategory::Expression, "returned value")?;
                }
            }
            NodeKind::Scope(scope) => {
                for decl in scope.decls() {
                    self.expect_category(ast, id, *decl, NodeCategory::Declaration, "local declaration")?;
                }
                for stmt in ast.scope_statements(id)? {
                    self.expect_category(ast, id, stmt, NodeCategory::Statement, "scope statement")?;
                }
            }
            NodeKind::PrimitiveType(_)
            | NodeKind::Identifier(_)
            | NodeKind::BoolConstant(_)
            | NodeKind::IntConstant(_) => {}
        }
        Ok(())
    }

    fn expect_kind(
        &mut self,
        ast: &Ast,
        owner: NodeId,
        member: NodeId,
        expected: &str,
        role: &str,
    ) -> AstResult<()> {
        let actual = ast.kind(member)?.name();
        if actual != expected {
            self.report(ast, owner, format!("{role} of {owner:?} is a {actual}, expected {expected}"))?;
        }
        Ok(())
    }

    fn expect_category(
        &mut self,
        ast: &Ast,
        owner: NodeId,
        member: NodeId,
        expected: NodeCategory,
        role: &str,
    ) -> AstResult<()> {
        let kind = ast.kind(member)?;
        if kind.category() != expected {
            let message = format!(
                "{role} of {owner:?} is a {}, expected a {expected:?} node",
                kind.name()
            );
            self.report(ast, owner, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallc_core::ast::{BinaryOp, FunctionDecl, PrimitiveKind};
    use smallc_core::Location;

    fn at(line: u32, column: u32) -> Location {
        Location::new(line, column)
    }

    fn counter_program(ast: &mut Ast) -> (NodeId, NodeId) {
        let program = ast.program(at(1, 1));
        let ty = ast.primitive_type(PrimitiveKind::Int, at(1, 1));
        let name = ast.identifier("count", at(1, 5));
        let decl = ast.scalar_decl(ty, name, at(1, 1)).unwrap();
        ast.add_child(program, decl).unwrap();

        let body = ast.scope(at(2, 1));
        let target_name = ast.identifier("count", at(3, 3));
        let target = ast.reference_expr(target_name, None, at(3, 3)).unwrap();
        let lhs_name = ast.identifier("count", at(3, 11));
        let lhs = ast.reference_expr(lhs_name, None, at(3, 11)).unwrap();
        let one = ast.int_constant("1", at(3, 19)).unwrap();
        let sum = ast.binary_expr(BinaryOp::Addition, lhs, one, at(3, 17)).unwrap();
        let assign = ast.assign_stmt(target, sum, at(3, 3)).unwrap();
        ast.add_child(body, assign).unwrap();

        let ret_ty = ast.primitive_type(PrimitiveKind::Void, at(2, 1));
        let fname = ast.identifier("tick", at(2, 6));
        let func = ast.function_decl(ret_ty, fname, Vec::new(), Some(body), at(2, 1)).unwrap();
        ast.add_child(program, func).unwrap();
        ast.set_root(program).unwrap();
        (program, one)
    }

    #[test]
    fn well_formed_tree_has_no_violations() {
        let mut ast = Ast::new();
        let (program, _) = counter_program(&mut ast);
        assert!(verify_tree(&ast, program).unwrap().is_empty());
    }

    #[test]
    fn stray_children_of_an_expression_are_reported() {
        let mut ast = Ast::new();
        let (program, one) = counter_program(&mut ast);
        let sum = ast.parent(one).unwrap().unwrap();
        let stray = ast.scope(at(3, 19));
        ast.add_child(sum, stray).unwrap();

        let diagnostics = verify_tree(&ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, SemanticErrorCode::MalformedTree);
        assert_eq!(diagnostics[0].location, at(3, 17));
        assert!(diagnostics[0].message.contains("is not a member"));
    }

    #[test]
    fn declarations_added_as_plain_scope_children_are_reported() {
        let mut ast = Ast::new();
        let (program, _) = counter_program(&mut ast);
        let func = ast.child(program, 1).unwrap();
        let body = ast.get_as::<FunctionDecl>(func).unwrap().body().unwrap();
        let ty = ast.primitive_type(PrimitiveKind::Int, at(4, 3));
        let name = ast.identifier("late", at(4, 7));
        let decl = ast.scalar_decl(ty, name, at(4, 3)).unwrap();
        ast.add_child(body, decl).unwrap();

        let diagnostics = verify_tree(&ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, at(2, 1));
        assert!(diagnostics[0].message.contains("scope statement"));
    }

    #[test]
    fn else_branch_without_its_flag_is_reported() {
        let mut ast = Ast::new();
        let (program, _) = counter_program(&mut ast);
        let func = ast.child(program, 1).unwrap();
        let body = ast.get_as::<FunctionDecl>(func).unwrap().body().unwrap();
        let cond = ast.bool_constant("true", at(5, 7)).unwrap();
        let then_branch = ast.scope(at(5, 13));
        let stmt = ast.if_stmt(cond, then_branch, None, at(5, 3)).unwrap();
        let else_branch = ast.scope(at(5, 21));
        ast.set_else(stmt, Some(else_branch)).unwrap();
        ast.set_has_else(stmt, false).unwrap();
        ast.add_child(body, stmt).unwrap();

        let diagnostics = verify_tree(&ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, at(5, 3));
        assert!(diagnostics[0].message.contains("no else flag"));
    }

    #[test]
    fn statements_in_the_program_body_are_reported() {
        let mut ast = Ast::new();
        let (program, _) = counter_program(&mut ast);
        let stray = ast.return_stmt(None, at(9, 1)).unwrap();
        ast.add_child(program, stray).unwrap();

        let diagnostics = verify_tree(&ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("top-level item"));
    }
}
