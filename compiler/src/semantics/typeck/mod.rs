//! Expression type annotation.
//!
//! `TypeAnnotator` walks a program whose symbol tables were filled by
//! `collect_symbols`, infers the kind of every expression it reaches and
//! checks the typing rules of SmallC statements. Inference only reads the
//! tree; `annotate_types` applies the collected annotations afterwards,
//! which makes this pass the single writer of expression annotations.
//! Every run recomputes the annotations under its root, so the pass can be
//! repeated after declarations change.

pub mod diagnostics;

pub use diagnostics::{DiagnosticSink, SemanticDiagnostic, SemanticErrorCode};

use std::collections::HashMap;

use log::debug;

use smallc_core::ast::{
    Argument, ArrayDecl, AssignStmt, BinaryExpr, BinaryOp, BoolConstant, BoolExpr, CallExpr,
    ExprStmt, FunctionDecl, IfStmt, IntConstant, IntExpr, PrimitiveKind, Program, ReferenceExpr,
    ReturnStmt, ScalarDecl, Scope, TypeShape, UnaryExpr, UnaryOp, WhileStmt,
};
use smallc_core::symbols::VariableEntry;
use smallc_core::{Ast, AstError, AstResult, NodeId, NodeKind, Visitor};

/// Annotate every expression under `root` and return the diagnostics
/// produced while inferring.
///
/// Annotations left by an earlier run are replaced; expressions whose kind
/// can no longer be inferred end up unannotated. Nothing is written unless
/// every inferred annotation can be applied.
pub fn annotate_types(ast: &mut Ast, root: NodeId) -> AstResult<Vec<SemanticDiagnostic>> {
    let mut annotator = TypeAnnotator::new();
    ast.visit(root, &mut annotator)?;
    let (annotations, diagnostics) = annotator.finish();

    let mut inferred = HashMap::with_capacity(annotations.len());
    for (id, kind) in &annotations {
        if let Some(existing) = inferred.insert(*id, *kind) {
            if existing != *kind {
                return Err(AstError::AnnotationConflict {
                    node: *id,
                    existing,
                    requested: *kind,
                });
            }
        }
    }
    let mut expressions = Vec::new();
    for id in ast.descendants(root)? {
        if ast.kind(id)?.is_expression() {
            expressions.push(id);
        }
    }

    for id in expressions {
        ast.clear_annotation(id)?;
    }
    for (id, kind) in inferred {
        ast.annotate(id, kind)?;
    }
    debug!(
        "annotated {} expression(s) under {root:?}, {} diagnostic(s)",
        annotations.len(),
        diagnostics.len()
    );
    Ok(diagnostics)
}

/// Inference pass. `Output` is the kind of the visited expression, or
/// `None` for statements and for expressions whose kind cannot be
/// determined.
#[derive(Debug, Default)]
pub struct TypeAnnotator {
    annotations: Vec<(NodeId, PrimitiveKind)>,
    sink: DiagnosticSink,
}

impl TypeAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inferred annotations in visiting order, plus diagnostics.
    pub fn finish(self) -> (Vec<(NodeId, PrimitiveKind)>, Vec<SemanticDiagnostic>) {
        (self.annotations, self.sink.into_vec())
    }

    fn report(
        &mut self,
        ast: &Ast,
        id: NodeId,
        message: String,
        code: SemanticErrorCode,
    ) -> AstResult<()> {
        let location = ast.location(id)?;
        self.sink.push(message, location, code);
        Ok(())
    }

    fn record(&mut self, id: NodeId, kind: Option<PrimitiveKind>) -> Option<PrimitiveKind> {
        if let Some(kind) = kind {
            self.annotations.push((id, kind));
        }
        kind
    }

    /// Visit `id` and report when its kind is known and differs from
    /// `expected`.
    fn expect(
        &mut self,
        ast: &Ast,
        id: NodeId,
        expected: PrimitiveKind,
        context: &str,
    ) -> AstResult<Option<PrimitiveKind>> {
        let actual = ast.visit(id, self)?;
        match actual {
            Some(actual) if actual != expected => {
                let code = if expected == PrimitiveKind::Bool {
                    SemanticErrorCode::ExpectedBoolean
                } else {
                    SemanticErrorCode::TypeMismatch
                };
                self.report(ast, id, format!("{context} must be {expected}, found {actual}"), code)?;
            }
            _ => {}
        }
        Ok(actual)
    }

    fn visit_all(&mut self, ast: &Ast, ids: &[NodeId]) -> AstResult<()> {
        for id in ids {
            ast.visit(*id, self)?;
        }
        Ok(())
    }
}

/// Entry for `name` in the nearest table at or above `from`.
fn resolve_variable(ast: &Ast, from: NodeId, name: &str) -> AstResult<Option<VariableEntry>> {
    for id in ast.ancestors(from)? {
        if let Some(entry) = ast.var_table(id)?.and_then(|table| table.lookup(name)) {
            return Ok(Some(*entry));
        }
    }
    Ok(None)
}

/// Entry of the array a call argument passes whole, as in `f(a)` with
/// `int a[5]`.
fn whole_array_argument(ast: &Ast, arg: NodeId) -> AstResult<Option<VariableEntry>> {
    let expr = ast.get_as::<Argument>(arg)?.expr();
    let NodeKind::ReferenceExpr(reference) = ast.kind(expr)? else {
        return Ok(None);
    };
    if reference.is_element() {
        return Ok(None);
    }
    let entry = resolve_variable(ast, expr, ast.ident_name(reference.ident())?)?;
    Ok(entry.filter(|entry| entry.is_array))
}

fn is_argument_value(ast: &Ast, id: NodeId) -> AstResult<bool> {
    match ast.parent(id)? {
        Some(parent) => Ok(matches!(ast.kind(parent)?, NodeKind::Argument(_))),
        None => Ok(false),
    }
}

/// Array-ness and extent agree; element kinds are checked separately.
/// An array parameter of unspecified size takes arrays of any size.
fn shapes_fit(expected: TypeShape, given: TypeShape) -> bool {
    match (expected, given) {
        (TypeShape::Primitive(_), TypeShape::Primitive(_)) => true,
        (TypeShape::Array(_, expected), TypeShape::Array(_, given)) => {
            expected == 0 || expected == given
        }
        _ => false,
    }
}

impl Visitor for TypeAnnotator {
    type Output = Option<PrimitiveKind>;

    fn operation(&self) -> &'static str {
        "annotate-types"
    }

    fn visit_program(&mut self, ast: &Ast, id: NodeId, _: &Program) -> AstResult<Self::Output> {
        self.visit_all(ast, ast.children(id)?)?;
        Ok(None)
    }

    fn visit_scalar_decl(&mut self, _: &Ast, _: NodeId, _: &ScalarDecl) -> AstResult<Self::Output> {
        Ok(None)
    }

    fn visit_array_decl(&mut self, _: &Ast, _: NodeId, _: &ArrayDecl) -> AstResult<Self::Output> {
        Ok(None)
    }

    fn visit_function_decl(&mut self, ast: &Ast, _: NodeId, node: &FunctionDecl) -> AstResult<Self::Output> {
        if let Some(body) = node.body() {
            ast.visit(body, self)?;
        }
        Ok(None)
    }

    fn visit_scope(&mut self, ast: &Ast, id: NodeId, _: &Scope) -> AstResult<Self::Output> {
        self.visit_all(ast, &ast.scope_statements(id)?)?;
        Ok(None)
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, _: NodeId, node: &ExprStmt) -> AstResult<Self::Output> {
        ast.visit(node.expr(), self)?;
        Ok(None)
    }

    fn visit_assign_stmt(&mut self, ast: &Ast, _: NodeId, node: &AssignStmt) -> AstResult<Self::Output> {
        if let Some(target) = ast.visit(node.target(), self)? {
            self.expect(ast, node.value(), target, "assigned value")?;
        } else {
            ast.visit(node.value(), self)?;
        }
        Ok(None)
    }

    fn visit_if_stmt(&mut self, ast: &Ast, _: NodeId, node: &IfStmt) -> AstResult<Self::Output> {
        self.expect(ast, node.cond(), PrimitiveKind::Bool, "condition")?;
        ast.visit(node.then_branch(), self)?;
        if let Some(branch) = node.else_branch() {
            ast.visit(branch, self)?;
        }
        Ok(None)
    }

    fn visit_while_stmt(&mut self, ast: &Ast, _: NodeId, node: &WhileStmt) -> AstResult<Self::Output> {
        self.expect(ast, node.cond(), PrimitiveKind::Bool, "condition")?;
        ast.visit(node.body(), self)?;
        Ok(None)
    }

    fn visit_return_stmt(&mut self, ast: &Ast, id: NodeId, node: &ReturnStmt) -> AstResult<Self::Output> {
        let Some(func) = ast.function_of(id)? else {
            self.report(ast, id, "return outside of a function".to_string(), SemanticErrorCode::MalformedTree)?;
            if let Some(value) = node.value() {
                ast.visit(value, self)?;
            }
            return Ok(None);
        };
        let expected = ast.return_kind(func)?;
        match node.value() {
            Some(value) if expected == PrimitiveKind::Void => {
                ast.visit(value, self)?;
                self.report(ast, id, "void function returns a value".to_string(), SemanticErrorCode::TypeMismatch)?;
            }
            Some(value) => {
                self.expect(ast, value, expected, "returned value")?;
            }
            None if expected != PrimitiveKind::Void => {
                self.report(ast, id, format!("missing {expected} return value"), SemanticErrorCode::TypeMismatch)?;
            }
            None => {}
        }
        Ok(None)
    }

    fn visit_int_constant(&mut self, _: &Ast, id: NodeId, _: &IntConstant) -> AstResult<Self::Output> {
        Ok(self.record(id, Some(PrimitiveKind::Int)))
    }

    fn visit_bool_constant(&mut self, _: &Ast, id: NodeId, _: &BoolConstant) -> AstResult<Self::Output> {
        Ok(self.record(id, Some(PrimitiveKind::Bool)))
    }

    fn visit_int_expr(&mut self, ast: &Ast, id: NodeId, node: &IntExpr) -> AstResult<Self::Output> {
        self.expect(ast, node.value(), PrimitiveKind::Int, "integer expression")?;
        Ok(self.record(id, Some(PrimitiveKind::Int)))
    }

    fn visit_bool_expr(&mut self, ast: &Ast, id: NodeId, node: &BoolExpr) -> AstResult<Self::Output> {
        self.expect(ast, node.value(), PrimitiveKind::Bool, "boolean expression")?;
        Ok(self.record(id, Some(PrimitiveKind::Bool)))
    }

    fn visit_unary_expr(&mut self, ast: &Ast, id: NodeId, node: &UnaryExpr) -> AstResult<Self::Output> {
        let kind = match node.op() {
            UnaryOp::Not => PrimitiveKind::Bool,
            UnaryOp::Minus => PrimitiveKind::Int,
        };
        self.expect(ast, node.operand(), kind, "operand")?;
        Ok(self.record(id, Some(kind)))
    }

    fn visit_binary_expr(&mut self, ast: &Ast, id: NodeId, node: &BinaryExpr) -> AstResult<Self::Output> {
        let op = node.op();
        let result = if op.is_arithmetic() {
            self.expect(ast, node.left(), PrimitiveKind::Int, "left operand")?;
            self.expect(ast, node.right(), PrimitiveKind::Int, "right operand")?;
            PrimitiveKind::Int
        } else if op.is_logical() {
            self.expect(ast, node.left(), PrimitiveKind::Bool, "left operand")?;
            self.expect(ast, node.right(), PrimitiveKind::Bool, "right operand")?;
            PrimitiveKind::Bool
        } else if matches!(op, BinaryOp::Equal | BinaryOp::NotEqual) {
            if let Some(left) = ast.visit(node.left(), self)? {
                self.expect(ast, node.right(), left, "right operand")?;
            } else {
                ast.visit(node.right(), self)?;
            }
            PrimitiveKind::Bool
        } else {
            self.expect(ast, node.left(), PrimitiveKind::Int, "left operand")?;
            self.expect(ast, node.right(), PrimitiveKind::Int, "right operand")?;
            PrimitiveKind::Bool
        };
        Ok(self.record(id, Some(result)))
    }

    fn visit_argument(&mut self, ast: &Ast, id: NodeId, node: &Argument) -> AstResult<Self::Output> {
        let kind = ast.visit(node.expr(), self)?;
        Ok(self.record(id, kind))
    }

    fn visit_call_expr(&mut self, ast: &Ast, id: NodeId, node: &CallExpr) -> AstResult<Self::Output> {
        let name = ast.ident_name(node.callee())?;
        let signature = match ast.program_of(id)? {
            Some(program) => ast.func_table(program)?.lookup(name).cloned(),
            None => None,
        };
        let Some(signature) = signature else {
            self.report(ast, id, format!("unknown function `{name}`"), SemanticErrorCode::UnresolvedSymbol)?;
            self.visit_all(ast, node.args())?;
            return Ok(None);
        };

        if signature.arity() != node.num_args() {
            let message = format!(
                "`{name}` takes {} argument(s), {} given",
                signature.arity(),
                node.num_args()
            );
            self.report(ast, id, message, SemanticErrorCode::ArityMismatch)?;
        }
        for (position, arg) in node.args().iter().enumerate() {
            match signature.params.get(position) {
                Some(param) => {
                    let context = format!("argument {} of `{name}`", position + 1);
                    let actual = self.expect(ast, *arg, param.kind, &context)?;
                    let given = match whole_array_argument(ast, *arg)? {
                        Some(entry) => Some(entry.shape()),
                        None => actual.map(TypeShape::Primitive),
                    };
                    if let Some(given) = given.filter(|given| !shapes_fit(param.shape(), *given)) {
                        let message = format!("{context} must be {}, found {given}", param.shape());
                        self.report(ast, *arg, message, SemanticErrorCode::TypeMismatch)?;
                    }
                }
                None => {
                    ast.visit(*arg, self)?;
                }
            }
        }
        Ok(self.record(id, Some(signature.return_type)))
    }

    fn visit_reference_expr(&mut self, ast: &Ast, id: NodeId, node: &ReferenceExpr) -> AstResult<Self::Output> {
        let name = ast.ident_name(node.ident())?;
        let entry = resolve_variable(ast, id, name)?;
        if let Some(index) = node.index() {
            self.expect(ast, index, PrimitiveKind::Int, "array index")?;
        }
        let Some(entry) = entry else {
            self.report(ast, id, format!("unknown variable `{name}`"), SemanticErrorCode::UnresolvedSymbol)?;
            return Ok(None);
        };
        if node.is_element() && !entry.is_array {
            self.report(ast, id, format!("`{name}` is not an array"), SemanticErrorCode::TypeMismatch)?;
        }
        if !node.is_element() && entry.is_array && !is_argument_value(ast, id)? {
            let message = format!("array `{name}` used without an index");
            self.report(ast, id, message, SemanticErrorCode::TypeMismatch)?;
        }
        Ok(self.record(id, Some(entry.kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantics::symbols::collect_symbols;
    use smallc_core::Location;

    fn at(line: u32, column: u32) -> Location {
        Location::new(line, column)
    }

    fn reference(ast: &mut Ast, name: &str, line: u32) -> NodeId {
        let ident = ast.identifier(name, at(line, 3));
        ast.reference_expr(ident, None, at(line, 3)).unwrap()
    }

    /// `int main() { <decls> <stmts> }` with `int g;` as a global.
    fn program_with(
        ast: &mut Ast,
        build: impl FnOnce(&mut Ast, NodeId),
    ) -> NodeId {
        program_with_globals(ast, |_, _| {}, build)
    }

    /// Like `program_with`, with extra top-level items added by `globals`
    /// between `g` and `main`.
    fn program_with_globals(
        ast: &mut Ast,
        globals: impl FnOnce(&mut Ast, NodeId),
        build: impl FnOnce(&mut Ast, NodeId),
    ) -> NodeId {
        let program = ast.program(at(1, 1));
        let gty = ast.primitive_type(PrimitiveKind::Int, at(1, 1));
        let gname = ast.identifier("g", at(1, 5));
        let global = ast.scalar_decl(gty, gname, at(1, 1)).unwrap();
        ast.add_child(program, global).unwrap();
        globals(ast, program);

        let body = ast.scope(at(2, 12));
        build(ast, body);
        let ret = ast.primitive_type(PrimitiveKind::Int, at(2, 1));
        let name = ast.identifier("main", at(2, 5));
        let func = ast.function_decl(ret, name, Vec::new(), Some(body), at(2, 1)).unwrap();
        ast.add_child(program, func).unwrap();
        ast.set_root(program).unwrap();
        assert!(collect_symbols(ast, program).unwrap().diagnostics.is_empty());
        program
    }

    #[test]
    fn annotates_references_through_the_nearest_table() {
        let mut ast = Ast::new();
        let mut target = None;
        let program = program_with(&mut ast, |ast, body| {
            let ty = ast.primitive_type(PrimitiveKind::Bool, at(3, 3));
            let name = ast.identifier("g", at(3, 8));
            let local = ast.scalar_decl(ty, name, at(3, 3)).unwrap();
            ast.add_decl(body, local).unwrap();

            let g = reference(ast, "g", 4);
            let ret = ast.return_stmt(Some(g), at(4, 3)).unwrap();
            ast.add_child(body, ret).unwrap();
            target = Some(g);
        });
        let g = target.unwrap();

        let diagnostics = annotate_types(&mut ast, program).unwrap();
        assert_eq!(ast.expr_type(g).unwrap(), Some(PrimitiveKind::Bool));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, SemanticErrorCode::TypeMismatch);
        assert_eq!(diagnostics[0].message, "returned value must be int, found bool");
    }

    #[test]
    fn conditions_must_be_boolean() {
        let mut ast = Ast::new();
        let mut cond = None;
        let program = program_with(&mut ast, |ast, body| {
            let one = ast.int_constant("1", at(3, 7)).unwrap();
            let then_branch = ast.scope(at(3, 10));
            let stmt = ast.if_stmt(one, then_branch, None, at(3, 3)).unwrap();
            ast.add_child(body, stmt).unwrap();
            let zero = ast.int_constant("0", at(4, 10)).unwrap();
            let ret = ast.return_stmt(Some(zero), at(4, 3)).unwrap();
            ast.add_child(body, ret).unwrap();
            cond = Some(one);
        });

        let diagnostics = annotate_types(&mut ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, SemanticErrorCode::ExpectedBoolean);
        assert_eq!(diagnostics[0].location, at(3, 7));
        assert_eq!(ast.expr_type(cond.unwrap()).unwrap(), Some(PrimitiveKind::Int));
    }

    #[test]
    fn unknown_names_are_unresolved() {
        let mut ast = Ast::new();
        let program = program_with(&mut ast, |ast, body| {
            let missing = reference(ast, "nope", 3);
            let stmt = ast.expr_stmt(missing, at(3, 3)).unwrap();
            ast.add_child(body, stmt).unwrap();

            let callee = ast.identifier("later", at(4, 3));
            let call = ast.call_expr(callee, Vec::new(), at(4, 3)).unwrap();
            let stmt = ast.expr_stmt(call, at(4, 3)).unwrap();
            ast.add_child(body, stmt).unwrap();
        });

        let diagnostics = annotate_types(&mut ast, program).unwrap();
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, ["unknown variable `nope`", "unknown function `later`"]);
        assert!(diagnostics
            .iter()
            .all(|d| d.code == SemanticErrorCode::UnresolvedSymbol));
    }

    #[test]
    fn calls_check_arity_and_argument_kinds() {
        let mut ast = Ast::new();
        let mut call_id = None;
        let program = program_with(&mut ast, |ast, body| {
            let callee = ast.identifier("main", at(3, 10));
            let flag = ast.bool_constant("false", at(3, 15)).unwrap();
            let arg = ast.argument(flag, at(3, 15)).unwrap();
            let call = ast.call_expr(callee, vec![arg], at(3, 10)).unwrap();
            let one = ast.int_constant("1", at(3, 24)).unwrap();
            let sum = ast.binary_expr(BinaryOp::Addition, call, one, at(3, 22)).unwrap();
            let ret = ast.return_stmt(Some(sum), at(3, 3)).unwrap();
            ast.add_child(body, ret).unwrap();
            call_id = Some(call);
        });

        let diagnostics = annotate_types(&mut ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, SemanticErrorCode::ArityMismatch);
        assert_eq!(ast.expr_type(call_id.unwrap()).unwrap(), Some(PrimitiveKind::Int));
    }

    #[test]
    fn running_twice_keeps_annotations() {
        let mut ast = Ast::new();
        let program = program_with(&mut ast, |ast, body| {
            let two = ast.int_constant("2", at(3, 10)).unwrap();
            let ret = ast.return_stmt(Some(two), at(3, 3)).unwrap();
            ast.add_child(body, ret).unwrap();
        });

        assert!(annotate_types(&mut ast, program).unwrap().is_empty());
        assert!(annotate_types(&mut ast, program).unwrap().is_empty());
    }

    #[test]
    fn rerunning_after_a_retype_replaces_annotations() {
        let mut ast = Ast::new();
        let mut refs = None;
        let program = program_with(&mut ast, |ast, body| {
            let g = reference(ast, "g", 3);
            let stmt = ast.expr_stmt(g, at(3, 3)).unwrap();
            ast.add_child(body, stmt).unwrap();
            let h = reference(ast, "h", 4);
            let stmt = ast.expr_stmt(h, at(4, 3)).unwrap();
            ast.add_child(body, stmt).unwrap();
            let zero = ast.int_constant("0", at(5, 10)).unwrap();
            let ret = ast.return_stmt(Some(zero), at(5, 3)).unwrap();
            ast.add_child(body, ret).unwrap();
            refs = Some((g, h));
        });
        let (g, h) = refs.unwrap();

        let first = annotate_types(&mut ast, program).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].code, SemanticErrorCode::UnresolvedSymbol);
        assert_eq!(ast.expr_type(g).unwrap(), Some(PrimitiveKind::Int));
        assert_eq!(ast.expr_type(h).unwrap(), None);

        let global = ast.child(program, 0).unwrap();
        let (ty, _) = ast.decl_parts(global).unwrap();
        ast.set_element_kind(ty, PrimitiveKind::Bool).unwrap();
        let table = ast.var_table_mut(program).unwrap().unwrap();
        table.lookup_mut("g").unwrap().kind = PrimitiveKind::Bool;
        table.declare("h", VariableEntry::scalar(PrimitiveKind::Bool));

        assert!(annotate_types(&mut ast, program).unwrap().is_empty());
        assert_eq!(ast.expr_type(g).unwrap(), Some(PrimitiveKind::Bool));
        assert_eq!(ast.expr_type(h).unwrap(), Some(PrimitiveKind::Bool));
    }

    #[test]
    fn whole_arrays_need_an_index_outside_calls() {
        let mut ast = Ast::new();
        let mut target = None;
        let program = program_with(&mut ast, |ast, body| {
            let element = ast.primitive_type(PrimitiveKind::Int, at(3, 3));
            let ty = ast.array_type(element, 5, at(3, 3)).unwrap();
            let name = ast.identifier("a", at(3, 7));
            let decl = ast.array_decl(ty, name, at(3, 3)).unwrap();
            ast.add_decl(body, decl).unwrap();

            let a = reference(ast, "a", 4);
            let one = ast.int_constant("1", at(4, 7)).unwrap();
            let assign = ast.assign_stmt(a, one, at(4, 3)).unwrap();
            ast.add_child(body, assign).unwrap();

            let index = ast.int_constant("0", at(5, 5)).unwrap();
            let name = ast.identifier("a", at(5, 3));
            let element = ast.reference_expr(name, Some(index), at(5, 3)).unwrap();
            let two = ast.int_constant("2", at(5, 10)).unwrap();
            let assign = ast.assign_stmt(element, two, at(5, 3)).unwrap();
            ast.add_child(body, assign).unwrap();

            let zero = ast.int_constant("0", at(6, 10)).unwrap();
            let ret = ast.return_stmt(Some(zero), at(6, 3)).unwrap();
            ast.add_child(body, ret).unwrap();
            target = Some(a);
        });

        let diagnostics = annotate_types(&mut ast, program).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, SemanticErrorCode::TypeMismatch);
        assert_eq!(diagnostics[0].message, "array `a` used without an index");
        assert_eq!(diagnostics[0].location, at(4, 3));
        assert_eq!(ast.expr_type(target.unwrap()).unwrap(), Some(PrimitiveKind::Int));
    }

    /// `int <name>(int <param>);` as a prototype; `size` of `None` declares
    /// a scalar parameter.
    fn prototype(ast: &mut Ast, program: NodeId, name: &str, size: Option<u32>) {
        let element = ast.primitive_type(PrimitiveKind::Int, at(1, 1));
        let param_ty = match size {
            Some(size) => ast.array_type(element, size, at(1, 1)).unwrap(),
            None => element,
        };
        let param_name = ast.identifier("p", at(1, 1));
        let param = ast.parameter(param_ty, param_name, at(1, 1)).unwrap();
        let ret = ast.primitive_type(PrimitiveKind::Int, at(1, 1));
        let ident = ast.identifier(name, at(1, 1));
        let func = ast.function_decl(ret, ident, vec![param], None, at(1, 1)).unwrap();
        ast.add_child(program, func).unwrap();
    }

    #[test]
    fn arguments_must_match_the_parameter_shape() {
        let mut ast = Ast::new();
        let program = program_with_globals(
            &mut ast,
            |ast, program| {
                prototype(ast, program, "sum", Some(0));
                prototype(ast, program, "twice", None);
                prototype(ast, program, "first", Some(4));
            },
            |ast, body| {
                let element = ast.primitive_type(PrimitiveKind::Int, at(3, 3));
                let ty = ast.array_type(element, 3, at(3, 3)).unwrap();
                let name = ast.identifier("a", at(3, 7));
                let decl = ast.array_decl(ty, name, at(3, 3)).unwrap();
                ast.add_decl(body, decl).unwrap();

                let calls: [(&str, Option<&str>, u32); 4] = [
                    ("sum", None, 4),
                    ("sum", Some("a"), 5),
                    ("twice", Some("a"), 6),
                    ("first", Some("a"), 7),
                ];
                for (callee, passed, line) in calls {
                    let value = match passed {
                        Some(array) => reference(ast, array, line),
                        None => ast.int_constant("1", at(line, 3)).unwrap(),
                    };
                    let arg = ast.argument(value, at(line, 3)).unwrap();
                    let ident = ast.identifier(callee, at(line, 3));
                    let call = ast.call_expr(ident, vec![arg], at(line, 3)).unwrap();
                    let stmt = ast.expr_stmt(call, at(line, 3)).unwrap();
                    ast.add_child(body, stmt).unwrap();
                }

                let zero = ast.int_constant("0", at(8, 10)).unwrap();
                let ret = ast.return_stmt(Some(zero), at(8, 3)).unwrap();
                ast.add_child(body, ret).unwrap();
            },
        );

        let diagnostics = annotate_types(&mut ast, program).unwrap();
        let found: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.location.line, d.message.as_str()))
            .collect();
        assert_eq!(
            found,
            [
                (4, "argument 1 of `sum` must be int[], found int"),
                (6, "argument 1 of `twice` must be int, found int[3]"),
                (7, "argument 1 of `first` must be int[4], found int[3]"),
            ]
        );
        assert!(diagnostics
            .iter()
            .all(|d| d.code == SemanticErrorCode::TypeMismatch));
    }
}
