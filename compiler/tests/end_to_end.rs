use smallc_compiler::semantics::constant_conditions;
use smallc_compiler::{annotate_types, collect_symbols, format_tree, verify_tree, FormatOptions};
use smallc_core::ast::{BinaryOp, IfStmt, PrimitiveKind, ReturnStmt};
use smallc_core::{Ast, Location, NodeId};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Conditional {
    ast: Ast,
    program: NodeId,
    func: NodeId,
    if_stmt: NodeId,
    cond: NodeId,
    then_return: NodeId,
    else_return: NodeId,
}

/// ```text
/// int main(int x) {
///   if (x < 10) {
///     return 1;
///   } else {
///     return 0;
///   }
/// }
/// ```
fn conditional() -> Conditional {
    let mut ast = Ast::new();
    let at = Location::new;

    let program = ast.program(at(1, 1));
    let ret_ty = ast.primitive_type(PrimitiveKind::Int, at(1, 1));
    let name = ast.identifier("main", at(1, 5));
    let param_ty = ast.primitive_type(PrimitiveKind::Int, at(1, 10));
    let param_name = ast.identifier("x", at(1, 14));
    let param = ast.parameter(param_ty, param_name, at(1, 10)).unwrap();
    let body = ast.scope(at(1, 17));

    let x_name = ast.identifier("x", at(2, 7));
    let x = ast.reference_expr(x_name, None, at(2, 7)).unwrap();
    let ten = ast.int_constant("10", at(2, 11)).unwrap();
    let cond = ast.binary_expr(BinaryOp::LessThan, x, ten, at(2, 9)).unwrap();

    let then_branch = ast.scope(at(2, 15));
    let one = ast.int_constant("1", at(3, 12)).unwrap();
    let then_return = ast.return_stmt(Some(one), at(3, 5)).unwrap();
    ast.add_child(then_branch, then_return).unwrap();

    let else_branch = ast.scope(at(4, 10));
    let zero = ast.int_constant("0", at(5, 12)).unwrap();
    let else_return = ast.return_stmt(Some(zero), at(5, 5)).unwrap();
    ast.add_child(else_branch, else_return).unwrap();

    let if_stmt = ast
        .if_stmt(cond, then_branch, Some(else_branch), at(2, 3))
        .unwrap();
    ast.add_child(body, if_stmt).unwrap();

    let func = ast
        .function_decl(ret_ty, name, vec![param], Some(body), at(1, 1))
        .unwrap();
    ast.set_global(func, true).unwrap();
    ast.add_child(program, func).unwrap();
    ast.set_root(program).unwrap();

    Conditional {
        ast,
        program,
        func,
        if_stmt,
        cond,
        then_return,
        else_return,
    }
}

#[test]
fn conditional_tree_is_well_formed() {
    init_logging();
    let tree = conditional();
    let ast = &tree.ast;

    assert!(verify_tree(ast, tree.program).unwrap().is_empty());
    let stmt = ast.get_as::<IfStmt>(tree.if_stmt).unwrap();
    assert!(stmt.has_else());
    assert!(stmt.else_branch().is_some());
    assert_eq!(stmt.cond(), tree.cond);

    for ret in [tree.then_return, tree.else_return] {
        assert!(!ast.get_as::<ReturnStmt>(ret).unwrap().returns_void());
        assert_eq!(ast.function_of(ret).unwrap(), Some(tree.func));
        assert_eq!(ast.root_of(ret).unwrap(), Some(tree.program));
    }
    assert_eq!(ast.function_of(tree.program).unwrap(), None);
}

#[test]
fn leaves_keep_their_source_locations() {
    let tree = conditional();
    let ast = &tree.ast;
    let cond = ast.get_as::<smallc_core::ast::BinaryExpr>(tree.cond).unwrap();

    assert_eq!(ast.location(cond.left()).unwrap(), Location::new(2, 7));
    assert_eq!(ast.location(cond.right()).unwrap(), Location::new(2, 11));
    let one = ast.get_as::<ReturnStmt>(tree.then_return).unwrap().value().unwrap();
    assert_eq!(ast.location(one).unwrap(), Location::new(3, 12));
}

#[test]
fn condition_is_not_constant() {
    let tree = conditional();
    assert!(constant_conditions(&tree.ast, tree.program).unwrap().is_empty());
}

#[test]
fn formatted_tree_matches_the_source_shape() {
    let tree = conditional();
    let options = FormatOptions {
        show_locations: false,
        ..FormatOptions::default()
    };
    let expected = "\
Program
  FunctionDecl global
    PrimitiveType int
    Identifier main
    Parameter
      PrimitiveType int
      Identifier x
    Scope
      IfStmt else
        BinaryExpr <
          ReferenceExpr
            Identifier x
          IntConstant 10
        Scope
          ReturnStmt
            IntConstant 1
        Scope
          ReturnStmt
            IntConstant 0
";
    assert_eq!(format_tree(&tree.ast, tree.program, options).unwrap(), expected);
}

#[test]
fn symbols_and_types_resolve_without_diagnostics() {
    init_logging();
    let mut tree = conditional();

    let collection = collect_symbols(&mut tree.ast, tree.program).unwrap();
    assert!(collection.diagnostics.is_empty());
    assert_eq!(collection.declared, 2);

    let diagnostics = annotate_types(&mut tree.ast, tree.program).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        tree.ast.expr_type(tree.cond).unwrap(),
        Some(PrimitiveKind::Bool)
    );
}

#[test]
fn releasing_the_program_frees_every_node() {
    let mut tree = conditional();
    let total = tree.ast.live_count();
    assert_eq!(tree.ast.descendants(tree.program).unwrap().len(), total);

    assert_eq!(tree.ast.release(tree.program).unwrap(), total);
    assert_eq!(tree.ast.live_count(), 0);
    assert!(tree.ast.get(tree.if_stmt).is_none());
}
