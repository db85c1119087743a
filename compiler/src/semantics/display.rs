//! Pretty-printing for syntax trees.
//!
//! The formatter produces deterministic, indented output, one node per line
//! with its children below it, to assist with debugging and snapshot-style
//! regression tests.

use smallc_core::ast::{
    Argument, ArrayDecl, ArrayType, AssignStmt, BinaryExpr, BoolConstant, BoolExpr, CallExpr,
    ExprStmt, FunctionDecl, Identifier, IfStmt, IntConstant, IntExpr, Parameter, PrimitiveType,
    Program, ReferenceExpr, ReturnStmt, ScalarDecl, Scope, UnaryExpr, WhileStmt,
};
use smallc_core::{Ast, AstResult, NodeId, Visitor};

/// Rendering switches for `TreeFormatter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Append `@line:column` to every line.
    pub show_locations: bool,
    /// Append `: kind` to annotated expressions.
    pub show_types: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            show_locations: true,
            show_types: false,
        }
    }
}

/// Format the subtree rooted at `id` into a human-readable string.
pub fn format_tree(ast: &Ast, id: NodeId, options: FormatOptions) -> AstResult<String> {
    let mut formatter = TreeFormatter::new(options);
    ast.visit(id, &mut formatter)?;
    Ok(formatter.finish())
}

/// Stateful formatter used to render tree nodes.
#[derive(Debug, Default)]
pub struct TreeFormatter {
    options: FormatOptions,
    buffer: String,
    depth: usize,
}

impl TreeFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            options,
            buffer: String::new(),
            depth: 0,
        }
    }

    /// Consume the formatter and return the accumulated string.
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Emit the line for `id`, then its children one level deeper.
    fn write_node(&mut self, ast: &Ast, id: NodeId, label: &str) -> AstResult<()> {
        let node = ast.node(id)?;
        let mut line = " ".repeat(self.depth * self.options.indent);
        line.push_str(node.kind().name());
        if !label.is_empty() {
            line.push(' ');
            line.push_str(label);
        }
        if self.options.show_types {
            if let Some(kind) = node.kind().annotation() {
                line.push_str(&format!(" : {kind}"));
            }
        }
        if self.options.show_locations {
            line.push_str(&format!(" @{}", node.location()));
        }
        self.buffer.push_str(&line);
        self.buffer.push('\n');

        self.depth += 1;
        let result = ast.walk_children(id, self).map(|_| ());
        self.depth -= 1;
        result
    }
}

fn flag(set: bool, name: &str) -> &str {
    if set {
        name
    } else {
        ""
    }
}

impl Visitor for TreeFormatter {
    type Output = ();

    fn operation(&self) -> &'static str {
        "format"
    }

    fn visit_program(&mut self, ast: &Ast, id: NodeId, node: &Program) -> AstResult<()> {
        self.write_node(ast, id, flag(node.use_io(), "io"))
    }

    fn visit_primitive_type(&mut self, ast: &Ast, id: NodeId, node: &PrimitiveType) -> AstResult<()> {
        self.write_node(ast, id, node.kind().as_str())
    }

    fn visit_array_type(&mut self, ast: &Ast, id: NodeId, _: &ArrayType) -> AstResult<()> {
        let shape = ast.type_shape(id)?;
        self.write_node(ast, id, &shape.to_string())
    }

    fn visit_identifier(&mut self, ast: &Ast, id: NodeId, node: &Identifier) -> AstResult<()> {
        self.write_node(ast, id, node.name())
    }

    fn visit_parameter(&mut self, ast: &Ast, id: NodeId, _: &Parameter) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_unary_expr(&mut self, ast: &Ast, id: NodeId, node: &UnaryExpr) -> AstResult<()> {
        self.write_node(ast, id, node.op().symbol())
    }

    fn visit_binary_expr(&mut self, ast: &Ast, id: NodeId, node: &BinaryExpr) -> AstResult<()> {
        self.write_node(ast, id, node.op().symbol())
    }

    fn visit_bool_expr(&mut self, ast: &Ast, id: NodeId, _: &BoolExpr) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_int_expr(&mut self, ast: &Ast, id: NodeId, _: &IntExpr) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_bool_constant(&mut self, ast: &Ast, id: NodeId, node: &BoolConstant) -> AstResult<()> {
        self.write_node(ast, id, node.literal())
    }

    fn visit_int_constant(&mut self, ast: &Ast, id: NodeId, node: &IntConstant) -> AstResult<()> {
        self.write_node(ast, id, node.literal())
    }

    fn visit_argument(&mut self, ast: &Ast, id: NodeId, _: &Argument) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_call_expr(&mut self, ast: &Ast, id: NodeId, _: &CallExpr) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_reference_expr(&mut self, ast: &Ast, id: NodeId, node: &ReferenceExpr) -> AstResult<()> {
        self.write_node(ast, id, flag(node.is_element(), "element"))
    }

    fn visit_scalar_decl(&mut self, ast: &Ast, id: NodeId, node: &ScalarDecl) -> AstResult<()> {
        self.write_node(ast, id, flag(node.is_global(), "global"))
    }

    fn visit_array_decl(&mut self, ast: &Ast, id: NodeId, node: &ArrayDecl) -> AstResult<()> {
        self.write_node(ast, id, flag(node.is_global(), "global"))
    }

    fn visit_function_decl(&mut self, ast: &Ast, id: NodeId, node: &FunctionDecl) -> AstResult<()> {
        let label = match (node.is_global(), node.is_prototype()) {
            (true, true) => "global prototype",
            (true, false) => "global",
            (false, true) => "prototype",
            (false, false) => "",
        };
        self.write_node(ast, id, label)
    }

    fn visit_expr_stmt(&mut self, ast: &Ast, id: NodeId, _: &ExprStmt) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_assign_stmt(&mut self, ast: &Ast, id: NodeId, _: &AssignStmt) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_if_stmt(&mut self, ast: &Ast, id: NodeId, node: &IfStmt) -> AstResult<()> {
        self.write_node(ast, id, flag(node.has_else(), "else"))
    }

    fn visit_while_stmt(&mut self, ast: &Ast, id: NodeId, _: &WhileStmt) -> AstResult<()> {
        self.write_node(ast, id, "")
    }

    fn visit_return_stmt(&mut self, ast: &Ast, id: NodeId, node: &ReturnStmt) -> AstResult<()> {
        self.write_node(ast, id, flag(node.returns_void(), "void"))
    }

    fn visit_scope(&mut self, ast: &Ast, id: NodeId, _: &Scope) -> AstResult<()> {
        self.write_node(ast, id, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallc_core::ast::{BinaryOp, PrimitiveKind, UnaryOp};
    use smallc_core::Location;

    fn at(line: u32, column: u32) -> Location {
        Location::new(line, column)
    }

    #[test]
    fn renders_nested_expressions() {
        let mut ast = Ast::new();
        let one = ast.int_constant("1", at(1, 2)).unwrap();
        let neg = ast.unary_expr(UnaryOp::Minus, one, at(1, 1)).unwrap();
        let two = ast.int_constant("2", at(1, 6)).unwrap();
        let sum = ast.binary_expr(BinaryOp::Addition, neg, two, at(1, 4)).unwrap();

        let text = format_tree(&ast, sum, FormatOptions::default()).unwrap();
        assert_eq!(
            text,
            "BinaryExpr + @1:4\n  UnaryExpr - @1:1\n    IntConstant 1 @1:2\n  IntConstant 2 @1:6\n"
        );
    }

    #[test]
    fn options_control_locations_and_types() {
        let mut ast = Ast::new();
        let element = ast.primitive_type(PrimitiveKind::Int, at(1, 1));
        let array = ast.array_type(element, 4, at(1, 1)).unwrap();
        let name = ast.identifier("xs", at(1, 5));
        let decl = ast.array_decl(array, name, at(1, 1)).unwrap();
        let flag = ast.bool_constant("true", at(2, 1)).unwrap();
        ast.annotate(flag, PrimitiveKind::Bool).unwrap();

        let options = FormatOptions {
            indent: 1,
            show_locations: false,
            show_types: true,
        };
        assert_eq!(
            format_tree(&ast, decl, options).unwrap(),
            "ArrayDecl\n ArrayType int[4]\n  PrimitiveType int\n Identifier xs\n"
        );
        assert_eq!(format_tree(&ast, flag, options).unwrap(), "BoolConstant true : bool\n");
    }
}
