//! Node payload definitions.
//!
//! Every concrete node kind has a payload struct holding its kind-specific
//! members. Members that are themselves nodes are stored as `NodeId`s into
//! the owning `Ast`; they are always also present in the node's child list,
//! so the generic child sequence is the single record of ownership. Payload
//! fields are only mutated through `Ast` so that invariant holds.

use super::ids::NodeId;
use super::ops::{BinaryOp, UnaryOp};
use super::types::PrimitiveKind;
use crate::symbols::{FunctionEntry, SymTable, VariableEntry};

/// Tree root owning the global symbol tables.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub(crate) functions: SymTable<FunctionEntry>,
    pub(crate) variables: SymTable<VariableEntry>,
    pub(crate) io: bool,
}

impl Program {
    pub fn func_table(&self) -> &SymTable<FunctionEntry> {
        &self.functions
    }

    pub fn var_table(&self) -> &SymTable<VariableEntry> {
        &self.variables
    }

    /// Whether the program links the I/O support library.
    pub fn use_io(&self) -> bool {
        self.io
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveType {
    pub(crate) kind: PrimitiveKind,
}

impl PrimitiveType {
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn is_array(&self) -> bool {
        false
    }
}

/// Array type wrapping an owned `PrimitiveType` element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub(crate) element: NodeId,
    pub(crate) size: u32,
}

impl ArrayType {
    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Element count; 0 means the size is unspecified.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_array(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub(crate) name: String,
}

impl Identifier {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Formal parameter of a function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub(crate) type_node: NodeId,
    pub(crate) ident: NodeId,
}

impl Parameter {
    pub fn type_node(&self) -> NodeId {
        self.type_node
    }

    pub fn ident(&self) -> NodeId {
        self.ident
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub(crate) op: UnaryOp,
    pub(crate) operand: NodeId,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl UnaryExpr {
    pub fn op(&self) -> UnaryOp {
        self.op
    }

    pub fn operand(&self) -> NodeId {
        self.operand
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub(crate) op: BinaryOp,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl BinaryExpr {
    pub fn op(&self) -> BinaryOp {
        self.op
    }

    pub fn left(&self) -> NodeId {
        self.left
    }

    pub fn right(&self) -> NodeId {
        self.right
    }
}

/// Sub-expression the grammar requires to be boolean-valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolExpr {
    pub(crate) value: NodeId,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl BoolExpr {
    pub fn value(&self) -> NodeId {
        self.value
    }
}

/// Sub-expression the grammar requires to be integer-valued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntExpr {
    pub(crate) value: NodeId,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl IntExpr {
    pub fn value(&self) -> NodeId {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolConstant {
    pub(crate) literal: String,
    pub(crate) value: bool,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl BoolConstant {
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

/// Integer literal. The parsed value is kept wider than the language's
/// `int` so a later pass can report out-of-range literals itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntConstant {
    pub(crate) literal: String,
    pub(crate) value: i64,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl IntConstant {
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn fits_int(&self) -> bool {
        i32::try_from(self.value).is_ok()
    }
}

/// Single call argument wrapping its expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub(crate) expr: NodeId,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl Argument {
    pub fn expr(&self) -> NodeId {
        self.expr
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub(crate) callee: NodeId,
    pub(crate) args: Vec<NodeId>,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl CallExpr {
    pub fn callee(&self) -> NodeId {
        self.callee
    }

    pub fn args(&self) -> &[NodeId] {
        &self.args
    }

    pub fn num_args(&self) -> usize {
        self.args.len()
    }
}

/// Variable reference; an index makes it an array-element reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceExpr {
    pub(crate) ident: NodeId,
    pub(crate) index: Option<NodeId>,
    pub(crate) annotation: Option<PrimitiveKind>,
}

impl ReferenceExpr {
    pub fn ident(&self) -> NodeId {
        self.ident
    }

    pub fn index(&self) -> Option<NodeId> {
        self.index
    }

    pub fn is_element(&self) -> bool {
        self.index.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarDecl {
    pub(crate) type_node: NodeId,
    pub(crate) ident: NodeId,
    pub(crate) global: bool,
}

impl ScalarDecl {
    pub fn type_node(&self) -> NodeId {
        self.type_node
    }

    pub fn ident(&self) -> NodeId {
        self.ident
    }

    pub fn is_global(&self) -> bool {
        self.global
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayDecl {
    pub(crate) type_node: NodeId,
    pub(crate) ident: NodeId,
    pub(crate) global: bool,
}

impl ArrayDecl {
    pub fn type_node(&self) -> NodeId {
        self.type_node
    }

    pub fn ident(&self) -> NodeId {
        self.ident
    }

    pub fn is_global(&self) -> bool {
        self.global
    }
}

/// Function declaration. Without a body it is a prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub(crate) return_type: NodeId,
    pub(crate) ident: NodeId,
    pub(crate) params: Vec<NodeId>,
    pub(crate) body: Option<NodeId>,
    pub(crate) prototype: bool,
    pub(crate) global: bool,
}

impl FunctionDecl {
    pub fn return_type(&self) -> NodeId {
        self.return_type
    }

    pub fn ident(&self) -> NodeId {
        self.ident
    }

    pub fn params(&self) -> &[NodeId] {
        &self.params
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn is_prototype(&self) -> bool {
        self.prototype
    }

    pub fn is_global(&self) -> bool {
        self.global
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub(crate) expr: NodeId,
}

impl ExprStmt {
    pub fn expr(&self) -> NodeId {
        self.expr
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignStmt {
    pub(crate) target: NodeId,
    pub(crate) value: NodeId,
}

impl AssignStmt {
    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn value(&self) -> NodeId {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub(crate) cond: NodeId,
    pub(crate) then_branch: NodeId,
    pub(crate) else_branch: Option<NodeId>,
    pub(crate) has_else: bool,
}

impl IfStmt {
    pub fn cond(&self) -> NodeId {
        self.cond
    }

    pub fn then_branch(&self) -> NodeId {
        self.then_branch
    }

    pub fn else_branch(&self) -> Option<NodeId> {
        self.else_branch
    }

    /// Whether the source had an `else`, even if its branch is empty.
    pub fn has_else(&self) -> bool {
        self.has_else
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub(crate) cond: NodeId,
    pub(crate) body: NodeId,
}

impl WhileStmt {
    pub fn cond(&self) -> NodeId {
        self.cond
    }

    pub fn body(&self) -> NodeId {
        self.body
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub(crate) value: Option<NodeId>,
}

impl ReturnStmt {
    pub fn value(&self) -> Option<NodeId> {
        self.value
    }

    pub fn returns_void(&self) -> bool {
        self.value.is_none()
    }
}

/// Block statement: local declarations plus nested statements in the child
/// list, with a variable table created on demand.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub(crate) decls: Vec<NodeId>,
    pub(crate) table: Option<SymTable<VariableEntry>>,
}

impl Scope {
    pub fn decls(&self) -> &[NodeId] {
        &self.decls
    }

    pub fn var_table(&self) -> Option<&SymTable<VariableEntry>> {
        self.table.as_ref()
    }

    pub fn has_var_table(&self) -> bool {
        self.table.is_some()
    }
}

/// Broad grouping of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Program,
    Type,
    Identifier,
    Parameter,
    Expression,
    Declaration,
    Statement,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Program => "program",
            NodeCategory::Type => "type",
            NodeCategory::Identifier => "identifier",
            NodeCategory::Parameter => "parameter",
            NodeCategory::Expression => "expression",
            NodeCategory::Declaration => "declaration",
            NodeCategory::Statement => "statement",
        }
    }
}

/// Closed set of node kinds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Program(Program),
    PrimitiveType(PrimitiveType),
    ArrayType(ArrayType),
    Identifier(Identifier),
    Parameter(Parameter),
    UnaryExpr(UnaryExpr),
    BinaryExpr(BinaryExpr),
    BoolExpr(BoolExpr),
    IntExpr(IntExpr),
    BoolConstant(BoolConstant),
    IntConstant(IntConstant),
    Argument(Argument),
    CallExpr(CallExpr),
    ReferenceExpr(ReferenceExpr),
    ScalarDecl(ScalarDecl),
    ArrayDecl(ArrayDecl),
    FunctionDecl(FunctionDecl),
    ExprStmt(ExprStmt),
    AssignStmt(AssignStmt),
    IfStmt(IfStmt),
    WhileStmt(WhileStmt),
    ReturnStmt(ReturnStmt),
    Scope(Scope),
}

/// Constraint a member slot places on the node it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRule {
    Kind(&'static str),
    Category(NodeCategory),
}

impl SlotRule {
    pub fn accepts(self, kind: &NodeKind) -> bool {
        match self {
            SlotRule::Kind(name) => kind.name() == name,
            SlotRule::Category(category) => kind.category() == category,
        }
    }

    /// Name used as the `expected` side of a kind mismatch.
    pub fn describe(self) -> &'static str {
        match self {
            SlotRule::Kind(name) => name,
            SlotRule::Category(category) => category.as_str(),
        }
    }
}

/// Mutable view of one member slot of a payload.
pub(crate) enum SlotMut<'a> {
    Required(&'a mut NodeId),
    Optional(&'a mut Option<NodeId>),
    List(&'a mut Vec<NodeId>),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program(_) => "Program",
            NodeKind::PrimitiveType(_) => "PrimitiveType",
            NodeKind::ArrayType(_) => "ArrayType",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::Parameter(_) => "Parameter",
            NodeKind::UnaryExpr(_) => "UnaryExpr",
            NodeKind::BinaryExpr(_) => "BinaryExpr",
            NodeKind::BoolExpr(_) => "BoolExpr",
            NodeKind::IntExpr(_) => "IntExpr",
            NodeKind::BoolConstant(_) => "BoolConstant",
            NodeKind::IntConstant(_) => "IntConstant",
            NodeKind::Argument(_) => "Argument",
            NodeKind::CallExpr(_) => "CallExpr",
            NodeKind::ReferenceExpr(_) => "ReferenceExpr",
            NodeKind::ScalarDecl(_) => "ScalarDecl",
            NodeKind::ArrayDecl(_) => "ArrayDecl",
            NodeKind::FunctionDecl(_) => "FunctionDecl",
            NodeKind::ExprStmt(_) => "ExprStmt",
            NodeKind::AssignStmt(_) => "AssignStmt",
            NodeKind::IfStmt(_) => "IfStmt",
            NodeKind::WhileStmt(_) => "WhileStmt",
            NodeKind::ReturnStmt(_) => "ReturnStmt",
            NodeKind::Scope(_) => "Scope",
        }
    }

    pub fn category(&self) -> NodeCategory {
        match self {
            NodeKind::Program(_) => NodeCategory::Program,
            NodeKind::PrimitiveType(_) | NodeKind::ArrayType(_) => NodeCategory::Type,
            NodeKind::Identifier(_) => NodeCategory::Identifier,
            NodeKind::Parameter(_) => NodeCategory::Parameter,
            NodeKind::UnaryExpr(_)
            | NodeKind::BinaryExpr(_)
            | NodeKind::BoolExpr(_)
            | NodeKind::IntExpr(_)
            | NodeKind::BoolConstant(_)
            | NodeKind::IntConstant(_)
            | NodeKind::Argument(_)
            | NodeKind::CallExpr(_)
            | NodeKind::ReferenceExpr(_) => NodeCategory::Expression,
            NodeKind::ScalarDecl(_) | NodeKind::ArrayDecl(_) | NodeKind::FunctionDecl(_) => {
                NodeCategory::Declaration
            }
            NodeKind::ExprStmt(_)
            | NodeKind::AssignStmt(_)
            | NodeKind::IfStmt(_)
            | NodeKind::WhileStmt(_)
            | NodeKind::ReturnStmt(_)
            | NodeKind::Scope(_) => NodeCategory::Statement,
        }
    }

    pub fn is_expression(&self) -> bool {
        self.category() == NodeCategory::Expression
    }

    pub fn is_declaration(&self) -> bool {
        self.category() == NodeCategory::Declaration
    }

    pub fn is_statement(&self) -> bool {
        self.category() == NodeCategory::Statement
    }

    /// Capability query used by enclosing-function lookups.
    pub fn as_function_decl(&self) -> Option<&FunctionDecl> {
        match self {
            NodeKind::FunctionDecl(func) => Some(func),
            _ => None,
        }
    }

    pub fn has_var_table(&self) -> bool {
        match self {
            NodeKind::Program(_) => true,
            NodeKind::Scope(scope) => scope.has_var_table(),
            _ => false,
        }
    }

    pub(crate) fn var_table(&self) -> Option<&SymTable<VariableEntry>> {
        match self {
            NodeKind::Program(program) => Some(&program.variables),
            NodeKind::Scope(scope) => scope.table.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn var_table_mut(&mut self) -> Option<&mut SymTable<VariableEntry>> {
        match self {
            NodeKind::Program(program) => Some(&mut program.variables),
            NodeKind::Scope(scope) => scope.table.as_mut(),
            _ => None,
        }
    }

    /// Type annotation of an expression; `None` for non-expressions and for
    /// expressions not yet annotated.
    pub fn annotation(&self) -> Option<PrimitiveKind> {
        match self {
            NodeKind::UnaryExpr(e) => e.annotation,
            NodeKind::BinaryExpr(e) => e.annotation,
            NodeKind::BoolExpr(e) => e.annotation,
            NodeKind::IntExpr(e) => e.annotation,
            NodeKind::BoolConstant(e) => e.annotation,
            NodeKind::IntConstant(e) => e.annotation,
            NodeKind::Argument(e) => e.annotation,
            NodeKind::CallExpr(e) => e.annotation,
            NodeKind::ReferenceExpr(e) => e.annotation,
            _ => None,
        }
    }

    pub(crate) fn annotation_mut(&mut self) -> Option<&mut Option<PrimitiveKind>> {
        match self {
            NodeKind::UnaryExpr(e) => Some(&mut e.annotation),
            NodeKind::BinaryExpr(e) => Some(&mut e.annotation),
            NodeKind::BoolExpr(e) => Some(&mut e.annotation),
            NodeKind::IntExpr(e) => Some(&mut e.annotation),
            NodeKind::BoolConstant(e) => Some(&mut e.annotation),
            NodeKind::IntConstant(e) => Some(&mut e.annotation),
            NodeKind::Argument(e) => Some(&mut e.annotation),
            NodeKind::CallExpr(e) => Some(&mut e.annotation),
            NodeKind::ReferenceExpr(e) => Some(&mut e.annotation),
            _ => None,
        }
    }

    pub(crate) fn set_global(&mut self, flag: bool) -> bool {
        match self {
            NodeKind::ScalarDecl(decl) => decl.global = flag,
            NodeKind::ArrayDecl(decl) => decl.global = flag,
            NodeKind::FunctionDecl(decl) => decl.global = flag,
            _ => return false,
        }
        true
    }

    /// Node ids held in member slots, in declaration order of the slots.
    pub fn members(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program(_)
            | NodeKind::PrimitiveType(_)
            | NodeKind::Identifier(_)
            | NodeKind::BoolConstant(_)
            | NodeKind::IntConstant(_) => Vec::new(),
            NodeKind::ArrayType(t) => vec![t.element],
            NodeKind::Parameter(p) => vec![p.type_node, p.ident],
            NodeKind::UnaryExpr(e) => vec![e.operand],
            NodeKind::BinaryExpr(e) => vec![e.left, e.right],
            NodeKind::BoolExpr(e) => vec![e.value],
            NodeKind::IntExpr(e) => vec![e.value],
            NodeKind::Argument(e) => vec![e.expr],
            NodeKind::CallExpr(e) => {
                let mut ids = vec![e.callee];
                ids.extend(e.args.iter().copied());
                ids
            }
            NodeKind::ReferenceExpr(e) => std::iter::once(e.ident).chain(e.index).collect(),
            NodeKind::ScalarDecl(d) => vec![d.type_node, d.ident],
            NodeKind::ArrayDecl(d) => vec![d.type_node, d.ident],
            NodeKind::FunctionDecl(d) => {
                let mut ids = vec![d.return_type, d.ident];
                ids.extend(d.params.iter().copied());
                ids.extend(d.body);
                ids
            }
            NodeKind::ExprStmt(s) => vec![s.expr],
            NodeKind::AssignStmt(s) => vec![s.target, s.value],
            NodeKind::IfStmt(s) => {
                let mut ids = vec![s.cond, s.then_branch];
                ids.extend(s.else_branch);
                ids
            }
            NodeKind::WhileStmt(s) => vec![s.cond, s.body],
            NodeKind::ReturnStmt(s) => s.value.into_iter().collect(),
            NodeKind::Scope(s) => s.decls.clone(),
        }
    }

    /// What the member slot currently holding `member` accepts, or `None`
    /// when `member` is not a member of this node.
    pub fn slot_rule(&self, member: NodeId) -> Option<SlotRule> {
        use NodeCategory::{Declaration, Expression, Statement, Type};
        use SlotRule::{Category, Kind};

        let rule = match self {
            NodeKind::Program(_)
            | NodeKind::PrimitiveType(_)
            | NodeKind::Identifier(_)
            | NodeKind::BoolConstant(_)
            | NodeKind::IntConstant(_) => return None,
            NodeKind::ArrayType(t) if t.element == member => Kind(PrimitiveType::KIND),
            NodeKind::Parameter(p) if p.type_node == member => Category(Type),
            NodeKind::Parameter(p) if p.ident == member => Kind(Identifier::KIND),
            NodeKind::UnaryExpr(e) if e.operand == member => Category(Expression),
            NodeKind::BinaryExpr(e) if e.left == member || e.right == member => {
                Category(Expression)
            }
            NodeKind::BoolExpr(e) if e.value == member => Category(Expression),
            NodeKind::IntExpr(e) if e.value == member => Category(Expression),
            NodeKind::Argument(e) if e.expr == member => Category(Expression),
            NodeKind::CallExpr(e) if e.callee == member => Kind(Identifier::KIND),
            NodeKind::CallExpr(e) if e.args.contains(&member) => Kind(Argument::KIND),
            NodeKind::ReferenceExpr(e) if e.ident == member => Kind(Identifier::KIND),
            NodeKind::ReferenceExpr(e) if e.index == Some(member) => Category(Expression),
            NodeKind::ScalarDecl(d) if d.type_node == member => Kind(PrimitiveType::KIND),
            NodeKind::ArrayDecl(d) if d.type_node == member => Kind(ArrayType::KIND),
            NodeKind::ScalarDecl(d) if d.ident == member => Kind(Identifier::KIND),
            NodeKind::ArrayDecl(d) if d.ident == member => Kind(Identifier::KIND),
            NodeKind::FunctionDecl(d) if d.return_type == member => Kind(PrimitiveType::KIND),
            NodeKind::FunctionDecl(d) if d.ident == member => Kind(Identifier::KIND),
            NodeKind::FunctionDecl(d) if d.params.contains(&member) => Kind(Parameter::KIND),
            NodeKind::FunctionDecl(d) if d.body == Some(member) => Kind(Scope::KIND),
            NodeKind::ExprStmt(s) if s.expr == member => Category(Expression),
            NodeKind::AssignStmt(s) if s.target == member => Kind(ReferenceExpr::KIND),
            NodeKind::AssignStmt(s) if s.value == member => Category(Expression),
            NodeKind::IfStmt(s) if s.cond == member => Category(Expression),
            NodeKind::IfStmt(s) if s.then_branch == member || s.else_branch == Some(member) => {
                Category(Statement)
            }
            NodeKind::WhileStmt(s) if s.cond == member => Category(Expression),
            NodeKind::WhileStmt(s) if s.body == member => Category(Statement),
            NodeKind::ReturnStmt(s) if s.value == Some(member) => Category(Expression),
            NodeKind::Scope(s) if s.decls.contains(&member) => Category(Declaration),
            _ => return None,
        };
        Some(rule)
    }

    pub(crate) fn slots_mut(&mut self) -> Vec<SlotMut<'_>> {
        use SlotMut::{List, Optional, Required};

        match self {
            NodeKind::Program(_)
            | NodeKind::PrimitiveType(_)
            | NodeKind::Identifier(_)
            | NodeKind::BoolConstant(_)
            | NodeKind::IntConstant(_) => Vec::new(),
            NodeKind::ArrayType(t) => vec![Required(&mut t.element)],
            NodeKind::Parameter(p) => vec![Required(&mut p.type_node), Required(&mut p.ident)],
            NodeKind::UnaryExpr(e) => vec![Required(&mut e.operand)],
            NodeKind::BinaryExpr(e) => vec![Required(&mut e.left), Required(&mut e.right)],
            NodeKind::BoolExpr(e) => vec![Required(&mut e.value)],
            NodeKind::IntExpr(e) => vec![Required(&mut e.value)],
            NodeKind::Argument(e) => vec![Required(&mut e.expr)],
            NodeKind::CallExpr(e) => vec![Required(&mut e.callee), List(&mut e.args)],
            NodeKind::ReferenceExpr(e) => vec![Required(&mut e.ident), Optional(&mut e.index)],
            NodeKind::ScalarDecl(d) => vec![Required(&mut d.type_node), Required(&mut d.ident)],
            NodeKind::ArrayDecl(d) => vec![Required(&mut d.type_node), Required(&mut d.ident)],
            NodeKind::FunctionDecl(d) => vec![
                Required(&mut d.return_type),
                Required(&mut d.ident),
                List(&mut d.params),
                Optional(&mut d.body),
            ],
            NodeKind::ExprStmt(s) => vec![Required(&mut s.expr)],
            NodeKind::AssignStmt(s) => vec![Required(&mut s.target), Required(&mut s.value)],
            NodeKind::IfStmt(s) => vec![
                Required(&mut s.cond),
                Required(&mut s.then_branch),
                Optional(&mut s.else_branch),
            ],
            NodeKind::WhileStmt(s) => vec![Required(&mut s.cond), Required(&mut s.body)],
            NodeKind::ReturnStmt(s) => vec![Optional(&mut s.value)],
            NodeKind::Scope(s) => vec![List(&mut s.decls)],
        }
    }
}

/// Typed narrowing from `NodeKind` to a concrete payload.
pub trait NodeData: Sized {
    const KIND: &'static str;

    fn from_kind(kind: &NodeKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self>;
}

macro_rules! node_data {
    ($($variant:ident),* $(,)?) => {
        $(
            impl NodeData for $variant {
                const KIND: &'static str = stringify!($variant);

                fn from_kind(kind: &NodeKind) -> Option<&Self> {
                    match kind {
                        NodeKind::$variant(data) => Some(data),
                        _ => None,
                    }
                }

                fn from_kind_mut(kind: &mut NodeKind) -> Option<&mut Self> {
                    match kind {
                        NodeKind::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for NodeKind {
                fn from(data: $variant) -> Self {
                    NodeKind::$variant(data)
                }
            }
        )*
    };
}

node_data!(
    Program,
    PrimitiveType,
    ArrayType,
    Identifier,
    Parameter,
    UnaryExpr,
    BinaryExpr,
    BoolExpr,
    IntExpr,
    BoolConstant,
    IntConstant,
    Argument,
    CallExpr,
    ReferenceExpr,
    ScalarDecl,
    ArrayDecl,
    FunctionDecl,
    ExprStmt,
    AssignStmt,
    IfStmt,
    WhileStmt,
    ReturnStmt,
    Scope,
);
