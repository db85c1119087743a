//! The `Ast` arena and its structural operations.
//!
//! An `Ast` owns every node of one tree. Ownership edges are recorded twice:
//! as the child's `parent` and as an entry in the parent's child sequence.
//! Every mutator here keeps both records in step, which is what makes the
//! "exactly one parent, listed exactly once" invariant hold.
//!
//! Reads take `&Ast` and writes take `&mut Ast`, so a traversal can never
//! observe a half-applied mutation.

use log::{debug, warn};

use super::arena::Arena;
use super::ids::NodeId;
use super::nodes::{
    Argument, ArrayDecl, ArrayType, BinaryExpr, CallExpr, FunctionDecl, Identifier, IfStmt,
    NodeCategory, NodeData, NodeKind, Parameter, PrimitiveType, Program, ReferenceExpr,
    ReturnStmt, ScalarDecl, Scope, SlotMut, UnaryExpr,
};
use super::ops::{BinaryOp, UnaryOp};
use super::types::{PrimitiveKind, TypeShape};
use crate::config::{AstConfig, SpellingPolicy};
use crate::diag::{AstError, AstResult, Location};
use crate::symbols::{FunctionEntry, SymTable, VariableEntry};

/// A node together with its structural links.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) location: Location,
    pub(crate) parent: Option<NodeId>,
    pub(crate) root: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, location: Location) -> Self {
        Self {
            kind,
            location,
            parent: None,
            root: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Program root recorded by `Ast::set_root`.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena owning every node of one SmallC tree.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Arena<Node>,
    root: Option<NodeId>,
    config: AstConfig,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AstConfig) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            config,
        }
    }

    pub fn config(&self) -> AstConfig {
        self.config
    }

    /// Program recorded by the last `set_root`.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes currently owned by the arena.
    pub fn live_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node(&self, id: NodeId) -> AstResult<&Node> {
        self.nodes.get(id.index()).ok_or(AstError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> AstResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(AstError::UnknownNode(id))
    }

    pub fn kind(&self, id: NodeId) -> AstResult<&NodeKind> {
        Ok(&self.node(id)?.kind)
    }

    /// Narrow a node to its concrete payload.
    pub fn get_as<T: NodeData>(&self, id: NodeId) -> AstResult<&T> {
        let kind = self.kind(id)?;
        T::from_kind(kind).ok_or(AstError::KindMismatch {
            node: id,
            expected: T::KIND,
            actual: kind.name(),
        })
    }

    pub(crate) fn get_as_mut<T: NodeData>(&mut self, id: NodeId) -> AstResult<&mut T> {
        let kind = &mut self.node_mut(id)?.kind;
        let actual = kind.name();
        T::from_kind_mut(kind).ok_or(AstError::KindMismatch {
            node: id,
            expected: T::KIND,
            actual,
        })
    }

    pub(crate) fn expect_category(
        &self,
        id: NodeId,
        category: NodeCategory,
        expected: &'static str,
    ) -> AstResult<&NodeKind> {
        let kind = self.kind(id)?;
        if kind.category() == category {
            Ok(kind)
        } else {
            Err(AstError::KindMismatch {
                node: id,
                expected,
                actual: kind.name(),
            })
        }
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, location: Location) -> NodeId {
        let raw = self.nodes.alloc(Node::new(kind, location));
        NodeId::from_raw(raw as u32)
    }

    // Navigation

    pub fn parent(&self, id: NodeId) -> AstResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn child(&self, id: NodeId, index: usize) -> AstResult<NodeId> {
        let children = &self.node(id)?.children;
        children
            .get(index)
            .copied()
            .ok_or(AstError::IndexOutOfBounds {
                node: id,
                what: "child",
                index,
                len: children.len(),
            })
    }

    pub fn num_children(&self, id: NodeId) -> AstResult<usize> {
        Ok(self.node(id)?.children.len())
    }

    pub fn children(&self, id: NodeId) -> AstResult<&[NodeId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn location(&self, id: NodeId) -> AstResult<Location> {
        Ok(self.node(id)?.location)
    }

    pub fn set_location(&mut self, id: NodeId, location: impl Into<Location>) -> AstResult<()> {
        self.node_mut(id)?.location = location.into();
        Ok(())
    }

    pub fn root_of(&self, id: NodeId) -> AstResult<Option<NodeId>> {
        Ok(self.node(id)?.root)
    }

    /// Root `Program` of the tree `id` belongs to, if it has been attached.
    pub fn program_of(&self, id: NodeId) -> AstResult<Option<NodeId>> {
        match self.root_of(id)? {
            Some(root) => Ok(Some(root)),
            None if matches!(self.kind(id)?, NodeKind::Program(_)) => Ok(Some(id)),
            None => Ok(None),
        }
    }

    /// `id` followed by its ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> AstResult<Vec<NodeId>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.node(node)?.parent;
        }
        Ok(chain)
    }

    /// Pre-order listing of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> AstResult<Vec<NodeId>> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(order)
    }

    /// Nearest function declaration enclosing `id`, starting at `id` itself.
    pub fn function_of(&self, id: NodeId) -> AstResult<Option<NodeId>> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if node.kind.as_function_decl().is_some() {
                return Ok(Some(node_id));
            }
            current = node.parent;
        }
        Ok(None)
    }

    pub fn has_var_table(&self, id: NodeId) -> AstResult<bool> {
        Ok(self.kind(id)?.has_var_table())
    }

    /// Nearest node at or above `id` owning a variable table.
    pub fn nearest_var_table(&self, id: NodeId) -> AstResult<Option<NodeId>> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            if node.kind.has_var_table() {
                return Ok(Some(node_id));
            }
            current = node.parent;
        }
        Ok(None)
    }

    // Ownership

    /// Append `child` to the child sequence of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> AstResult<()> {
        self.check_attachable(parent, child)?;
        self.link(parent, child)
    }

    pub(crate) fn check_attachable(&self, parent: NodeId, child: NodeId) -> AstResult<()> {
        self.node(parent)?;
        if let Some(owner) = self.node(child)?.parent {
            return Err(AstError::AlreadyAttached {
                child,
                parent: owner,
            });
        }
        if self.ancestors(parent)?.contains(&child) {
            return Err(AstError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Record the edge `parent -> child` without validation.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) -> AstResult<()> {
        let root = {
            let owner = self.node_mut(parent)?;
            owner.children.push(child);
            owner.root
        };
        self.node_mut(child)?.parent = Some(parent);
        debug!("attached {child:?} under {parent:?}");
        if root.is_some() {
            self.assign_root(child, root)?;
        }
        Ok(())
    }

    fn assign_root(&mut self, top: NodeId, root: Option<NodeId>) -> AstResult<()> {
        for id in self.descendants(top)? {
            self.node_mut(id)?.root = root;
        }
        Ok(())
    }

    /// Record `program` as the root of every node in its tree.
    pub fn set_root(&mut self, program: NodeId) -> AstResult<()> {
        self.get_as::<Program>(program)?;
        if let Some(parent) = self.node(program)?.parent {
            return Err(AstError::AlreadyAttached {
                child: program,
                parent,
            });
        }
        self.assign_root(program, Some(program))?;
        self.root = Some(program);
        debug!("set {program:?} as tree root");
        Ok(())
    }

    /// Swap `old` for `new` in every record of its owner and hand `old`
    /// back detached. When `old` sits in a member slot, `new` must satisfy
    /// that slot's rule.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> AstResult<NodeId> {
        let parent = self.node(old)?.parent.ok_or(AstError::Detached(old))?;
        self.check_attachable(parent, new)?;
        if let Some(rule) = self.kind(parent)?.slot_rule(old) {
            let replacement = self.kind(new)?;
            if !rule.accepts(replacement) {
                return Err(AstError::KindMismatch {
                    node: new,
                    expected: rule.describe(),
                    actual: replacement.name(),
                });
            }
        }

        let root = {
            let owner = self.node_mut(parent)?;
            let position = owner
                .children
                .iter()
                .position(|id| *id == old)
                .ok_or(AstError::NotAChild { parent, child: old })?;
            owner.children[position] = new;
            for slot in owner.kind.slots_mut() {
                match slot {
                    SlotMut::Required(id) if *id == old => *id = new,
                    SlotMut::Optional(id) if *id == Some(old) => *id = Some(new),
                    SlotMut::List(ids) => {
                        for id in ids.iter_mut().filter(|id| **id == old) {
                            *id = new;
                        }
                    }
                    _ => {}
                }
            }
            owner.root
        };

        self.node_mut(old)?.parent = None;
        self.assign_root(old, None)?;
        self.node_mut(new)?.parent = Some(parent);
        self.assign_root(new, root)?;
        debug!("replaced {old:?} with {new:?} under {parent:?}");
        Ok(old)
    }

    /// Remove `id` from its owner. Nodes held in a required member slot
    /// cannot be detached, only replaced.
    pub fn detach(&mut self, id: NodeId) -> AstResult<NodeId> {
        let parent = self.node(id)?.parent.ok_or(AstError::Detached(id))?;
        {
            let owner = self.node_mut(parent)?;
            for slot in owner.kind.slots_mut() {
                match slot {
                    SlotMut::Required(slot) if *slot == id => {
                        return Err(AstError::RequiredSlot { parent, child: id });
                    }
                    SlotMut::Optional(slot) if *slot == Some(id) => *slot = None,
                    SlotMut::List(ids) => ids.retain(|member| *member != id),
                    _ => {}
                }
            }
            if let NodeKind::FunctionDecl(func) = &mut owner.kind {
                func.prototype = func.body.is_none();
            }
            owner.children.retain(|child| *child != id);
        }
        self.node_mut(id)?.parent = None;
        self.assign_root(id, None)?;
        debug!("detached {id:?} from {parent:?}");
        Ok(id)
    }

    /// Destroy the subtree rooted at `id`, returning how many nodes were
    /// released. An attached node is detached from its owner first.
    pub fn release(&mut self, id: NodeId) -> AstResult<usize> {
        if self.node(id)?.parent.is_some() {
            self.detach(id)?;
        }
        let doomed = self.descendants(id)?;
        for node in &doomed {
            self.nodes.remove(node.index());
        }
        if self.root == Some(id) {
            self.root = None;
        }
        debug!("released {} node(s) rooted at {id:?}", doomed.len());
        Ok(doomed.len())
    }

    // Expression annotations

    pub fn expr_type(&self, id: NodeId) -> AstResult<Option<PrimitiveKind>> {
        let kind = self.expect_category(id, NodeCategory::Expression, "expression")?;
        Ok(kind.annotation())
    }

    /// Record the type of an expression. Annotating again with the same kind
    /// is accepted; a different kind is a conflict.
    pub fn annotate(&mut self, id: NodeId, ty: PrimitiveKind) -> AstResult<()> {
        self.expect_category(id, NodeCategory::Expression, "expression")?;
        let slot = self
            .node_mut(id)?
            .kind
            .annotation_mut()
            .ok_or(AstError::UnknownNode(id))?;
        let current = *slot;
        match current {
            Some(existing) if existing != ty => Err(AstError::AnnotationConflict {
                node: id,
                existing,
                requested: ty,
            }),
            _ => {
                *slot = Some(ty);
                Ok(())
            }
        }
    }

    pub fn clear_annotation(&mut self, id: NodeId) -> AstResult<Option<PrimitiveKind>> {
        self.expect_category(id, NodeCategory::Expression, "expression")?;
        let slot = self
            .node_mut(id)?
            .kind
            .annotation_mut()
            .ok_or(AstError::UnknownNode(id))?;
        Ok(slot.take())
    }

    // Types

    /// Structural shape of a type node.
    pub fn type_shape(&self, id: NodeId) -> AstResult<TypeShape> {
        match self.kind(id)? {
            NodeKind::PrimitiveType(prim) => Ok(TypeShape::Primitive(prim.kind)),
            NodeKind::ArrayType(array) => {
                let element = self.get_as::<PrimitiveType>(array.element)?;
                Ok(TypeShape::Array(element.kind, array.size))
            }
            other => Err(AstError::KindMismatch {
                node: id,
                expected: "type",
                actual: other.name(),
            }),
        }
    }

    pub fn type_equal(&self, a: NodeId, b: NodeId) -> AstResult<bool> {
        Ok(self.type_shape(a)? == self.type_shape(b)?)
    }

    pub fn is_array_type(&self, id: NodeId) -> AstResult<bool> {
        Ok(self.type_shape(id)?.is_array())
    }

    /// Element kind of a type node; arrays delegate to their element node.
    pub fn element_kind(&self, id: NodeId) -> AstResult<PrimitiveKind> {
        Ok(self.type_shape(id)?.element())
    }

    pub fn set_element_kind(&mut self, id: NodeId, kind: PrimitiveKind) -> AstResult<()> {
        let target = match self.kind(id)? {
            NodeKind::ArrayType(array) => array.element,
            _ => id,
        };
        self.get_as_mut::<PrimitiveType>(target)?.kind = kind;
        Ok(())
    }

    pub fn set_element_kind_by_name(&mut self, id: NodeId, name: &str) -> AstResult<bool> {
        match PrimitiveKind::from_spelling(name) {
            Some(kind) => self.set_element_kind(id, kind).map(|_| true),
            None => self.unrecognized("type name", name),
        }
    }

    pub fn set_array_size(&mut self, id: NodeId, size: u32) -> AstResult<()> {
        self.get_as_mut::<ArrayType>(id)?.size = size;
        Ok(())
    }

    // Operators

    pub fn set_unary_op(&mut self, id: NodeId, op: UnaryOp) -> AstResult<()> {
        self.get_as_mut::<UnaryExpr>(id)?.op = op;
        Ok(())
    }

    /// Set a unary opcode from its spelling. Returns whether the opcode was
    /// changed; see `SpellingPolicy` for unrecognized spellings.
    pub fn set_unary_op_by_name(&mut self, id: NodeId, name: &str) -> AstResult<bool> {
        self.get_as::<UnaryExpr>(id)?;
        match UnaryOp::from_spelling(name) {
            Some(op) => self.set_unary_op(id, op).map(|_| true),
            None => self.unrecognized("unary operator", name),
        }
    }

    pub fn set_binary_op(&mut self, id: NodeId, op: BinaryOp) -> AstResult<()> {
        self.get_as_mut::<BinaryExpr>(id)?.op = op;
        Ok(())
    }

    pub fn set_binary_op_by_name(&mut self, id: NodeId, name: &str) -> AstResult<bool> {
        self.get_as::<BinaryExpr>(id)?;
        match BinaryOp::from_spelling(name) {
            Some(op) => self.set_binary_op(id, op).map(|_| true),
            None => self.unrecognized("binary operator", name),
        }
    }

    fn unrecognized(&self, category: &'static str, spelling: &str) -> AstResult<bool> {
        match self.config.spelling {
            SpellingPolicy::Strict => Err(AstError::UnrecognizedSpelling {
                category,
                spelling: spelling.to_string(),
            }),
            SpellingPolicy::Permissive => {
                warn!("ignoring unrecognized {category} spelling `{spelling}`");
                Ok(false)
            }
        }
    }

    // Identifiers and declarations

    pub fn ident_name(&self, id: NodeId) -> AstResult<&str> {
        Ok(self.get_as::<Identifier>(id)?.name())
    }

    /// Type node and identifier node of any declaration.
    pub fn decl_parts(&self, id: NodeId) -> AstResult<(NodeId, NodeId)> {
        match self.kind(id)? {
            NodeKind::ScalarDecl(decl) => Ok((decl.type_node, decl.ident)),
            NodeKind::ArrayDecl(decl) => Ok((decl.type_node, decl.ident)),
            NodeKind::FunctionDecl(decl) => Ok((decl.return_type, decl.ident)),
            other => Err(AstError::KindMismatch {
                node: id,
                expected: "declaration",
                actual: other.name(),
            }),
        }
    }

    pub fn decl_name(&self, id: NodeId) -> AstResult<&str> {
        let (_, ident) = self.decl_parts(id)?;
        self.ident_name(ident)
    }

    pub fn set_global(&mut self, id: NodeId, global: bool) -> AstResult<()> {
        let kind = &mut self.node_mut(id)?.kind;
        let actual = kind.name();
        if kind.set_global(global) {
            Ok(())
        } else {
            Err(AstError::KindMismatch {
                node: id,
                expected: "declaration",
                actual,
            })
        }
    }

    /// Type of a scalar declaration, narrowed to `PrimitiveType`.
    pub fn scalar_type(&self, decl: NodeId) -> AstResult<&PrimitiveType> {
        let decl = self.get_as::<ScalarDecl>(decl)?;
        self.get_as::<PrimitiveType>(decl.type_node)
    }

    /// Type of an array declaration, narrowed to `ArrayType`.
    pub fn array_type_of(&self, decl: NodeId) -> AstResult<&ArrayType> {
        let decl = self.get_as::<ArrayDecl>(decl)?;
        self.get_as::<ArrayType>(decl.type_node)
    }

    pub fn return_kind(&self, func: NodeId) -> AstResult<PrimitiveKind> {
        let func = self.get_as::<FunctionDecl>(func)?;
        Ok(self.get_as::<PrimitiveType>(func.return_type)?.kind)
    }

    pub fn param(&self, func: NodeId, index: usize) -> AstResult<NodeId> {
        let params = &self.get_as::<FunctionDecl>(func)?.params;
        params
            .get(index)
            .copied()
            .ok_or(AstError::IndexOutOfBounds {
                node: func,
                what: "parameter",
                index,
                len: params.len(),
            })
    }

    pub fn arg(&self, call: NodeId, index: usize) -> AstResult<NodeId> {
        let args = &self.get_as::<CallExpr>(call)?.args;
        args.get(index).copied().ok_or(AstError::IndexOutOfBounds {
            node: call,
            what: "argument",
            index,
            len: args.len(),
        })
    }

    /// Statements of a scope, i.e. its children that are not declarations.
    pub fn scope_statements(&self, scope: NodeId) -> AstResult<Vec<NodeId>> {
        let decls = &self.get_as::<Scope>(scope)?.decls;
        Ok(self
            .children(scope)?
            .iter()
            .copied()
            .filter(|child| !decls.contains(child))
            .collect())
    }

    // Member setters

    pub fn set_param_type(&mut self, param: NodeId, ty: NodeId) -> AstResult<NodeId> {
        let old = self.get_as::<Parameter>(param)?.type_node;
        self.expect_category(ty, NodeCategory::Type, "type")?;
        self.replace(old, ty)
    }

    pub fn set_param_ident(&mut self, param: NodeId, ident: NodeId) -> AstResult<NodeId> {
        let old = self.get_as::<Parameter>(param)?.ident;
        self.get_as::<Identifier>(ident)?;
        self.replace(old, ident)
    }

    pub fn add_param(&mut self, func: NodeId, param: NodeId) -> AstResult<()> {
        self.get_as::<FunctionDecl>(func)?;
        self.get_as::<Parameter>(param)?;
        self.check_attachable(func, param)?;
        self.get_as_mut::<FunctionDecl>(func)?.params.push(param);
        self.link(func, param)
    }

    pub fn add_arg(&mut self, call: NodeId, arg: NodeId) -> AstResult<()> {
        self.get_as::<CallExpr>(call)?;
        self.get_as::<Argument>(arg)?;
        self.check_attachable(call, arg)?;
        self.get_as_mut::<CallExpr>(call)?.args.push(arg);
        self.link(call, arg)
    }

    /// Add a local declaration to a scope.
    pub fn add_decl(&mut self, scope: NodeId, decl: NodeId) -> AstResult<()> {
        self.get_as::<Scope>(scope)?;
        self.expect_category(decl, NodeCategory::Declaration, "declaration")?;
        self.check_attachable(scope, decl)?;
        self.get_as_mut::<Scope>(scope)?.decls.push(decl);
        self.link(scope, decl)
    }

    /// Attach or remove a function body; the prototype flag follows.
    pub fn set_body(&mut self, func: NodeId, body: Option<NodeId>) -> AstResult<Option<NodeId>> {
        if let Some(body) = body {
            self.get_as::<Scope>(body)?;
        }
        let previous = self.set_optional(func, body, |kind| match kind {
            NodeKind::FunctionDecl(func) => Some(&mut func.body),
            _ => None,
        })?;
        let func = self.get_as_mut::<FunctionDecl>(func)?;
        func.prototype = func.body.is_none();
        Ok(previous)
    }

    pub fn set_else(&mut self, stmt: NodeId, branch: Option<NodeId>) -> AstResult<Option<NodeId>> {
        if let Some(branch) = branch {
            self.expect_category(branch, NodeCategory::Statement, "statement")?;
        }
        let previous = self.set_optional(stmt, branch, |kind| match kind {
            NodeKind::IfStmt(stmt) => Some(&mut stmt.else_branch),
            _ => None,
        })?;
        if branch.is_some() {
            self.get_as_mut::<IfStmt>(stmt)?.has_else = true;
        }
        Ok(previous)
    }

    pub fn set_has_else(&mut self, stmt: NodeId, has_else: bool) -> AstResult<()> {
        self.get_as_mut::<IfStmt>(stmt)?.has_else = has_else;
        Ok(())
    }

    pub fn set_return_value(
        &mut self,
        stmt: NodeId,
        value: Option<NodeId>,
    ) -> AstResult<Option<NodeId>> {
        if let Some(value) = value {
            self.expect_category(value, NodeCategory::Expression, "expression")?;
        }
        self.set_optional(stmt, value, |kind| match kind {
            NodeKind::ReturnStmt(stmt) => Some(&mut stmt.value),
            _ => None,
        })
    }

    pub fn set_index(&mut self, reference: NodeId, index: Option<NodeId>) -> AstResult<Option<NodeId>> {
        if let Some(index) = index {
            self.expect_category(index, NodeCategory::Expression, "expression")?;
        }
        self.set_optional(reference, index, |kind| match kind {
            NodeKind::ReferenceExpr(reference) => Some(&mut reference.index),
            _ => None,
        })
    }

    /// Fill an optional member slot, detaching and returning its previous
    /// occupant.
    fn set_optional(
        &mut self,
        owner: NodeId,
        value: Option<NodeId>,
        slot: fn(&mut NodeKind) -> Option<&mut Option<NodeId>>,
    ) -> AstResult<Option<NodeId>> {
        let kind = &mut self.node_mut(owner)?.kind;
        let actual = kind.name();
        let previous = match slot(kind) {
            Some(current) => *current,
            None => {
                return Err(AstError::KindMismatch {
                    node: owner,
                    expected: "node with an optional member",
                    actual,
                })
            }
        };
        if previous == value {
            return Ok(None);
        }
        if let Some(value) = value {
            self.check_attachable(owner, value)?;
        }
        if let Some(previous) = previous {
            self.detach(previous)?;
        }
        if let Some(value) = value {
            if let Some(current) = slot(&mut self.node_mut(owner)?.kind) {
                *current = Some(value);
            }
            self.link(owner, value)?;
        }
        Ok(previous)
    }

    // Symbol tables

    pub fn func_table(&self, program: NodeId) -> AstResult<&SymTable<FunctionEntry>> {
        Ok(&self.get_as::<Program>(program)?.functions)
    }

    pub fn func_table_mut(&mut self, program: NodeId) -> AstResult<&mut SymTable<FunctionEntry>> {
        Ok(&mut self.get_as_mut::<Program>(program)?.functions)
    }

    /// Variable table owned by a Program or a Scope, if it exists.
    pub fn var_table(&self, id: NodeId) -> AstResult<Option<&SymTable<VariableEntry>>> {
        Ok(self.kind(id)?.var_table())
    }

    pub fn var_table_mut(&mut self, id: NodeId) -> AstResult<Option<&mut SymTable<VariableEntry>>> {
        Ok(self.node_mut(id)?.kind.var_table_mut())
    }

    /// Create the variable table of a scope if it does not exist yet.
    pub fn ensure_var_table(&mut self, scope: NodeId) -> AstResult<&mut SymTable<VariableEntry>> {
        let scope = self.get_as_mut::<Scope>(scope)?;
        Ok(scope.table.get_or_insert_with(SymTable::new))
    }

    pub fn use_io(&self, program: NodeId) -> AstResult<bool> {
        Ok(self.get_as::<Program>(program)?.io)
    }

    pub fn set_io(&mut self, program: NodeId, io: bool) -> AstResult<()> {
        self.get_as_mut::<Program>(program)?.io = io;
        Ok(())
    }

    pub fn returns_void(&self, stmt: NodeId) -> AstResult<bool> {
        Ok(self.get_as::<ReturnStmt>(stmt)?.returns_void())
    }

    pub fn reference_is_element(&self, reference: NodeId) -> AstResult<bool> {
        Ok(self.get_as::<ReferenceExpr>(reference)?.is_element())
    }
}
