//! Constant evaluation.
//!
//! `ConstEvaluator` computes the value of expressions built only from
//! constants and operators. It never rewrites the tree: callers decide what
//! to do with a value, e.g. warn about a condition that is always true.
//! Integer arithmetic follows SmallC's 32-bit `int`; overflow, division by
//! zero and literals outside that range make an expression non-constant.

use std::collections::HashMap;
use std::fmt;

use log::debug;

use smallc_core::ast::{
    Argument, BinaryExpr, BinaryOp, BoolConstant, BoolExpr, CallExpr, IntConstant, IntExpr,
    ReferenceExpr, UnaryExpr, UnaryOp,
};
use smallc_core::{Ast, AstResult, NodeId, NodeKind, Visitor};

/// Value of a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Int(i32),
    Bool(bool),
}

impl ConstValue {
    pub fn as_int(self) -> Option<i32> {
        match self {
            ConstValue::Int(value) => Some(value),
            ConstValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            ConstValue::Bool(value) => Some(value),
            ConstValue::Int(_) => None,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Int(value) => write!(f, "{value}"),
            ConstValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Expression evaluator. Visiting anything but an expression is an
/// `UnhandledNode` error.
#[derive(Debug, Default)]
pub struct ConstEvaluator {
    cache: HashMap<NodeId, Option<ConstValue>>,
}

impl ConstEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the expression `id`, or `None` when it is not constant.
    pub fn evaluate(&mut self, ast: &Ast, id: NodeId) -> AstResult<Option<ConstValue>> {
        if let Some(cached) = self.cache.get(&id) {
            return Ok(*cached);
        }
        let value = ast.visit(id, self)?;
        self.cache.insert(id, value);
        Ok(value)
    }

    fn eval_unary(op: UnaryOp, value: ConstValue) -> Option<ConstValue> {
        match op {
            UnaryOp::Not => Some(ConstValue::Bool(!value.as_bool()?)),
            UnaryOp::Minus => value.as_int()?.checked_neg().map(ConstValue::Int),
        }
    }

    fn eval_binary(op: BinaryOp, left: ConstValue, right: ConstValue) -> Option<ConstValue> {
        use BinaryOp::*;

        let value = match op {
            Addition => ConstValue::Int(left.as_int()?.checked_add(right.as_int()?)?),
            Subtraction => ConstValue::Int(left.as_int()?.checked_sub(right.as_int()?)?),
            Multiplication => ConstValue::Int(left.as_int()?.checked_mul(right.as_int()?)?),
            Division => ConstValue::Int(left.as_int()?.checked_div(right.as_int()?)?),
            And => ConstValue::Bool(left.as_bool()? && right.as_bool()?),
            Or => ConstValue::Bool(left.as_bool()? || right.as_bool()?),
            Equal | NotEqual => {
                if std::mem::discriminant(&left) != std::mem::discriminant(&right) {
                    return None;
                }
                ConstValue::Bool((left == right) == (op == Equal))
            }
            LessThan => ConstValue::Bool(left.as_int()? < right.as_int()?),
            LessOrEqual => ConstValue::Bool(left.as_int()? <= right.as_int()?),
            Greater => ConstValue::Bool(left.as_int()? > right.as_int()?),
            GreaterOrEqual => ConstValue::Bool(left.as_int()? >= right.as_int()?),
        };
        Some(value)
    }
}

impl Visitor for ConstEvaluator {
    type Output = Option<ConstValue>;

    fn operation(&self) -> &'static str {
        "const-eval"
    }

    fn visit_int_constant(&mut self, _: &Ast, _: NodeId, node: &IntConstant) -> AstResult<Self::Output> {
        Ok(i32::try_from(node.value()).ok().map(ConstValue::Int))
    }

    fn visit_bool_constant(&mut self, _: &Ast, _: NodeId, node: &BoolConstant) -> AstResult<Self::Output> {
        Ok(Some(ConstValue::Bool(node.value())))
    }

    fn visit_int_expr(&mut self, ast: &Ast, _: NodeId, node: &IntExpr) -> AstResult<Self::Output> {
        Ok(self.evaluate(ast, node.value())?.filter(|v| v.as_int().is_some()))
    }

    fn visit_bool_expr(&mut self, ast: &Ast, _: NodeId, node: &BoolExpr) -> AstResult<Self::Output> {
        Ok(self.evaluate(ast, node.value())?.filter(|v| v.as_bool().is_some()))
    }

    fn visit_unary_expr(&mut self, ast: &Ast, _: NodeId, node: &UnaryExpr) -> AstResult<Self::Output> {
        let operand = self.evaluate(ast, node.operand())?;
        Ok(operand.and_then(|value| Self::eval_unary(node.op(), value)))
    }

    fn visit_binary_expr(&mut self, ast: &Ast, _: NodeId, node: &BinaryExpr) -> AstResult<Self::Output> {
        let left = self.evaluate(ast, node.left())?;
        let right = self.evaluate(ast, node.right())?;
        match (left, right) {
            (Some(left), Some(right)) => Ok(Self::eval_binary(node.op(), left, right)),
            _ => Ok(None),
        }
    }

    fn visit_argument(&mut self, ast: &Ast, _: NodeId, node: &Argument) -> AstResult<Self::Output> {
        self.evaluate(ast, node.expr())
    }

    fn visit_call_expr(&mut self, _: &Ast, _: NodeId, _: &CallExpr) -> AstResult<Self::Output> {
        Ok(None)
    }

    fn visit_reference_expr(&mut self, _: &Ast, _: NodeId, _: &ReferenceExpr) -> AstResult<Self::Output> {
        Ok(None)
    }
}

/// Conditions of `if` and `while` statements under `root` whose value is
/// known before the program runs, with that value.
pub fn constant_conditions(ast: &Ast, root: NodeId) -> AstResult<Vec<(NodeId, ConstValue)>> {
    let mut evaluator = ConstEvaluator::new();
    let mut found = Vec::new();
    for id in ast.descendants(root)? {
        let cond = match ast.kind(id)? {
            NodeKind::IfStmt(stmt) => stmt.cond(),
            NodeKind::WhileStmt(stmt) => stmt.cond(),
            _ => continue,
        };
        if let Some(value) = evaluator.evaluate(ast, cond)? {
            found.push((cond, value));
        }
    }
    debug!("found {} constant condition(s) under {root:?}", found.len());
    Ok(found)
}
