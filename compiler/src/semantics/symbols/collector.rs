//! Symbol collection for global and block-level declarations.
//!
//! This pass walks a program, records every function in the program's
//! function table and every variable in the table of the node that owns
//! it: globals in the program, parameters and locals in the scope of their
//! block. Duplicate definitions are reported as diagnostics. A prototype
//! followed by a definition with the same signature is not a duplicate.
//!
//! The walk only reads the tree; entries are written once it is complete.

use std::collections::HashMap;

use log::debug;

use smallc_core::ast::{FunctionDecl, Parameter, Scope};
use smallc_core::symbols::{DeclarationResult, FunctionEntry, VariableEntry};
use smallc_core::{Ast, AstResult, Location, NodeId, NodeKind};

use crate::semantics::typeck::diagnostics::{
    DiagnosticSink, SemanticDiagnostic, SemanticErrorCode,
};

/// Output produced by the collection pass.
#[derive(Debug)]
pub struct SymbolCollection {
    /// Number of entries written into tables.
    pub declared: usize,
    pub diagnostics: Vec<SemanticDiagnostic>,
}

#[derive(Debug)]
enum PendingSymbol {
    Variable {
        owner: NodeId,
        name: String,
        entry: VariableEntry,
        location: Location,
    },
    Function {
        name: String,
        entry: FunctionEntry,
        prototype: bool,
        location: Location,
    },
}

/// Collect the symbols of `program` into its tables and the tables of its
/// scopes. Meant to run once over a freshly built tree.
pub fn collect_symbols(ast: &mut Ast, program: NodeId) -> AstResult<SymbolCollection> {
    let pending = pending_symbols(ast, program)?;
    let mut sink = DiagnosticSink::new();
    let mut declared = 0usize;
    let mut first_seen: HashMap<(NodeId, String), Location> = HashMap::new();
    let mut functions: HashMap<String, (Location, bool)> = HashMap::new();

    for symbol in pending {
        match symbol {
            PendingSymbol::Variable {
                owner,
                name,
                entry,
                location,
            } => {
                let table = if matches!(ast.kind(owner)?, NodeKind::Program(_)) {
                    ast.var_table_mut(owner)?
                } else {
                    Some(ast.ensure_var_table(owner)?)
                };
                let Some(table) = table else { continue };
                match table.declare(name.clone(), entry) {
                    DeclarationResult::Ok => {
                        declared += 1;
                        first_seen.insert((owner, name), location);
                    }
                    DeclarationResult::Duplicate => {
                        report_duplicate(&mut sink, "variable", &name, location);
                        if let Some(previous) = first_seen.get(&(owner, name.clone())) {
                            sink.push(
                                format!("previous `{name}` definition here"),
                                *previous,
                                SemanticErrorCode::DuplicateSymbol,
                            );
                        }
                    }
                }
            }
            PendingSymbol::Function {
                name,
                entry,
                prototype,
                location,
            } => {
                let table = ast.func_table_mut(program)?;
                let stored = table.entry_or_insert_with(name.clone(), || entry.clone());
                match functions.get(&name).copied() {
                    None => {
                        declared += 1;
                        functions.insert(name, (location, prototype));
                    }
                    Some((previous, previous_prototype)) => {
                        if *stored != entry {
                            sink.push(
                                format!("conflicting declarations of function `{name}`"),
                                location,
                                SemanticErrorCode::TypeMismatch,
                            );
                        } else if !prototype && !previous_prototype {
                            report_duplicate(&mut sink, "function", &name, location);
                            sink.push(
                                format!("previous `{name}` definition here"),
                                previous,
                                SemanticErrorCode::DuplicateSymbol,
                            );
                        }
                        if previous_prototype && !prototype {
                            functions.insert(name, (location, false));
                        }
                    }
                }
            }
        }
    }

    debug!(
        "collected {declared} symbol(s) under {program:?}, {} diagnostic(s)",
        sink.len()
    );
    Ok(SymbolCollection {
        declared,
        diagnostics: sink.into_vec(),
    })
}

fn report_duplicate(sink: &mut DiagnosticSink, kind: &str, name: &str, location: Location) {
    sink.push(
        format!("duplicate definition of {kind} `{name}`"),
        location,
        SemanticErrorCode::DuplicateSymbol,
    );
}

fn pending_symbols(ast: &Ast, program: NodeId) -> AstResult<Vec<PendingSymbol>> {
    let mut pending = Vec::new();
    for id in ast.descendants(program)? {
        match ast.kind(id)? {
            NodeKind::Program(_) => {
                for child in ast.children(id)? {
                    if let Some(symbol) = variable_symbol(ast, id, *child)? {
                        pending.push(symbol);
                    }
                }
            }
            NodeKind::FunctionDecl(func) => {
                pending.push(function_symbol(ast, id, func)?);
                if let Some(body) = func.body() {
                    for param in func.params() {
                        pending.push(param_symbol(ast, body, *param)?);
                    }
                }
            }
            NodeKind::Scope(scope) => pending.extend(scope_symbols(ast, id, scope)?),
            _ => {}
        }
    }
    Ok(pending)
}

fn scope_symbols(ast: &Ast, id: NodeId, scope: &Scope) -> AstResult<Vec<PendingSymbol>> {
    let mut pending = Vec::new();
    for decl in scope.decls() {
        if let Some(symbol) = variable_symbol(ast, id, *decl)? {
            pending.push(symbol);
        }
    }
    Ok(pending)
}

/// Pending entry for a scalar or array declaration; `None` for anything
/// else.
fn variable_symbol(ast: &Ast, owner: NodeId, decl: NodeId) -> AstResult<Option<PendingSymbol>> {
    if !matches!(ast.kind(decl)?, NodeKind::ScalarDecl(_) | NodeKind::ArrayDecl(_)) {
        return Ok(None);
    }
    let (type_node, ident) = ast.decl_parts(decl)?;
    Ok(Some(PendingSymbol::Variable {
        owner,
        name: ast.ident_name(ident)?.to_string(),
        entry: VariableEntry::from(ast.type_shape(type_node)?),
        location: ast.location(ident)?,
    }))
}

fn param_symbol(ast: &Ast, body: NodeId, param: NodeId) -> AstResult<PendingSymbol> {
    let node = ast.get_as::<Parameter>(param)?;
    Ok(PendingSymbol::Variable {
        owner: body,
        name: ast.ident_name(node.ident())?.to_string(),
        entry: VariableEntry::from(ast.type_shape(node.type_node())?),
        location: ast.location(node.ident())?,
    })
}

fn function_symbol(ast: &Ast, id: NodeId, func: &FunctionDecl) -> AstResult<PendingSymbol> {
    let params = func
        .params()
        .iter()
        .map(|param| {
            let node = ast.get_as::<Parameter>(*param)?;
            Ok(VariableEntry::from(ast.type_shape(node.type_node())?))
        })
        .collect::<AstResult<Vec<_>>>()?;
    Ok(PendingSymbol::Function {
        name: ast.ident_name(func.ident())?.to_string(),
        entry: FunctionEntry::new(ast.return_kind(id)?, params),
        prototype: func.is_prototype(),
        location: ast.location(func.ident())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallc_core::ast::PrimitiveKind;

    fn at(line: u32, column: u32) -> Location {
        Location::new(line, column)
    }

    fn scalar(ast: &mut Ast, kind: PrimitiveKind, name: &str, line: u32) -> NodeId {
        let ty = ast.primitive_type(kind, at(line, 1));
        let ident = ast.identifier(name, at(line, 5));
        ast.scalar_decl(ty, ident, at(line, 1)).unwrap()
    }

    fn function(ast: &mut Ast, name: &str, params: &[&str], body: Option<NodeId>, line: u32) -> NodeId {
        let ret = ast.primitive_type(PrimitiveKind::Int, at(line, 1));
        let ident = ast.identifier(name, at(line, 5));
        let params = params
            .iter()
            .map(|param| {
                let ty = ast.primitive_type(PrimitiveKind::Int, at(line, 10));
                let ident = ast.identifier(*param, at(line, 14));
                ast.parameter(ty, ident, at(line, 10)).unwrap()
            })
            .collect();
        ast.function_decl(ret, ident, params, body, at(line, 1)).unwrap()
    }

    #[test]
    fn globals_params_and_locals_land_in_their_tables() {
        let mut ast = Ast::new();
        let program = ast.program(at(1, 1));
        let global = scalar(&mut ast, PrimitiveKind::Bool, "ready", 1);
        ast.add_child(program, global).unwrap();

        let body = ast.scope(at(2, 20));
        let local = scalar(&mut ast, PrimitiveKind::Int, "total", 3);
        ast.add_decl(body, local).unwrap();
        let func = function(&mut ast, "sum", &["a", "b"], Some(body), 2);
        ast.add_child(program, func).unwrap();

        let collection = collect_symbols(&mut ast, program).unwrap();
        assert!(collection.diagnostics.is_empty());
        assert_eq!(collection.declared, 5);

        let globals = ast.var_table(program).unwrap().unwrap();
        assert_eq!(
            globals.lookup("ready"),
            Some(&VariableEntry::scalar(PrimitiveKind::Bool))
        );
        let locals: Vec<_> = ast
            .var_table(body)
            .unwrap()
            .unwrap()
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        assert_eq!(locals, ["a", "b", "total"]);
        assert_eq!(ast.func_table(program).unwrap().lookup("sum").unwrap().arity(), 2);
    }

    #[test]
    fn reports_duplicate_locals() {
        let mut ast = Ast::new();
        let program = ast.program(at(1, 1));
        let body = ast.scope(at(2, 20));
        let first = scalar(&mut ast, PrimitiveKind::Int, "x", 3);
        let second = scalar(&mut ast, PrimitiveKind::Bool, "x", 4);
        ast.add_decl(body, first).unwrap();
        ast.add_decl(body, second).unwrap();
        let func = function(&mut ast, "main", &[], Some(body), 2);
        ast.add_child(program, func).unwrap();

        let collection = collect_symbols(&mut ast, program).unwrap();
        assert_eq!(collection.diagnostics.len(), 2);
        assert_eq!(collection.diagnostics[0].location, at(4, 5));
        assert_eq!(collection.diagnostics[0].message, "duplicate definition of variable `x`");
        assert_eq!(collection.diagnostics[1].location, at(3, 5));
        assert_eq!(
            ast.var_table(body).unwrap().unwrap().lookup("x"),
            Some(&VariableEntry::scalar(PrimitiveKind::Int))
        );
    }

    #[test]
    fn prototype_then_definition_is_not_a_duplicate() {
        let mut ast = Ast::new();
        let program = ast.program(at(1, 1));
        let proto = function(&mut ast, "next", &["n"], None, 1);
        ast.add_child(program, proto).unwrap();
        let body = ast.scope(at(2, 20));
        let def = function(&mut ast, "next", &["n"], Some(body), 2);
        ast.add_child(program, def).unwrap();

        let collection = collect_symbols(&mut ast, program).unwrap();
        assert!(collection.diagnostics.is_empty());
        assert_eq!(ast.func_table(program).unwrap().len(), 1);
    }

    #[test]
    fn two_definitions_are_duplicates() {
        let mut ast = Ast::new();
        let program = ast.program(at(1, 1));
        for line in [1, 2] {
            let body = ast.scope(at(line, 20));
            let def = function(&mut ast, "main", &[], Some(body), line);
            ast.add_child(program, def).unwrap();
        }

        let collection = collect_symbols(&mut ast, program).unwrap();
        let codes: Vec<_> = collection.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            [SemanticErrorCode::DuplicateSymbol, SemanticErrorCode::DuplicateSymbol]
        );
        assert_eq!(collection.diagnostics[1].location, at(1, 5));
    }

    #[test]
    fn mismatched_prototype_is_reported() {
        let mut ast = Ast::new();
        let program = ast.program(at(1, 1));
        let proto = function(&mut ast, "next", &["n"], None, 1);
        ast.add_child(program, proto).unwrap();
        let body = ast.scope(at(2, 20));
        let def = function(&mut ast, "next", &[], Some(body), 2);
        ast.add_child(program, def).unwrap();

        let collection = collect_symbols(&mut ast, program).unwrap();
        assert_eq!(collection.diagnostics.len(), 1);
        assert_eq!(collection.diagnostics[0].code, SemanticErrorCode::TypeMismatch);
    }
}
