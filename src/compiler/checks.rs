//! Semantic checks
//!
//! Name-use and disposal checks over the parsed contract, the recursive
//! type checker for clause expressions, and lock-index assignment. The
//! node-level operand checks are shared with the expression compiler,
//! which re-validates each node as it lowers it.

use crate::compiler::ast::{
    referenced_builtin, Clause, Contract, Expression, Param, Statement,
};
use crate::compiler::builtins::{BinaryOp, UnaryOp};
use crate::compiler::environ::{Environ, Role};
use crate::compiler::types::Type;
use crate::compiler::CompileError;
use std::collections::BTreeMap;

/// Types refined by equality-driven propagation, keyed by parameter
/// name. Names are unique across a compile (no shadowing), so a flat
/// map suffices.
pub type InferredTypes = BTreeMap<String, Type>;

/// No contract parameter may carry the asset-value type; values enter
/// clauses through requirements only
pub fn prohibit_value_params(contract: &Contract) -> Result<(), CompileError> {
    for p in &contract.params {
        if p.typ == Type::Value {
            return Err(CompileError::ValueParam(p.name.clone()));
        }
    }
    Ok(())
}

/// Every contract parameter must be referenced by at least one clause
pub fn require_all_params_used_in_clauses(
    params: &[Param],
    clauses: &[Clause],
) -> Result<(), CompileError> {
    for p in params {
        if !clauses.iter().any(|c| clause_uses_name(c, &p.name)) {
            return Err(CompileError::UnusedParam(p.name.clone()));
        }
    }
    Ok(())
}

/// Every clause parameter must be referenced by the clause
pub fn require_all_params_used_in_clause(clause: &Clause) -> Result<(), CompileError> {
    for p in &clause.params {
        if !clause_uses_name(clause, &p.name) {
            return Err(CompileError::UnusedParam(p.name.clone()));
        }
    }
    Ok(())
}

/// The contract value and each declared requirement must each appear in
/// exactly one lock or unlock statement of the clause
pub fn require_all_values_disposed_once(
    contract: &Contract,
    clause: &Clause,
) -> Result<(), CompileError> {
    value_disposed_once(&contract.value, clause)?;
    for req in &clause.reqs {
        value_disposed_once(&req.name, clause)?;
    }
    Ok(())
}

fn value_disposed_once(name: &str, clause: &Clause) -> Result<(), CompileError> {
    let mut count = 0;
    for stmt in &clause.statements {
        match stmt {
            Statement::Unlock(expr) if expr.to_string() == name => count += 1,
            Statement::Lock { locked, .. } if locked.to_string() == name => count += 1,
            _ => {}
        }
    }
    match count {
        0 => Err(CompileError::ValueNotDisposed {
            value: name.to_string(),
            clause: clause.name.clone(),
        }),
        1 => Ok(()),
        _ => Err(CompileError::ValueDisposedTwice {
            value: name.to_string(),
            clause: clause.name.clone(),
        }),
    }
}

/// Assign each lock statement its zero-based position among the clause's
/// lock statements, in source order: the output index the generated
/// CHECKOUTPUT inspects
pub fn assign_indexes(clause: &mut Clause) {
    let mut next = 0;
    for stmt in &mut clause.statements {
        if let Statement::Lock { index, .. } = stmt {
            *index = next;
            next += 1;
        }
    }
}

/// Type-check every expression of the clause against the operator and
/// builtin signatures; `verify` additionally requires a Boolean result
pub fn type_check_clause(
    contract: &Contract,
    clause: &Clause,
    env: &mut Environ,
    inferred: &mut InferredTypes,
) -> Result<(), CompileError> {
    for req in &clause.reqs {
        type_check_expr(contract, env, inferred, &req.amount)?;
        type_check_expr(contract, env, inferred, &req.asset)?;
    }
    for stmt in &clause.statements {
        match stmt {
            Statement::Verify(expr) => {
                type_check_expr(contract, env, inferred, expr)?;
                let typ = expr.typ(env);
                if typ != Type::Boolean {
                    return Err(CompileError::VerifyNotBoolean {
                        clause: clause.name.clone(),
                        typ: typ.to_string(),
                    });
                }
            }
            Statement::Lock {
                locked, program, ..
            } => {
                type_check_expr(contract, env, inferred, locked)?;
                type_check_expr(contract, env, inferred, program)?;
            }
            Statement::Unlock(expr) => type_check_expr(contract, env, inferred, expr)?,
        }
    }
    Ok(())
}

fn type_check_expr(
    contract: &Contract,
    env: &mut Environ,
    inferred: &mut InferredTypes,
    expr: &Expression,
) -> Result<(), CompileError> {
    match expr {
        Expression::Binary { op, left, right } => {
            check_binary(env, inferred, op, left, right)?;
            type_check_expr(contract, env, inferred, left)?;
            type_check_expr(contract, env, inferred, right)?;
        }
        Expression::Unary { op, expr } => {
            check_unary(env, op, expr)?;
            type_check_expr(contract, env, inferred, expr)?;
        }
        Expression::Call { func, args } => {
            check_call(contract, env, func, args)?;
            for arg in args {
                // lists are legal here, and only here
                if let Expression::List(items) = arg {
                    for item in items {
                        type_check_expr(contract, env, inferred, item)?;
                    }
                } else {
                    type_check_expr(contract, env, inferred, arg)?;
                }
            }
        }
        Expression::List(_) => return Err(CompileError::ListOutsideCall),
        _ => {}
    }
    Ok(())
}

/// Check a binary node's operands against the operator descriptor. For
/// `==`/`!=`, unequal types are an error unless one side is the generic
/// `Hash` and the other a hash subtype, in which case the subtype is
/// propagated onto the generic side; Boolean operands are rejected.
pub fn check_binary(
    env: &mut Environ,
    inferred: &mut InferredTypes,
    op: &'static BinaryOp,
    left: &Expression,
    right: &Expression,
) -> Result<(), CompileError> {
    let text = || format!("({} {} {})", left, op.op, right);

    let ltype = left.typ(env);
    if let Some(want) = &op.left {
        if ltype != *want {
            return Err(CompileError::LeftOperandType {
                expr: text(),
                actual: ltype.to_string(),
                want: want.to_string(),
            });
        }
    }
    let rtype = right.typ(env);
    if let Some(want) = &op.right {
        if rtype != *want {
            return Err(CompileError::RightOperandType {
                expr: text(),
                actual: rtype.to_string(),
                want: want.to_string(),
            });
        }
    }

    if op.op == "==" || op.op == "!=" {
        if ltype != rtype {
            if ltype == Type::Hash && rtype.is_hash_subtype() {
                propagate_type(env, inferred, &rtype, left);
            } else if rtype == Type::Hash && ltype.is_hash_subtype() {
                propagate_type(env, inferred, &ltype, right);
            } else {
                return Err(CompileError::EqualityMismatch {
                    expr: text(),
                    left: ltype.to_string(),
                    right: rtype.to_string(),
                });
            }
        }
        if ltype == Type::Boolean {
            return Err(CompileError::BooleanEquality {
                expr: text(),
                op: op.op.to_string(),
            });
        }
    }
    Ok(())
}

/// Check a unary node's operand against the operator descriptor
pub fn check_unary(
    env: &Environ,
    op: &'static UnaryOp,
    operand: &Expression,
) -> Result<(), CompileError> {
    if let Some(want) = &op.operand {
        let actual = operand.typ(env);
        if actual != *want {
            return Err(CompileError::OperandType {
                expr: format!("{}{}", op.op, operand),
                actual: actual.to_string(),
                want: want.to_string(),
            });
        }
    }
    Ok(())
}

/// Check a call node: builtin arity and argument types, or — for a call
/// to the contract itself — the arguments against the contract's own
/// parameters. Calls to any other contract are unsupported.
pub fn check_call(
    contract: &Contract,
    env: &Environ,
    func: &Expression,
    args: &[Expression],
) -> Result<(), CompileError> {
    let Some(builtin) = referenced_builtin(func) else {
        if func.typ(env) == Type::Contract {
            if func.to_string() != contract.name {
                return Err(CompileError::CrossContractCall);
            }
            if args.len() != contract.params.len() {
                return Err(CompileError::ArgCount {
                    name: contract.name.clone(),
                    have: args.len(),
                    want: contract.params.len(),
                });
            }
            for (i, (arg, param)) in args.iter().zip(&contract.params).enumerate() {
                let actual = arg.typ(env);
                if actual != param.typ {
                    return Err(CompileError::ArgType {
                        index: i,
                        name: contract.name.clone(),
                        actual: actual.to_string(),
                        want: param.typ.to_string(),
                    });
                }
            }
            return Ok(());
        }
        return Err(CompileError::UnknownFunction(func.to_string()));
    };

    if args.len() != builtin.args.len() {
        return Err(CompileError::ArgCount {
            name: builtin.name.to_string(),
            have: args.len(),
            want: builtin.args.len(),
        });
    }
    for (i, arg) in args.iter().enumerate() {
        if let Some(want) = &builtin.args[i] {
            let actual = arg.typ(env);
            if actual != *want {
                return Err(CompileError::ArgType {
                    index: i,
                    name: builtin.name.to_string(),
                    actual: actual.to_string(),
                    want: want.to_string(),
                });
            }
        }
    }
    if builtin.name == "checkTxMultiSig" {
        for (i, arg) in args.iter().enumerate() {
            if !matches!(arg, Expression::List(_)) {
                return Err(CompileError::ArgNotList {
                    index: i,
                    name: builtin.name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Refine a variable's binding to a more specific type, recording the
/// refinement for parameters so the analysis can report their best type.
/// Anything but a plain variable reference is left alone.
pub fn propagate_type(
    env: &mut Environ,
    inferred: &mut InferredTypes,
    typ: &Type,
    expr: &Expression,
) {
    if let Expression::VarRef(name) = expr {
        if let Some(entry) = env.lookup_mut(name) {
            entry.typ = typ.clone();
            if matches!(entry.role, Role::ContractParam | Role::ClauseParam) {
                inferred.insert(name.clone(), typ.clone());
            }
        }
    }
}

fn clause_uses_name(clause: &Clause, name: &str) -> bool {
    for req in &clause.reqs {
        if references(&req.amount, name) || references(&req.asset, name) {
            return true;
        }
    }
    clause.statements.iter().any(|stmt| match stmt {
        Statement::Verify(expr) => references(expr, name),
        Statement::Lock {
            locked, program, ..
        } => references(locked, name) || references(program, name),
        Statement::Unlock(expr) => references(expr, name),
    })
}

fn references(expr: &Expression, name: &str) -> bool {
    match expr {
        Expression::Binary { left, right, .. } => {
            references(left, name) || references(right, name)
        }
        Expression::Unary { expr, .. } => references(expr, name),
        Expression::Call { func, args } => {
            references(func, name) || args.iter().any(|a| references(a, name))
        }
        Expression::VarRef(n) => n == name,
        Expression::List(items) => items.iter().any(|i| references(i, name)),
        _ => false,
    }
}
