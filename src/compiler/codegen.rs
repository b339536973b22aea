//! Code generation
//!
//! Lowers a contract to VM bytecode. The contract compiler seeds the
//! environment, emits instantiation arguments and arranges multi-clause
//! dispatch; the clause compiler lowers each statement; the expression
//! compiler walks expressions against the symbolic stack so that every
//! variable reference resolves to the right DUP/OVER/PICK depth.
//!
//! Clause bodies never contain jumps. Multi-clause dispatch relies on
//! this: each body is compiled in a fresh inner builder and its bytes are
//! spliced into the outer program, which would relocate any absolute jump
//! offset inside the body.

use crate::compiler::ast::{referenced_builtin, Clause, Contract, Expression, Statement};
use crate::compiler::builder::Builder;
use crate::compiler::checks::{self, InferredTypes};
use crate::compiler::compile::{ContractArg, HashCall};
use crate::compiler::environ::{Environ, Role};
use crate::compiler::builtins::{BUILTINS, KEYWORDS};
use crate::compiler::stack::{Stack, StackEntry};
use crate::compiler::types::Type;
use crate::compiler::CompileError;
use crate::vm::{self, OpCode};

/// Per-clause metadata gathered while compiling: time bounds recorded
/// from `before`/`after` verifies, and hash-function calls
#[derive(Debug, Clone, Default)]
pub struct ClauseAnalysis {
    pub mintimes: Vec<String>,
    pub maxtimes: Vec<String>,
    pub hash_calls: Vec<HashCall>,
}

/// Everything an expression lowering can see and amend
struct ClauseScope<'a> {
    contract: &'a Contract,
    clause: &'a Clause,
    env: &'a mut Environ,
    inferred: &'a mut InferredTypes,
    analysis: &'a mut ClauseAnalysis,
}

/// Compile a contract with its instantiation arguments to a program,
/// returning the bytes, the propagation-refined parameter types, and
/// each clause's gathered metadata
pub fn compile_contract(
    contract: &mut Contract,
    args: &[ContractArg],
) -> Result<(Vec<u8>, InferredTypes, Vec<ClauseAnalysis>), CompileError> {
    if contract.clauses.is_empty() {
        return Err(CompileError::EmptyContract);
    }

    let mut env = Environ::new();
    for keyword in KEYWORDS {
        env.add(keyword, Type::Nil, Role::Keyword)?;
    }
    for builtin in BUILTINS {
        env.add(builtin.name, Type::Nil, Role::Builtin)?;
    }
    env.add(&contract.name, Type::Contract, Role::Contract)?;
    for p in &contract.params {
        env.add(&p.name, p.typ.clone(), Role::ContractParam)?;
    }
    env.add(&contract.value, Type::Value, Role::ContractValue)?;
    for clause in &contract.clauses {
        env.add(&clause.name, Type::Nil, Role::Clause)?;
    }

    checks::prohibit_value_params(contract)?;
    checks::require_all_params_used_in_clauses(&contract.params, &contract.clauses)?;

    for clause in &mut contract.clauses {
        checks::assign_indexes(clause);
    }
    let contract = &*contract;

    let stack = Stack::from_params(&contract.params);
    let mut inferred = InferredTypes::new();
    let mut analyses = Vec::with_capacity(contract.clauses.len());

    let mut b = Builder::new();
    for arg in args {
        match arg {
            ContractArg::Boolean(v) => b.add_int64(*v as i64),
            ContractArg::Integer(n) => b.add_int64(*n),
            ContractArg::String(data) => b.add_data(data),
        }
    }

    if contract.clauses.len() == 1 {
        let analysis = compile_clause(
            &mut b,
            &stack,
            contract,
            &mut env,
            &mut inferred,
            &contract.clauses[0],
        )?;
        analyses.push(analysis);
        return Ok((b.build()?, inferred, analyses));
    }

    let end_target = b.new_jump_target();
    let clause_targets: Vec<_> = contract
        .clauses
        .iter()
        .map(|_| b.new_jump_target())
        .collect();

    if !stack.is_empty() {
        // the clause selector sits at the stack bottom, under the
        // contract params; roll it to the top
        b.add_int64(stack.len() as i64);
        b.add_op(OpCode::Roll);
    }

    // clauses N-1 .. 2: test the selector explicitly
    for i in (2..contract.clauses.len()).rev() {
        b.add_op(OpCode::Dup);
        b.add_int64(i as i64);
        b.add_op(OpCode::NumEqual);
        b.add_jump_if(clause_targets[i]);
    }

    // clause 1 takes the selector itself as the condition;
    // clause 0 is the fall-through
    b.add_jump_if(clause_targets[1]);

    for (i, clause) in contract.clauses.iter().enumerate() {
        b.set_jump_target(clause_targets[i]);

        // A fresh inner builder per clause body, so the body's final
        // pending VERIFY is left off when it is finalized; the bytes are
        // then spliced into the outer program. Sound only because clause
        // bodies contain no jumps.
        let mut inner = Builder::new();
        let analysis = compile_clause(&mut inner, &stack, contract, &mut env, &mut inferred, clause)
            .map_err(|e| e.context(format!("compiling clause {}", i)))?;
        analyses.push(analysis);
        let body = inner
            .build()
            .map_err(|e| e.context("assembling bytecode"))?;
        b.add_raw_bytes(&body);

        if i < contract.clauses.len() - 1 {
            b.add_jump(end_target);
        }
    }
    b.set_jump_target(end_target);

    Ok((b.build()?, inferred, analyses))
}

/// Compile one clause into `b` against the inherited contract-param
/// stack prefix
fn compile_clause(
    b: &mut Builder,
    contract_stack: &Stack,
    contract: &Contract,
    env: &mut Environ,
    inferred: &mut InferredTypes,
    clause: &Clause,
) -> Result<ClauseAnalysis, CompileError> {
    env.push_scope();
    let result = compile_clause_scoped(b, contract_stack, contract, env, inferred, clause);
    env.pop_scope();
    result
}

fn compile_clause_scoped(
    b: &mut Builder,
    contract_stack: &Stack,
    contract: &Contract,
    env: &mut Environ,
    inferred: &mut InferredTypes,
    clause: &Clause,
) -> Result<ClauseAnalysis, CompileError> {
    log::debug!("compiling clause \"{}\"", clause.name);

    for p in &clause.params {
        env.add(&p.name, p.typ.clone(), Role::ClauseParam)?;
    }
    for req in &clause.reqs {
        env.add(&req.name, Type::Value, Role::ClauseValue)?;
    }

    checks::require_all_values_disposed_once(contract, clause)?;
    checks::type_check_clause(contract, clause, env, inferred)?;
    checks::require_all_params_used_in_clause(clause)?;

    // clause params below the inherited contract params; the last
    // contract param is topmost at clause entry
    let mut stack = Stack::from_params(&clause.params);
    stack.extend(contract_stack);

    let mut analysis = ClauseAnalysis::default();
    let mut scope = ClauseScope {
        contract,
        clause,
        env,
        inferred,
        analysis: &mut analysis,
    };

    for stmt in &clause.statements {
        match stmt {
            Statement::Verify(expr) => {
                compile_expr(b, &stack, &mut scope, expr).map_err(|e| {
                    e.context(format!(
                        "in verify statement in clause \"{}\"",
                        clause.name
                    ))
                })?;
                b.add_op(OpCode::Verify);

                // report time bounds from bare before()/after() verifies
                if let Expression::Call { func, args } = expr {
                    if args.len() == 1 {
                        if let Some(builtin) = referenced_builtin(func) {
                            match builtin.name {
                                "before" => scope.analysis.maxtimes.push(args[0].to_string()),
                                "after" => scope.analysis.mintimes.push(args[0].to_string()),
                                _ => {}
                            }
                        }
                    }
                }
            }

            Statement::Lock {
                locked,
                program,
                index,
            } => {
                let in_lock = |e: CompileError| {
                    e.context(format!("in lock statement in clause \"{}\"", clause.name))
                };

                // the CHECKOUTPUT tuple: index, refdatahash, amount,
                // asset, version, program. A local stack copy keeps the
                // shared one unchanged for the next statement.
                b.add_int64(*index);
                let mut ostack = stack.with(index.to_string());

                b.add_data(&[]);
                ostack.push("''");

                if locked.to_string() == contract.value {
                    b.add_op(OpCode::Amount);
                    ostack.push("<amount>");
                    b.add_op(OpCode::Asset);
                    ostack.push("<asset>");
                } else {
                    let req = clause
                        .reqs
                        .iter()
                        .find(|r| locked.to_string() == r.name)
                        .ok_or_else(|| CompileError::UnknownValue {
                            value: locked.to_string(),
                            clause: clause.name.clone(),
                        })?;

                    compile_expr(b, &ostack, &mut scope, &req.amount).map_err(in_lock)?;
                    ostack.push(req.amount.to_string());

                    compile_expr(b, &ostack, &mut scope, &req.asset).map_err(in_lock)?;
                    ostack.push(req.asset.to_string());
                }

                // output version
                b.add_int64(1);
                ostack.push("1");

                compile_expr(b, &ostack, &mut scope, program).map_err(in_lock)?;

                b.add_op(OpCode::CheckOutput);
                b.add_op(OpCode::Verify);
            }

            Statement::Unlock(_) => {
                if clause.statements.len() == 1 {
                    // nothing else leaves a result; make sure the clause
                    // yields a truthy value
                    b.add_op(OpCode::True);
                }
            }
        }
    }

    Ok(analysis)
}

/// Lower one expression. Net-pushes exactly one stack slot; list
/// expressions are rejected here and handled by `compile_arg`.
fn compile_expr(
    b: &mut Builder,
    stack: &Stack,
    scope: &mut ClauseScope,
    expr: &Expression,
) -> Result<(), CompileError> {
    match expr {
        Expression::Binary { op, left, right } => {
            checks::check_binary(scope.env, scope.inferred, op, left, right)?;

            compile_expr(b, stack, scope, left).map_err(|e| {
                e.context(format!("in left operand of \"{}\" expression", op.op))
            })?;
            compile_expr(b, &stack.with(left.to_string()), scope, right).map_err(|e| {
                e.context(format!("in right operand of \"{}\" expression", op.op))
            })?;

            let ops = vm::assemble(op.opcodes).map_err(|e| {
                CompileError::from(e)
                    .context(format!("assembling bytecode in \"{}\" expression", op.op))
            })?;
            b.add_raw_bytes(&ops);
        }

        Expression::Unary { op, expr } => {
            checks::check_unary(scope.env, op, expr)?;
            compile_expr(b, stack, scope, expr)
                .map_err(|e| e.context(format!("in \"{}\" expression", op.op)))?;
            let ops = vm::assemble(op.opcodes).map_err(|e| {
                CompileError::from(e)
                    .context(format!("assembling bytecode in \"{}\" expression", op.op))
            })?;
            b.add_raw_bytes(&ops);
        }

        Expression::Call { func, args } => {
            checks::check_call(scope.contract, scope.env, func, args)?;

            let Some(builtin) = referenced_builtin(func) else {
                // a call to the contract itself: build the predicate
                // program argument by argument, then evaluate it
                b.add_int64(args.len() as i64);
                let mut stack = stack.with("<arg count>");
                b.add_data(&[]);
                stack.push("<program>");
                for arg in args.iter().rev() {
                    compile_expr(b, &stack, scope, arg)
                        .map_err(|e| e.context("compiling contract call"))?;
                    b.add_op(OpCode::CatPushData);
                }
                b.add_int64(0);
                b.add_op(OpCode::CheckPredicate);
                return Ok(());
            };

            if builtin.name == "checkTxMultiSig" {
                // Emit the [... sigM ... sig1 txsighash pubkeyN ... pubkey1 M N]
                // arrangement CHECKMULTISIG expects: the signature list's
                // trailing count is parked on the alt stack while the
                // sighash and the public keys go on
                let mut new_entries = compile_arg(b, stack, scope, &args[1])?;
                b.add_op(OpCode::ToAltStack);
                new_entries.pop();

                b.add_op(OpCode::TxSigHash);
                new_entries.push(StackEntry::new("<txsighash>"));

                let mut extended = stack.clone();
                extended.extend_entries(new_entries);
                compile_arg(b, &extended, scope, &args[0])?;

                b.add_op(OpCode::FromAltStack);
                b.add_op(OpCode::Swap);
                b.add_op(OpCode::CheckMultiSig);
                return Ok(());
            }

            let mut stack = stack.clone();
            for (i, arg) in args.iter().enumerate().rev() {
                let new_entries = compile_arg(b, &stack, scope, arg).map_err(|e| {
                    e.context(format!("compiling argument {} in call expression", i))
                })?;
                stack.extend_entries(new_entries);
            }
            let ops = vm::assemble(builtin.opcodes).map_err(|e| {
                CompileError::from(e).context("assembling bytecode in call expression")
            })?;
            b.add_raw_bytes(&ops);

            if matches!(builtin.name, "sha3" | "sha256") {
                scope.analysis.hash_calls.push(HashCall {
                    name: builtin.name.to_string(),
                    arg: args[0].to_string(),
                    typ: args[0].typ(scope.env).to_string(),
                });
            }
        }

        Expression::VarRef(name) => return compile_ref(b, stack, name),

        Expression::Integer(n) => b.add_int64(*n),

        Expression::Bytes(data) => b.add_data(data),

        Expression::Boolean(v) => {
            b.add_op(if *v { OpCode::True } else { OpCode::False });
        }

        // a list pushes its items and its length, breaking this
        // function's one-slot contract; only compile_arg may accept one
        Expression::List(_) => return Err(CompileError::ListOutsideCall),
    }
    Ok(())
}

/// Lower a call argument: a list pushes its items in reverse order (the
/// first-declared item topmost under the count) followed by its length;
/// anything else goes through `compile_expr`. Returns the slots added.
fn compile_arg(
    b: &mut Builder,
    stack: &Stack,
    scope: &mut ClauseScope,
    expr: &Expression,
) -> Result<Vec<StackEntry>, CompileError> {
    if let Expression::List(items) = expr {
        let mut new_entries = Vec::with_capacity(items.len() + 1);
        let mut stack = stack.clone();
        for item in items.iter().rev() {
            compile_expr(b, &stack, scope, item)?;
            let entry = StackEntry::new(item.to_string());
            new_entries.push(entry.clone());
            stack.push_entry(entry);
        }
        b.add_int64(items.len() as i64);
        new_entries.push(StackEntry::new(items.len().to_string()));
        return Ok(new_entries);
    }

    compile_expr(b, stack, scope, expr)?;
    Ok(vec![StackEntry::new(expr.to_string())])
}

/// Lower a variable reference to a copy of the stack slot it names
fn compile_ref(b: &mut Builder, stack: &Stack, name: &str) -> Result<(), CompileError> {
    let Some(depth) = stack.depth_of(name) else {
        return Err(CompileError::UndefinedReference(name.to_string()));
    };
    match depth {
        0 => b.add_op(OpCode::Dup),
        1 => b.add_op(OpCode::Over),
        _ => {
            b.add_int64(depth as i64);
            b.add_op(OpCode::Pick);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::parser::parse;

    fn compile_src(src: &str) -> Vec<u8> {
        let mut contract = parse(src).unwrap();
        let (program, _, _) = compile_contract(&mut contract, &[]).unwrap();
        program
    }

    fn compile_err(src: &str) -> CompileError {
        let mut contract = parse(src).unwrap();
        compile_contract(&mut contract, &[]).unwrap_err()
    }

    #[test]
    fn test_trivial_lock() {
        // CHECKOUTPUT tuple: index 0, empty refdata, AMOUNT, ASSET,
        // version 1, then the program param from depth 5
        let program = compile_src(
            "contract T(p: Integer) locks v { clause c() { lock v with p } }",
        );
        assert_eq!(
            program,
            vec![
                0x00, // 0
                0x00, // ''
                OpCode::Amount as u8,
                OpCode::Asset as u8,
                0x51, // 1
                0x55, // 5
                OpCode::Pick as u8,
                OpCode::CheckOutput as u8,
                // the lock's trailing VERIFY is program-final and dropped
            ]
        );
    }

    #[test]
    fn test_trivial_unlock() {
        let program = compile_src("contract T() locks v { clause c() { unlock v } }");
        assert_eq!(program, vec![OpCode::True as u8]);
    }

    #[test]
    fn test_single_clause_has_no_jumps() {
        let program = compile_src(
            r#"
            contract Single(p: Program, n: Integer) locks v {
                clause c() {
                    verify n > 0
                    lock v with p
                }
            }
            "#,
        );
        for instr in vm::decode(&program).unwrap() {
            assert!(!matches!(instr, vm::Instruction::Jump { .. }));
        }
    }

    #[test]
    fn test_two_clause_dispatch() {
        // no params: no selector roll. JUMPIF t1, clause 0 (TRUE),
        // JUMP end, t1: clause 1 (TRUE), end.
        let program = compile_src(
            "contract T() locks v { clause a() { unlock v } clause b() { unlock v } }",
        );
        assert_eq!(
            program,
            vec![
                OpCode::JumpIf as u8,
                0x0b,
                0x00,
                0x00,
                0x00,
                OpCode::True as u8,
                OpCode::Jump as u8,
                0x0c,
                0x00,
                0x00,
                0x00,
                OpCode::True as u8,
            ]
        );
    }

    #[test]
    fn test_selector_rolled_over_params() {
        let program = compile_src(
            r#"
            contract T(ok: Boolean) locks v {
                clause a() { unlock v }
                clause b() { verify ok unlock v }
            }
            "#,
        );
        // one param on the stack: INT64(1) ROLL precedes the dispatch
        assert_eq!(program[0], 0x51);
        assert_eq!(program[1], OpCode::Roll as u8);
        assert_eq!(program[2], OpCode::JumpIf as u8);
        // clause b body: DUP for ok; its VERIFY is body-final and dropped
        let t1 = u32::from_le_bytes([program[3], program[4], program[5], program[6]]) as usize;
        assert_eq!(program[t1], OpCode::Dup as u8);
    }

    #[test]
    fn test_three_clause_dispatch_counts() {
        let program = compile_src(
            r#"
            contract T(ok: Boolean) locks v {
                clause a() { unlock v }
                clause b() { verify ok unlock v }
                clause c() { verify !ok unlock v }
            }
            "#,
        );
        let instrs = vm::decode(&program).unwrap();
        let jumpifs = instrs
            .iter()
            .filter(|i| i.opcode() == Some(OpCode::JumpIf))
            .count();
        let jumps = instrs
            .iter()
            .filter(|i| i.opcode() == Some(OpCode::Jump))
            .count();
        assert_eq!(jumpifs, 2); // N-1 dispatch tests
        assert_eq!(jumps, 2); // every clause but the last jumps to the end
        // the explicit selector test for clause 2
        assert!(instrs
            .windows(2)
            .any(|w| w[0].opcode() == Some(OpCode::Num2)
                && w[1].opcode() == Some(OpCode::NumEqual)));
    }

    #[test]
    fn test_ref_depths() {
        // args are compiled in reverse order: c first (depth 0 -> DUP),
        // then b (now depth 2 -> PICK), then a (depth 3 -> PICK)
        let program = compile_src(
            r#"
            contract T() locks v {
                clause spend(a: Integer, b: Integer, c: Integer) {
                    verify min(a, min(b, c)) > 0
                    unlock v
                }
            }
            "#,
        );
        let instrs = vm::decode(&program).unwrap();
        assert_eq!(instrs[0].opcode(), Some(OpCode::Dup)); // c
        assert_eq!(instrs[1].opcode(), Some(OpCode::Num2)); // depth of b
        assert_eq!(instrs[2].opcode(), Some(OpCode::Pick));
        assert_eq!(instrs[3].opcode(), Some(OpCode::Min));
        assert_eq!(instrs[4].opcode(), Some(OpCode::Num3)); // depth of a
        assert_eq!(instrs[5].opcode(), Some(OpCode::Pick));
        assert_eq!(instrs[6].opcode(), Some(OpCode::Min));
    }

    #[test]
    fn test_lock_requirement_compiles_amount_then_asset() {
        let program = compile_src(
            r#"
            contract Sale(price: Integer, currency: Asset, seller: Program) locks offered {
                clause buy() requires payment: price of currency {
                    lock payment with seller
                    unlock offered
                }
            }
            "#,
        );
        let instrs = vm::decode(&program).unwrap();
        // index 0, '' refdata, then the requirement's amount and asset
        // params picked from under the partial tuple
        assert_eq!(instrs[0].opcode(), Some(OpCode::False));
        assert_eq!(instrs[1].opcode(), Some(OpCode::False));
        assert_eq!(instrs[2].opcode(), Some(OpCode::Num4)); // price at depth 4
        assert_eq!(instrs[3].opcode(), Some(OpCode::Pick));
        assert_eq!(instrs[4].opcode(), Some(OpCode::Num4)); // currency at depth 4
        assert_eq!(instrs[5].opcode(), Some(OpCode::Pick));
        assert!(instrs.iter().all(|i| i.opcode() != Some(OpCode::Amount)));
    }

    #[test]
    fn test_lock_unknown_requirement() {
        // `mystery` is neither the contract value nor a declared
        // requirement; disposal checks don't cover it, the lock lowering
        // rejects it
        let err = compile_err(
            r#"
            contract T(p: Program) locks v {
                clause c() {
                    lock mystery with p
                    unlock v
                }
            }
            "#,
        );
        assert!(matches!(
            err.root_cause(),
            CompileError::UnknownValue { value, .. } if value == "mystery"
        ));
    }

    #[test]
    fn test_reference_known_but_not_on_stack() {
        // the contract's own name binds in the environment but never
        // occupies a stack slot
        let err = compile_err(
            "contract T(p: Integer) locks v { clause c() { verify p > 0 lock v with T } }",
        );
        assert!(matches!(
            err.root_cause(),
            CompileError::UndefinedReference(name) if name == "T"
        ));
    }

    #[test]
    fn test_undefined_reference() {
        let err = compile_err(
            "contract T() locks v { clause c() { verify nonesuch > 1 unlock v } }",
        );
        // the name never enters the environment, so the type check trips
        // before reference resolution
        assert!(matches!(
            err.root_cause(),
            CompileError::LeftOperandType { .. }
        ));
    }

    #[test]
    fn test_self_call_lowering() {
        let program = compile_src(
            r#"
            contract Escrow(n: Integer) locks v {
                clause renew() {
                    verify n > 0
                    lock v with Escrow(n + 1)
                }
            }
            "#,
        );
        let instrs = vm::decode(&program).unwrap();
        // ... <argcount> '' <arg> CATPUSHDATA 0 CHECKPREDICATE ...
        let pos = instrs
            .iter()
            .position(|i| i.opcode() == Some(OpCode::CatPushData))
            .unwrap();
        assert_eq!(instrs[pos + 1].opcode(), Some(OpCode::False)); // INT64(0)
        assert_eq!(instrs[pos + 2].opcode(), Some(OpCode::CheckPredicate));
        assert_eq!(instrs[pos - 1].opcode(), Some(OpCode::Add));
    }

    #[test]
    fn test_cross_contract_call_rejected() {
        let err = compile_err(
            r#"
            contract T(other: Program) locks v {
                clause a() { unlock v }
                clause b() { verify other == other lock v with a(1) }
            }
            "#,
        );
        // `a` is a clause name, not a builtin and not the contract
        assert!(matches!(
            err.root_cause(),
            CompileError::UnknownFunction(name) if name == "a"
        ));
    }

    #[test]
    fn test_multisig_window() {
        let program = compile_src(
            r#"
            contract M(k1: PublicKey, k2: PublicKey, p: Program) locks v {
                clause spend(s1: Signature, s2: Signature) {
                    verify checkTxMultiSig([k1, k2], [s1, s2])
                    lock v with p
                }
            }
            "#,
        );
        let instrs = vm::decode(&program).unwrap();
        let ops: Vec<_> = instrs.iter().filter_map(|i| i.opcode()).collect();
        let window: Vec<OpCode> = vec![
            OpCode::FromAltStack,
            OpCode::Swap,
            OpCode::CheckMultiSig,
            OpCode::Verify,
        ];
        assert!(
            ops.windows(4).any(|w| w == window.as_slice()),
            "missing multisig tail in {:?}",
            ops
        );
        assert!(ops.contains(&OpCode::ToAltStack));
        assert!(ops.contains(&OpCode::TxSigHash));
    }

    #[test]
    fn test_multisig_args_must_be_lists() {
        let err = compile_err(
            r#"
            contract M(k1: PublicKey) locks v {
                clause spend(s1: Signature) {
                    verify checkTxMultiSig(k1, [s1])
                    unlock v
                }
            }
            "#,
        );
        assert!(matches!(
            err.root_cause(),
            CompileError::ArgNotList { index: 0, .. }
        ));
    }

    #[test]
    fn test_list_outside_call_rejected() {
        let err = compile_err(
            "contract T() locks v { clause c() { verify [1, 2] == [1, 2] unlock v } }",
        );
        assert!(matches!(err.root_cause(), CompileError::ListOutsideCall));
    }

    #[test]
    fn test_boolean_args_emit_int_pushes() {
        let src = "contract T(p: Program) locks v { clause c() { lock v with p } }";
        let mut contract = parse(src).unwrap();
        let (program, _, _) = compile_contract(
            &mut contract,
            &[
                ContractArg::Boolean(true),
                ContractArg::Integer(20),
                ContractArg::String(vec![0xaa, 0xbb]),
            ],
        )
        .unwrap();
        // TRUE, then 20 as a one-byte data push, then the byte string
        assert_eq!(&program[..6], &[0x51, 0x01, 0x14, 0x02, 0xaa, 0xbb]);
    }

    #[test]
    fn test_empty_contract() {
        let err = compile_err("contract T() locks v { }");
        assert!(matches!(err, CompileError::EmptyContract));
    }

    #[test]
    fn test_clause_error_carries_index_context() {
        let err = compile_err(
            r#"
            contract T() locks v {
                clause a() { unlock v }
                clause b() { verify 1 + 2 unlock v }
            }
            "#,
        );
        assert!(err.to_string().contains("compiling clause 1"));
        assert!(matches!(
            err.root_cause(),
            CompileError::VerifyNotBoolean { .. }
        ));
    }
}
