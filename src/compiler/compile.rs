//! Compile entry point and analysis result
//!
//! Ties the pipeline together: parse, lower, then assemble the result
//! object callers consume — the program bytes plus, per clause, its
//! arguments, disposed values, time bounds and hash calls. The JSON
//! shape is part of the interface: program bytes are hex-encoded,
//! `mintimes`/`maxtimes` are always present (empty, not omitted), and
//! absent `value_info` fields are omitted.

use crate::compiler::ast::{Contract, Statement};
use crate::compiler::checks::InferredTypes;
use crate::compiler::codegen::{self, ClauseAnalysis};
use crate::compiler::parser;
use crate::compiler::types::Type;
use crate::compiler::CompileError;
use serde::{Deserialize, Serialize};

/// serde adapter for hex-encoded byte strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

/// The compiled program and its structured analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResult {
    pub name: String,
    /// The spending predicate, as VM bytecode
    #[serde(with = "hex_bytes")]
    pub program: Vec<u8>,
    /// Name of the protected value
    pub value: String,
    pub params: Vec<ParamInfo>,
    #[serde(rename = "clause_info")]
    pub clauses: Vec<ClauseInfo>,
}

/// A contract or clause parameter with its most specific inferred type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
}

/// Per-clause analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseInfo {
    pub name: String,
    pub args: Vec<ParamInfo>,
    /// One record per value the clause disposes, in statement order
    #[serde(rename = "value_info")]
    pub values: Vec<ValueInfo>,
    /// Textual form of "x" for each `verify after(x)` in the clause
    pub mintimes: Vec<String>,
    /// Textual form of "x" for each `verify before(x)` in the clause
    pub maxtimes: Vec<String>,
    /// Each hash-function call and the type of the argument passed in
    #[serde(rename = "hash_calls")]
    pub hash_calls: Vec<HashCall>,
}

/// How a clause disposes one value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueInfo {
    pub name: String,
    /// The locking program's textual form; absent for unlocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// The requirement's asset expression, when not the contract value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// The requirement's amount expression, when not the contract value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// A recorded call to a hash builtin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashCall {
    pub name: String,
    pub arg: String,
    #[serde(rename = "type")]
    pub typ: String,
}

/// One contract instantiation argument. The JSON form is a map with
/// exactly one of the three keys; byte strings are hex-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractArg {
    Boolean(bool),
    Integer(i64),
    String(#[serde(with = "hex_bytes")] Vec<u8>),
}

/// Compile an Ivy contract from source text, with instantiation
/// arguments emitted ahead of the predicate
pub fn compile(source: &str, args: &[ContractArg]) -> Result<CompileResult, CompileError> {
    let mut contract = parser::parse(source)?;
    log::debug!(
        "parsed contract \"{}\" with {} clause(s)",
        contract.name,
        contract.clauses.len()
    );

    let (program, inferred, analyses) = codegen::compile_contract(&mut contract, args)
        .map_err(|e| e.context("compiling contract"))?;
    log::debug!("compiled \"{}\" to {} bytes", contract.name, program.len());

    Ok(assemble_result(&contract, program, &inferred, analyses))
}

fn assemble_result(
    contract: &Contract,
    program: Vec<u8>,
    inferred: &InferredTypes,
    analyses: Vec<ClauseAnalysis>,
) -> CompileResult {
    let best_type = |name: &str, declared: &Type| -> String {
        inferred
            .get(name)
            .unwrap_or(declared)
            .to_string()
    };

    let params = contract
        .params
        .iter()
        .map(|p| ParamInfo {
            name: p.name.clone(),
            typ: best_type(&p.name, &p.typ),
        })
        .collect();

    let clauses = contract
        .clauses
        .iter()
        .zip(analyses)
        .map(|(clause, analysis)| {
            let args = clause
                .params
                .iter()
                .map(|p| ParamInfo {
                    name: p.name.clone(),
                    typ: best_type(&p.name, &p.typ),
                })
                .collect();

            let mut values = Vec::new();
            for stmt in &clause.statements {
                match stmt {
                    Statement::Lock {
                        locked, program, ..
                    } => {
                        let mut info = ValueInfo {
                            name: locked.to_string(),
                            program: Some(program.to_string()),
                            asset: None,
                            amount: None,
                        };
                        if info.name != contract.value {
                            if let Some(req) =
                                clause.reqs.iter().find(|r| r.name == info.name)
                            {
                                info.asset = Some(req.asset.to_string());
                                info.amount = Some(req.amount.to_string());
                            }
                        }
                        values.push(info);
                    }
                    Statement::Unlock(_) => values.push(ValueInfo {
                        name: contract.value.clone(),
                        program: None,
                        asset: None,
                        amount: None,
                    }),
                    Statement::Verify(_) => {}
                }
            }

            ClauseInfo {
                name: clause.name.clone(),
                args,
                values,
                mintimes: analysis.mintimes,
                maxtimes: analysis.maxtimes,
                hash_calls: analysis.hash_calls,
            }
        })
        .collect();

    CompileResult {
        name: contract.name.clone(),
        program,
        value: contract.value.clone(),
        params,
        clauses,
    }
}
