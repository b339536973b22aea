//! Ivy contract compiler
//!
//! Lowers a parsed contract to a VM bytecode predicate plus a structured
//! analysis of its clauses. The pipeline: parse, seed the environment,
//! run the semantic checks, then generate code clause by clause against a
//! symbolic stack that mirrors the VM stack slot for slot.
//!
//! # Example
//!
//! ```rust
//! use ivy_compiler::compiler::compile;
//!
//! let source = r#"
//!     contract LockWithPublicKey(publicKey: PublicKey) locks value {
//!         clause spend(sig: Signature) {
//!             verify checkTxSig(publicKey, sig)
//!             unlock value
//!         }
//!     }
//! "#;
//! let result = compile(source, &[]).unwrap();
//! assert_eq!(result.name, "LockWithPublicKey");
//! assert_eq!(hex::encode(&result.program), "7878ae7cac");
//! ```

pub mod ast;
pub mod builder;
pub mod builtins;
pub mod checks;
pub mod codegen;
pub mod compile;
pub mod environ;
pub mod lexer;
pub mod parser;
pub mod stack;
pub mod types;

pub use compile::{
    compile, ClauseInfo, CompileResult, ContractArg, HashCall, ParamInfo, ValueInfo,
};
pub use parser::{parse, ParseError};
pub use types::Type;

use crate::vm::VmError;
use thiserror::Error;

/// Compilation errors. The first error encountered aborts the compile;
/// no partial result is produced.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    // structural errors
    #[error("empty contract")]
    EmptyContract,
    #[error("name \"{0}\" already defined")]
    Redefined(String),
    #[error("contract parameter \"{0}\" cannot have type Value")]
    ValueParam(String),
    #[error("parameter \"{0}\" is unused")]
    UnusedParam(String),
    #[error("value \"{value}\" not disposed in clause \"{clause}\"")]
    ValueNotDisposed { value: String, clause: String },
    #[error("value \"{value}\" disposed multiple times in clause \"{clause}\"")]
    ValueDisposedTwice { value: String, clause: String },
    #[error("unknown value \"{value}\" in lock statement in clause \"{clause}\"")]
    UnknownValue { value: String, clause: String },
    #[error("undefined reference \"{0}\"")]
    UndefinedReference(String),
    #[error("encountered list outside of function-call context")]
    ListOutsideCall,
    #[error("unknown function \"{0}\"")]
    UnknownFunction(String),
    #[error("calling other contracts not yet supported")]
    CrossContractCall,

    // type errors
    #[error("expression in verify statement in clause \"{clause}\" has type \"{typ}\", must be Boolean")]
    VerifyNotBoolean { clause: String, typ: String },
    #[error("in \"{expr}\", left operand has type \"{actual}\", must be \"{want}\"")]
    LeftOperandType {
        expr: String,
        actual: String,
        want: String,
    },
    #[error("in \"{expr}\", right operand has type \"{actual}\", must be \"{want}\"")]
    RightOperandType {
        expr: String,
        actual: String,
        want: String,
    },
    #[error("in \"{expr}\", operand has type \"{actual}\", must be \"{want}\"")]
    OperandType {
        expr: String,
        actual: String,
        want: String,
    },
    #[error("type mismatch in \"{expr}\": left operand has type \"{left}\", right operand has type \"{right}\"")]
    EqualityMismatch {
        expr: String,
        left: String,
        right: String,
    },
    #[error("in \"{expr}\": using \"{op}\" on Boolean values not allowed")]
    BooleanEquality { expr: String, op: String },
    #[error("wrong number of args for \"{name}\": have {have}, want {want}")]
    ArgCount {
        name: String,
        have: usize,
        want: usize,
    },
    #[error("argument {index} to \"{name}\" has type \"{actual}\", must be \"{want}\"")]
    ArgType {
        index: usize,
        name: String,
        actual: String,
        want: String,
    },
    #[error("argument {index} to \"{name}\" must be a list")]
    ArgNotList { index: usize, name: String },

    // internal errors; these indicate a compiler bug, not bad input
    #[error("assembling bytecode: {0}")]
    Vm(#[from] VmError),
    #[error("unresolved jump target")]
    UnresolvedJump,

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Wrap the error with surrounding context, mirroring how the
    /// pipeline reports where in the contract it failed
    pub(crate) fn context(self, context: impl Into<String>) -> CompileError {
        CompileError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping any context layers
    pub fn root_cause(&self) -> &CompileError {
        match self {
            CompileError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
