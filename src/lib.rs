//! Ivy: a compiler for smart-contract predicates
//!
//! Ivy is a small domain-specific language for writing the predicates
//! that lock values on a stack-machine blockchain. A contract is a named,
//! parameterized template with one or more clauses, each a mutually
//! exclusive way of spending the protected value. This crate provides:
//! - Parsing of Ivy source into a contract AST
//! - Semantic validation: name binding, type checking, use and
//!   disposal checks
//! - Code generation to VM bytecode over a symbolic stack, including
//!   multi-clause dispatch by a selector integer
//! - A structured analysis of each clause: parameters, locked and
//!   unlocked values, time bounds, hash calls
//! - An assembler and disassembler for the VM's instruction encoding
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
//!
//! let result = compile(source, &[]).unwrap();
//! assert_eq!(result.name, "LockWithPublicKey");
//! // OVER OVER TXSIGHASH SWAP CHECKSIG
//! assert_eq!(hex::encode(&result.program), "7878ae7cac");
//! ```

pub mod compiler;
pub mod vm;

pub use compiler::{compile, CompileError, CompileResult, ContractArg};
