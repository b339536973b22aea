//! Host virtual machine encoding
//!
//! The compiler targets a stack-based bytecode VM. This module carries the
//! VM-facing surface the compiler needs: the opcode table, the mnemonic
//! assembler used for operator and builtin descriptors, the canonical
//! integer/data push encodings, and a decoder for validating and
//! disassembling compiled programs.

pub mod assemble;
pub mod opcodes;

pub use assemble::{
    assemble, decode, disassemble, int64_bytes, push_data, push_int64, Instruction, VmError,
};
pub use opcodes::OpCode;
