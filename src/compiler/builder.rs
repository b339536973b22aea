//! Bytecode builder
//!
//! Accumulates opcodes, pushes and raw byte runs, and back-patches
//! forward jump targets with absolute offsets at finalization.
//!
//! A `VERIFY` is not appended immediately: it is held pending and flushed
//! by whatever is emitted next, and `build()` discards a still-pending
//! one. A clause body therefore ends without its final `VERIFY` — the
//! boolean it would have consumed is the predicate's result — while a
//! `VERIFY` followed by more code lands in front of that code as usual.

use crate::compiler::CompileError;
use crate::vm::{self, OpCode};
use std::collections::HashMap;

/// A forward jump label, resolved at finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JumpTarget(usize);

/// Builds one program's byte stream
#[derive(Debug, Default)]
pub struct Builder {
    program: Vec<u8>,
    pending_verify: bool,
    jump_counter: usize,
    /// target -> resolved absolute offset
    jump_addrs: HashMap<JumpTarget, u32>,
    /// byte positions of 4-byte placeholders awaiting each target
    placeholders: Vec<(usize, JumpTarget)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self) {
        if self.pending_verify {
            self.program.push(OpCode::Verify as u8);
            self.pending_verify = false;
        }
    }

    /// Append the canonical push of a 64-bit integer
    pub fn add_int64(&mut self, n: i64) {
        self.flush();
        self.program.extend(vm::push_int64(n));
    }

    /// Append a length-prefixed data push
    pub fn add_data(&mut self, data: &[u8]) {
        self.flush();
        self.program.extend(vm::push_data(data));
    }

    /// Append a single opcode; `VERIFY` is held pending
    pub fn add_op(&mut self, op: OpCode) {
        self.flush();
        if op == OpCode::Verify {
            self.pending_verify = true;
        } else {
            self.program.push(op as u8);
        }
    }

    /// Append pre-assembled bytes verbatim
    pub fn add_raw_bytes(&mut self, bytes: &[u8]) {
        self.flush();
        self.program.extend_from_slice(bytes);
    }

    /// Reserve a forward jump label
    pub fn new_jump_target(&mut self) -> JumpTarget {
        self.jump_counter += 1;
        JumpTarget(self.jump_counter)
    }

    /// Append an unconditional jump to `target`
    pub fn add_jump(&mut self, target: JumpTarget) {
        self.add_jump_op(OpCode::Jump, target);
    }

    /// Append a conditional jump to `target`
    pub fn add_jump_if(&mut self, target: JumpTarget) {
        self.add_jump_op(OpCode::JumpIf, target);
    }

    fn add_jump_op(&mut self, op: OpCode, target: JumpTarget) {
        self.flush();
        self.program.push(op as u8);
        self.placeholders.push((self.program.len(), target));
        self.program.extend_from_slice(&[0; 4]);
    }

    /// Resolve `target` to the current end of the program
    pub fn set_jump_target(&mut self, target: JumpTarget) {
        self.flush();
        self.jump_addrs.insert(target, self.program.len() as u32);
    }

    /// Finalize: patch every jump placeholder and return the byte string.
    /// Fails if a reserved target was never set. A pending `VERIFY` is
    /// discarded, not flushed.
    pub fn build(mut self) -> Result<Vec<u8>, CompileError> {
        for (pos, target) in &self.placeholders {
            let addr = self
                .jump_addrs
                .get(target)
                .ok_or(CompileError::UnresolvedJump)?;
            self.program[*pos..*pos + 4].copy_from_slice(&addr.to_le_bytes());
        }
        Ok(self.program)
    }
}
