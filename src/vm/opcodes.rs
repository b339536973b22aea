//! Host VM opcodes
//!
//! Defines the subset of the virtual machine's instruction set that the
//! compiler emits. Byte values follow the VM's Bitcoin-derived layout:
//! 0x01-0x4b are raw data pushes (the byte is the payload length) and are
//! therefore not listed here.

use serde::{Deserialize, Serialize};

/// Opcodes of the stack virtual machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OpCode {
    // Pushes (0x00 - 0x60); 0x01-0x4b push that many raw bytes
    /// Push the empty string (reads as integer 0 / false)
    False = 0x00,
    /// Push data with a 1-byte length prefix
    PushData1 = 0x4c,
    /// Push data with a 2-byte length prefix
    PushData2 = 0x4d,
    /// Push data with a 4-byte length prefix
    PushData4 = 0x4e,
    /// Push the integer -1
    Negate1 = 0x4f,
    /// Push the integer 1 (true)
    True = 0x51,
    /// Push the integer 2
    Num2 = 0x52,
    /// Push the integer 3
    Num3 = 0x53,
    /// Push the integer 4
    Num4 = 0x54,
    /// Push the integer 5
    Num5 = 0x55,
    /// Push the integer 6
    Num6 = 0x56,
    /// Push the integer 7
    Num7 = 0x57,
    /// Push the integer 8
    Num8 = 0x58,
    /// Push the integer 9
    Num9 = 0x59,
    /// Push the integer 10
    Num10 = 0x5a,
    /// Push the integer 11
    Num11 = 0x5b,
    /// Push the integer 12
    Num12 = 0x5c,
    /// Push the integer 13
    Num13 = 0x5d,
    /// Push the integer 14
    Num14 = 0x5e,
    /// Push the integer 15
    Num15 = 0x5f,
    /// Push the integer 16
    Num16 = 0x60,

    // Control flow (0x61 - 0x6a)
    /// No operation
    Nop = 0x61,
    /// Unconditional jump; 4-byte absolute offset immediate
    Jump = 0x63,
    /// Conditional jump; pops a boolean, 4-byte absolute offset immediate
    JumpIf = 0x64,
    /// Pop the top value; fail execution if it is not truthy
    Verify = 0x69,
    /// Fail execution unconditionally
    Fail = 0x6a,

    // Stack (0x6b - 0x7d)
    /// Move the top value to the alt stack
    ToAltStack = 0x6b,
    /// Move the top of the alt stack back
    FromAltStack = 0x6c,
    /// Discard the top value
    Drop = 0x75,
    /// Duplicate the top value
    Dup = 0x76,
    /// Copy the second value to the top
    Over = 0x78,
    /// Copy the value at depth n (popped) to the top
    Pick = 0x79,
    /// Move the value at depth n (popped) to the top
    Roll = 0x7a,
    /// Swap the top two values
    Swap = 0x7c,

    // Splice (0x7e - 0x82)
    /// Concatenate the top two strings
    Cat = 0x7e,
    /// Concatenate the top value onto the program string below it,
    /// as a push of that value
    CatPushData = 0x7f,
    /// Push the length of the top string
    Size = 0x82,

    // Bitwise / comparison (0x87 - 0x88)
    /// Push whether the top two values are byte-equal
    Equal = 0x87,
    /// EQUAL followed by VERIFY
    EqualVerify = 0x88,

    // Numeric (0x8f - 0xa5)
    /// Negate the top integer
    Negate = 0x8f,
    /// Absolute value of the top integer
    Abs = 0x90,
    /// Logical negation of the top boolean
    Not = 0x91,
    /// Add the top two integers
    Add = 0x93,
    /// Subtract the top integer from the second
    Sub = 0x94,
    /// Logical AND of the top two booleans
    BoolAnd = 0x9a,
    /// Logical OR of the top two booleans
    BoolOr = 0x9b,
    /// Push whether the top two integers are equal
    NumEqual = 0x9c,
    /// Push whether the top two integers differ
    NumNotEqual = 0x9e,
    /// Push whether the second integer is less than the top
    LessThan = 0x9f,
    /// Push whether the second integer is greater than the top
    GreaterThan = 0xa0,
    /// Push whether the second integer is at most the top
    LessThanOrEqual = 0xa1,
    /// Push whether the second integer is at least the top
    GreaterThanOrEqual = 0xa2,
    /// Push the smaller of the top two integers
    Min = 0xa3,
    /// Push the larger of the top two integers
    Max = 0xa4,

    // Crypto (0xa8 - 0xae)
    /// SHA-256 of the top string
    Sha256 = 0xa8,
    /// SHA3-256 of the top string
    Sha3 = 0xaa,
    /// Check a signature against a message hash and public key
    CheckSig = 0xac,
    /// Check M signatures against N public keys
    CheckMultiSig = 0xad,
    /// Push the transaction signature hash
    TxSigHash = 0xae,

    // Introspection (0xc0 - 0xc6)
    /// Evaluate a constructed predicate against an argument count
    CheckPredicate = 0xc0,
    /// Check an output against the (index, refdatahash, amount, asset,
    /// version, program) tuple on the stack
    CheckOutput = 0xc1,
    /// Push the asset id of the value being spent
    Asset = 0xc2,
    /// Push the amount of the value being spent
    Amount = 0xc3,
    /// Push the transaction's minimum valid time
    MinTime = 0xc5,
    /// Push the transaction's maximum valid time
    MaxTime = 0xc6,
}

impl OpCode {
    /// Convert byte to opcode
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(OpCode::False),
            0x4c => Some(OpCode::PushData1),
            0x4d => Some(OpCode::PushData2),
            0x4e => Some(OpCode::PushData4),
            0x4f => Some(OpCode::Negate1),
            0x51 => Some(OpCode::True),
            0x52 => Some(OpCode::Num2),
            0x53 => Some(OpCode::Num3),
            0x54 => Some(OpCode::Num4),
            0x55 => Some(OpCode::Num5),
            0x56 => Some(OpCode::Num6),
            0x57 => Some(OpCode::Num7),
            0x58 => Some(OpCode::Num8),
            0x59 => Some(OpCode::Num9),
            0x5a => Some(OpCode::Num10),
            0x5b => Some(OpCode::Num11),
            0x5c => Some(OpCode::Num12),
            0x5d => Some(OpCode::Num13),
            0x5e => Some(OpCode::Num14),
            0x5f => Some(OpCode::Num15),
            0x60 => Some(OpCode::Num16),
            0x61 => Some(OpCode::Nop),
            0x63 => Some(OpCode::Jump),
            0x64 => Some(OpCode::JumpIf),
            0x69 => Some(OpCode::Verify),
            0x6a => Some(OpCode::Fail),
            0x6b => Some(OpCode::ToAltStack),
            0x6c => Some(OpCode::FromAltStack),
            0x75 => Some(OpCode::Drop),
            0x76 => Some(OpCode::Dup),
            0x78 => Some(OpCode::Over),
            0x79 => Some(OpCode::Pick),
            0x7a => Some(OpCode::Roll),
            0x7c => Some(OpCode::Swap),
            0x7e => Some(OpCode::Cat),
            0x7f => Some(OpCode::CatPushData),
            0x82 => Some(OpCode::Size),
            0x87 => Some(OpCode::Equal),
            0x88 => Some(OpCode::EqualVerify),
            0x8f => Some(OpCode::Negate),
            0x90 => Some(OpCode::Abs),
            0x91 => Some(OpCode::Not),
            0x93 => Some(OpCode::Add),
            0x94 => Some(OpCode::Sub),
            0x9a => Some(OpCode::BoolAnd),
            0x9b => Some(OpCode::BoolOr),
            0x9c => Some(OpCode::NumEqual),
            0x9e => Some(OpCode::NumNotEqual),
            0x9f => Some(OpCode::LessThan),
            0xa0 => Some(OpCode::GreaterThan),
            0xa1 => Some(OpCode::LessThanOrEqual),
            0xa2 => Some(OpCode::GreaterThanOrEqual),
            0xa3 => Some(OpCode::Min),
            0xa4 => Some(OpCode::Max),
            0xa8 => Some(OpCode::Sha256),
            0xaa => Some(OpCode::Sha3),
            0xac => Some(OpCode::CheckSig),
            0xad => Some(OpCode::CheckMultiSig),
            0xae => Some(OpCode::TxSigHash),
            0xc0 => Some(OpCode::CheckPredicate),
            0xc1 => Some(OpCode::CheckOutput),
            0xc2 => Some(OpCode::Asset),
            0xc3 => Some(OpCode::Amount),
            0xc5 => Some(OpCode::MinTime),
            0xc6 => Some(OpCode::MaxTime),
            _ => None,
        }
    }

    /// Look up an opcode by its assembler mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "FALSE" | "0" => Some(OpCode::False),
            "PUSHDATA1" => Some(OpCode::PushData1),
            "PUSHDATA2" => Some(OpCode::PushData2),
            "PUSHDATA4" => Some(OpCode::PushData4),
            "1NEGATE" => Some(OpCode::Negate1),
            "TRUE" | "1" => Some(OpCode::True),
            "2" => Some(OpCode::Num2),
            "3" => Some(OpCode::Num3),
            "4" => Some(OpCode::Num4),
            "5" => Some(OpCode::Num5),
            "6" => Some(OpCode::Num6),
            "7" => Some(OpCode::Num7),
            "8" => Some(OpCode::Num8),
            "9" => Some(OpCode::Num9),
            "10" => Some(OpCode::Num10),
            "11" => Some(OpCode::Num11),
            "12" => Some(OpCode::Num12),
            "13" => Some(OpCode::Num13),
            "14" => Some(OpCode::Num14),
            "15" => Some(OpCode::Num15),
            "16" => Some(OpCode::Num16),
            "NOP" => Some(OpCode::Nop),
            "JUMP" => Some(OpCode::Jump),
            "JUMPIF" => Some(OpCode::JumpIf),
            "VERIFY" => Some(OpCode::Verify),
            "FAIL" => Some(OpCode::Fail),
            "TOALTSTACK" => Some(OpCode::ToAltStack),
            "FROMALTSTACK" => Some(OpCode::FromAltStack),
            "DROP" => Some(OpCode::Drop),
            "DUP" => Some(OpCode::Dup),
            "OVER" => Some(OpCode::Over),
            "PICK" => Some(OpCode::Pick),
            "ROLL" => Some(OpCode::Roll),
            "SWAP" => Some(OpCode::Swap),
            "CAT" => Some(OpCode::Cat),
            "CATPUSHDATA" => Some(OpCode::CatPushData),
            "SIZE" => Some(OpCode::Size),
            "EQUAL" => Some(OpCode::Equal),
            "EQUALVERIFY" => Some(OpCode::EqualVerify),
            "NEGATE" => Some(OpCode::Negate),
            "ABS" => Some(OpCode::Abs),
            "NOT" => Some(OpCode::Not),
            "ADD" => Some(OpCode::Add),
            "SUB" => Some(OpCode::Sub),
            "BOOLAND" => Some(OpCode::BoolAnd),
            "BOOLOR" => Some(OpCode::BoolOr),
            "NUMEQUAL" => Some(OpCode::NumEqual),
            "NUMNOTEQUAL" => Some(OpCode::NumNotEqual),
            "LESSTHAN" => Some(OpCode::LessThan),
            "GREATERTHAN" => Some(OpCode::GreaterThan),
            "LESSTHANOREQUAL" => Some(OpCode::LessThanOrEqual),
            "GREATERTHANOREQUAL" => Some(OpCode::GreaterThanOrEqual),
            "MIN" => Some(OpCode::Min),
            "MAX" => Some(OpCode::Max),
            "SHA256" => Some(OpCode::Sha256),
            "SHA3" => Some(OpCode::Sha3),
            "CHECKSIG" => Some(OpCode::CheckSig),
            "CHECKMULTISIG" => Some(OpCode::CheckMultiSig),
            "TXSIGHASH" => Some(OpCode::TxSigHash),
            "CHECKPREDICATE" => Some(OpCode::CheckPredicate),
            "CHECKOUTPUT" => Some(OpCode::CheckOutput),
            "ASSET" => Some(OpCode::Asset),
            "AMOUNT" => Some(OpCode::Amount),
            "MINTIME" => Some(OpCode::MinTime),
            "MAXTIME" => Some(OpCode::MaxTime),
            _ => None,
        }
    }

    /// Get the number of immediate bytes this opcode consumes after itself.
    /// Data push lengths are variable and handled by the decoder.
    pub fn immediate_bytes(&self) -> usize {
        match self {
            OpCode::Jump | OpCode::JumpIf => 4, // 32-bit absolute offset
            _ => 0,
        }
    }

    /// Get the opcode mnemonic for disassembly
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::False => "FALSE",
            OpCode::PushData1 => "PUSHDATA1",
            OpCode::PushData2 => "PUSHDATA2",
            OpCode::PushData4 => "PUSHDATA4",
            OpCode::Negate1 => "1NEGATE",
            OpCode::True => "TRUE",
            OpCode::Num2 => "2",
            OpCode::Num3 => "3",
            OpCode::Num4 => "4",
            OpCode::Num5 => "5",
            OpCode::Num6 => "6",
            OpCode::Num7 => "7",
            OpCode::Num8 => "8",
            OpCode::Num9 => "9",
            OpCode::Num10 => "10",
            OpCode::Num11 => "11",
            OpCode::Num12 => "12",
            OpCode::Num13 => "13",
            OpCode::Num14 => "14",
            OpCode::Num15 => "15",
            OpCode::Num16 => "16",
            OpCode::Nop => "NOP",
            OpCode::Jump => "JUMP",
            OpCode::JumpIf => "JUMPIF",
            OpCode::Verify => "VERIFY",
            OpCode::Fail => "FAIL",
            OpCode::ToAltStack => "TOALTSTACK",
            OpCode::FromAltStack => "FROMALTSTACK",
            OpCode::Drop => "DROP",
            OpCode::Dup => "DUP",
            OpCode::Over => "OVER",
            OpCode::Pick => "PICK",
            OpCode::Roll => "ROLL",
            OpCode::Swap => "SWAP",
            OpCode::Cat => "CAT",
            OpCode::CatPushData => "CATPUSHDATA",
            OpCode::Size => "SIZE",
            OpCode::Equal => "EQUAL",
            OpCode::EqualVerify => "EQUALVERIFY",
            OpCode::Negate => "NEGATE",
            OpCode::Abs => "ABS",
            OpCode::Not => "NOT",
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::BoolAnd => "BOOLAND",
            OpCode::BoolOr => "BOOLOR",
            OpCode::NumEqual => "NUMEQUAL",
            OpCode::NumNotEqual => "NUMNOTEQUAL",
            OpCode::LessThan => "LESSTHAN",
            OpCode::GreaterThan => "GREATERTHAN",
            OpCode::LessThanOrEqual => "LESSTHANOREQUAL",
            OpCode::GreaterThanOrEqual => "GREATERTHANOREQUAL",
            OpCode::Min => "MIN",
            OpCode::Max => "MAX",
            OpCode::Sha256 => "SHA256",
            OpCode::Sha3 => "SHA3",
            OpCode::CheckSig => "CHECKSIG",
            OpCode::CheckMultiSig => "CHECKMULTISIG",
            OpCode::TxSigHash => "TXSIGHASH",
            OpCode::CheckPredicate => "CHECKPREDICATE",
            OpCode::CheckOutput => "CHECKOUTPUT",
            OpCode::Asset => "ASSET",
            OpCode::Amount => "AMOUNT",
            OpCode::MinTime => "MINTIME",
            OpCode::MaxTime => "MAXTIME",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        let opcodes = [
            OpCode::False,
            OpCode::True,
            OpCode::Jump,
            OpCode::Verify,
            OpCode::Dup,
            OpCode::Roll,
            OpCode::CatPushData,
            OpCode::NumEqual,
            OpCode::TxSigHash,
            OpCode::CheckOutput,
            OpCode::MaxTime,
        ];

        for op in opcodes {
            let byte = op as u8;
            let decoded = OpCode::from_byte(byte).unwrap();
            assert_eq!(op, decoded);
        }
    }

    #[test]
    fn test_mnemonic_roundtrip() {
        for byte in 0u8..=0xff {
            if let Some(op) = OpCode::from_byte(byte) {
                assert_eq!(OpCode::from_mnemonic(op.name()), Some(op));
            }
        }
    }

    #[test]
    fn test_data_push_range_is_unnamed() {
        for byte in 0x01u8..=0x4b {
            assert!(OpCode::from_byte(byte).is_none());
        }
    }

    #[test]
    fn test_immediate_bytes() {
        assert_eq!(OpCode::Jump.immediate_bytes(), 4);
        assert_eq!(OpCode::JumpIf.immediate_bytes(), 4);
        assert_eq!(OpCode::Dup.immediate_bytes(), 0);
    }
}
