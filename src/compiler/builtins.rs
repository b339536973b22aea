//! Keyword, builtin and operator tables
//!
//! Module-level constant data seeded into the top environment scope and
//! consulted by the parser, type checker and expression compiler. Operator
//! and builtin descriptors carry their VM lowering as a mnemonic string
//! for the assembler; an empty type slot means "any".

use crate::compiler::types::Type;

/// Reserved words of the language
pub const KEYWORDS: &[&str] = &[
    "contract", "clause", "verify", "lock", "with", "unlock", "locks", "requires", "of",
];

/// A binary operator descriptor
#[derive(Debug)]
pub struct BinaryOp {
    pub op: &'static str,
    /// Parser binding power; higher binds tighter
    pub precedence: u8,
    /// Assembler mnemonics emitted after both operands
    pub opcodes: &'static str,
    /// Required left operand type; `None` accepts any
    pub left: Option<Type>,
    /// Required right operand type; `None` accepts any
    pub right: Option<Type>,
    pub result: Type,
}

/// A unary operator descriptor
#[derive(Debug)]
pub struct UnaryOp {
    pub op: &'static str,
    pub opcodes: &'static str,
    /// Required operand type; `None` accepts any
    pub operand: Option<Type>,
    pub result: Type,
}

/// A builtin function descriptor
#[derive(Debug)]
pub struct Builtin {
    pub name: &'static str,
    /// Assembler mnemonics emitted after the (reversed) arguments;
    /// empty for builtins with a special-cased lowering
    pub opcodes: &'static str,
    /// Argument types; `None` accepts any
    pub args: &'static [Option<Type>],
    pub result: Type,
}

pub static BINARY_OPS: &[BinaryOp] = &[
    BinaryOp {
        op: "||",
        precedence: 1,
        opcodes: "BOOLOR",
        left: Some(Type::Boolean),
        right: Some(Type::Boolean),
        result: Type::Boolean,
    },
    BinaryOp {
        op: "&&",
        precedence: 2,
        opcodes: "BOOLAND",
        left: Some(Type::Boolean),
        right: Some(Type::Boolean),
        result: Type::Boolean,
    },
    BinaryOp {
        op: ">",
        precedence: 3,
        opcodes: "GREATERTHAN",
        left: Some(Type::Integer),
        right: Some(Type::Integer),
        result: Type::Boolean,
    },
    BinaryOp {
        op: "<",
        precedence: 3,
        opcodes: "LESSTHAN",
        left: Some(Type::Integer),
        right: Some(Type::Integer),
        result: Type::Boolean,
    },
    BinaryOp {
        op: ">=",
        precedence: 3,
        opcodes: "GREATERTHANOREQUAL",
        left: Some(Type::Integer),
        right: Some(Type::Integer),
        result: Type::Boolean,
    },
    BinaryOp {
        op: "<=",
        precedence: 3,
        opcodes: "LESSTHANOREQUAL",
        left: Some(Type::Integer),
        right: Some(Type::Integer),
        result: Type::Boolean,
    },
    BinaryOp {
        op: "==",
        precedence: 3,
        opcodes: "EQUAL",
        left: None,
        right: None,
        result: Type::Boolean,
    },
    BinaryOp {
        op: "!=",
        precedence: 3,
        opcodes: "EQUAL NOT",
        left: None,
        right: None,
        result: Type::Boolean,
    },
    BinaryOp {
        op: "+",
        precedence: 4,
        opcodes: "ADD",
        left: Some(Type::Integer),
        right: Some(Type::Integer),
        result: Type::Integer,
    },
    BinaryOp {
        op: "-",
        precedence: 4,
        opcodes: "SUB",
        left: Some(Type::Integer),
        right: Some(Type::Integer),
        result: Type::Integer,
    },
];

pub static UNARY_OPS: &[UnaryOp] = &[
    UnaryOp {
        op: "-",
        opcodes: "NEGATE",
        operand: Some(Type::Integer),
        result: Type::Integer,
    },
    UnaryOp {
        op: "!",
        opcodes: "NOT",
        operand: Some(Type::Boolean),
        result: Type::Boolean,
    },
];

pub static BUILTINS: &[Builtin] = &[
    Builtin {
        name: "sha3",
        opcodes: "SHA3",
        args: &[None],
        result: Type::Hash,
    },
    Builtin {
        name: "sha256",
        opcodes: "SHA256",
        args: &[None],
        result: Type::Hash,
    },
    Builtin {
        name: "size",
        opcodes: "SIZE SWAP DROP",
        args: &[None],
        result: Type::Integer,
    },
    Builtin {
        name: "abs",
        opcodes: "ABS",
        args: &[Some(Type::Integer)],
        result: Type::Integer,
    },
    Builtin {
        name: "min",
        opcodes: "MIN",
        args: &[Some(Type::Integer), Some(Type::Integer)],
        result: Type::Integer,
    },
    Builtin {
        name: "max",
        opcodes: "MAX",
        args: &[Some(Type::Integer), Some(Type::Integer)],
        result: Type::Integer,
    },
    Builtin {
        name: "concat",
        opcodes: "CAT",
        args: &[None, None],
        result: Type::String,
    },
    Builtin {
        name: "concatpush",
        opcodes: "CATPUSHDATA",
        args: &[None, None],
        result: Type::String,
    },
    Builtin {
        name: "before",
        opcodes: "MAXTIME GREATERTHAN",
        args: &[Some(Type::Time)],
        result: Type::Boolean,
    },
    Builtin {
        name: "after",
        opcodes: "MINTIME LESSTHAN",
        args: &[Some(Type::Time)],
        result: Type::Boolean,
    },
    Builtin {
        name: "checkTxSig",
        opcodes: "TXSIGHASH SWAP CHECKSIG",
        args: &[Some(Type::PublicKey), Some(Type::Signature)],
        result: Type::Boolean,
    },
    // lowered by hand in the expression compiler
    Builtin {
        name: "checkTxMultiSig",
        opcodes: "",
        args: &[None, None],
        result: Type::Boolean,
    },
];

/// Look up a builtin descriptor by name
pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Look up a binary operator descriptor by symbol
pub fn binary_op(op: &str) -> Option<&'static BinaryOp> {
    BINARY_OPS.iter().find(|o| o.op == op)
}

/// Look up a unary operator descriptor by symbol
pub fn unary_op(op: &str) -> Option<&'static UnaryOp> {
    UNARY_OPS.iter().find(|o| o.op == op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm;

    #[test]
    fn test_lookups() {
        assert_eq!(builtin("sha3").unwrap().result, Type::Hash);
        assert!(builtin("frobnicate").is_none());
        assert_eq!(binary_op("==").unwrap().opcodes, "EQUAL");
        assert_eq!(unary_op("!").unwrap().opcodes, "NOT");
    }

    #[test]
    fn test_all_opcode_strings_assemble() {
        for op in BINARY_OPS {
            vm::assemble(op.opcodes).unwrap();
        }
        for op in UNARY_OPS {
            vm::assemble(op.opcodes).unwrap();
        }
        for b in BUILTINS {
            vm::assemble(b.opcodes).unwrap();
        }
    }

    #[test]
    fn test_keywords_are_not_builtins() {
        for k in KEYWORDS {
            assert!(builtin(k).is_none());
        }
    }
}
