//! Contract syntax tree
//!
//! The parsed form of a contract. Statements and expressions are tagged
//! sum types; the textual rendering (`Display`) is load-bearing — it
//! produces the labels the symbolic stack matches variable references
//! against, and the strings reported in the compile analysis.

use crate::compiler::builtins::{self, BinaryOp, Builtin, UnaryOp};
use crate::compiler::environ::Environ;
use crate::compiler::types::Type;
use std::fmt;

/// A contract template: a named, parameterized predicate protecting a value
#[derive(Debug, Clone)]
pub struct Contract {
    pub name: String,
    /// Name of the protected value
    pub value: String,
    pub params: Vec<Param>,
    pub clauses: Vec<Clause>,
}

/// A contract or clause parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub typ: Type,
}

/// One alternative spending path of a contract
#[derive(Debug, Clone)]
pub struct Clause {
    pub name: String,
    pub params: Vec<Param>,
    pub reqs: Vec<Requirement>,
    pub statements: Vec<Statement>,
}

/// A value the clause requires as input, distinct from the contract's
/// protected value; locally named, referencable by `lock` statements
#[derive(Debug, Clone)]
pub struct Requirement {
    pub name: String,
    pub amount: Expression,
    pub asset: Expression,
}

/// A clause body statement
#[derive(Debug, Clone)]
pub enum Statement {
    Verify(Expression),
    Lock {
        locked: Expression,
        program: Expression,
        /// Output index in the checked transaction; assigned during
        /// compilation, in source order among lock statements
        index: i64,
    },
    Unlock(Expression),
}

/// An expression
#[derive(Debug, Clone)]
pub enum Expression {
    Binary {
        op: &'static BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: &'static UnaryOp,
        expr: Box<Expression>,
    },
    Call {
        func: Box<Expression>,
        args: Vec<Expression>,
    },
    VarRef(String),
    Integer(i64),
    Bytes(Vec<u8>),
    Boolean(bool),
    List(Vec<Expression>),
}

impl Expression {
    /// The expression's type under the given environment. Unknown names
    /// read as `Nil` and are rejected later, at reference resolution.
    pub fn typ(&self, env: &Environ) -> Type {
        match self {
            Expression::Binary { op, .. } => op.result.clone(),
            Expression::Unary { op, .. } => op.result.clone(),
            Expression::Call { func, .. } => {
                if let Some(b) = referenced_builtin(func) {
                    return b.result.clone();
                }
                if func.typ(env) == Type::Contract {
                    return Type::Program;
                }
                Type::Nil
            }
            Expression::VarRef(name) => env.lookup_type(name),
            Expression::Integer(_) => Type::Integer,
            Expression::Bytes(_) => Type::String,
            Expression::Boolean(_) => Type::Boolean,
            Expression::List(_) => Type::List,
        }
    }
}

/// The builtin a call target refers to, if it is a plain reference to one
pub fn referenced_builtin(expr: &Expression) -> Option<&'static Builtin> {
    match expr {
        Expression::VarRef(name) => builtins::builtin(name),
        _ => None,
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.op, right)
            }
            Expression::Unary { op, expr } => write!(f, "{}{}", op.op, expr),
            Expression::Call { func, args } => {
                write!(f, "{}(", func)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Expression::VarRef(name) => write!(f, "{}", name),
            Expression::Integer(n) => write!(f, "{}", n),
            Expression::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
            Expression::Boolean(b) => write!(f, "{}", b),
            Expression::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
