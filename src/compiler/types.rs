//! Domain type tags
//!
//! Every expression and parameter carries one of these tags. `Hash` is a
//! generic hash type; `Sha3`/`Sha256` are its refinements, parameterized by
//! the preimage type, and take part in equality-driven type propagation.

use std::fmt;

/// Type tag of an Ivy expression or parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// No type; keywords, builtins and clause names bind with this
    Nil,
    Boolean,
    Integer,
    /// An arbitrary byte string
    String,
    /// A hash of unknown function and preimage
    Hash,
    /// An asset id
    Asset,
    /// An asset amount
    Amount,
    /// A block timestamp bound
    Time,
    PublicKey,
    Signature,
    /// A predicate program
    Program,
    /// An on-chain value: an amount of some asset
    Value,
    /// The contract template itself
    Contract,
    /// A list literal; only valid as a call argument
    List,
    /// SHA3-256 hash refined by its preimage type
    Sha3(Box<Type>),
    /// SHA-256 hash refined by its preimage type
    Sha256(Box<Type>),
}

impl Type {
    /// Whether this is a refinement of the generic `Hash` type
    pub fn is_hash_subtype(&self) -> bool {
        matches!(self, Type::Sha3(_) | Type::Sha256(_))
    }

    /// Parse a plain (non-parameterized) type name
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "Boolean" => Some(Type::Boolean),
            "Integer" => Some(Type::Integer),
            "String" => Some(Type::String),
            "Hash" => Some(Type::Hash),
            "Asset" => Some(Type::Asset),
            "Amount" => Some(Type::Amount),
            "Time" => Some(Type::Time),
            "PublicKey" => Some(Type::PublicKey),
            "Signature" => Some(Type::Signature),
            "Program" => Some(Type::Program),
            "Value" => Some(Type::Value),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Nil => write!(f, ""),
            Type::Boolean => write!(f, "Boolean"),
            Type::Integer => write!(f, "Integer"),
            Type::String => write!(f, "String"),
            Type::Hash => write!(f, "Hash"),
            Type::Asset => write!(f, "Asset"),
            Type::Amount => write!(f, "Amount"),
            Type::Time => write!(f, "Time"),
            Type::PublicKey => write!(f, "PublicKey"),
            Type::Signature => write!(f, "Signature"),
            Type::Program => write!(f, "Program"),
            Type::Value => write!(f, "Value"),
            Type::Contract => write!(f, "Contract"),
            Type::List => write!(f, "List"),
            Type::Sha3(inner) => write!(f, "Sha3({})", inner),
            Type::Sha256(inner) => write!(f, "Sha256({})", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_subtypes() {
        assert!(Type::Sha3(Box::new(Type::PublicKey)).is_hash_subtype());
        assert!(Type::Sha256(Box::new(Type::String)).is_hash_subtype());
        assert!(!Type::Hash.is_hash_subtype());
        assert!(!Type::Integer.is_hash_subtype());
    }

    #[test]
    fn test_display() {
        assert_eq!(Type::Integer.to_string(), "Integer");
        assert_eq!(
            Type::Sha3(Box::new(Type::PublicKey)).to_string(),
            "Sha3(PublicKey)"
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Type::from_name("Time"), Some(Type::Time));
        assert_eq!(Type::from_name("Sha3"), None);
        assert_eq!(Type::from_name("bogus"), None);
    }
}
