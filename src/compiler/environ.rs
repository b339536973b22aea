//! Name binding environment
//!
//! A chain of lexical scopes mapping each name to its type and role. The
//! top scope is seeded with keywords, builtins and the contract's own
//! names; each clause gets a child scope. Adding a name that is already
//! visible anywhere in the chain is a redefinition error — nothing
//! shadows, not even across scopes.

use crate::compiler::types::Type;
use crate::compiler::CompileError;
use std::collections::HashMap;

/// What kind of thing a name is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Keyword,
    Builtin,
    Contract,
    ContractParam,
    ContractValue,
    Clause,
    ClauseParam,
    ClauseValue,
}

/// A single binding
#[derive(Debug, Clone)]
pub struct Entry {
    pub typ: Type,
    pub role: Role,
}

/// The scope chain. Scopes are pushed for each clause and popped when
/// its compilation ends; lookups search innermost-out.
#[derive(Debug)]
pub struct Environ {
    scopes: Vec<HashMap<String, Entry>>,
}

impl Environ {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    /// Open a child scope
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Close the innermost scope
    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1);
        self.scopes.pop();
    }

    /// Bind `name` in the innermost scope. Fails if the name is already
    /// visible anywhere in the chain.
    pub fn add(&mut self, name: &str, typ: Type, role: Role) -> Result<(), CompileError> {
        if self.lookup(name).is_some() {
            return Err(CompileError::Redefined(name.to_string()));
        }
        self.scopes
            .last_mut()
            .expect("environment always has a scope")
            .insert(name.to_string(), Entry { typ, role });
        Ok(())
    }

    /// Find a binding, innermost scope first
    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Find a binding for in-place refinement (type propagation)
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    /// The bound type of a name, `Nil` if unbound
    pub fn lookup_type(&self, name: &str) -> Type {
        self.lookup(name)
            .map(|entry| entry.typ.clone())
            .unwrap_or(Type::Nil)
    }
}

impl Default for Environ {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut env = Environ::new();
        env.add("pk", Type::PublicKey, Role::ContractParam).unwrap();
        let entry = env.lookup("pk").unwrap();
        assert_eq!(entry.typ, Type::PublicKey);
        assert_eq!(entry.role, Role::ContractParam);
        assert_eq!(env.lookup_type("missing"), Type::Nil);
    }

    #[test]
    fn test_redefinition_rejected() {
        let mut env = Environ::new();
        env.add("x", Type::Integer, Role::ContractParam).unwrap();
        let err = env.add("x", Type::Boolean, Role::ClauseParam).unwrap_err();
        assert!(matches!(err, CompileError::Redefined(name) if name == "x"));
    }

    #[test]
    fn test_no_shadowing_across_scopes() {
        let mut env = Environ::new();
        env.add("sha3", Type::Nil, Role::Builtin).unwrap();
        env.push_scope();
        assert!(env.add("sha3", Type::Integer, Role::ClauseParam).is_err());
        // outer binding still visible from the child scope
        assert_eq!(env.lookup("sha3").unwrap().role, Role::Builtin);
        env.pop_scope();
    }

    #[test]
    fn test_pop_scope_forgets_bindings() {
        let mut env = Environ::new();
        env.push_scope();
        env.add("sig", Type::Signature, Role::ClauseParam).unwrap();
        env.pop_scope();
        assert!(env.lookup("sig").is_none());
    }

    #[test]
    fn test_lookup_mut_refines_outer_binding() {
        let mut env = Environ::new();
        env.add("h", Type::Hash, Role::ContractParam).unwrap();
        env.push_scope();
        env.lookup_mut("h").unwrap().typ = Type::Sha3(Box::new(Type::String));
        env.pop_scope();
        assert_eq!(env.lookup_type("h"), Type::Sha3(Box::new(Type::String)));
    }
}
