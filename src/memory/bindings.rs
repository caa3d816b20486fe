//! Named value bindings
//!
//! This module provides the environment that statements read and write:
//! - [`Bindings`]: all live names, with nested scopes for loop bodies
//! - [`Binding`]: a value, its declared type and whether it may be reassigned
//!
//! # Scoping
//!
//! Top-level declarations live for the whole run and may be redeclared
//! (the playground re-runs a section by declaring the same names again).
//! Names declared inside a pushed scope are removed when it is popped, and any
//! binding they shadowed is restored.

use super::value::{Value, ValueType};
use rustc_hash::FxHashMap;

/// A named value
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub declared_type: ValueType,
    pub is_const: bool,
}

impl Binding {
    pub fn new(value: Value, declared_type: ValueType, is_const: bool) -> Self {
        Binding {
            value,
            declared_type,
            is_const,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ScopeData {
    shadowed: Vec<(String, Binding)>,
    declared: Vec<String>,
}

/// Every live binding, in declaration order
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    vars: FxHashMap<String, Binding>,
    insertion_order: Vec<String>,
    scope_stack: Vec<ScopeData>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new scope
    pub fn push_scope(&mut self) {
        self.scope_stack.push(ScopeData::default());
    }

    /// Exit the current scope
    pub fn pop_scope(&mut self) {
        if let Some(scope) = self.scope_stack.pop() {
            for name in scope.declared {
                self.vars.remove(&name);
                if let Some(pos) = self.insertion_order.iter().rposition(|x| x == &name) {
                    self.insertion_order.remove(pos);
                }
            }

            for (name, binding) in scope.shadowed {
                self.vars.insert(name, binding);
            }
        }
    }

    /// Declare a name in the innermost scope
    pub fn declare(&mut self, name: &str, binding: Binding) {
        if let Some(scope) = self.scope_stack.last_mut() {
            // Redeclaring inside the same scope just replaces; only the first
            // declaration of a name in this scope records what it shadowed
            let first_in_scope = !scope.declared.iter().any(|n| n == name)
                && !scope.shadowed.iter().any(|(n, _)| n == name);
            match self.vars.insert(name.to_string(), binding) {
                Some(old) if first_in_scope => scope.shadowed.push((name.to_string(), old)),
                None => {
                    scope.declared.push(name.to_string());
                    self.insertion_order.push(name.to_string());
                }
                Some(_) => {}
            }
        } else {
            if !self.vars.contains_key(name) {
                self.insertion_order.push(name.to_string());
            }
            self.vars.insert(name.to_string(), binding);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Binding> {
        self.vars.get_mut(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).map(|b| &b.value)
    }

    /// Names in declaration order
    pub fn names(&self) -> &[String] {
        &self.insertion_order
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
