//! Environment and bindings for the Alonso interpreter.
//!
//! Scopes form a chain through `outer` references. The chain is shared:
//! a closure holds a handle to the environment that was current at its
//! definition site, which must outlive the frame that created it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// Shared, mutable handle to a scope.
pub type EnvRef = Rc<RefCell<Env>>;

pub struct Env {
    /// Variables defined in this scope
    store: HashMap<String, Value>,
    /// Reference to the enclosing environment (None for the root scope)
    outer: Option<EnvRef>,
}

impl Env {
    pub fn new_root() -> EnvRef {
        Rc::new(RefCell::new(Env {
            store: HashMap::new(),
            outer: None,
        }))
    }

    pub fn enclosed(outer: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Env {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    /// Walk the chain from innermost to outermost and return the first hit.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.store.get(name) {
            Some(v.clone())
        } else {
            self.outer.as_ref().and_then(|o| o.borrow().get(name))
        }
    }

    /// Always writes the innermost scope; an existing outer binding is
    /// shadowed, never reassigned.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }
}
