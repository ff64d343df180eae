// ABOUTME: Environment module for managing variable bindings and scopes

use crate::value::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A lexical scope: a local binding map plus an optional parent. Lookup
/// walks the parent chain; definition always targets the local map. The
/// language forbids rebinding, so scopes only ever grow.
#[derive(Debug)]
pub struct Environment {
    store: RefCell<HashMap<String, Object>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a child environment; function calls extend their captured
    /// environment through this.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            store: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Looks a name up in this scope and then the parent chain.
    pub fn get(&self, name: &str) -> Option<Object> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }
        None
    }

    /// Binds a name in THIS scope only.
    pub fn define(&self, name: String, value: Object) {
        self.store.borrow_mut().insert(name, value);
    }

    /// Whether the name is bound in THIS scope (the rebinding check does
    /// not consult parents: shadowing an outer name is allowed).
    pub fn contains_local(&self, name: &str) -> bool {
        self.store.borrow().contains_key(name)
    }

    /// Removes a local binding; the REPL merge uses this to replace
    /// colliding names on reload.
    pub fn remove(&self, name: &str) -> Option<Object> {
        self.store.borrow_mut().remove(name)
    }

    /// The names bound locally in this scope.
    pub fn names(&self) -> Vec<String> {
        self.store.borrow().keys().cloned().collect()
    }
}
