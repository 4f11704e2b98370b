//! Lexically-scoped variable bindings.
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{HashPair, Object};

pub type Env = Rc<RefCell<Environment>>;

/// A parent-pointing scope. Closures capture the `Env` they were created in
/// by cloning the `Rc`, so a function body can still see bindings made after
/// it was defined, as long as they're in an enclosing scope.
#[derive(Debug, Default, PartialEq)]
pub struct Environment {
    store: IndexMap<String, Object>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn enclosed(outer: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            store: IndexMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.borrow().get(name)),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.store.insert(name.into(), value.clone());
        value
    }

    /// Flattens this scope's own bindings (not outer ones) into a `Hash`,
    /// used to produce the value of `import(...)`.
    pub fn exported_hash(&self) -> IndexMap<super::HashKey, HashPair> {
        let mut pairs = IndexMap::new();
        for (name, value) in &self.store {
            let key = Object::String(Rc::from(name.as_str()));
            if let Some(hash_key) = key.hash_key() {
                pairs.insert(
                    hash_key,
                    HashPair {
                        key,
                        value: value.clone(),
                    },
                );
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_through_outer_scopes() {
        let outer = Environment::new();
        outer.borrow_mut().set("x", Object::Integer(5));

        let inner = Environment::enclosed(outer.clone());
        assert_eq!(inner.borrow().get("x"), Some(Object::Integer(5)));

        inner.borrow_mut().set("x", Object::Integer(10));
        assert_eq!(inner.borrow().get("x"), Some(Object::Integer(10)));
        assert_eq!(outer.borrow().get("x"), Some(Object::Integer(5)));
    }

    #[test]
    fn missing_binding_is_none() {
        let env = Environment::new();
        assert_eq!(env.borrow().get("missing"), None);
    }

    #[test]
    fn exported_hash_only_contains_own_bindings() {
        let outer = Environment::new();
        outer.borrow_mut().set("hidden", Object::Integer(1));

        let inner = Environment::enclosed(outer);
        inner.borrow_mut().set("visible", Object::Integer(2));

        let exported = inner.borrow().exported_hash();
        assert_eq!(exported.len(), 1);
    }
}
