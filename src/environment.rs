// ── Environment ───────────────────────────────────────────────────────────────

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::object::Object;

/// A variable scope. Cloning shares the scope; closures hold such a share
/// of the scope they were created in.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<EnvInner>>);

#[derive(Default)]
struct EnvInner {
    vars: FxHashMap<String, Object>,
    parent: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Env::default()
    }

    /// A fresh, empty scope whose lookups continue into `parent`.
    pub fn enclosed(parent: &Env) -> Self {
        Env(Rc::new(RefCell::new(EnvInner {
            vars: FxHashMap::default(),
            parent: Some(parent.clone()),
        })))
    }

    /// Binds `name` in this scope only, shadowing any outer binding.
    pub fn set(&self, name: &str, val: Object) {
        self.0.borrow_mut().vars.insert(name.to_string(), val);
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        let inner = self.0.borrow();
        if let Some(val) = inner.vars.get(name) {
            return Some(val.clone());
        }
        inner.parent.as_ref().and_then(|parent| parent.get(name))
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Env")
            .field("bindings", &inner.vars.len())
            .field("enclosed", &inner.parent.is_some())
            .finish()
    }
}
