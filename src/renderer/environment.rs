use std::collections::HashMap;

use log::{debug, trace};

use crate::reflect::{Lookup, ObjectAccessor};
use crate::value::Value;

const THIS: &str = "this";
const THIS_PREFIX: &str = "this.";

/// Resolves dotted paths against one value.
///
/// The wrapped value is either a map, read by key, an object, read through an
/// [`ObjectAccessor`] with inherited members, or a plain value without members.
/// On top of it sits a stack of local bindings, the loop variables, which shadow the
/// wrapped value's members.
///
/// Every first path segment resolved against the wrapped value gets its own child
/// environment, kept for the life of this one. Changes made to the underlying value
/// after a segment was first resolved are therefore not seen through that segment.
#[derive(Debug)]
pub struct Environment {
    value: Value,
    accessor: Option<ObjectAccessor>,
    locals: Vec<(String, Value)>,
    children: HashMap<String, Environment>,
}

impl Environment {
    /// Wraps `value`
    pub fn new(value: impl Into<Value>) -> Environment {
        let value = value.into();
        let accessor = value.as_object().map(|o| o.accessor());
        Environment { value, accessor, locals: Vec::new(), children: HashMap::new() }
    }

    /// The wrapped value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The accessor reading the wrapped value, if it is an object
    pub fn accessor(&self) -> Option<&ObjectAccessor> {
        self.accessor.as_ref()
    }

    /// Finds the value `path` points to.
    ///
    /// `this` on its own is the wrapped value and a leading `this.` is ignored, in any
    /// case. A path that leads nowhere gives `None`.
    pub fn resolve(&mut self, path: &str) -> Option<Value> {
        let path = path.trim();
        let found = self.lookup(path);
        if found.is_none() {
            debug!("`{}` doesn't resolve to anything", path);
        }
        found
    }

    /// The display form of the value at `path`, empty if there is none
    pub fn display_string(&mut self, path: &str) -> String {
        self.resolve(path).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Binds `name` to `value` until the matching [`Environment::pop_local`]
    pub fn push_local(&mut self, name: impl Into<String>, value: Value) {
        self.locals.push((name.into(), value));
    }

    /// Removes the most recent binding of `name` to `value`, returning its value.
    /// Objects are matched by identity, everything else by equality.
    pub fn pop_local(&mut self, name: &str, value: &Value) -> Option<Value> {
        let index = self.locals.iter().rposition(|(n, v)| n == name && v.is_same(value))?;
        Some(self.locals.remove(index).1)
    }

    fn lookup(&mut self, path: &str) -> Option<Value> {
        if path.eq_ignore_ascii_case(THIS) {
            return Some(self.value.clone());
        }
        let path = match path.get(..THIS_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(THIS_PREFIX) => &path[THIS_PREFIX.len()..],
            _ => path,
        };

        let (head, rest) = match path.find('.') {
            Some(dot) => (&path[..dot], Some(&path[dot + 1..])),
            None => (path, None),
        };

        // Locals are looked up on every access and never cached
        if let Some(local) = self.local(head) {
            return match rest {
                Some(rest) => Environment::new(local).lookup(rest),
                None => Some(local),
            };
        }

        match rest {
            Some(rest) => self.child(head).lookup(rest),
            None => member(&self.value, self.accessor.as_ref(), head),
        }
    }

    fn local(&self, name: &str) -> Option<Value> {
        self.locals.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.clone())
    }

    fn child(&mut self, name: &str) -> &mut Environment {
        let Environment { ref value, ref accessor, ref mut children, .. } = *self;
        children.entry(name.to_string()).or_insert_with(|| {
            trace!("Caching environment for `{}`", name);
            Environment::new(member(value, accessor.as_ref(), name).unwrap_or_default())
        })
    }
}

/// Map key, then property, then field, each searched up the supertype chain
fn member(value: &Value, accessor: Option<&ObjectAccessor>, name: &str) -> Option<Value> {
    if let Value::Map(ref map) = *value {
        return map.get(name).cloned();
    }
    let accessor = accessor?;
    accessor
        .get_property(name, Lookup::inherited())
        .or_else(|| accessor.get_field(name, Lookup::inherited()))
}
