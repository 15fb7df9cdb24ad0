//! Name-based access to host objects whose shape the templates don't know.
//!
//! A host type describes itself once with a [`TypeInfo`] table and implements
//! [`Reflect`] to hand it out. Instances wrapped in an [`Object`] can then be read,
//! written and invoked by member name through an [`ObjectAccessor`].

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

mod accessor;
mod type_info;

pub use self::accessor::{Lookup, ObjectAccessor};
pub use self::type_info::{Member, Method, TypeInfo, TypeInfoBuilder};

use crate::value::Value;

/// Implemented by host types that can be put in a context as objects
pub trait Reflect: Any {
    /// The table describing `Self`
    fn type_info() -> &'static TypeInfo;
}

/// A shared host instance and the table describing its concrete type
#[derive(Clone)]
pub struct Object {
    target: Rc<RefCell<dyn Any>>,
    info: &'static TypeInfo,
}

impl Object {
    /// Takes ownership of `value`
    pub fn new<T: Reflect>(value: T) -> Object {
        Object::shared(Rc::new(RefCell::new(value)))
    }

    /// Wraps an instance the host keeps a handle on, so writes made through
    /// an accessor stay visible to the host
    pub fn shared<T: Reflect>(target: Rc<RefCell<T>>) -> Object {
        Object { target, info: T::type_info() }
    }

    /// Table of the concrete type
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Name of the concrete type
    pub fn type_name(&self) -> &'static str {
        self.info.name()
    }

    /// A fresh accessor bound to the concrete type
    pub fn accessor(&self) -> ObjectAccessor {
        ObjectAccessor::new(self.clone())
    }

    /// Borrows the instance as `T`, if that is its concrete type and it isn't
    /// mutably borrowed at the moment
    pub fn downcast_ref<T: Any>(&self) -> Option<Ref<'_, T>> {
        let target = self.target.try_borrow().ok()?;
        Ref::filter_map(target, |t| t.downcast_ref::<T>()).ok()
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(&self, other: &Object) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.target) as *const u8,
            Rc::as_ptr(&other.target) as *const u8,
        )
    }

    /// Text shown when the object is interpolated: the nearest display hook up the
    /// supertype chain, else the type name
    pub(crate) fn display(&self) -> String {
        self.walk(|info, target| info.display.as_ref().and_then(|hook| hook(target)))
            .unwrap_or_else(|| self.type_name().to_string())
    }

    /// Elements visited by a `foreach`, from the nearest iterate hook
    pub(crate) fn iterate(&self) -> Option<Vec<Value>> {
        self.walk(|info, target| info.iterate.as_ref().and_then(|hook| hook(target)))
    }

    /// Visits the concrete type then each supertype with the matching view of the
    /// instance, stopping at the first `Some`
    fn walk<R>(&self, mut visit: impl FnMut(&TypeInfo, &dyn Any) -> Option<R>) -> Option<R> {
        let guard = self.target.try_borrow().ok()?;
        let mut target: &dyn Any = &*guard;
        let mut info = self.info;
        loop {
            if let Some(found) = visit(info, target) {
                return Some(found);
            }
            let parent = info.parent.as_ref()?;
            target = parent.upcast.view(target)?;
            info = parent.info;
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object").field("type", &self.type_name()).finish()
    }
}
