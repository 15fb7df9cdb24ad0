//! Member tables describing a host type

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use lazy_static::lazy_static;

use crate::value::{Value, ValueKind};

type Getter = Box<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, Value) -> bool + Send + Sync>;
type StaticGetter = Box<dyn Fn() -> Value + Send + Sync>;
type StaticSetter = Box<dyn Fn(Value) -> bool + Send + Sync>;
type InstanceCall = Box<dyn Fn(&mut dyn Any, &[Value]) -> Option<Value> + Send + Sync>;
type StaticCall = Box<dyn Fn(&[Value]) -> Value + Send + Sync>;
type Hook<R> = Box<dyn Fn(&dyn Any) -> Option<R> + Send + Sync>;

lazy_static! {
    static ref ROOT: TypeInfo = TypeInfo {
        name: "object",
        parent: None,
        fields: Vec::new(),
        properties: Vec::new(),
        methods: Vec::new(),
        display: None,
        iterate: None,
    };
}

/// Projects an instance onto the part of it that belongs to its supertype
pub(crate) trait Upcast: Send + Sync {
    fn view<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any>;
    fn view_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

/// Types extending the root type are their own root part
struct Identity;

impl Upcast for Identity {
    fn view<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any> {
        Some(target)
    }

    fn view_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        Some(target)
    }
}

struct Projection<T, P> {
    view: fn(&T) -> &P,
    view_mut: fn(&mut T) -> &mut P,
}

impl<T: Any, P: Any> Upcast for Projection<T, P> {
    fn view<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any> {
        target.downcast_ref::<T>().map(|t| (self.view)(t) as &dyn Any)
    }

    fn view_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        target.downcast_mut::<T>().map(|t| (self.view_mut)(t) as &mut dyn Any)
    }
}

/// Link from a type to its immediate supertype
pub(crate) struct Parent {
    pub(crate) info: &'static TypeInfo,
    pub(crate) upcast: Box<dyn Upcast>,
}

pub(crate) enum Access {
    Instance { get: Getter, set: Option<Setter> },
    Static { get: StaticGetter, set: Option<StaticSetter> },
}

/// A field or a property declared on a type
pub struct Member {
    name: &'static str,
    pub(crate) access: Access,
}

impl Member {
    /// Name the member is looked up by
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the member can be read without an instance
    pub fn is_static(&self) -> bool {
        matches!(self.access, Access::Static { .. })
    }

    /// Whether the member accepts writes
    pub fn is_writable(&self) -> bool {
        match self.access {
            Access::Instance { ref set, .. } => set.is_some(),
            Access::Static { ref set, .. } => set.is_some(),
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("static", &self.is_static())
            .field("writable", &self.is_writable())
            .finish()
    }
}

pub(crate) enum Call {
    Instance(InstanceCall),
    Static(StaticCall),
}

/// One overload of a method declared on a type
pub struct Method {
    name: &'static str,
    params: Vec<ValueKind>,
    pub(crate) call: Call,
}

impl Method {
    /// Name the method is looked up by
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared parameter kinds, in order
    pub fn params(&self) -> &[ValueKind] {
        &self.params
    }

    /// Whether the method can be invoked without an instance
    pub fn is_static(&self) -> bool {
        matches!(self.call, Call::Static(_))
    }

    /// Exact, positional match of the argument kinds
    pub(crate) fn accepts(&self, kinds: &[ValueKind]) -> bool {
        self.params == kinds
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("static", &self.is_static())
            .finish()
    }
}

/// Describes the members of a host type so templates can read them by name.
///
/// Every chain of supertypes ends at the root type, named `object`, which declares
/// nothing.
///
/// ```rust
/// use lit_template::{Reflect, TypeInfo};
/// use lazy_static::lazy_static;
///
/// struct Animal { legs: u32 }
/// struct Dog { animal: Animal, name: String }
///
/// lazy_static! {
///     static ref ANIMAL: TypeInfo = TypeInfo::builder::<Animal>("Animal")
///         .field("legs", |a| a.legs)
///         .build();
///     static ref DOG: TypeInfo = TypeInfo::builder::<Dog>("Dog")
///         .extends(&ANIMAL, |d| &d.animal, |d| &mut d.animal)
///         .field("name", |d| d.name.clone())
///         .build();
/// }
///
/// impl Reflect for Dog {
///     fn type_info() -> &'static TypeInfo {
///         &DOG
///     }
/// }
/// ```
pub struct TypeInfo {
    name: &'static str,
    pub(crate) parent: Option<Parent>,
    pub(crate) fields: Vec<Member>,
    pub(crate) properties: Vec<Member>,
    pub(crate) methods: Vec<Method>,
    pub(crate) display: Option<Hook<String>>,
    pub(crate) iterate: Option<Hook<Vec<Value>>>,
}

impl TypeInfo {
    /// The universal root type every other type descends from
    pub fn root() -> &'static TypeInfo {
        &ROOT
    }

    /// Starts describing the type `T`
    pub fn builder<T: Any>(name: &'static str) -> TypeInfoBuilder<T> {
        TypeInfoBuilder {
            info: TypeInfo {
                name,
                parent: Some(Parent { info: TypeInfo::root(), upcast: Box::new(Identity) }),
                fields: Vec::new(),
                properties: Vec::new(),
                methods: Vec::new(),
                display: None,
                iterate: None,
            },
            ty: PhantomData,
        }
    }

    /// Name of the type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The immediate supertype, `None` only for the root type
    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent.as_ref().map(|p| p.info)
    }

    /// Fields declared on this type, not including inherited ones
    pub fn fields(&self) -> &[Member] {
        &self.fields
    }

    /// Properties declared on this type, not including inherited ones
    pub fn properties(&self) -> &[Member] {
        &self.properties
    }

    /// Methods declared on this type, not including inherited ones
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("parent", &self.parent().map(TypeInfo::name))
            .field("fields", &self.fields)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Declares the members of `T`, see [`TypeInfo`]
pub struct TypeInfoBuilder<T> {
    info: TypeInfo,
    ty: PhantomData<fn(T)>,
}

fn instance<T, V, F>(get: F) -> Getter
where
    T: Any,
    V: Into<Value>,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    Box::new(move |target: &dyn Any| target.downcast_ref::<T>().map(|t| get(t).into()))
}

fn instance_mut<T, F>(set: F) -> Setter
where
    T: Any,
    F: Fn(&mut T, Value) -> bool + Send + Sync + 'static,
{
    Box::new(move |target: &mut dyn Any, value: Value| match target.downcast_mut::<T>() {
        Some(t) => set(t, value),
        None => false,
    })
}

fn static_get<V, F>(get: F) -> StaticGetter
where
    V: Into<Value>,
    F: Fn() -> V + Send + Sync + 'static,
{
    Box::new(move || get().into())
}

impl<T: Any> TypeInfoBuilder<T> {
    /// Declares the immediate supertype. `view` and `view_mut` give access to the
    /// part of `T` that the supertype's members read.
    pub fn extends<P: Any>(
        mut self,
        parent: &'static TypeInfo,
        view: fn(&T) -> &P,
        view_mut: fn(&mut T) -> &mut P,
    ) -> Self {
        let upcast = Box::new(Projection { view, view_mut });
        self.info.parent = Some(Parent { info: parent, upcast });
        self
    }

    /// A read-only stored member
    pub fn field<V, F>(mut self, name: &'static str, get: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let access = Access::Instance { get: instance(get), set: None };
        self.info.fields.push(Member { name, access });
        self
    }

    /// A stored member that can be written. `set` returns `false` if it rejects the value.
    pub fn field_mut<V, F, S>(mut self, name: &'static str, get: F, set: S) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> bool + Send + Sync + 'static,
    {
        self.info.fields.push(Member {
            name,
            access: Access::Instance { get: instance(get), set: Some(instance_mut(set)) },
        });
        self
    }

    /// A read-only member that needs no instance
    pub fn static_field<V, F>(mut self, name: &'static str, get: F) -> Self
    where
        V: Into<Value>,
        F: Fn() -> V + Send + Sync + 'static,
    {
        let access = Access::Static { get: static_get(get), set: None };
        self.info.fields.push(Member { name, access });
        self
    }

    /// A writable member that needs no instance
    pub fn static_field_mut<V, F, S>(mut self, name: &'static str, get: F, set: S) -> Self
    where
        V: Into<Value>,
        F: Fn() -> V + Send + Sync + 'static,
        S: Fn(Value) -> bool + Send + Sync + 'static,
    {
        self.info.fields.push(Member {
            name,
            access: Access::Static { get: static_get(get), set: Some(Box::new(set)) },
        });
        self
    }

    /// A read-only computed member
    pub fn property<V, F>(mut self, name: &'static str, get: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.info
            .properties
            .push(Member { name, access: Access::Instance { get: instance(get), set: None } });
        self
    }

    /// A computed member with a setter
    pub fn property_mut<V, F, S>(mut self, name: &'static str, get: F, set: S) -> Self
    where
        V: Into<Value>,
        F: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, Value) -> bool + Send + Sync + 'static,
    {
        self.info.properties.push(Member {
            name,
            access: Access::Instance { get: instance(get), set: Some(instance_mut(set)) },
        });
        self
    }

    /// A computed member that needs no instance
    pub fn static_property<V, F>(mut self, name: &'static str, get: F) -> Self
    where
        V: Into<Value>,
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.info
            .properties
            .push(Member { name, access: Access::Static { get: static_get(get), set: None } });
        self
    }

    /// A computed member with a setter that needs no instance
    pub fn static_property_mut<V, F, S>(mut self, name: &'static str, get: F, set: S) -> Self
    where
        V: Into<Value>,
        F: Fn() -> V + Send + Sync + 'static,
        S: Fn(Value) -> bool + Send + Sync + 'static,
    {
        self.info.properties.push(Member {
            name,
            access: Access::Static { get: static_get(get), set: Some(Box::new(set)) },
        });
        self
    }

    /// A method overload taking arguments of exactly the kinds in `params`
    pub fn method<V, F>(mut self, name: &'static str, params: &[ValueKind], call: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&mut T, &[Value]) -> V + Send + Sync + 'static,
    {
        let invoke: InstanceCall = Box::new(move |target: &mut dyn Any, args: &[Value]| {
            target.downcast_mut::<T>().map(|t| call(t, args).into())
        });
        let params = params.to_vec();
        self.info.methods.push(Method { name, params, call: Call::Instance(invoke) });
        self
    }

    /// A method overload that needs no instance
    pub fn static_method<V, F>(mut self, name: &'static str, params: &[ValueKind], call: F) -> Self
    where
        V: Into<Value>,
        F: Fn(&[Value]) -> V + Send + Sync + 'static,
    {
        let invoke: StaticCall = Box::new(move |args: &[Value]| call(args).into());
        let params = params.to_vec();
        self.info.methods.push(Method { name, params, call: Call::Static(invoke) });
        self
    }

    /// How an instance is displayed when interpolated. Defaults to the type name.
    pub fn display<F>(mut self, display: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.info.display =
            Some(Box::new(move |target: &dyn Any| target.downcast_ref::<T>().map(|t| display(t))));
        self
    }

    /// Makes instances iterable by a `foreach`
    pub fn iterate<F>(mut self, iterate: F) -> Self
    where
        F: Fn(&T) -> Vec<Value> + Send + Sync + 'static,
    {
        self.info.iterate =
            Some(Box::new(move |target: &dyn Any| target.downcast_ref::<T>().map(|t| iterate(t))));
        self
    }

    /// Finishes the description
    pub fn build(self) -> TypeInfo {
        self.info
    }
}
