use std::any::Any;
use std::collections::HashMap;

use log::trace;
use once_cell::unsync::OnceCell;

use super::type_info::{Access, Call, Member, Method, TypeInfo, Upcast};
use super::Object;
use crate::value::{Map, Value, ValueKind};

/// Which members a lookup may match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lookup {
    static_only: bool,
    search_ancestors: bool,
}

impl Lookup {
    /// Members declared on the bound type only
    pub const fn own() -> Lookup {
        Lookup { static_only: false, search_ancestors: false }
    }

    /// Members of the bound type, then of each supertype up to the root
    pub const fn inherited() -> Lookup {
        Lookup { static_only: false, search_ancestors: true }
    }

    /// Restricts the lookup to members that need no instance
    pub const fn static_only(self) -> Lookup {
        Lookup { static_only: true, ..self }
    }

    /// Whether only static members match
    pub fn is_static_only(&self) -> bool {
        self.static_only
    }

    /// Whether supertypes are searched on a miss
    pub fn searches_ancestors(&self) -> bool {
        self.search_ancestors
    }

    // An instance lookup also sees static members
    fn admits(&self, is_static: bool) -> bool {
        !self.static_only || is_static
    }
}

type MemberTable = HashMap<&'static str, &'static Member>;
type MethodTable = HashMap<&'static str, Vec<&'static Method>>;

fn index_members(members: &'static [Member]) -> MemberTable {
    members.iter().map(|m| (m.name(), m)).collect()
}

/// Reads, writes and invokes the members of one object by name.
///
/// An accessor is bound to one type of the object's supertype chain: either its
/// concrete type or, for the accessors returned by [`ObjectAccessor::parent`], one
/// of its ancestors. Member tables are built on first use and the parent accessor is
/// created once, so repeated lookups on the same accessor are cheap.
pub struct ObjectAccessor {
    object: Object,
    info: &'static TypeInfo,
    // From the concrete type down to `info`
    views: Vec<&'static dyn Upcast>,
    fields: OnceCell<MemberTable>,
    properties: OnceCell<MemberTable>,
    methods: OnceCell<MethodTable>,
    parent: OnceCell<Option<Box<ObjectAccessor>>>,
}

impl ObjectAccessor {
    /// An accessor bound to the concrete type of `object`
    pub fn new(object: Object) -> ObjectAccessor {
        let info = object.type_info();
        ObjectAccessor::bound(object, info, Vec::new())
    }

    fn bound(object: Object, info: &'static TypeInfo, views: Vec<&'static dyn Upcast>) -> Self {
        ObjectAccessor {
            object,
            info,
            views,
            fields: OnceCell::new(),
            properties: OnceCell::new(),
            methods: OnceCell::new(),
            parent: OnceCell::new(),
        }
    }

    /// The object this accessor reads
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// The type this accessor is bound to
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The accessor for the immediate supertype, `None` at the root type
    pub fn parent(&self) -> Option<&ObjectAccessor> {
        let info = self.info;
        self.parent
            .get_or_init(|| {
                let parent = info.parent.as_ref()?;
                let mut views = self.views.clone();
                views.push(&*parent.upcast);
                Some(Box::new(ObjectAccessor::bound(self.object.clone(), parent.info, views)))
            })
            .as_deref()
    }

    /// Reads a stored member
    pub fn get_field(&self, name: &str, lookup: Lookup) -> Option<Value> {
        match self.fields().get(name) {
            Some(member) if lookup.admits(member.is_static()) => self.read(member),
            _ if lookup.search_ancestors => self.parent()?.get_field(name, lookup),
            _ => None,
        }
    }

    /// Writes a stored member. Returns whether a writable member took the value.
    pub fn set_field(&self, name: &str, value: Value, lookup: Lookup) -> bool {
        match self.fields().get(name) {
            Some(member) if lookup.admits(member.is_static()) => self.write(member, value),
            _ if lookup.search_ancestors => {
                self.parent().map_or(false, |parent| parent.set_field(name, value, lookup))
            }
            _ => false,
        }
    }

    /// Reads a computed member
    pub fn get_property(&self, name: &str, lookup: Lookup) -> Option<Value> {
        match self.properties().get(name) {
            Some(member) if lookup.admits(member.is_static()) => self.read(member),
            _ if lookup.search_ancestors => self.parent()?.get_property(name, lookup),
            _ => None,
        }
    }

    /// Writes a computed member. Returns whether a writable member took the value.
    pub fn set_property(&self, name: &str, value: Value, lookup: Lookup) -> bool {
        match self.properties().get(name) {
            Some(member) if lookup.admits(member.is_static()) => self.write(member, value),
            _ if lookup.search_ancestors => {
                self.parent().map_or(false, |parent| parent.set_property(name, value, lookup))
            }
            _ => false,
        }
    }

    /// Invokes the overload whose parameter kinds are exactly the kinds of `args`.
    /// `None` if no such overload exists.
    pub fn invoke_method(&self, name: &str, args: &[Value], lookup: Lookup) -> Option<Value> {
        let kinds: Vec<ValueKind> = args.iter().map(Value::kind).collect();
        let found = self.methods().get(name).and_then(|overloads| {
            overloads.iter().find(|m| lookup.admits(m.is_static()) && m.accepts(&kinds))
        });
        match found {
            Some(method) => self.call(method, args),
            None if lookup.search_ancestors => self.parent()?.invoke_method(name, args, lookup),
            None => None,
        }
    }

    /// Copies the readable fields and properties into a map keyed by member name.
    ///
    /// Fields come first, then properties, so a property replaces a field of the same
    /// name. With an inherited lookup the supertypes are copied first and a nearer
    /// type's member replaces an ancestor's.
    pub fn members(&self, lookup: Lookup) -> Map {
        let mut chain = vec![self];
        if lookup.search_ancestors {
            let mut current = self;
            while let Some(parent) = current.parent() {
                chain.push(parent);
                current = parent;
            }
        }

        let mut members = Map::new();
        for accessor in chain.iter().rev() {
            accessor.copy_members(accessor.info.fields(), lookup, &mut members);
        }
        for accessor in chain.iter().rev() {
            accessor.copy_members(accessor.info.properties(), lookup, &mut members);
        }
        members
    }

    fn copy_members(&self, declared: &[Member], lookup: Lookup, out: &mut Map) {
        for member in declared.iter().filter(|m| lookup.admits(m.is_static())) {
            if let Some(value) = self.read(member) {
                out.insert(member.name().to_owned(), value);
            }
        }
    }

    fn fields(&self) -> &MemberTable {
        let info = self.info;
        self.fields.get_or_init(|| {
            trace!("Indexing fields of `{}`", info.name());
            index_members(&info.fields)
        })
    }

    fn properties(&self) -> &MemberTable {
        let info = self.info;
        self.properties.get_or_init(|| {
            trace!("Indexing properties of `{}`", info.name());
            index_members(&info.properties)
        })
    }

    fn methods(&self) -> &MethodTable {
        let info = self.info;
        self.methods.get_or_init(|| {
            trace!("Indexing methods of `{}`", info.name());
            let mut table = MethodTable::new();
            for method in &info.methods {
                table.entry(method.name()).or_insert_with(Vec::new).push(method);
            }
            table
        })
    }

    fn read(&self, member: &Member) -> Option<Value> {
        match member.access {
            Access::Static { ref get, .. } => Some(get()),
            Access::Instance { ref get, .. } => self.with_target(|target| get(target)),
        }
    }

    fn write(&self, member: &Member, value: Value) -> bool {
        match member.access {
            Access::Static { set: Some(ref set), .. } => set(value),
            Access::Instance { set: Some(ref set), .. } => {
                self.with_target_mut(|target| Some(set(target, value))).unwrap_or(false)
            }
            _ => false,
        }
    }

    fn call(&self, method: &Method, args: &[Value]) -> Option<Value> {
        match method.call {
            Call::Static(ref call) => Some(call(args)),
            Call::Instance(ref call) => self.with_target_mut(|target| call(target, args)),
        }
    }

    /// Runs `f` on the part of the instance that belongs to the bound type
    fn with_target<R>(&self, f: impl FnOnce(&dyn Any) -> Option<R>) -> Option<R> {
        let guard = self.object.target.try_borrow().ok()?;
        let mut target: &dyn Any = &*guard;
        for view in &self.views {
            target = view.view(target)?;
        }
        f(target)
    }

    fn with_target_mut<R>(&self, f: impl FnOnce(&mut dyn Any) -> Option<R>) -> Option<R> {
        let mut guard = self.object.target.try_borrow_mut().ok()?;
        let mut target: &mut dyn Any = &mut *guard;
        for view in &self.views {
            target = view.view_mut(target)?;
        }
        f(target)
    }
}

impl std::fmt::Debug for ObjectAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectAccessor")
            .field("object", &self.object)
            .field("bound", &self.info.name())
            .finish()
    }
}
