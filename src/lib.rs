//! # lit-template
//!
//! A small text template engine rendering plain text against data whose shape is only
//! known at runtime.
//!
//! Three constructs are understood:
//!
//! - `{{ path }}` interpolates the value at a dotted path
//! - `{% foreach name in path %}...{% endfor %}` repeats its body for every element of
//!   a list, every entry of a map or every grapheme of a string
//! - `{% if path op literal %}...{% else %}...{% endif %}` compares a value with a
//!   literal using `<`, `>`, `<=`, `>=` or `==`
//!
//! Everything else is copied as is.
//!
//! Contexts are built from anything serde can serialize, or from host objects that
//! describe their members with a [`TypeInfo`] table. Objects are read by member name,
//! including the members their supertypes declare.
//!
//! ## Example
//!
//! ```rust
//! use lit_template::{Context, Engine};
//!
//! let mut context = Context::new();
//! context.insert("user", "Ann");
//! context.insert("messages", vec!["hi", "bye"]);
//! context.insert("unread", 2);
//!
//! let template = "{{ user }}:{% foreach m in messages %} {{ m }}{% endfor %}\
//!                 {% if unread > 0 %} ({{ unread }} unread){% endif %}";
//! let rendered = Engine::one_off(template, context).unwrap();
//! assert_eq!(rendered, "Ann: hi bye (2 unread)");
//! ```

#![deny(missing_docs)]

mod context;
mod engine;
mod errors;
mod parser;
mod reflect;
mod renderer;
mod value;

// Library exports.

pub use crate::context::Context;
pub use crate::engine::Engine;
pub use crate::errors::{Error, ErrorKind, Result};
pub use crate::reflect::{
    Lookup, Member, Method, Object, ObjectAccessor, Reflect, TypeInfo, TypeInfoBuilder,
};
pub use crate::renderer::Environment;
pub use crate::value::{Map, Value, ValueKind};
