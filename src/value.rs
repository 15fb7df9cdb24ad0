//! The dynamic values a template is rendered against

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as Json;
use unic_segment::Graphemes;

use crate::errors::{Error, Result};
use crate::reflect::{Object, Reflect};

/// Ordered map of values, iterated in insertion order
pub type Map = IndexMap<String, Value>;

/// A value found in a context
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Nothing. Displays as an empty string
    Null,
    /// A boolean
    Bool(bool),
    /// A signed integer
    Int(i64),
    /// A floating point number
    Float(f64),
    /// A string
    String(String),
    /// A sequence of values
    List(Vec<Value>),
    /// An ordered mapping from keys to values
    Map(Map),
    /// A host object, read through its reflection table
    Object(Object),
}

/// The kind of a value, used to pick method overloads and to convert
/// condition literals
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// `Value::Null`
    Null,
    /// `Value::Bool`
    Bool,
    /// `Value::Int`
    Int,
    /// `Value::Float`
    Float,
    /// `Value::String`
    String,
    /// `Value::List`
    List,
    /// `Value::Map`
    Map,
    /// `Value::Object` of the named concrete type
    Object(&'static str),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Bool => write!(f, "a boolean"),
            ValueKind::Int => write!(f, "an integer"),
            ValueKind::Float => write!(f, "a float"),
            ValueKind::String => write!(f, "a string"),
            ValueKind::List => write!(f, "a list"),
            ValueKind::Map => write!(f, "a map"),
            ValueKind::Object(name) => write!(f, "an object of type `{}`", name),
        }
    }
}

impl Value {
    /// Wraps a reflected host value
    pub fn object<T: Reflect>(value: T) -> Value {
        Value::Object(Object::new(value))
    }

    /// Serializes anything serde can handle into a `Value`.
    /// Structs become maps, sequences become lists.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
        Ok(serde_json::to_value(value).map_err(Error::json)?.into())
    }

    /// The kind of this value
    pub fn kind(&self) -> ValueKind {
        match *self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Object(ref o) => ValueKind::Object(o.type_name()),
        }
    }

    /// Whether this is `Value::Null`
    pub fn is_null(&self) -> bool {
        matches!(*self, Value::Null)
    }

    /// The string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// The integer if this is an integer
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// The object if this is a host object
    pub fn as_object(&self) -> Option<&Object> {
        match *self {
            Value::Object(ref o) => Some(o),
            _ => None,
        }
    }

    /// Identity used when popping loop bindings: objects are the same when they
    /// share an allocation, floats when their bits match, everything else by equality.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_same(y))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|((ka, va), (kb, vb))| ka == kb && va.is_same(vb))
            }
            _ => self == other,
        }
    }

    /// The elements a `foreach` visits, or `None` if this value can't be iterated.
    ///
    /// Maps yield one `{key, value}` map per entry and strings yield their
    /// grapheme clusters.
    pub(crate) fn into_iterable(self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            Value::Map(map) => Some(
                map.into_iter()
                    .map(|(key, value)| {
                        let mut entry = Map::with_capacity(2);
                        entry.insert("key".to_string(), Value::String(key));
                        entry.insert("value".to_string(), value);
                        Value::Map(entry)
                    })
                    .collect(),
            ),
            Value::String(s) => Some(Graphemes::new(&s).map(Value::from).collect()),
            Value::Object(o) => o.iterate(),
            _ => None,
        }
    }

    /// Converts `literal` to the kind of this value and compares the two.
    ///
    /// `Ok(None)` means this value has no natural ordering (null, list, map,
    /// object, NaN). `Err` means the literal can't be read as this kind.
    pub(crate) fn compare_literal(&self, literal: &str) -> Result<Option<Ordering>> {
        match *self {
            Value::Int(left) => literal
                .parse::<i64>()
                .map(|right| Some(left.cmp(&right)))
                .map_err(|_| Error::condition(literal, ValueKind::Int)),
            Value::Float(left) => literal
                .parse::<f64>()
                .map(|right| left.partial_cmp(&right))
                .map_err(|_| Error::condition(literal, ValueKind::Float)),
            Value::Bool(left) => parse_bool(literal)
                .map(|right| Some(left.cmp(&right)))
                .ok_or_else(|| Error::condition(literal, ValueKind::Bool)),
            Value::String(ref left) => Ok(Some(left.as_str().cmp(literal))),
            _ => Ok(None),
        }
    }
}

fn parse_bool(literal: &str) -> Option<bool> {
    if literal.eq_ignore_ascii_case("true") {
        Some(true)
    } else if literal.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(ref s) => f.write_str(s),
            Value::List(ref items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Map(_) => f.write_str("[object]"),
            Value::Object(ref o) => f.write_str(&o.display()),
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(i: $ty) -> Value {
                    Value::Int(i64::from(i))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(i: u64) -> Value {
        match i64::try_from(i) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(i as f64),
        }
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Value {
        Value::from(i as u64)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Value {
        Value::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Value {
        Value::String(s.clone())
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Value {
        Value::Object(o)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Value {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Value {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Value {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Value {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> std::iter::FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Value {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}
