use serde::Serialize;

use crate::errors::{Error, Result};
use crate::reflect::Reflect;
use crate::value::{Map, Value};

/// The struct that holds the context of a template rendering.
///
/// Light wrapper around an ordered map of values, which becomes the root a template's
/// paths are resolved against.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    data: Map,
}

impl Context {
    /// Initializes an empty context
    pub fn new() -> Self {
        Context { data: Map::new() }
    }

    /// Converts the `val` parameter to `Value` and insert it into the context.
    ///
    /// ```rust
    /// # use lit_template::Context;
    /// let mut context = Context::new();
    /// context.insert("number_users", 42);
    /// context.insert("admin", "Ann");
    /// ```
    pub fn insert<S: Into<String>, T: Into<Value>>(&mut self, key: S, val: T) {
        self.data.insert(key.into(), val.into());
    }

    /// Serializes `val` and inserts it into the context.
    ///
    /// Returns an error if the serialization fails.
    ///
    /// ```rust
    /// # use lit_template::Context;
    /// # use serde_derive::Serialize;
    /// #[derive(Serialize)]
    /// struct Invoice {
    ///     total: f64,
    /// }
    ///
    /// let mut context = Context::new();
    /// context.try_insert("invoice", &Invoice { total: 12.5 }).unwrap();
    /// ```
    pub fn try_insert<T: Serialize + ?Sized, S: Into<String>>(
        &mut self,
        key: S,
        val: &T,
    ) -> Result<()> {
        self.data.insert(key.into(), Value::from_serialize(val)?);
        Ok(())
    }

    /// Wraps a reflected host value and inserts it into the context
    pub fn insert_object<S: Into<String>, T: Reflect>(&mut self, key: S, val: T) {
        self.data.insert(key.into(), Value::object(val));
    }

    /// Takes a serde-json `Value` and convert it into a `Context` with no overhead/cloning.
    pub fn from_value(obj: serde_json::Value) -> Result<Self> {
        match Value::from(obj) {
            Value::Map(data) => Ok(Context { data }),
            _ => Err(Error::msg(
                "Creating a Context from a Value/Serialize requires it being a JSON object",
            )),
        }
    }

    /// Takes something that impl Serialize and create a context with it.
    /// Meant to be used if you have a hashmap or a struct and don't want to insert values
    /// one by one in the context.
    pub fn from_serialize(value: impl Serialize) -> Result<Self> {
        let obj = serde_json::to_value(value).map_err(Error::json)?;
        Context::from_value(obj)
    }

    /// Returns the value at a given key
    pub fn get(&self, index: &str) -> Option<&Value> {
        self.data.get(index)
    }

    /// Checks if a value exists at a specific index.
    pub fn contains_key(&self, index: &str) -> bool {
        self.data.contains_key(index)
    }

    /// Remove a key from the context, returning the value at the key if the key was
    /// previously inserted into the context.
    pub fn remove(&mut self, index: &str) -> Option<Value> {
        self.data.shift_remove(index)
    }

    /// Converts the context into a `Value` map
    pub fn into_value(self) -> Value {
        Value::Map(self.data)
    }
}

impl From<Context> for Value {
    fn from(context: Context) -> Value {
        context.into_value()
    }
}
