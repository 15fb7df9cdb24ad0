use serde::Serialize;

use crate::errors::Result;
use crate::renderer::{Environment, Processor};
use crate::value::Value;

/// Renders templates against one context.
///
/// The engine keeps the environment built over its context, so the members resolved
/// by one render are not looked up again by the next ones.
///
/// ```rust
/// use lit_template::{Context, Engine};
///
/// let mut context = Context::new();
/// context.insert("names", vec!["Ann", "Bob"]);
///
/// let mut engine = Engine::new(context);
/// let output = engine.render("{% foreach name in names %}<{{ name }}>{% endfor %}").unwrap();
/// assert_eq!(output, "<Ann><Bob>");
/// ```
#[derive(Debug)]
pub struct Engine {
    environment: Environment,
    strict_conditions: bool,
}

impl Engine {
    /// Create a new engine rendering against `context`
    pub fn new(context: impl Into<Value>) -> Engine {
        Engine { environment: Environment::new(context), strict_conditions: false }
    }

    /// Create a new engine from anything serde can serialize, structs becoming maps
    pub fn from_serialize<T: Serialize + ?Sized>(context: &T) -> Result<Engine> {
        Ok(Engine::new(Value::from_serialize(context)?))
    }

    /// Renders `text`.
    ///
    /// Fails on malformed syntax: an unterminated `{{` or `{%`, a block without its
    /// terminator or an unreadable `foreach`/`if` header.
    pub fn render(&mut self, text: &str) -> Result<String> {
        Processor::new(text, &mut self.environment, self.strict_conditions).render()
    }

    /// Whether a condition literal that can't be converted to the kind of the value it
    /// is compared with fails the render. When off, the default, such a condition is
    /// false and a warning is logged.
    pub fn set_strict_conditions(&mut self, strict: bool) {
        self.strict_conditions = strict;
    }

    /// The environment paths are resolved in
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Mutable access to the environment, to bind names before rendering
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Renders a single template against `context` without keeping an engine around.
    ///
    /// ```rust
    /// use lit_template::{Context, Engine};
    ///
    /// let mut context = Context::new();
    /// context.insert("greeting", "hello");
    /// assert_eq!(Engine::one_off("{{ greeting }} world", context).unwrap(), "hello world");
    /// ```
    pub fn one_off(text: &str, context: impl Into<Value>) -> Result<String> {
        Engine::new(context).render(text)
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use serde_derive::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Page {
        title: String,
        visits: u32,
    }

    #[test]
    fn can_build_from_serializable() {
        let page = Page { title: "Home".into(), visits: 12 };
        let mut engine = Engine::from_serialize(&page).unwrap();
        assert_eq!(engine.render("{{ title }}: {{ visits }}").unwrap(), "Home: 12");
    }

    #[test]
    fn engine_is_reusable() {
        let mut engine = Engine::new(vec![1, 2]);
        assert_eq!(engine.render("{{ this }}").unwrap(), "[1, 2]");
        assert_eq!(engine.render("{% foreach i in this %}{{ i }}{% endfor %}").unwrap(), "12");
    }

    #[test]
    fn default_engine_renders_text_only() {
        let mut engine = Engine::default();
        assert_eq!(engine.render("plain {{ nothing }}text").unwrap(), "plain text");
    }

    #[test]
    fn strict_conditions_can_be_toggled() {
        let mut engine = Engine::from_serialize(&Page { title: "x".into(), visits: 1 }).unwrap();
        let template = "{% if visits > many %}yes{% else %}no{% endif %}";
        assert_eq!(engine.render(template).unwrap(), "no");
        engine.set_strict_conditions(true);
        assert!(engine.render(template).is_err());
        engine.set_strict_conditions(false);
        assert_eq!(engine.render(template).unwrap(), "no");
    }

    #[test]
    fn locals_can_be_bound_from_outside() {
        let mut engine = Engine::default();
        engine.environment_mut().push_local("user", Value::from("Ann"));
        assert_eq!(engine.render("Hi {{ user }}").unwrap(), "Hi Ann");
        assert!(engine.environment().value().is_null());
    }
}
