//! Responsible for rendering templates

pub use self::environment::Environment;
pub(crate) use self::processor::Processor;

mod environment;
mod processor;

#[cfg(test)]
mod tests;
