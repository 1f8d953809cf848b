//! Environment builder for registering global functions.

use crate::values::NativeFunction;

/// Builder for constructing the global environment.
///
/// The environment holds the host functions every session starts with.
///
/// # Example
///
/// ```
/// use domy_core::api::{Engine, EngineOptions};
/// use domy_core::stdlib;
///
/// let engine = Engine::new(EngineOptions::default(), |env| {
///     env.register(&stdlib::PRINT);
/// });
/// assert_eq!(engine.environment().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    entries: Vec<&'static NativeFunction>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host function under its own name. Registering a second
    /// function with the same name replaces the first.
    pub fn register(&mut self, native: &'static NativeFunction) -> &mut Self {
        self.entries.retain(|existing| existing.name != native.name);
        self.entries.push(native);
        self
    }

    /// Build the final environment, sorted by name.
    pub(crate) fn build(mut self) -> Vec<&'static NativeFunction> {
        self.entries.sort_by_key(|native| native.name);
        self.entries
    }
}
