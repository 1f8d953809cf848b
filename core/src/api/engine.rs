//! The Domy engine.

use bumpalo::Bump;

use super::{EngineOptions, EnvironmentBuilder, Error, Session};
use crate::parser::{self, Program};
use crate::stdlib;
use crate::values::{NativeFunction, Value};

/// The Domy compilation and execution engine.
///
/// The engine manages:
/// - Global environment (host functions such as `print`)
/// - Runtime configuration (EngineOptions)
///
/// Parsed programs and the values they produce borrow from an arena owned by
/// the caller.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use domy_core::api::{Engine, EngineOptions};
///
/// let engine = Engine::with_stdlib(EngineOptions::default());
/// let arena = Bump::new();
///
/// let mut out = Vec::new();
/// let mut session = engine.session(&arena).with_output(&mut out);
/// session.eval("my f = do(a, b) { return a & b }").unwrap();
/// let value = session.eval("print(f(true, true))").unwrap();
/// drop(session);
///
/// assert_eq!(value.as_bool(), Some(true));
/// assert_eq!(String::from_utf8(out).unwrap(), "true\n");
/// ```
pub struct Engine {
    environment: Vec<&'static NativeFunction>,
    options: EngineOptions,
}

impl Engine {
    /// Create a new engine with a custom environment.
    ///
    /// # Example
    ///
    /// ```
    /// use domy_core::api::{Engine, EngineOptions};
    ///
    /// // No built-ins at all: `print` is undefined.
    /// let engine = Engine::new(EngineOptions::default(), |_env| {});
    /// assert!(engine.environment().is_empty());
    /// ```
    pub fn new(options: EngineOptions, init: impl FnOnce(&mut EnvironmentBuilder)) -> Self {
        let mut builder = EnvironmentBuilder::new();
        init(&mut builder);
        Self {
            environment: builder.build(),
            options,
        }
    }

    /// Create an engine with every built-in registered.
    pub fn with_stdlib(options: EngineOptions) -> Self {
        Self::new(options, |env| {
            for &native in stdlib::BUILTINS {
                env.register(native);
            }
        })
    }

    /// Access the global environment, sorted by name.
    pub fn environment(&self) -> &[&'static NativeFunction] {
        &self.environment
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Parse a program. The source is copied into `arena`.
    pub fn compile<'a>(&self, arena: &'a Bump, source: &str) -> Result<Program<'a>, Error> {
        let source = arena.alloc_str(source);
        let program = parser::parse_with_max_depth(arena, source, self.options.parser.max_depth)
            .map_err(|e| Error::from_parse(&e, source))?;
        tracing::debug!(statements = program.statements.len(), "compiled");
        Ok(program)
    }

    /// Start a session: a global scope seeded with the environment that
    /// persists across runs.
    pub fn session<'a>(&self, arena: &'a Bump) -> Session<'a, 'static> {
        Session::new(arena, self)
    }

    /// Compile and run `source` in a fresh session.
    pub fn run<'a>(&self, arena: &'a Bump, source: &str) -> Result<Value<'a>, Error> {
        self.session(arena).eval(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ExecutionOptions, ParserOptions};

    #[test]
    fn test_run_returns_last_value() {
        let engine = Engine::with_stdlib(EngineOptions::default());
        let arena = Bump::new();
        let value = engine.run(&arena, "my x = true; !x").unwrap();
        assert_eq!(value, Value::FALSE);
    }

    #[test]
    fn test_compile_error() {
        let engine = Engine::with_stdlib(EngineOptions::default());
        let arena = Bump::new();
        let err = engine.compile(&arena, "my = true").unwrap_err();
        match err {
            Error::Compilation { diagnostics, src } => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(src, "my = true");
            }
            other => panic!("expected a compilation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_depth_option() {
        let options = EngineOptions {
            parser: ParserOptions { max_depth: 4 },
            execution: ExecutionOptions::default(),
        };
        let engine = Engine::with_stdlib(options);
        let arena = Bump::new();
        let err = engine.compile(&arena, "((((((true))))))").unwrap_err();
        assert_eq!(err.diagnostics()[0].code, Some("P005".to_string()));
    }

    #[test]
    fn test_empty_environment() {
        let engine = Engine::new(EngineOptions::default(), |_| {});
        let arena = Bump::new();
        let err = engine.run(&arena, "print(true)").unwrap_err();
        assert_eq!(err.diagnostics()[0].code, Some("R001".to_string()));
    }

    #[test]
    fn test_iteration_limit_is_resource_error() {
        let options = EngineOptions {
            parser: ParserOptions::default(),
            execution: ExecutionOptions {
                max_iterations: Some(3),
                ..ExecutionOptions::default()
            },
        };
        let engine = Engine::with_stdlib(options);
        let arena = Bump::new();
        let err = engine.run(&arena, "while true {}").unwrap_err();
        assert!(matches!(err, Error::ResourceExceeded(_)));
    }
}
