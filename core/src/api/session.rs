//! Sessions: a persistent global scope for running many programs.

use std::io::Write;

use bumpalo::Bump;

use super::{Engine, Error, ParserOptions};
use crate::evaluator::Evaluator;
use crate::parser::{self, Program};
use crate::values::Value;

/// A global scope that lives across runs, as in an interactive prompt.
///
/// Bindings made by one program are visible to the next. A failing run keeps
/// the bindings made before the failure.
pub struct Session<'a, 'o> {
    arena: &'a Bump,
    parser: ParserOptions,
    evaluator: Evaluator<'a, 'o>,
}

impl<'a> Session<'a, 'static> {
    pub(crate) fn new(arena: &'a Bump, engine: &Engine) -> Self {
        let options = engine.options();
        let mut evaluator = Evaluator::new(options.execution.clone());
        for &native in engine.environment() {
            if let Err(e) = evaluator.register_native(native) {
                tracing::warn!("skipping built-in: {}", e);
            }
        }
        Self {
            arena,
            parser: options.parser.clone(),
            evaluator,
        }
    }
}

impl<'a, 'o> Session<'a, 'o> {
    /// Redirect `print` output.
    pub fn with_output<'p>(self, out: impl Write + 'p) -> Session<'a, 'p> {
        Session {
            arena: self.arena,
            parser: self.parser,
            evaluator: self.evaluator.with_output(out),
        }
    }

    /// Run an already parsed program.
    pub fn run(&mut self, program: &Program<'a>) -> Result<Value<'a>, Error> {
        self.evaluator
            .run(program)
            .map_err(|e| Error::from_execution(&e, program.source))
    }

    /// Parse and run `source`.
    pub fn eval(&mut self, source: &str) -> Result<Value<'a>, Error> {
        let source = self.arena.alloc_str(source);
        let program = parser::parse_with_max_depth(self.arena, source, self.parser.max_depth)
            .map_err(|e| Error::from_parse(&e, source))?;
        self.run(&program)
    }

    /// Names bound in the global scope, sorted.
    pub fn globals(&self) -> Vec<&'a str> {
        let mut names: Vec<_> = self.evaluator.global_names().collect();
        names.sort_unstable();
        names
    }
}
