#![allow(dead_code)]

use bumpalo::Bump;
use domy::{Engine, EngineOptions, Error};
use pretty_assertions::assert_eq;

/// Result of running one program with `print` output captured.
pub struct Case {
    pub input: &'static str,
    pub result: Result<String, Error>,
    pub printed: String,
}

impl Case {
    pub fn run(input: &'static str) -> Self {
        Self::run_with(input, EngineOptions::default())
    }

    pub fn run_with(input: &'static str, options: EngineOptions) -> Self {
        let engine = Engine::with_stdlib(options);
        let arena = Bump::new();
        let mut printed = Vec::new();
        let result = {
            let mut session = engine.session(&arena).with_output(&mut printed);
            session.eval(input).map(|value| value.to_string())
        };
        Self {
            input,
            result,
            printed: String::from_utf8(printed).expect("print writes UTF-8"),
        }
    }

    /// The printed form of the program's final value.
    pub fn value(&self, expected: &str) {
        match &self.result {
            Ok(value) => assert_eq!(value, expected, "input: {}", self.input),
            Err(e) => panic!("{} failed: {:?}", self.input, e),
        }
    }

    /// Everything written by `print`.
    pub fn output(&self, expected: &str) {
        assert_eq!(self.printed, expected, "input: {}", self.input);
    }

    /// Code of the first diagnostic.
    pub fn error(&self, code: &str) {
        match &self.result {
            Ok(value) => panic!("{} succeeded with {}", self.input, value),
            Err(e) => {
                let first = e.diagnostics().first().and_then(|d| d.code.as_deref());
                assert_eq!(first, Some(code), "input: {}", self.input);
            }
        }
    }

    /// Message of the first diagnostic.
    pub fn message(&self, expected: &str) {
        match &self.result {
            Ok(value) => panic!("{} succeeded with {}", self.input, value),
            Err(e) => assert_eq!(
                e.diagnostics().first().map(|d| d.message.as_str()),
                Some(expected),
                "input: {}",
                self.input
            ),
        }
    }
}

/// Declares a test that runs `input` and checks each listed property.
///
/// ```ignore
/// test_case!(
///     name,
///     input: "print(true)",
///     output: "true\n",
///     value: "true",
/// );
/// ```
#[macro_export]
macro_rules! test_case {
    ($name:ident, input: $input:expr, $($check:ident: $expected:expr),* $(,)?) => {
        #[test]
        fn $name() {
            let case = $crate::cases::Case::run($input);
            $( case.$check($expected); )*
        }
    };
}
