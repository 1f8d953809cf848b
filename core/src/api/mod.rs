//! Public API for embedding Domy.
//!
//! An [`Engine`] holds the global environment and the options; it compiles
//! source text into [`Program`](crate::parser::Program)s and opens
//! [`Session`]s that run them against a persistent global scope.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use domy_core::api::{Engine, EngineOptions};
//!
//! let engine = Engine::with_stdlib(EngineOptions::default());
//! let arena = Bump::new();
//! let value = engine.run(&arena, "(true == false) ? true : false").unwrap();
//! assert_eq!(value.to_string(), "false");
//! ```

pub mod engine;
pub mod environment;
pub mod error;
pub mod options;
pub mod session;

pub use engine::Engine;
pub use environment::EnvironmentBuilder;
pub use error::{Diagnostic, Error, RelatedInfo, Severity};
pub use options::{EngineOptions, ExecutionOptions, ParserOptions};
pub use session::Session;
