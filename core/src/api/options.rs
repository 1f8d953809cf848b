//! Configuration options for the Domy engine.

/// Configuration options for parsing.
///
/// # Example
///
/// ```
/// use domy_core::api::ParserOptions;
///
/// let options = ParserOptions { max_depth: 32 };
/// assert_eq!(ParserOptions::default().max_depth, 64);
/// # let _ = options;
/// ```
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Maximum nesting of statements and parenthesized or braced
    /// expressions. Operator chains do not nest.
    ///
    /// Default: 64
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: crate::parser::parser::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration options for program execution.
///
/// These options control resource limits during evaluation.
///
/// # Example
///
/// ```
/// use domy_core::api::ExecutionOptions;
///
/// let options = ExecutionOptions {
///     max_depth: 500,
///     max_iterations: Some(10_000),
///     ..ExecutionOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,

    /// Maximum number of `while` iterations per run (if Some).
    ///
    /// Set to `None` for unlimited iterations (be careful with untrusted code!).
    ///
    /// Default: None
    pub max_iterations: Option<usize>,

    /// Bytes of host stack one run may use before it is stopped.
    ///
    /// Checked alongside `max_depth`, which counts nodes rather than bytes and
    /// so cannot account for frame sizes that differ between builds. The
    /// default fits a 2 MiB thread.
    ///
    /// Default: 1 MiB
    pub stack_budget: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_iterations: None,
            stack_budget: DEFAULT_STACK_BUDGET,
        }
    }
}

/// Default for [`ExecutionOptions::stack_budget`].
pub const DEFAULT_STACK_BUDGET: usize = 1024 * 1024;

/// Configuration options for the Domy engine.
///
/// # Example
///
/// ```
/// use domy_core::api::{EngineOptions, ExecutionOptions, ParserOptions};
///
/// let options = EngineOptions {
///     parser: ParserOptions::default(),
///     execution: ExecutionOptions {
///         max_depth: 500,
///         max_iterations: Some(10_000),
///         ..ExecutionOptions::default()
///     },
/// };
/// # let _ = options;
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub parser: ParserOptions,
    pub execution: ExecutionOptions,
}
