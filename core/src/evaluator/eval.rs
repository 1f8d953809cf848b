//! Core evaluation logic.

use std::io::{self, Write};

use crate::{
    api::ExecutionOptions,
    evaluator::{
        ExecutionError, ExecutionErrorKind, Outcome,
        ResourceExceededError::*,
        RuntimeError::{self, *},
    },
    parser::{AnnotatedSource, Block, Callee, ComparisonOp, ControlKind, Expr, Program, Span},
    scope_stack::{Capture, ScopeArena, ScopeError, ScopeId},
    values::{Closure, NativeFunction, Value},
};

enum Callable<'a> {
    Closure(Closure<'a>),
    Native(&'static NativeFunction),
}

impl Callable<'_> {
    fn arity(&self) -> usize {
        match self {
            Callable::Closure(closure) => closure.decl.params.len(),
            Callable::Native(native) => native.arity,
        }
    }
}

/// Address of the current stack frame, for measuring stack use.
#[inline(always)]
fn stack_position() -> usize {
    let marker = 0u8;
    std::hint::black_box(&marker) as *const u8 as usize
}

/// Tree-walking evaluator.
///
/// Owns the global scope, so successive [`Evaluator::run`] calls see the
/// bindings left by earlier programs. `print` output goes to the writer
/// given to [`Evaluator::with_output`] (stdout by default).
pub struct Evaluator<'a, 'o> {
    options: ExecutionOptions,
    scopes: ScopeArena<'a, Value<'a>>,
    out: Box<dyn Write + 'o>,
    /// Span tables of every program run so far. Closures declared by an
    /// earlier program still point into its tree.
    anns: Vec<&'a AnnotatedSource<'a, Expr<'a>>>,
    /// Values held while their neighbours are evaluated. They are roots for
    /// scope collection.
    temporaries: Vec<Value<'a>>,
    stack_base: usize,
    depth: usize,
    iterations: usize,
}

impl<'a> Evaluator<'a, 'static> {
    pub fn new(options: ExecutionOptions) -> Self {
        Self {
            options,
            scopes: ScopeArena::new(),
            out: Box::new(io::stdout()),
            anns: Vec::new(),
            temporaries: Vec::new(),
            stack_base: 0,
            depth: 0,
            iterations: 0,
        }
    }
}

impl<'a, 'o> Evaluator<'a, 'o> {
    /// Redirect `print` output.
    pub fn with_output<'p>(self, out: impl Write + 'p) -> Evaluator<'a, 'p> {
        Evaluator {
            options: self.options,
            scopes: self.scopes,
            out: Box::new(out),
            anns: self.anns,
            temporaries: self.temporaries,
            stack_base: self.stack_base,
            depth: self.depth,
            iterations: self.iterations,
        }
    }

    /// Bind a value in the global scope.
    pub fn declare_global(&mut self, name: &'a str, value: Value<'a>) -> Result<(), ScopeError> {
        self.scopes.declare(ScopeId::ROOT, name, value)
    }

    /// Register a host function under its own name.
    pub fn register_native(&mut self, native: &'static NativeFunction) -> Result<(), ScopeError> {
        self.declare_global(native.name, Value::Native(native))
    }

    pub fn lookup_global(&self, name: &str) -> Option<Value<'a>> {
        self.scopes.lookup(ScopeId::ROOT, name).copied()
    }

    /// Names bound in the global scope, in no particular order.
    pub fn global_names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.scopes.names(ScopeId::ROOT)
    }

    /// Number of scope frames currently held, the global one included.
    pub fn frame_count(&self) -> usize {
        self.scopes.frame_count()
    }

    /// Evaluate every top-level statement of `program` in the global scope.
    ///
    /// Returns the value of the last statement, or `true` for an empty
    /// program. A control word reaching the top level is an error. A function
    /// value returned here keeps its scope only while a binding refers to it.
    pub fn run(&mut self, program: &Program<'a>) -> Result<Value<'a>, ExecutionError> {
        if !self.anns.iter().any(|ann| std::ptr::eq(*ann, program.ann)) {
            self.anns.push(program.ann);
        }
        self.temporaries.clear();
        self.stack_base = stack_position();
        self.depth = 0;
        self.iterations = 0;

        let mut last = Value::TRUE;
        for statement in program.statements {
            let outcome = self.eval_expr(statement, ScopeId::ROOT)?;
            if let Some(kind) = outcome.control {
                return Err(self.error(statement, ControlOutsideContext { kind }));
            }
            last = outcome.value;
        }
        tracing::debug!(
            statements = program.statements.len(),
            frames = self.scopes.frame_count(),
            "run finished"
        );
        Ok(last)
    }

    /// Span of `expr` and the text of the program it belongs to.
    fn span_of(&self, expr: &'a Expr<'a>) -> Option<(Span, &'a str)> {
        self.anns
            .iter()
            .rev()
            .find_map(|ann| ann.span_of(expr).map(|span| (span, ann.source)))
    }

    fn error(&self, expr: &'a Expr<'a>, kind: impl Into<ExecutionErrorKind>) -> ExecutionError {
        match self.span_of(expr) {
            Some((span, source)) => ExecutionError::new(kind, span).in_source(source),
            None => ExecutionError::new(kind, Span(0..0)),
        }
    }

    /// Close `frame`, collecting dead scopes when enough have piled up.
    /// `result` is what the frame produced; its value is still held.
    fn pop_frame(&mut self, frame: ScopeId, result: &Result<Outcome<'a>, ExecutionError>) {
        self.scopes.pop(frame);
        if self.scopes.needs_collection() {
            let carried = result.as_ref().ok().map(|outcome| outcome.value);
            let roots = self
                .temporaries
                .iter()
                .chain(carried.iter())
                .filter_map(|value| value.captured())
                .collect::<Vec<_>>();
            self.scopes.collect(roots);
        }
    }

    /// Evaluate an expression node.
    pub(crate) fn eval_expr(
        &mut self,
        expr: &'a Expr<'a>,
        scope: ScopeId,
    ) -> Result<Outcome<'a>, ExecutionError> {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(self.error(
                expr,
                StackOverflow {
                    depth: self.depth,
                    max_depth: self.options.max_depth,
                },
            ));
        }
        if self.stack_base.abs_diff(stack_position()) > self.options.stack_budget {
            return Err(self.error(
                expr,
                StackExhausted {
                    depth: self.depth,
                    budget: self.options.stack_budget,
                },
            ));
        }

        self.depth += 1;
        let result = self.eval_expr_inner(expr, scope);
        self.depth -= 1;

        result
    }

    /// Inner evaluation logic (no depth tracking).
    fn eval_expr_inner(
        &mut self,
        expr: &'a Expr<'a>,
        scope: ScopeId,
    ) -> Result<Outcome<'a>, ExecutionError> {
        match expr {
            Expr::Terminal(value) => Ok(Value::Bool(*value).into()),

            Expr::Ident(name) => match self.scopes.lookup(scope, name) {
                Some(value) => Ok((*value).into()),
                None => Err(self.error(
                    expr,
                    UndefinedIdentifier {
                        name: name.to_string(),
                    },
                )),
            },

            Expr::Not(operand) => {
                let outcome = self.eval_expr(operand, scope)?;
                if outcome.is_tagged() {
                    return Ok(outcome);
                }
                let value = self.expect_bool(operand, outcome.value)?;
                Ok(Value::Bool(!value).into())
            }

            // A tag on the left aborts at once, whatever the operator. The
            // right side is always evaluated otherwise: there is no boolean
            // short-circuit.
            Expr::Logic { op, left, right } => {
                let lhs = self.eval_expr(left, scope)?;
                if lhs.is_tagged() {
                    return Ok(lhs);
                }
                let a = self.expect_bool(left, lhs.value)?;

                let rhs = self.eval_expr(right, scope)?;
                if rhs.is_tagged() {
                    return Ok(rhs);
                }
                let b = self.expect_bool(right, rhs.value)?;

                Ok(Value::Bool(op.apply(a, b)).into())
            }

            Expr::Comparison { op, left, right } => {
                let lhs = self.eval_pure(left, scope, ControlInComparison)?;
                self.temporaries.push(lhs);
                let rhs = self.eval_pure(right, scope, ControlInComparison);
                self.temporaries.pop();
                let rhs = rhs?;
                let equal = lhs == rhs;
                Ok(Value::Bool(match op {
                    ComparisonOp::Eq => equal,
                    ComparisonOp::Neq => !equal,
                })
                .into())
            }

            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                let value = self.eval_pure(cond, scope, ControlInCondition)?;
                if self.expect_bool(cond, value)? {
                    self.eval_expr(then_branch, scope)
                } else {
                    self.eval_expr(else_branch, scope)
                }
            }

            Expr::Grouped(inner) => self.eval_expr(inner, scope),

            Expr::Declare { name, value } => {
                if self.scopes.is_declared_here(scope, name) {
                    return Err(self.error(
                        expr,
                        AlreadyDefined {
                            name: name.to_string(),
                        },
                    ));
                }
                let bound = self.eval_pure(
                    value,
                    scope,
                    ControlInBinding {
                        name: name.to_string(),
                    },
                )?;
                // The value itself may have declared the name: `my x = my x = true`.
                self.scopes
                    .declare(scope, *name, bound)
                    .map_err(|e| self.scope_error(expr, e))?;
                Ok(bound.into())
            }

            Expr::Assign { name, value } => {
                if self.scopes.lookup(scope, name).is_none() {
                    return Err(self.error(
                        expr,
                        UndefinedIdentifier {
                            name: name.to_string(),
                        },
                    ));
                }
                let bound = self.eval_pure(
                    value,
                    scope,
                    ControlInBinding {
                        name: name.to_string(),
                    },
                )?;
                self.scopes
                    .reassign(scope, name, bound)
                    .map_err(|e| self.scope_error(expr, e))?;
                Ok(bound.into())
            }

            Expr::Invocation { callee, args } => self.eval_invocation(expr, callee, args, scope),

            Expr::Function(decl) => {
                self.scopes.capture(scope);
                Ok(Value::Function(Closure { decl: *decl, scope }).into())
            }

            Expr::Block(block) => {
                let frame = self.scopes.push(scope);
                let result = self.eval_block(block, frame);
                self.pop_frame(frame, &result);
                result
            }

            Expr::While { cond, body } => self.eval_while(cond, body, scope),

            Expr::Control { kind, value } => match (kind, value) {
                (ControlKind::Return, Some(value)) => {
                    let outcome = self.eval_expr(value, scope)?;
                    if outcome.is_tagged() {
                        return Ok(outcome);
                    }
                    Ok(Outcome::tagged(outcome.value, ControlKind::Return))
                }
                (kind, _) => Ok(Outcome::tagged(Value::TRUE, *kind)),
            },
        }
    }

    /// Evaluate `expr` where a control tag is not allowed.
    fn eval_pure(
        &mut self,
        expr: &'a Expr<'a>,
        scope: ScopeId,
        misuse: RuntimeError,
    ) -> Result<Value<'a>, ExecutionError> {
        let outcome = self.eval_expr(expr, scope)?;
        if outcome.is_tagged() {
            return Err(self.error(expr, misuse));
        }
        Ok(outcome.value)
    }

    fn expect_bool(&self, expr: &'a Expr<'a>, value: Value<'a>) -> Result<bool, ExecutionError> {
        value.as_bool().ok_or_else(|| {
            self.error(
                expr,
                NotABoolean {
                    found: value.kind_name(),
                },
            )
        })
    }

    fn scope_error(&self, expr: &'a Expr<'a>, err: ScopeError) -> ExecutionError {
        let kind = match err {
            ScopeError::AlreadyDefined(name) => AlreadyDefined { name },
            ScopeError::Undefined(name) => UndefinedIdentifier { name },
        };
        self.error(expr, kind)
    }

    /// Evaluate statements in `frame`. The first tagged outcome stops the
    /// block; otherwise the last statement's value is the result (`true`
    /// when there are none).
    fn eval_block(&mut self, block: &'a Block<'a>, frame: ScopeId) -> Result<Outcome<'a>, ExecutionError> {
        let mut last = Value::TRUE;
        for statement in block.statements {
            let outcome = self.eval_expr(statement, frame)?;
            if outcome.is_tagged() {
                return Ok(outcome);
            }
            last = outcome.value;
        }
        Ok(last.into())
    }

    fn eval_while(
        &mut self,
        cond: &'a Expr<'a>,
        body: &'a Block<'a>,
        scope: ScopeId,
    ) -> Result<Outcome<'a>, ExecutionError> {
        loop {
            let value = self.eval_pure(cond, scope, ControlInCondition)?;
            if !self.expect_bool(cond, value)? {
                break;
            }

            self.iterations += 1;
            if let Some(max_iterations) = self.options.max_iterations {
                if self.iterations > max_iterations {
                    return Err(self.error(cond, IterationLimit { max_iterations }));
                }
            }
            tracing::trace!(iteration = self.iterations, "loop iteration");

            let frame = self.scopes.push(scope);
            let result = self.eval_block(body, frame);
            self.pop_frame(frame, &result);
            let outcome = result?;

            match outcome.control {
                Some(ControlKind::Return) => return Ok(outcome),
                Some(ControlKind::Break) => break,
                Some(ControlKind::Continue) | None => {}
            }
        }
        Ok(Value::TRUE.into())
    }

    fn eval_invocation(
        &mut self,
        expr: &'a Expr<'a>,
        callee: &'a Callee<'a>,
        args: &'a [&'a Expr<'a>],
        scope: ScopeId,
    ) -> Result<Outcome<'a>, ExecutionError> {
        let (name, function) = match callee {
            Callee::Name(name) => match self.scopes.lookup(scope, name) {
                Some(value) => (*name, *value),
                None => {
                    return Err(self.error(
                        expr,
                        UndefinedIdentifier {
                            name: name.to_string(),
                        },
                    ));
                }
            },
            // Called at once and never stored, so its scope is not captured.
            Callee::Immediate(decl) => (
                "function",
                Value::Function(Closure { decl: *decl, scope }),
            ),
        };

        let target = match function {
            Value::Function(closure) => Callable::Closure(closure),
            Value::Native(native) => Callable::Native(native),
            Value::Bool(_) => {
                return Err(self.error(
                    expr,
                    NotCallable {
                        name: name.to_string(),
                        kind: function.kind_name(),
                    },
                ));
            }
        };
        let expected = target.arity();
        if args.len() != expected {
            return Err(self.error(
                expr,
                ArityMismatch {
                    name: name.to_string(),
                    expected,
                    got: args.len(),
                },
            ));
        }

        let held = self.temporaries.len();
        self.temporaries.push(function);
        for arg in args {
            match self.eval_pure(arg, scope, ControlInArgument) {
                Ok(value) => self.temporaries.push(value),
                Err(e) => {
                    self.temporaries.truncate(held);
                    return Err(e);
                }
            }
        }
        let values = self.temporaries.split_off(held + 1);
        self.temporaries.truncate(held);
        tracing::trace!(function = name, args = values.len(), "call");

        match target {
            Callable::Native(native) => native
                .call(&mut *self.out, &values)
                .map(Outcome::plain)
                .map_err(|e| {
                    self.error(
                        expr,
                        NativeFailed {
                            name: native.name.to_string(),
                            message: e.to_string(),
                        },
                    )
                }),
            Callable::Closure(closure) => {
                let frame = self.scopes.push(closure.scope);
                let result = self.call_closure(expr, closure, &values, frame);
                self.pop_frame(frame, &result);
                result
            }
        }
    }

    fn call_closure(
        &mut self,
        expr: &'a Expr<'a>,
        closure: Closure<'a>,
        args: &[Value<'a>],
        frame: ScopeId,
    ) -> Result<Outcome<'a>, ExecutionError> {
        for (param, value) in closure.decl.params.iter().zip(args) {
            self.scopes
                .declare(frame, *param, *value)
                .map_err(|e| self.scope_error(expr, e))?;
        }

        let outcome = self.eval_block(&closure.decl.body, frame)?;
        match outcome.control {
            Some(ControlKind::Return) | None => Ok(outcome.value.into()),
            Some(kind) => Err(self.error(expr, ControlOutsideContext { kind })),
        }
    }
}
