use std::io::Read;
use std::path::PathBuf;

use bumpalo::Bump;
use clap::Parser;
use domy::{Engine, EngineOptions, ExecutionOptions, ParserOptions, Program, render_error};
use domy_core::lexer;
use miette::{IntoDiagnostic, Result, WrapErr};

mod highlighter;
mod repl;
mod validator;

/// Domy - a tiny boolean scripting language
#[derive(Parser, Debug)]
#[command(name = "domy", version)]
#[command(about = "Run Domy programs", long_about = None)]
struct Args {
    /// Print the token stream (for debugging)
    #[arg(long)]
    debug_tokens: bool,

    /// Print the parsed AST (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Maximum evaluation depth before giving up
    #[arg(long, default_value_t = ExecutionOptions::default().max_depth)]
    max_depth: usize,

    /// Maximum number of loop iterations per run (unlimited if not set)
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Program text to run instead of a file
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Program file to run (if not provided, reads from stdin or starts a REPL)
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DebugFlags {
    tokens: bool,
    parse: bool,
}

/// Compile `source`, printing debug output on the way. Errors are rendered
/// to stderr and reported as `None`.
pub(crate) fn compile<'a>(
    engine: &Engine,
    arena: &'a Bump,
    source: &str,
    debug: DebugFlags,
) -> Option<Program<'a>> {
    if debug.tokens {
        println!("=== Tokens ===");
        // Lex errors are reported by the compile step below.
        if let Ok(tokens) = lexer::tokenize(source) {
            for token in tokens {
                println!("{}:{} {:?} {:?}", token.row, token.col, token.kind, token.text);
            }
        }
        println!();
    }

    let program = match engine.compile(arena, source) {
        Ok(program) => program,
        Err(e) => {
            render_error(&e);
            return None;
        }
    };

    if debug.parse {
        println!("=== Parsed AST ===");
        println!("{:#?}", program.statements);
        println!();
    }

    Some(program)
}

/// Run a whole program. Returns whether it succeeded.
fn run_program(engine: &Engine, source: &str, debug: DebugFlags, print_value: bool) -> bool {
    let arena = Bump::new();
    let Some(program) = compile(engine, &arena, source, debug) else {
        return false;
    };
    let mut session = engine.session(&arena);
    match session.run(&program) {
        Ok(value) => {
            if print_value {
                println!("{}", value);
            }
            true
        }
        Err(e) => {
            render_error(&e);
            false
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the log level, defaulting to WARN
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let options = EngineOptions {
        parser: ParserOptions::default(),
        execution: ExecutionOptions {
            max_depth: args.max_depth,
            max_iterations: args.max_iterations,
            ..ExecutionOptions::default()
        },
    };
    let engine = Engine::with_stdlib(options);
    let debug = DebugFlags {
        tokens: args.debug_tokens,
        parse: args.debug_parse,
    };

    let ok = if let Some(source) = &args.eval {
        run_program(&engine, source, debug, true)
    } else if let Some(path) = &args.file {
        let source = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot read {}", path.display()))?;
        run_program(&engine, &source, debug, false)
    } else if atty::is(atty::Stream::Stdin) {
        repl::Repl::new(&engine, debug).run();
        true
    } else {
        // Pipe mode: stdin is one program
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .into_diagnostic()
            .wrap_err("cannot read stdin")?;
        run_program(&engine, &source, debug, false)
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
