use std::path::{Path, PathBuf};

use bumpalo::Bump;
use domy::{Engine, Session, render_error};
use reedline::{
    DefaultPrompt, DefaultPromptSegment, EditCommand, Emacs, FileBackedHistory, KeyCode,
    KeyModifiers, Keybindings, Reedline, ReedlineEvent, Signal, default_emacs_keybindings,
};
use thiserror::Error;

use crate::{DebugFlags, highlighter::Highlighter, validator::DomyValidator};

const HISTORY_SIZE: usize = 1000;
const DEFAULT_HISTORY_SHOWN: usize = 10;

/// A line starting with `.`.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    History(usize),
    Save(&'a str),
    Load(&'a str),
    Exit,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, type .help for a list")]
    Unknown(String),
    #[error("`{0}` needs a file path")]
    MissingPath(&'static str),
    #[error("`.history` takes a count, got `{0}`")]
    BadCount(String),
}

/// Parse a REPL command. Returns `None` for ordinary program input.
pub fn parse_command(line: &str) -> Option<Result<Command<'_>, CommandError>> {
    let line = line.trim();
    if !line.starts_with('.') {
        return None;
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let path = |command: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingPath(command))
        } else {
            Ok(rest)
        }
    };
    Some(match name {
        ".help" => Ok(Command::Help),
        ".exit" => Ok(Command::Exit),
        ".history" if rest.is_empty() => Ok(Command::History(DEFAULT_HISTORY_SHOWN)),
        ".history" => rest
            .parse()
            .map(Command::History)
            .map_err(|_| CommandError::BadCount(rest.to_string())),
        ".save" => path(".save").map(Command::Save),
        ".load" => path(".load").map(Command::Load),
        other => Err(CommandError::Unknown(other.to_string())),
    })
}

/// The last `n` entries of `record`.
pub fn history_tail(record: &[String], n: usize) -> &[String] {
    &record[record.len().saturating_sub(n)..]
}

fn print_help() {
    println!("Help:");
    println!("  .save <path>     Save accepted inputs to <path>");
    println!("  .load <path>     Run the file at <path> in this session");
    println!("  .history [n]     Show the last n inputs (default {DEFAULT_HISTORY_SHOWN})");
    println!("  .help            Print this message");
    println!("  .exit            Leave the session");
}

fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".domy_history"))
}

fn add_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline() -> (Reedline, DefaultPrompt) {
    let mut keybindings = default_emacs_keybindings();
    add_keybindings(&mut keybindings);

    let mut line_editor = Reedline::create()
        .with_highlighter(Box::new(Highlighter))
        .with_validator(Box::new(DomyValidator))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    if let Some(path) = history_path() {
        match FileBackedHistory::with_file(HISTORY_SIZE, path) {
            Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
            Err(e) => tracing::warn!("history disabled: {}", e),
        }
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("domy".to_string()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

/// Interactive session state: the accepted inputs, in order.
pub struct Repl<'e> {
    engine: &'e Engine,
    debug: DebugFlags,
    record: Vec<String>,
}

impl<'e> Repl<'e> {
    pub fn new(engine: &'e Engine, debug: DebugFlags) -> Self {
        Self {
            engine,
            debug,
            record: Vec::new(),
        }
    }

    pub fn run(mut self) {
        let arena = Bump::new();
        let mut session = self.engine.session(&arena);
        let (mut line_editor, prompt) = setup_reedline();

        println!(
            "Domy v{} - type .help for usage information",
            env!("CARGO_PKG_VERSION")
        );

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    return;
                }
            };

            match sig {
                Signal::Success(buffer) => {
                    if !self.handle(&arena, &mut session, &buffer) {
                        return;
                    }
                }
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    return;
                }
            }
        }
    }

    /// Process one submitted buffer. Returns `false` to end the session.
    fn handle<'a>(&mut self, arena: &'a Bump, session: &mut Session<'a, '_>, buffer: &str) -> bool {
        let command = match parse_command(buffer) {
            None => {
                if !buffer.trim().is_empty() && self.eval(arena, session, buffer, true) {
                    self.record.push(buffer.to_string());
                }
                return true;
            }
            Some(Ok(command)) => command,
            Some(Err(e)) => {
                eprintln!("{e}");
                return true;
            }
        };

        match command {
            Command::Help => print_help(),
            Command::Exit => return false,
            Command::History(n) => {
                println!("History:");
                for entry in history_tail(&self.record, n) {
                    println!("  {}", entry);
                }
            }
            Command::Save(path) => {
                if let Err(e) = std::fs::write(path, self.record.join("\n")) {
                    eprintln!("cannot save to {}: {}", path, e);
                }
            }
            Command::Load(path) => self.load(arena, session, Path::new(path)),
        }
        true
    }

    fn load<'a>(&mut self, arena: &'a Bump, session: &mut Session<'a, '_>, path: &Path) {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("cannot load {}: {}", path.display(), e);
                return;
            }
        };
        if self.eval(arena, session, &source, false) {
            self.record.push(source);
        }
    }

    fn eval<'a>(
        &self,
        arena: &'a Bump,
        session: &mut Session<'a, '_>,
        source: &str,
        show_value: bool,
    ) -> bool {
        let program = match crate::compile(self.engine, arena, source, self.debug) {
            Some(program) => program,
            None => return false,
        };
        match session.run(&program) {
            Ok(value) => {
                if show_value {
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
}
