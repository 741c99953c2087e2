use crate::core::error::LennyError;

use console::style;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, EditMode, Editor};

pub type LineEditor = Editor<(), DefaultHistory>;

/// Words that end the console session.
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// One line read from the console.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Message(String),
    Blank,
    Exit,
}

impl ConsoleInput {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ConsoleInput::Blank
        } else if EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
            ConsoleInput::Exit
        } else {
            ConsoleInput::Message(trimmed.to_string())
        }
    }
}

/// Creates a configured rustyline editor
pub fn create_editor() -> Result<LineEditor, LennyError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .edit_mode(EditMode::Emacs)
        .build();

    Editor::with_config(config)
        .map_err(|e| LennyError::Input(format!("Failed to create line editor: {}", e)))
}

/// Reads a line of input. `Exit` on Ctrl-C, Ctrl-D or an exit word.
pub fn read_input(editor: &mut LineEditor) -> Result<ConsoleInput, LennyError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "You: ".to_string()
    } else {
        style("You: ").bold().cyan().to_string()
    };

    classify_readline(editor.readline(&prompt))
}

fn classify_readline(line: Result<String, ReadlineError>) -> Result<ConsoleInput, LennyError> {
    match line {
        Ok(line) => Ok(ConsoleInput::classify(&line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(ConsoleInput::Exit),
        Err(ReadlineError::Io(source)) => Err(source.into()),
        Err(err) => Err(LennyError::Input(format!("Input error: {}", err))),
    }
}
