use crate::core::error::AitermError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

/// Words that end the chat session.
pub const EXIT_KEYWORDS: [&str; 2] = ["exit", "quit"];

pub fn is_exit_keyword(input: &str) -> bool {
    EXIT_KEYWORDS
        .iter()
        .any(|keyword| input.eq_ignore_ascii_case(keyword))
}

/// What a prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Free text for the model.
    Message,
    /// A menu number, a flow letter or a yes/no answer.
    Choice,
}

impl PromptKind {
    /// Only chat messages are worth hinting back to the user.
    pub fn keeps_history(self) -> bool {
        matches!(self, PromptKind::Message)
    }
}

/// Somewhere prompts can read a line from.
pub trait LineSource {
    /// `Ok(None)` means end of input or a user interrupt (Ctrl-D / Ctrl-C).
    fn read_line(&mut self, prompt: &str, kind: PromptKind)
    -> Result<Option<String>, AitermError>;
}

/// Completes the chat exit keywords.
pub struct KeywordCompleter;

impl Completer for KeywordCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if typed.is_empty() || typed.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let matches = EXIT_KEYWORDS
            .iter()
            .filter(|keyword| keyword.starts_with(&typed.to_lowercase()))
            .map(|keyword| Pair {
                display: keyword.to_string(),
                replacement: keyword.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

pub struct ChatHelper {
    completer: KeywordCompleter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new() -> Self {
        Self {
            completer: KeywordCompleter,
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for ChatHelper {}

/// Line editor for every interactive prompt. History lives only in memory.
pub struct ChatEditor {
    editor: Editor<ChatHelper, DefaultHistory>,
}

impl ChatEditor {
    pub fn new() -> Result<Self, AitermError> {
        let config = Config::builder()
            .history_ignore_space(true)
            .history_ignore_dups(true)
            .map_err(|e| AitermError::Input(format!("Invalid line editor config: {}", e)))?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)
            .map_err(|e| AitermError::Input(format!("Failed to create line editor: {}", e)))?;
        editor.set_helper(Some(ChatHelper::new()));

        Ok(Self { editor })
    }
}

impl LineSource for ChatEditor {
    fn read_line(
        &mut self,
        prompt: &str,
        kind: PromptKind,
    ) -> Result<Option<String>, AitermError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if kind.keeps_history() && !line.trim().is_empty() {
                    self.editor
                        .add_history_entry(line.as_str())
                        .map_err(|e| AitermError::Input(format!("Failed to add history entry: {}", e)))?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(AitermError::Input(err.to_string())),
        }
    }
}
