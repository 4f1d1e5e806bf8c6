//! Scripted collaborators shared by unit tests.

use crate::clipboard::ClipboardService;
use crate::core::error::AitermError;
use crate::core::executor::{CommandOutput, ShellRunner};
use crate::input::{LineSource, PromptKind};
use crate::providers::{ChatTurn, CompletionService};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays canned lines; `None` entries act like Ctrl-D, and so does running out.
pub struct ScriptedInput {
    lines: VecDeque<Option<String>>,
    prompts: Vec<String>,
    kinds: Vec<PromptKind>,
}

impl ScriptedInput {
    pub fn new(lines: &[Option<&str>]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.map(str::to_string)).collect(),
            prompts: Vec::new(),
            kinds: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn kinds(&self) -> &[PromptKind] {
        &self.kinds
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(
        &mut self,
        prompt: &str,
        kind: PromptKind,
    ) -> Result<Option<String>, AitermError> {
        self.prompts.push(prompt.to_string());
        self.kinds.push(kind);
        Ok(self.lines.pop_front().flatten())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    copied: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingClipboard {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl ClipboardService for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), AitermError> {
        self.copied.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(AitermError::Clipboard("no clipboard in tests".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingShell {
    commands: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingShell {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl ShellRunner for RecordingShell {
    fn run(&self, command: &str) -> Result<CommandOutput, AitermError> {
        self.commands.lock().unwrap().push(command.to_string());
        if self.fail {
            return Err(AitermError::Execution("no shell in tests".into()));
        }
        Ok(CommandOutput {
            stdout: "out\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })
    }
}

/// Answers each completion call with the next queued result and records the
/// conversation it was given.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AitermError>>>,
    calls: Mutex<Vec<Vec<ChatTurn>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, AitermError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedProvider {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, AitermError> {
        self.calls.lock().unwrap().push(turns.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AitermError::Unknown("no scripted reply left".into())))
    }

    fn model(&self) -> &str {
        "test/model"
    }
}
