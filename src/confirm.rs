//! Run / Copy / Ignore / Quit prompt for a command suggested by the model.

use crate::clipboard::ClipboardService;
use crate::core::executor::ShellRunner;
use crate::display;
use crate::input::{LineSource, PromptKind};
use tracing::{debug, warn};

pub const CHOICE_PROMPT: &str = "Options: (R)un, (C)opy, (I)gnore, (Q)uit AI [I]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Prompting,
    ConfirmingRun,
    Done,
    QuitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run,
    Copy,
    Ignore,
    Quit,
}

impl Choice {
    /// Case-insensitive single letter; blank input means `Ignore`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "" | "i" => Some(Choice::Ignore),
            "r" => Some(Choice::Run),
            "c" => Some(Choice::Copy),
            "q" => Some(Choice::Quit),
            _ => None,
        }
    }
}

/// Only an exact, case-insensitive "yes" confirms.
pub fn is_confirmed(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}

/// How the flow ended, as seen by the chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Done,
    QuitRequested,
}

pub struct ConfirmationFlow<'a> {
    command: &'a str,
    clipboard: &'a dyn ClipboardService,
    shell: &'a dyn ShellRunner,
    state: FlowState,
}

impl<'a> ConfirmationFlow<'a> {
    pub fn new(
        command: &'a str,
        clipboard: &'a dyn ClipboardService,
        shell: &'a dyn ShellRunner,
    ) -> Self {
        Self {
            command,
            clipboard,
            shell,
            state: FlowState::Prompting,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Drives the machine until it reaches a terminal state.
    pub fn run(mut self, input: &mut dyn LineSource) -> FlowOutcome {
        loop {
            match self.state {
                FlowState::Done => return FlowOutcome::Done,
                FlowState::QuitRequested => return FlowOutcome::QuitRequested,
                _ => self.step(input),
            }
        }
    }

    /// Performs exactly one transition.
    pub fn step(&mut self, input: &mut dyn LineSource) {
        self.state = match self.state {
            FlowState::Prompting => self.prompt_choice(input),
            FlowState::ConfirmingRun => self.confirm_run(input),
            terminal => terminal,
        };
        debug!(state = ?self.state, "confirmation flow transition");
    }

    fn prompt_choice(&self, input: &mut dyn LineSource) -> FlowState {
        let line = match input.read_line(CHOICE_PROMPT, PromptKind::Choice) {
            Ok(Some(line)) => line,
            Ok(None) => {
                display::print_info("\nDefaulting to Ignore.");
                return FlowState::Done;
            }
            Err(e) => {
                warn!(error = %e, "reading choice failed, defaulting to ignore");
                display::print_info("\nDefaulting to Ignore.");
                return FlowState::Done;
            }
        };

        match Choice::parse(&line) {
            Some(Choice::Run) => FlowState::ConfirmingRun,
            Some(Choice::Copy) => {
                match self.clipboard.copy(self.command) {
                    Ok(()) => display::print_info("Copied to clipboard."),
                    Err(e) => {
                        warn!(error = %e, "clipboard copy failed");
                        display::display_error(&e);
                    }
                }
                FlowState::Done
            }
            Some(Choice::Ignore) => {
                display::print_info("Ignoring command suggestion.");
                FlowState::Done
            }
            Some(Choice::Quit) => FlowState::QuitRequested,
            None => {
                display::print_error("Invalid option. Please choose R, C, I, or Q.");
                FlowState::Prompting
            }
        }
    }

    fn confirm_run(&self, input: &mut dyn LineSource) -> FlowState {
        let prompt = format!("Execute: '{}'? (yes/No): ", self.command);
        let confirmed = match input.read_line(&prompt, PromptKind::Choice) {
            Ok(Some(line)) => is_confirmed(&line),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "reading confirmation failed, not executing");
                false
            }
        };

        if !confirmed {
            display::print_info("Command not executed.");
            return FlowState::Done;
        }

        display::display_running(self.command);
        match self.shell.run(self.command) {
            Ok(output) => display::display_command_output(&output),
            Err(e) => {
                warn!(error = %e, "suggested command could not be started");
                display::display_error(&e);
            }
        }
        FlowState::Done
    }
}
