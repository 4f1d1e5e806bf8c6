use crate::clipboard::ClipboardService;
use crate::config::Settings;
use crate::confirm::{ConfirmationFlow, FlowOutcome};
use crate::core::executor::ShellRunner;
use crate::core::extract::extract_command;
use crate::core::history::HistoryBuffer;
use crate::display;
use crate::input::{LineSource, PromptKind, is_exit_keyword};
use crate::providers::CompletionService;
use console::style;
use tracing::{debug, info, warn};

/// Whether the chat loop keeps going after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Continue,
    Exit,
}

/// The non-terminal collaborators a session acts through.
pub struct Services<'a> {
    pub provider: &'a dyn CompletionService,
    pub clipboard: &'a dyn ClipboardService,
    pub shell: &'a dyn ShellRunner,
}

/// One run of the interactive chat loop. The history lives and dies with it.
pub struct ChatSession<'a> {
    services: Services<'a>,
    history: HistoryBuffer,
}

impl<'a> ChatSession<'a> {
    pub fn new(settings: &Settings, services: Services<'a>) -> Self {
        Self {
            services,
            history: HistoryBuffer::new(settings.system_prompt.clone(), settings.max_turns),
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Reads and answers user messages until exit, quit, or end of input.
    pub async fn run(&mut self, input: &mut dyn LineSource) {
        info!(model = self.services.provider.model(), "chat session started");
        let prompt = format!("{} ", style("You:").bold().blue());

        loop {
            let line = match input.read_line(&prompt, PromptKind::Message) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    display::print_info("\nExiting AI Chat...");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "reading chat input failed");
                    display::display_error(&e);
                    break;
                }
            };

            let text = line.trim();
            if is_exit_keyword(text) {
                display::print_info("Exiting AI Chat...");
                break;
            }
            if text.is_empty() {
                continue;
            }

            if self.round(text, input).await == SessionSignal::Exit {
                display::print_info("Exiting AI Chat...");
                break;
            }
        }

        info!(turns = self.history.len(), "chat session ended");
    }

    /// One request/response round for a non-blank user message.
    pub async fn round(&mut self, text: &str, input: &mut dyn LineSource) -> SessionSignal {
        if let Err(e) = self.history.append_user(text) {
            debug!(error = %e, "skipping round");
            return SessionSignal::Continue;
        }
        self.history.trim();

        debug!(turns = self.history.len(), "requesting completion");
        let reply = match self.services.provider.complete(self.history.turns()).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "completion round failed, rolling back");
                display::display_error(&e);
                if let Err(rollback) = self.history.rollback_last() {
                    warn!(error = %rollback, "rollback failed");
                }
                return SessionSignal::Continue;
            }
        };

        self.history.append_assistant(reply.as_str());
        display::display_ai_message(&reply);

        match extract_command(&reply) {
            Some(command) if !command.is_empty() => self.offer_command(&command, input),
            Some(_) => {
                debug!("assistant sent an empty command block");
                SessionSignal::Continue
            }
            None => SessionSignal::Continue,
        }
    }

    fn offer_command(&self, command: &str, input: &mut dyn LineSource) -> SessionSignal {
        display::print_info("\nAI suggested the following command:");
        display::display_command(command);

        let flow = ConfirmationFlow::new(command, self.services.clipboard, self.services.shell);
        match flow.run(input) {
            FlowOutcome::Done => SessionSignal::Continue,
            FlowOutcome::QuitRequested => SessionSignal::Exit,
        }
    }
}
