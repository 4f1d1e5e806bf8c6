use crate::clipboard::ClipboardService;
use crate::config::Settings;
use crate::core::executor::ShellRunner;
use crate::display;
use crate::input::{LineSource, PromptKind};
use crate::providers::CompletionService;
use crate::session::{ChatSession, Services};
use crate::system::SystemInfo;
use tracing::{info, warn};

const MENU_PROMPT: &str = "Enter your choice (1 or 2): ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    Chat,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Exit),
            "2" => Some(MenuChoice::Chat),
            _ => None,
        }
    }
}

/// Top-level menu: either leave the program or start a chat session.
pub struct Application {
    settings: Settings,
    system_info: SystemInfo,
    provider: Box<dyn CompletionService>,
    clipboard: Box<dyn ClipboardService>,
    shell: Box<dyn ShellRunner>,
}

impl Application {
    pub fn new(
        settings: Settings,
        system_info: SystemInfo,
        provider: Box<dyn CompletionService>,
        clipboard: Box<dyn ClipboardService>,
        shell: Box<dyn ShellRunner>,
    ) -> Self {
        Self {
            settings,
            system_info,
            provider,
            clipboard,
            shell,
        }
    }

    pub async fn run(&self, input: &mut dyn LineSource) {
        display::display_welcome(&self.system_info.username, &self.system_info.os_info);
        self.warn_if_unconfigured();

        loop {
            display::display_menu();

            let line = match input.read_line(MENU_PROMPT, PromptKind::Choice) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    display::print_info("\nExiting.");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "reading menu choice failed");
                    display::display_error(&e);
                    break;
                }
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => {
                    display::print_info("Exiting. Your normal terminal will resume.");
                    break;
                }
                Some(MenuChoice::Chat) => {
                    self.chat(input).await;
                    display::print_info("Returned to main menu.");
                }
                None => display::print_error("Invalid choice. Please enter 1 or 2."),
            }
        }
    }

    async fn chat(&self, input: &mut dyn LineSource) {
        self.warn_if_unconfigured();
        display::display_chat_banner(self.provider.model());

        let services = Services {
            provider: self.provider.as_ref(),
            clipboard: self.clipboard.as_ref(),
            shell: self.shell.as_ref(),
        };
        let mut session = ChatSession::new(&self.settings, services);
        session.run(input).await;
        info!(turns = session.history().len(), "left chat session");
    }

    /// Chat still starts without a credential; the first request will fail.
    fn warn_if_unconfigured(&self) {
        if let Err(e) = self.settings.check_credential() {
            warn!(error = %e, "credential not configured");
            display::display_credential_warning(&e, &self.settings.api_key_env);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use crate::config::Config;
    use crate::system::ShellType;
    use crate::testing::{RecordingClipboard, RecordingShell, ScriptedInput, ScriptedProvider};
    use std::sync::Arc;

    fn app(provider: Arc<ScriptedProvider>) -> Application {
        let settings =
            Settings::resolve(&Config::default(), &Args::default(), |_| None).unwrap();
        let system_info = SystemInfo {
            os_info: "TestOS".into(),
            shell_path: "/bin/sh".into(),
            shell_type: ShellType::UnixLike,
            username: "tester".into(),
        };
        Application::new(
            settings,
            system_info,
            Box::new(SharedProvider(provider)),
            Box::new(RecordingClipboard::default()),
            Box::new(RecordingShell::default()),
        )
    }

    /// Lets a test keep a handle on the provider the application owns.
    struct SharedProvider(Arc<ScriptedProvider>);

    #[async_trait::async_trait]
    impl CompletionService for SharedProvider {
        async fn complete(
            &self,
            turns: &[crate::providers::ChatTurn],
        ) -> Result<String, crate::core::error::AitermError> {
            self.0.complete(turns).await
        }

        fn model(&self) -> &str {
            self.0.model()
        }
    }

    #[test]
    fn menu_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse(" 2 "), Some(MenuChoice::Chat));
        assert_eq!(MenuChoice::parse("3"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[tokio::test]
    async fn exit_choice_ends_menu() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut input = ScriptedInput::new(&[Some("1"), Some("2")]);

        app(provider.clone()).run(&mut input).await;

        assert_eq!(input.remaining(), 1);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_choice_reprompts() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut input = ScriptedInput::new(&[Some("7"), Some("1")]);

        app(provider).run(&mut input).await;

        assert_eq!(input.prompts(), &[MENU_PROMPT, MENU_PROMPT]);
        assert_eq!(input.kinds(), &[PromptKind::Choice, PromptKind::Choice]);
    }

    #[tokio::test]
    async fn quit_in_chat_returns_to_menu() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(
            "<<CMD_START>>df -h<<CMD_END>>".into(),
        )]));
        let mut input = ScriptedInput::new(&[
            Some("2"),
            Some("disk usage?"),
            Some("q"),
            Some("1"),
            Some("left over"),
        ]);

        app(provider.clone()).run(&mut input).await;

        assert_eq!(provider.calls().len(), 1);
        assert_eq!(input.remaining(), 1);
        assert_eq!(input.prompts().last().map(String::as_str), Some(MENU_PROMPT));
    }

    #[tokio::test]
    async fn end_of_input_at_menu_exits() {
        let provider = Arc::new(ScriptedProvider::default());
        let mut input = ScriptedInput::new(&[]);

        app(provider).run(&mut input).await;

        assert_eq!(input.prompts().len(), 1);
    }
}
