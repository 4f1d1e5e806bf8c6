use crate::cli::Args;
use crate::core::error::AitermError;
use crate::core::history::DEFAULT_MAX_TURNS;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const SYSTEM_PROMPT: &str = "You are a specialized Linux terminal assistant.
Your sole purpose is to help users with shell commands, scripting, and other terminal-related tasks.
Do not engage in conversations outside of this scope.
Do not provide general knowledge, opinions, or creative content.
If the user asks for something unrelated to the Linux terminal, politely state that you can only assist with terminal-related queries.
When you suggest a shell command that the user can run directly in their terminal, please wrap it clearly like this:
<<CMD_START>>
the_command_here
<<CMD_END>>
Only provide one such command block per response if a command is relevant.
The command should be complete and executable as is.
If the command is multi-line, ensure all lines are within the tags and correctly formatted for direct execution (e.g., using backslashes for line continuation if necessary).
For other code snippets, configurations, or explanations, use standard markdown code blocks.";

/// Optional on-disk configuration. Every key may be omitted.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_turns: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub api_key_env: Option<String>,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join(".aiterm").join("config.yaml")
    }

    /// Loads `explicit` if given, otherwise the default path when it exists.
    /// The file is never created.
    pub fn load(explicit: Option<&Path>) -> Result<Config, AitermError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, AitermError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AitermError::Config(format!("Read {}: {}", path.display(), e)))?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yml::from_str::<Config>(&contents)
            .map_err(|e| AitermError::Config(format!("Parse {}: {}", path.display(), e)))
    }
}

/// Everything the session needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub model: String,
    pub base_url: String,
    pub max_turns: usize,
    pub timeout: Duration,
    pub system_prompt: String,
}

impl Settings {
    /// Flags win over the file, the file wins over built-in defaults.
    /// `env` looks up environment variables. A zero turn limit or timeout is
    /// rejected.
    pub fn resolve<F>(config: &Config, args: &Args, env: F) -> Result<Self, AitermError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key_env = config
            .api_key_env
            .clone()
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string());

        let max_turns = args
            .max_turns
            .or(config.max_turns)
            .unwrap_or(DEFAULT_MAX_TURNS);
        if max_turns == 0 {
            return Err(AitermError::Config(
                "max_turns must be at least 1".to_string(),
            ));
        }

        let timeout_secs = args
            .timeout
            .or(config.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AitermError::Config(
                "timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            api_key: env(&api_key_env),
            api_key_env,
            model: args
                .model
                .clone()
                .or_else(|| config.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: args
                .base_url
                .clone()
                .or_else(|| config.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_turns,
            timeout: Duration::from_secs(timeout_secs),
            system_prompt: SYSTEM_PROMPT.to_string(),
        })
    }

    /// Fails when the credential is missing, blank or still the placeholder.
    pub fn check_credential(&self) -> Result<(), AitermError> {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => Err(AitermError::Config(format!(
                "{} is not set.",
                self.api_key_env
            ))),
            Some(API_KEY_PLACEHOLDER) => Err(AitermError::Config(format!(
                "{} is still the placeholder value.",
                self.api_key_env
            ))),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::HistoryBuffer;
    use crate::providers::ChatTurn;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = Settings::resolve(&Config::default(), &Args::default(), no_env).unwrap();
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.max_turns, 10);
        assert_eq!(settings.timeout, Duration::from_secs(60));
        assert_eq!(settings.api_key_env, "OPENROUTER_API_KEY");
        assert!(settings.system_prompt.contains("<<CMD_START>>"));
        assert!(settings.system_prompt.contains("<<CMD_END>>"));
    }

    #[test]
    fn flags_override_file() {
        let config = Config {
            model: Some("file/model".into()),
            max_turns: Some(4),
            timeout_secs: Some(30),
            ..Config::default()
        };
        let args = Args {
            model: Some("flag/model".into()),
            ..Args::default()
        };
        let settings = Settings::resolve(&config, &args, no_env).unwrap();
        assert_eq!(settings.model, "flag/model");
        assert_eq!(settings.max_turns, 4);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn credential_is_read_from_configured_variable() {
        let config = Config {
            api_key_env: Some("MY_KEY".into()),
            ..Config::default()
        };
        let settings = Settings::resolve(&config, &Args::default(), |name| {
            (name == "MY_KEY").then(|| "sk-123".to_string())
        })
        .unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-123"));
        assert!(settings.check_credential().is_ok());
    }

    #[test]
    fn missing_blank_or_placeholder_credential_is_a_config_error() {
        for key in [None, Some("  "), Some(API_KEY_PLACEHOLDER)] {
            let settings = Settings::resolve(&Config::default(), &Args::default(), |_| {
                key.map(str::to_string)
            })
            .unwrap();
            assert!(matches!(
                settings.check_credential(),
                Err(AitermError::Config(_))
            ));
        }
    }

    #[test]
    fn zero_turn_limit_is_rejected_from_flag_or_file() {
        let args = Args {
            max_turns: Some(0),
            ..Args::default()
        };
        assert!(matches!(
            Settings::resolve(&Config::default(), &args, no_env),
            Err(AitermError::Config(_))
        ));

        let config = Config {
            max_turns: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            Settings::resolve(&config, &Args::default(), no_env),
            Err(AitermError::Config(_))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected_from_flag_or_file() {
        let args = Args {
            timeout: Some(0),
            ..Args::default()
        };
        assert!(matches!(
            Settings::resolve(&Config::default(), &args, no_env),
            Err(AitermError::Config(_))
        ));

        let config = Config {
            timeout_secs: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            Settings::resolve(&config, &Args::default(), no_env),
            Err(AitermError::Config(_))
        ));
    }

    #[test]
    fn smallest_turn_limit_still_sends_the_user_message() {
        let args = Args {
            max_turns: Some(1),
            ..Args::default()
        };
        let settings = Settings::resolve(&Config::default(), &args, no_env).unwrap();
        let mut history = HistoryBuffer::new(settings.system_prompt, settings.max_turns);
        history.append_user("list files").unwrap();
        history.trim();
        assert_eq!(history.turns().last(), Some(&ChatTurn::user("list files")));
    }

    #[test]
    fn loads_partial_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model: anthropic/claude\nmax_turns: 2").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.model.as_deref(), Some("anthropic/claude"));
        assert_eq!(config.max_turns, Some(2));
        assert!(config.base_url.is_none());
    }

    #[test]
    fn empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.model.is_none());
    }

    #[test]
    fn unparsable_or_missing_explicit_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_turns: [not, a, number]").unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(AitermError::Config(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(AitermError::Config(_))
        ));
    }
}
