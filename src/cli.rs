use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Chat with an AI terminal assistant and run the commands it suggests", long_about = None)]
pub struct Args {
    /// Model to use (OpenRouter model id)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Number of user/assistant exchanges kept in the conversation
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Completion request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Path to a YAML config file [default: ~/.aiterm/config.yaml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
