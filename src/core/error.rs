use thiserror::Error;

/// Unified error type for the terminal assistant
#[derive(Error, Debug)]
pub enum AitermError {
    /// Missing or placeholder credential, unreadable config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// The completion endpoint could not be reached
    #[error("Request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status
    #[error("HTTP error {status}")]
    Http { status: u16, body: String },

    /// Success status but the expected fields are missing or empty
    #[error("Malformed API response: {message}")]
    MalformedResponse { message: String, raw: String },

    /// The response body is not valid JSON
    #[error("Failed to decode JSON response: {message}")]
    Decode { message: String, raw: String },

    #[error("Could not copy to clipboard: {0}")]
    Clipboard(String),

    /// The shell itself could not be started
    #[error("Failed to run command: {0}")]
    Execution(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    #[error("Refusing to append an empty user message")]
    EmptyInput,

    #[error("History holds only the system prompt")]
    EmptyHistory,

    /// The request could not even be built
    #[error("An unexpected error occurred: {0}")]
    Unknown(String),
}

impl AitermError {
    /// Raw server text worth showing next to the error message, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            AitermError::Http { body, .. } => Some(body.as_str()),
            AitermError::MalformedResponse { raw, .. } | AitermError::Decode { raw, .. } => {
                Some(raw.as_str())
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AitermError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AitermError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AitermError::Transport(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            AitermError::Unknown(format!("Invalid request: {}", err))
        } else if let Some(status) = err.status() {
            AitermError::Http {
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            AitermError::Transport(err.to_string())
        }
    }
}
