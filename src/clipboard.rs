use crate::core::error::AitermError;
use arboard::Clipboard;

pub trait ClipboardService {
    fn copy(&self, text: &str) -> Result<(), AitermError>;
}

/// The desktop clipboard. A fresh handle is opened per copy so a missing
/// clipboard only fails the copy, never startup.
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), AitermError> {
        let mut clipboard = Clipboard::new().map_err(|e| AitermError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| AitermError::Clipboard(e.to_string()))
    }
}
