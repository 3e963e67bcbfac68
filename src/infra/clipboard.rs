//! Clipboard seam for the AI-formatted export.

use crate::domain::ExportError;

/// Write-only clipboard surface.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// The system clipboard via `arboard`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| ExportError::ClipboardUnavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ExportError::ClipboardWrite(e.to_string()))
    }
}

/// In-memory sink for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
