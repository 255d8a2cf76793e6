use crate::core::error::{LauncherError, LauncherResult};

/// Somewhere to put a copied link.
pub trait ClipboardSink: Send {
    fn copy_text(&mut self, text: &str) -> LauncherResult<()>;
}

/// The desktop clipboard. A fresh handle per copy keeps this `Send`.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> LauncherResult<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| LauncherError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| LauncherError::Clipboard(e.to_string()))
    }
}
