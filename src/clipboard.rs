use crate::error::{MetricsError, Result};

/// Write `text` to the system clipboard.
///
/// The failure is reported to the caller rather than swallowed; the UI shows
/// it as a transient notice, never as a search error.
pub fn copy_text(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| MetricsError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| MetricsError::Clipboard(e.to_string()))
}
