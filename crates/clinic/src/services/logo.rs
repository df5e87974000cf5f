//! Logo image.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Read the logo and encode it as a `data:` URI.
///
/// Returns `None` when the file is missing or unreadable; pages then show
/// "Image not loaded" in its place.
#[must_use]
pub fn load_logo(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(format!(
            "data:{};base64,{}",
            mime_for(path),
            STANDARD.encode(bytes)
        )),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Logo not loaded");
            None
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}
