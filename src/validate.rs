//! URL input validation
//!
//! Turns whatever the user typed into an absolute URL before either scan
//! pipeline runs.

use crate::error::{Result, ScanError};

/// Normalize raw user input into an absolute URL.
///
/// Bare hosts get an `https://` prefix; an explicit `http://` or `https://`
/// is kept as typed. The returned string is the trimmed input (plus prefix),
/// not the re-serialized URL, so `example.com` stays `https://example.com`.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::EmptyInput);
    }

    let formatted = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match url::Url::parse(&formatted) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(formatted),
        Ok(_) => Err(ScanError::MalformedUrl(formatted)),
        Err(e) => Err(ScanError::MalformedUrl(format!("{} ({})", formatted, e))),
    }
}

fn has_http_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
