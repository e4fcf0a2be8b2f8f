//! Display-name sanitization.

use crate::error::{Error, Result};

/// Replace filesystem-reserved characters in a display name with `_`.
///
/// Path traversal, path separators buried in a name, and null bytes are
/// rejected outright rather than sanitized: a listing serving such a name
/// is hostile input, not a styling problem.
pub fn sanitize_display_name(name: &str) -> Result<String> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "name is empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}
