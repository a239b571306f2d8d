//! Single-line previews of user-supplied text (names, prompts, imported
//! documents) so a pasted multi-kilobyte JSON blob never floods the log.

use std::fmt::Write;

/// Default number of characters kept by [`preview`].
pub const PREVIEW_CHARS: usize = 120;

/// Escape control characters and cap the result at [`PREVIEW_CHARS`].
pub fn preview(s: &str) -> String {
    preview_with_limit(s, PREVIEW_CHARS)
}

/// Like [`preview`] with an explicit cap; the total character count is
/// appended when the text had to be cut.
pub fn preview_with_limit(s: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(s.len().min(max_chars) + 16);
    let mut total = 0usize;
    for ch in s.chars() {
        total += 1;
        if total > max_chars {
            continue;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    if total > max_chars {
        let _ = write!(&mut out, "… ({} chars)", total);
    }
    out
}
