//! Escaping for user-facing text.

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escape text for a paragraph body, turning newlines into `<br>` markers.
///
/// The result never contains a line feed, so it stays on one rendered line.
pub fn escape_text(s: &str) -> String {
    let normalized = s.replace("\r\n", "\n");
    escape_html(&normalized).replace('\n', "<br>")
}
