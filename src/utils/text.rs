use html_escape::decode_html_entities;

/// Normalizes a scraped text fragment: entities decoded, every whitespace run
/// (including `\r`, `\t`, `\n` and non-breaking spaces) collapsed to a single
/// space, ends trimmed.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = decode_html_entities(text);
    let mut out = String::with_capacity(decoded.len());
    let mut pending_space = false;
    for ch in decoded.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Replaces line breaks with spaces and trims, leaving other spacing alone.
pub fn join_lines(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}
