use std::sync::LazyLock;

use regex::Regex;

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("valid blank line regex"));

/// Convert an extracted HTML fragment to Markdown.
///
/// Links stay inline as `[text](href)` and text is never hard-wrapped.
/// Underscores are left unescaped so API names read as written.
pub fn html_to_markdown(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }
    let markdown = html2md::parse_html(fragment).replace("\\_", "_");
    collapse_blank_lines(&markdown).trim().to_owned()
}

/// Replace any run of two or more blank lines with a single blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    EXCESS_BLANK_LINES.replace_all(text, "\n\n").into_owned()
}
