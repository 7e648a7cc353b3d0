use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static SPACE_AROUND_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").expect("valid newline pattern"));

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"));

/// Collapses every whitespace run, newlines included, into a single space
///
/// Leading and trailing whitespace is kept as one space so that adjacent
/// inline text (`Hello <b>world</b>`) keeps its word boundary.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Final cleanup of rendered Markdown
///
/// - Removes spaces and tabs touching a newline
/// - Collapses three or more newlines into exactly two
/// - Trims the result
pub fn tidy_markdown(text: &str) -> String {
    let without_padding = SPACE_AROUND_NEWLINE.replace_all(text, "\n");
    let collapsed = BLANK_LINE_RUN.replace_all(&without_padding, "\n\n");
    collapsed.trim().to_string()
}

/// Whitespace-normalized text of a title-like string, `None` when blank
pub fn clean_inline(text: &str) -> Option<String> {
    let cleaned = collapse_whitespace(text).trim().to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
