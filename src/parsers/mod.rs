pub mod html;
pub mod links;
pub mod markdown;
pub mod text;

#[cfg(test)]
mod tests;

/// Result of parsing one rendered page
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Title from `h1`, `<title>` or `og:title`
    pub title: Option<String>,
    /// Markdown rendering of the body
    pub content: String,
    /// Absolute in-scope links, deduplicated
    pub links: Vec<String>,
}

impl ParseResult {
    /// Creates a new parse result with the given title, content and links
    pub fn new(title: Option<String>, content: String, links: Vec<String>) -> Self {
        Self {
            title,
            content,
            links,
        }
    }
}
