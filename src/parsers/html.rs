use crate::filter::UrlFilter;
use crate::parsers::{ParseResult, links, markdown, text};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:title"]"#).expect("valid og:title selector")
});

/// Parses rendered HTML once and extracts Markdown, title and in-scope links
pub fn parse(html: &str, base_url: &Url, filter: &UrlFilter) -> ParseResult {
    let doc = Html::parse_document(html);

    let content = markdown::document_to_markdown(&doc);
    let title = extract_title(&doc);
    let links = links::extract_links(&doc, base_url, filter);

    ::log::debug!(
        "HTML parser produced {} chars of markdown and {} links for {}",
        content.len(),
        links.len(),
        base_url
    );

    ParseResult::new(title, content, links)
}

/// Page title: first non-empty `h1`, then `<title>`, then `og:title`
pub fn extract_title(doc: &Html) -> Option<String> {
    let from_h1 = doc
        .select(&H1)
        .find_map(|h1| text::clean_inline(&h1.text().collect::<String>()));
    if from_h1.is_some() {
        return from_h1;
    }

    let from_title = doc
        .select(&TITLE)
        .next()
        .and_then(|t| text::clean_inline(&t.text().collect::<String>()));
    if from_title.is_some() {
        return from_title;
    }

    doc.select(&OG_TITLE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(text::clean_inline)
}
