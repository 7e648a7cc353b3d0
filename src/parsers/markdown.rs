//! Converts a rendered DOM into Markdown.
//!
//! Only a fixed set of tags gets Markdown structure: paragraphs, line breaks,
//! `h1`-`h4`, list items, code blocks and divs. Every other element passes
//! its inner text through unchanged, and `script`/`style` subtrees are
//! dropped entirely.

use crate::parsers::text;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// Tags whose subtree never contributes text
const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// Converts a whole HTML document, starting from its `<body>`
pub fn html_to_markdown(html: &str) -> String {
    let doc = Html::parse_document(html);
    document_to_markdown(&doc)
}

/// Converts an already parsed document, starting from its `<body>`
///
/// Falls back to the root element when the document has no body.
pub fn document_to_markdown(doc: &Html) -> String {
    match doc.select(&BODY).next() {
        Some(body) => extract(body),
        None => extract(doc.root_element()),
    }
}

/// Renders the children of `root` as Markdown
pub fn extract(root: ElementRef<'_>) -> String {
    let rendered = render_tree(root);
    text::tidy_markdown(&rendered)
}

/// A direct child of an element that can contribute output
enum Piece<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
}

/// An element whose children are still being rendered
struct Frame<'a> {
    /// `None` for the root, which is rendered without wrapping
    tag: Option<&'a str>,
    pieces: std::vec::IntoIter<Piece<'a>>,
    out: String,
}

impl<'a> Frame<'a> {
    fn new(element: ElementRef<'a>, tag: Option<&'a str>) -> Self {
        let pieces: Vec<Piece<'a>> = element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(t) => Some(Piece::Text(&**t)),
                Node::Element(_) => ElementRef::wrap(child).map(Piece::Element),
                // Comments, doctypes and processing instructions
                _ => None,
            })
            .collect();

        Self {
            tag,
            pieces: pieces.into_iter(),
            out: String::new(),
        }
    }
}

/// Walks the subtree under `root` in document order with an explicit stack,
/// so nesting depth is bounded by the heap rather than the call stack
fn render_tree(root: ElementRef<'_>) -> String {
    let mut stack = vec![Frame::new(root, None)];

    loop {
        let Some(frame) = stack.last_mut() else {
            return String::new();
        };

        match frame.pieces.next() {
            Some(Piece::Text(t)) => frame.out.push_str(&text::collapse_whitespace(t)),
            Some(Piece::Element(element)) => {
                let tag = element.value().name();
                if SKIPPED_TAGS.contains(&tag) {
                    continue;
                }
                if tag == "br" {
                    frame.out.push('\n');
                    continue;
                }
                stack.push(Frame::new(element, Some(tag)));
            }
            None => {
                let Some(done) = stack.pop() else {
                    return String::new();
                };
                let rendered = match done.tag {
                    Some(tag) => wrap(tag, done.out),
                    None => done.out,
                };
                match stack.last_mut() {
                    Some(parent) => parent.out.push_str(&rendered),
                    None => return rendered,
                }
            }
        }
    }
}

/// Applies the tag's Markdown structure around its rendered children
fn wrap(tag: &str, inner: String) -> String {
    match tag {
        "p" => format!("\n\n{inner}\n\n"),
        "h1" | "h2" | "h3" | "h4" => {
            let level = heading_level(tag);
            format!("\n\n{} {inner}\n\n", "#".repeat(level))
        }
        "li" => format!("\n- {inner}"),
        "pre" | "code" => format!("\n```\n{inner}\n```\n"),
        "div" => format!("\n{inner}\n"),
        _ => inner,
    }
}

fn heading_level(tag: &str) -> usize {
    tag[1..].parse().unwrap_or(1)
}
