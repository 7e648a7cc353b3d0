use crate::filter::{UrlFilter, UrlFilterConfig};
use crate::parsers::links::{extract_links, resolve_href};
use scraper::Html;
use url::Url;

fn links_for(base: &str, body: &str) -> Vec<String> {
    let base = Url::parse(base).unwrap();
    let filter = UrlFilter::new(UrlFilterConfig::for_base(&base)).unwrap();
    let doc = Html::parse_document(&format!("<html><body>{body}</body></html>"));
    extract_links(&doc, &base, &filter)
}

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[test]
    fn test_resolve_forms() {
        let base = Url::parse("https://example.com:8443/a/b").unwrap();

        assert_eq!(
            resolve_href("https://example.com/x", &base).unwrap().as_str(),
            "https://example.com/x"
        );
        assert_eq!(
            resolve_href("//cdn.example.com/y", &base).unwrap().as_str(),
            "https://cdn.example.com/y"
        );
        assert_eq!(
            resolve_href("/root", &base).unwrap().as_str(),
            "https://example.com:8443/root"
        );
        assert_eq!(
            resolve_href("sibling", &base).unwrap().as_str(),
            "https://example.com:8443/a/sibling"
        );
        assert_eq!(
            resolve_href("../up?q=1", &base).unwrap().as_str(),
            "https://example.com:8443/up?q=1"
        );
    }

    #[test]
    fn test_resolve_failure() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(resolve_href("http://[::1", &base).is_err());
        assert!(resolve_href("httpfoo", &base).is_err());
    }
}

#[cfg(test)]
mod extraction_tests {
    use super::*;

    #[test]
    fn test_absolute_path_href() {
        let links = links_for("https://example.com/a/", r#"<a href="/b">B</a>"#);
        assert_eq!(links, vec!["https://example.com/b".to_string()]);
    }

    #[test]
    fn test_fragment_href() {
        let links = links_for("https://example.com/a/", r##"<a href="#top">Top</a>"##);
        assert!(links.is_empty());
    }

    #[test]
    fn test_other_host() {
        let links = links_for("https://example.com/a/", r#"<a href="https://other.com/x">X</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_asset_href() {
        let links = links_for("https://example.com/a/", r#"<a href="photo.png">Photo</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_relative_href() {
        let links = links_for("https://example.com/a/", r#"<a href="c/d">D</a>"#);
        assert_eq!(links, vec!["https://example.com/a/c/d".to_string()]);
    }

    #[test]
    fn test_protocol_relative_same_host() {
        let links = links_for("http://example.com/", r#"<a href="//example.com/e">E</a>"#);
        assert_eq!(links, vec!["http://example.com/e".to_string()]);
    }

    #[test]
    fn test_mixed_page() {
        let body = r#"
            <a href="/docs">Docs</a>
            <a href="/docs#intro">Docs again</a>
            <a href="https://example.com/docs">Docs absolute</a>
            <a href="mailto:hi@example.com">Mail</a>
            <a href="tel:123">Call</a>
            <a href="javascript:void(0)">Nothing</a>
            <a href="">Empty</a>
            <a>No href</a>
            <a href="/_next/static/chunk">Chunk</a>
            <a href="/static/guide">Static</a>
            <a href="/style.CSS">Style</a>
            <a href="https://www.example.com/pricing">Other host</a>
            <a href="http://[::1">Broken</a>
            <a href=" /blog ">Blog</a>
        "#;
        let links = links_for("https://example.com/", body);

        assert_eq!(
            links,
            vec![
                "https://example.com/docs".to_string(),
                "https://example.com/blog".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_anchors_are_returned_once() {
        let links = links_for(
            "https://example.com/",
            r#"<a href="/same">1</a><a href="/same">2</a><a href="same">3</a>"#,
        );
        assert_eq!(links, vec!["https://example.com/same".to_string()]);
    }
}
