use std::path::PathBuf;
use url::Url;

/// Stem used when a title-based name slugifies to nothing
pub const DEFAULT_PAGE_NAME: &str = "index";

/// Stem used when a URL-based name slugifies to nothing
pub const DEFAULT_AGGREGATE_NAME: &str = "webpage";

/// Where one page's Markdown lands, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub folder: Option<String>,
    pub stem: String,
}

impl OutputLocation {
    /// Relative path of the `.md` file, e.g. `example-com/getting-started.md`
    pub fn relative_path(&self) -> PathBuf {
        let file_name = format!("{}.md", self.stem);
        match &self.folder {
            Some(folder) => PathBuf::from(folder).join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Same location with a numeric suffix on the stem, e.g. `guide-2`
    pub fn with_suffix(&self, n: usize) -> Self {
        Self {
            folder: self.folder.clone(),
            stem: format!("{}-{}", self.stem, n),
        }
    }
}

/// Lowercases and replaces runs of non-alphanumeric characters with a single dash
///
/// Only ASCII letters and digits survive, so the result is always safe as a
/// path component. Leading and trailing dashes are trimmed.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Folder + file name for per-page output
///
/// The stem comes from the title, or from the URL path when the title is
/// absent (or slugifies to `index`) and the page is not the site root.
pub fn title_location(url: &Url, title: Option<&str>) -> OutputLocation {
    let host = url.host_str().unwrap_or_default();
    let folder = non_empty_or(slugify(strip_www(host)), DEFAULT_PAGE_NAME);

    let mut stem = slugify(title.unwrap_or(DEFAULT_PAGE_NAME));
    if stem.is_empty() || stem == DEFAULT_PAGE_NAME {
        let segments = path_segments(url);
        stem = if segments.is_empty() {
            DEFAULT_PAGE_NAME.to_string()
        } else {
            slugify(&segments.join("-"))
        };
    }

    OutputLocation {
        folder: Some(folder),
        stem: non_empty_or(stem, DEFAULT_PAGE_NAME),
    }
}

/// Flat file name for aggregate output: host without `www.` and TLD, plus the first path segment
pub fn url_location(url: &Url) -> OutputLocation {
    let host = strip_www(url.host_str().unwrap_or_default());
    let host = match host.rsplit_once('.') {
        Some((name, _tld)) => name,
        None => host,
    };

    let mut raw = host.to_string();
    if let Some(first) = path_segments(url).first() {
        raw.push('-');
        raw.push_str(first);
    }

    OutputLocation {
        folder: None,
        stem: non_empty_or(slugify(&raw), DEFAULT_AGGREGATE_NAME),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World! 2024"), "hello-world-2024");
        assert_eq!(slugify("  --Already-Slugged--  "), "already-slugged");
        assert_eq!(slugify("C++ & Rust: a/b\\c"), "c-rust-a-b-c");
        assert_eq!(slugify("Ünïcödé"), "n-c-d");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_title_location_from_title() {
        let loc = title_location(
            &url("https://www.example.com/docs/start"),
            Some("Getting Started"),
        );
        assert_eq!(loc.folder.as_deref(), Some("example-com"));
        assert_eq!(loc.stem, "getting-started");
        assert_eq!(
            loc.relative_path(),
            PathBuf::from("example-com").join("getting-started.md")
        );
    }

    #[test]
    fn test_title_location_root_without_title() {
        let loc = title_location(&url("https://example.com/"), None);
        assert_eq!(loc.folder.as_deref(), Some("example-com"));
        assert_eq!(loc.stem, "index");
    }

    #[test]
    fn test_title_location_falls_back_to_path() {
        let loc = title_location(&url("https://example.com/docs/API_v2/"), None);
        assert_eq!(loc.stem, "docs-api-v2");

        // A page literally titled "Index" is named after its path too
        let loc = title_location(&url("https://example.com/blog/archive"), Some("Index"));
        assert_eq!(loc.stem, "blog-archive");

        // Unsluggable titles use the path
        let loc = title_location(&url("https://example.com/faq"), Some("???"));
        assert_eq!(loc.stem, "faq");
    }

    #[test]
    fn test_url_location() {
        assert_eq!(
            url_location(&url("https://www.example.com/docs/intro")).stem,
            "example-docs"
        );
        assert_eq!(url_location(&url("https://example.com/")).stem, "example");
        assert_eq!(
            url_location(&url("https://blog.example.co.uk/posts")).stem,
            "blog-example-co-posts"
        );
        assert_eq!(url_location(&url("http://localhost:8080/")).stem, "localhost");
        assert_eq!(
            url_location(&url("https://example.com/")).relative_path(),
            PathBuf::from("example.md")
        );
    }

    #[test]
    fn test_with_suffix() {
        let loc = title_location(&url("https://example.com/a"), Some("Guide"));
        assert_eq!(
            loc.with_suffix(2).relative_path(),
            PathBuf::from("example-com").join("guide-2.md")
        );
    }
}
