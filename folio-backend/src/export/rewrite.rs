//! Root-relative link rewriting for copied HTML files.
//!
//! Hand-written pages in extra directories link with `/static/...`,
//! `/games/` or leftover `url_for(...)` calls. On a static host under an
//! arbitrary prefix those must become relative to the file's directory.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static URL_FOR_STATIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url_for\('static',\s*filename='([^']+)'\)").unwrap());
static URL_FOR_MAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url_for\('main\.([^']+)'\)").unwrap());
static BARE_STATIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(href|src)="static/"#).unwrap());
static ROOT_STATIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(href|src)="/static/"#).unwrap());
// First char excludes `//host` URLs
static ROOT_DIR_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="/([^"/][^"]*)/""#).unwrap());
static ROOT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="/""#).unwrap());

/// `../` repeated `depth` times, or `./` at the root
pub fn path_to_root(depth: usize) -> String {
    if depth == 0 {
        "./".to_string()
    } else {
        "../".repeat(depth)
    }
}

/// Directory depth of a file path relative to the output root
/// (`index.html` is 0, `games/snake/index.html` is 2)
pub fn depth_of(relative: &Path) -> usize {
    relative.parent().map(|p| p.components().count()).unwrap_or(0)
}

/// Rewrite root-relative links in `content` for a file `depth` directories deep
pub fn rewrite_html(content: &str, depth: usize) -> String {
    let root = path_to_root(depth);

    let out = URL_FOR_STATIC_RE.replace_all(content, format!("{}static/${{1}}", root).as_str());
    let out = URL_FOR_MAIN_RE.replace_all(&out, format!("{}${{1}}/", root).as_str());
    let out = BARE_STATIC_RE.replace_all(&out, format!("${{1}}=\"{}static/", root).as_str());
    let out = ROOT_STATIC_RE.replace_all(&out, format!("${{1}}=\"{}static/", root).as_str());
    let out = ROOT_DIR_LINK_RE.replace_all(&out, format!("href=\"{}${{1}}/\"", root).as_str());
    let out = ROOT_LINK_RE.replace_all(&out, format!("href=\"{}\"", root).as_str());
    out.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_root() {
        assert_eq!(path_to_root(0), "./");
        assert_eq!(path_to_root(2), "../../");
        assert_eq!(depth_of(Path::new("index.html")), 0);
        assert_eq!(depth_of(Path::new("games/snake/index.html")), 2);
    }

    #[test]
    fn test_rewrite_static_links() {
        let html = r#"<link href="/static/css/style.css"><script src="static/js/app.js"></script>"#;
        assert_eq!(
            rewrite_html(html, 1),
            r#"<link href="../static/css/style.css"><script src="../static/js/app.js"></script>"#
        );
        assert_eq!(
            rewrite_html(html, 0),
            r#"<link href="./static/css/style.css"><script src="./static/js/app.js"></script>"#
        );
    }

    #[test]
    fn test_rewrite_url_for_calls() {
        let html = r#"<img src="{{ url_for('static', filename='img/a.png') }}"> <a href="{{ url_for('main.games') }}">"#;
        assert_eq!(
            rewrite_html(html, 2),
            r#"<img src="{{ ../../static/img/a.png }}"> <a href="{{ ../../games/ }}">"#
        );
    }

    #[test]
    fn test_rewrite_navigation_links() {
        let html = r#"<a href="/games/">G</a><a href="/posts/hello/">P</a><a href="/">Home</a>"#;
        assert_eq!(
            rewrite_html(html, 1),
            r#"<a href="../games/">G</a><a href="../posts/hello/">P</a><a href="../">Home</a>"#
        );
    }

    #[test]
    fn test_external_links_untouched() {
        let html = r#"<a href="https://example.com/x/"></a><script src="//cdn.example.com/lib/"></script><a href="//cdn.example.com/a/">"#;
        assert_eq!(rewrite_html(html, 3), html);
    }

    #[test]
    fn test_already_relative_untouched() {
        let html = r#"<a href="../games/">G</a><img src="../static/a.png">"#;
        assert_eq!(rewrite_html(html, 1), html);
    }
}
