//! Markdown rendering with GitHub Flavored Markdown extensions.
//!
//! Posts use tables, fenced code, footnotes and definition lists, and may
//! embed raw HTML (game iframes, images with attributes).

use comrak::{markdown_to_html, Options};
use regex::Regex;
use std::sync::LazyLock;

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<pre><code(.*?)</code></pre>").unwrap());
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static MD_EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_~`]").unwrap());

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Class of the `<div>` wrapped around code blocks; empty disables wrapping
    code_css_class: String,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new("highlight")
    }
}

impl MarkdownRenderer {
    pub fn new(code_css_class: &str) -> Self {
        Self {
            code_css_class: code_css_class.to_string(),
        }
    }

    fn configure(options: &mut Options) {
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        options.extension.footnotes = true;
        options.extension.description_lists = true;
        options.extension.header_ids = Some(String::new());
        options.render.unsafe_ = true;
    }

    /// Render a markdown body to HTML
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::default();
        Self::configure(&mut options);
        let html = markdown_to_html(markdown, &options);
        if self.code_css_class.is_empty() {
            return html;
        }
        let class = &self.code_css_class;
        CODE_BLOCK_RE
            .replace_all(&html, |caps: &regex::Captures| {
                format!(
                    "<div class=\"{}\"><pre><code{}</code></pre></div>",
                    class, &caps[1]
                )
            })
            .into_owned()
    }
}

/// Plain-text excerpt: first paragraph without markup, cut at `length` characters
pub fn excerpt(content: &str, length: usize) -> String {
    let text = HTML_TAG_RE.replace_all(content, "");
    let text = MD_LINK_RE.replace_all(&text, "$1");
    let text = MD_EMPHASIS_RE.replace_all(&text, "");

    let first = text
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#'))
        .unwrap_or("");
    let first = first.split_whitespace().collect::<Vec<_>>().join(" ");

    if first.chars().count() > length {
        let cut: String = first.chars().take(length).collect();
        format!("{}...", cut.trim_end())
    } else {
        first
    }
}
