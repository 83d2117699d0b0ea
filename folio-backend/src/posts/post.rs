use chrono::NaiveDate;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::error::PostError;
use super::file_ops::slugify;
use super::frontmatter::{self, split_dated_stem};
use super::markdown::{self, MarkdownRenderer};

/// A blog post: front matter metadata plus raw and rendered body
#[derive(Debug, Clone)]
pub struct Post {
    /// URL identifier: the file stem without its `YYYY-MM-DD-` prefix
    pub slug: String,
    pub source_path: PathBuf,
    pub title: String,
    pub date: NaiveDate,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    /// Raw markdown body
    pub content: String,
    pub html_content: String,
    /// Front matter keys without a dedicated field
    pub extra: BTreeMap<String, Value>,
}

impl Post {
    /// Read and parse a post file, rendering its body with `renderer`
    pub fn from_file(path: &Path, renderer: &MarkdownRenderer) -> Result<Post, PostError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                PostError::NotFound(path.to_path_buf())
            } else {
                PostError::Content {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut post = Self::parse(&stem, &content, renderer)?;
        post.source_path = path.to_path_buf();
        Ok(post)
    }

    /// Parse post source text. `stem` is the file name without extension.
    pub fn parse(stem: &str, content: &str, renderer: &MarkdownRenderer) -> Result<Post, PostError> {
        let (stem_date, slug) = split_dated_stem(stem);

        let (yaml, body) = frontmatter::split_frontmatter(content)
            .ok_or_else(|| PostError::metadata(&slug, "No YAML front matter found"))?;

        let fm = frontmatter::parse_frontmatter(&yaml).map_err(|source| PostError::Yaml {
            slug: slug.clone(),
            source,
        })?;

        let title = fm
            .clean_title()
            .ok_or_else(|| PostError::metadata(&slug, "Missing title"))?;

        let date = match fm.date.as_deref() {
            Some(raw) => fm.parsed_date().ok_or_else(|| {
                PostError::metadata(&slug, format!("Invalid date format: {}", raw))
            })?,
            None => stem_date.ok_or_else(|| PostError::metadata(&slug, "Missing date"))?,
        };

        let html_content = renderer.render(&body);
        if html_content.trim().is_empty() && !body.trim().is_empty() {
            return Err(PostError::Render {
                slug,
                message: "renderer produced no output".to_string(),
            });
        }

        Ok(Post {
            slug,
            source_path: PathBuf::new(),
            title,
            date,
            categories: fm.categories,
            tags: fm.tags,
            description: fm.description,
            content: body,
            html_content,
            extra: fm.extra,
        })
    }

    /// Site-relative URL of the post page
    pub fn url(&self) -> String {
        format!("posts/{}/", self.slug)
    }

    pub fn formatted_date(&self, format: &str) -> String {
        self.date.format(format).to_string()
    }

    /// `description` from the front matter, otherwise the first paragraph
    pub fn excerpt(&self, length: usize) -> String {
        match &self.description {
            Some(description) if !description.trim().is_empty() => description.trim().to_string(),
            _ => markdown::excerpt(&self.content, length),
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        let wanted = slugify(category);
        self.categories.iter().any(|c| slugify(c) == wanted)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = slugify(tag);
        self.tags.iter().any(|t| slugify(t) == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "---\ntitle: \"Building a Snake Game\"\ndate: 2023-05-14\ncategories: [games, javascript]\ntags: [canvas]\n---\n\nI built *snake*.\n\nMore text.\n";

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("2023-05-14-snake-game.markdown");
        fs::write(&path, SAMPLE).unwrap();

        let post = Post::from_file(&path, &MarkdownRenderer::default()).unwrap();
        assert_eq!(post.slug, "snake-game");
        assert_eq!(post.title, "Building a Snake Game");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2023, 5, 14).unwrap());
        assert_eq!(post.categories, vec!["games", "javascript"]);
        assert_eq!(post.tags, vec!["canvas"]);
        assert!(post.html_content.contains("<em>snake</em>"));
        assert_eq!(post.url(), "posts/snake-game/");
        assert_eq!(post.formatted_date("%B %d, %Y"), "May 14, 2023");
        assert_eq!(post.excerpt(200), "I built snake.");
        assert_eq!(post.source_path, path);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = Post::from_file(&dir.path().join("gone.markdown"), &MarkdownRenderer::default())
            .unwrap_err();
        assert!(matches!(err, PostError::NotFound(_)));
    }

    #[test]
    fn test_no_frontmatter() {
        let err = Post::parse("plain", "# Hello\n", &MarkdownRenderer::default()).unwrap_err();
        assert_eq!(err.kind(), "metadata");
        assert!(err.to_string().contains("No YAML front matter"));
    }

    #[test]
    fn test_missing_title() {
        let err = Post::parse("x", "---\ndate: 2020-01-01\n---\nbody", &MarkdownRenderer::default())
            .unwrap_err();
        assert!(err.to_string().contains("Missing title in x"));
    }

    #[test]
    fn test_date_from_file_name() {
        let post = Post::parse(
            "2017-08-09-old-post",
            "---\ntitle: Old\n---\nbody",
            &MarkdownRenderer::default(),
        )
        .unwrap();
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2017, 8, 9).unwrap());
        assert_eq!(post.slug, "old-post");
    }

    #[test]
    fn test_missing_and_invalid_date() {
        let renderer = MarkdownRenderer::default();
        let err = Post::parse("undated", "---\ntitle: T\n---\nbody", &renderer).unwrap_err();
        assert!(err.to_string().contains("Missing date"));

        let err = Post::parse("bad", "---\ntitle: T\ndate: yesterday\n---\nbody", &renderer)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid date format: yesterday"));
    }

    #[test]
    fn test_yaml_error() {
        let err = Post::parse("broken", "---\ntitle: [oops\n---\nbody", &MarkdownRenderer::default())
            .unwrap_err();
        assert_eq!(err.kind(), "yaml");
    }

    #[test]
    fn test_description_and_category_matching() {
        let post = Post::parse(
            "p",
            "---\ntitle: T\ndate: 2020-02-02\ndescription: Short summary\ncategories: Machine Learning, Data\n---\nLong body",
            &MarkdownRenderer::default(),
        )
        .unwrap();
        assert_eq!(post.excerpt(5), "Short summary");
        assert!(post.in_category("machine-learning"));
        assert!(post.in_category("Machine Learning"));
        assert!(!post.in_category("machine"));
    }
}
