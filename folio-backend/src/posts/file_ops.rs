//! File helpers for the posts directory
//!
//! Listing post sources and slugifying category names for URLs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Slugify a name for use in a URL (e.g. "Machine Learning!" -> "machine-learning")
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

/// List post files with the given extension (no dot), sorted by file name.
/// Hidden files and subdirectories are skipped.
pub fn list_post_files(posts_dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !posts_dir.exists() {
        return Ok(files);
    }

    for entry in fs::read_dir(posts_dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden || !path.is_file() {
            continue;
        }
        if path.extension().map(|e| e == extension).unwrap_or(false) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Machine Learning"), "machine-learning");
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("  multiple   spaces  "), "multiple-spaces");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify("already-slugified"), "already-slugified");
    }

    #[test]
    fn test_list_post_files() {
        let dir = tempdir().unwrap();
        let posts = dir.path();

        fs::write(posts.join("2020-01-01-a.markdown"), "x").unwrap();
        fs::write(posts.join("b.markdown"), "x").unwrap();
        fs::write(posts.join("notes.md"), "x").unwrap();
        fs::write(posts.join(".draft.markdown"), "x").unwrap();
        fs::create_dir(posts.join("drafts.markdown")).unwrap();

        let files = list_post_files(posts, "markdown").unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["2020-01-01-a.markdown", "b.markdown"]);
    }

    #[test]
    fn test_list_missing_dir() {
        let dir = tempdir().unwrap();
        let files = list_post_files(&dir.path().join("nope"), "markdown").unwrap();
        assert!(files.is_empty());
    }
}
