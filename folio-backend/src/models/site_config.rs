//! Site configuration model backed by a RON file.
//!
//! Holds the site identity, post listing options, static asset settings,
//! the game/project/app listings and the static export settings.  Loaded
//! from `config/site.ron`; every section is optional and falls back to
//! its defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Top-level site configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub posts: PostsConfig,
    pub static_files: StaticConfig,
    pub games: Vec<GameEntry>,
    pub projects: Vec<ListingEntry>,
    pub apps: Vec<ListingEntry>,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    /// Markdown shown on the about page.
    pub about: String,
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    /// Font Awesome icon name, e.g. "github".
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    /// File extension of post sources, without the dot.
    pub extension: String,
    pub per_page: usize,
    /// chrono format used when displaying post dates.
    pub date_format: String,
    /// Number of posts listed on the home page.
    pub home_recent: usize,
    pub excerpt_length: usize,
    /// CSS class wrapped around fenced code blocks.
    pub code_css_class: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    pub cache_timeout: u64,
    /// Stylesheets relative to the static dir, linked from every page.
    pub stylesheets: Vec<String>,
}

/// A browser game served at `/{slug}/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEntry {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Script relative to the static dir; defaults to `js/{slug}.js`.
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub stylesheet: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl GameEntry {
    pub fn script_path(&self) -> String {
        self.script
            .clone()
            .unwrap_or_else(|| format!("js/{}.js", self.slug))
    }
}

/// A project or app card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Absolute URL the exported site is published under. `404.html` links
    /// through it; root-absolute links are used when empty.
    pub base_url: String,
    /// Glob patterns skipped when copying assets.
    pub ignore: Vec<String>,
    /// Directories under the content dir copied verbatim into the output.
    pub extra_dirs: Vec<String>,
    pub copy_cname: bool,
    pub branch: String,
    pub remote: String,
    pub commit_message: String,
    /// Committer identity for the deploy commit; git's own config when unset.
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: "A blog about things".to_string(),
            author: "Author Name".to_string(),
            url: "http://localhost:5000".to_string(),
            about: String::new(),
            social: Vec::new(),
        }
    }
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            extension: "markdown".to_string(),
            per_page: 10,
            date_format: "%B %d, %Y".to_string(),
            home_recent: 5,
            excerpt_length: 200,
            code_css_class: "highlight".to_string(),
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            cache_timeout: 3600,
            stylesheets: vec![
                "css/style.css".to_string(),
                "css/navigation.css".to_string(),
                "css/syntax.css".to_string(),
            ],
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            ignore: vec![
                "*.pyc".to_string(),
                "*.pyo".to_string(),
                "__pycache__".to_string(),
                ".*".to_string(),
            ],
            extra_dirs: Vec::new(),
            copy_cname: true,
            branch: "gh-pages".to_string(),
            remote: "origin".to_string(),
            commit_message: "Deploy to GitHub Pages".to_string(),
            author_name: None,
            author_email: None,
        }
    }
}

impl SiteConfig {
    /// Load from `path`. A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} not found, using default site config", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str::<SiteConfig>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn game(&self, slug: &str) -> Option<&GameEntry> {
        self.games.iter().find(|g| g.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = SiteConfig::load(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(config.posts.per_page, 10);
        assert_eq!(config.posts.extension, "markdown");
        assert_eq!(config.static_files.cache_timeout, 3600);
        assert_eq!(config.export.branch, "gh-pages");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.ron");
        std::fs::write(
            &path,
            r#"(
                site: (title: "Field Notes", author: "R. Quill"),
                games: [(slug: "snake", title: "Snake Game")],
            )"#,
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.site.title, "Field Notes");
        assert_eq!(config.site.description, "A blog about things");
        assert_eq!(config.posts.date_format, "%B %d, %Y");
        let snake = config.game("snake").unwrap();
        assert_eq!(snake.script_path(), "js/snake.js");
        assert!(config.game("tetris").is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.ron");
        std::fs::write(&path, "(site: (title: ").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("site.ron"));
    }

    #[test]
    fn test_sample_config_links_resolve() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
        let config = SiteConfig::load(&root.join("config").join("site.ron")).unwrap();
        let static_dir = root.join("app").join("static");

        assert!(!config.games.is_empty());
        for game in &config.games {
            let script = static_dir.join(game.script_path());
            assert!(script.is_file(), "missing {}", script.display());
        }
        for stylesheet in &config.static_files.stylesheets {
            assert!(static_dir.join(stylesheet).is_file(), "missing {}", stylesheet);
        }
        for dir in &config.export.extra_dirs {
            assert!(root.join("app").join(dir).is_dir(), "missing {}", dir);
        }
        for entry in config.projects.iter().chain(&config.apps) {
            let url = entry.url.as_deref().unwrap_or_default();
            assert!(url.is_empty() || url.starts_with("https://"), "dead link {}", url);
        }
    }
}
