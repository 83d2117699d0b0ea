//! Static site build
//!
//! Renders every page of the site into `<route>/index.html` under the output
//! directory with relative links, copies the static assets and any extra
//! directories, and reports what happened. Per-file failures are logged and
//! collected in the [`BuildReport`]; only an unusable output directory
//! aborts the build.

use glob::Pattern;
use maud::Markup;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::ExportError;
use super::rewrite::{depth_of, rewrite_html};
use crate::config::Config;
use crate::models::SiteConfig;
use crate::posts::{paginate, MarkdownRenderer, Post, PostIndex};
use crate::render::pages::{self, WritingsView};
use crate::render::{Links, PageContext};

/// Outcome of a build
#[derive(Debug, Default)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Output paths of rendered pages, relative to `output_dir`
    pub pages: Vec<String>,
    pub assets_copied: usize,
    pub posts_skipped: usize,
    pub failures: Vec<String>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, message: String) {
        log::error!("[EXPORT] {}", message);
        self.failures.push(message);
    }
}

pub struct SiteBuilder<'a> {
    config: &'a Config,
    site: &'a SiteConfig,
    output_dir: PathBuf,
    ignore: Vec<Pattern>,
}

impl<'a> SiteBuilder<'a> {
    pub fn new(config: &'a Config, site: &'a SiteConfig) -> Self {
        let ignore = site
            .export
            .ignore
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("[EXPORT] Ignoring bad ignore pattern {:?}: {}", raw, e);
                    None
                }
            })
            .collect();

        Self {
            config,
            site,
            output_dir: config.output_dir.clone(),
            ignore,
        }
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// True when any component of `relative` matches an ignore glob
    pub fn is_ignored(&self, relative: &Path) -> bool {
        relative.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            self.ignore.iter().any(|p| p.matches(&name))
        })
    }

    pub fn build(&self) -> Result<BuildReport, ExportError> {
        log::info!("[EXPORT] Building site into {}", self.output_dir.display());
        self.clean_output()?;

        let mut report = BuildReport {
            output_dir: self.output_dir.clone(),
            ..Default::default()
        };

        self.copy_static(&mut report);

        let renderer = MarkdownRenderer::new(&self.site.posts.code_css_class);
        let index = PostIndex::load(&self.config.posts_dir, &self.site.posts.extension, &renderer);
        report.posts_skipped = index.skipped().len();

        self.render_pages(&index, &renderer, &mut report);
        self.render_posts(&index, &mut report);
        self.copy_extra_dirs(&mut report);
        self.copy_cname(&mut report);

        log::info!(
            "[EXPORT] Done: {} pages, {} assets, {} failures",
            report.pages.len(),
            report.assets_copied,
            report.failures.len()
        );
        Ok(report)
    }

    /// Fails when wiping the output directory would take site sources with it
    fn check_output_dir(&self) -> Result<(), ExportError> {
        let Ok(output) = self.output_dir.canonicalize() else {
            return Ok(());
        };
        let cwd = std::env::current_dir().map_err(|e| ExportError::io(Path::new("."), e))?;
        let sources = [
            &self.config.content_dir,
            &self.config.posts_dir,
            &self.config.static_dir,
            &cwd,
        ];
        for source in sources {
            let Ok(protected) = source.canonicalize() else {
                continue;
            };
            // Inside static/ the copy would also walk into its own output
            if protected.starts_with(&output)
                || (source == &self.config.static_dir && output.starts_with(&protected))
            {
                return Err(ExportError::UnsafeOutput { output, protected });
            }
        }
        Ok(())
    }

    fn clean_output(&self) -> Result<(), ExportError> {
        self.check_output_dir()?;
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir).map_err(|e| ExportError::io(&self.output_dir, e))?;
        }
        fs::create_dir_all(&self.output_dir).map_err(|e| ExportError::io(&self.output_dir, e))
    }

    fn copy_static(&self, report: &mut BuildReport) {
        let source = &self.config.static_dir;
        if !source.is_dir() {
            log::warn!("[EXPORT] No static directory at {}", source.display());
            return;
        }
        let target = self.output_dir.join("static");
        for relative in self.walk_files(source, report) {
            match copy_file(&source.join(&relative), &target.join(&relative)) {
                Ok(()) => report.assets_copied += 1,
                Err(e) => report.fail(e.to_string()),
            }
        }
    }

    /// Files under `root` relative to it, skipping ignored names
    fn walk_files(&self, root: &Path, report: &mut BuildReport) -> Vec<PathBuf> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(root)
                    .map(|rel| !self.is_ignored(rel))
                    .unwrap_or(true)
            });
        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if let Ok(rel) = entry.path().strip_prefix(root) {
                        files.push(rel.to_path_buf());
                    }
                }
                Ok(_) => {}
                Err(e) => report.fail(format!("walking {}: {}", root.display(), e)),
            }
        }
        files
    }

    fn write_page(&self, relative: &str, markup: Markup, report: &mut BuildReport) {
        let path = self.output_dir.join(relative);
        let result = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|_| fs::write(&path, markup.into_string()));
        match result {
            Ok(()) => {
                log::debug!("[EXPORT] Wrote {}", relative);
                report.pages.push(relative.to_string());
            }
            Err(e) => report.fail(ExportError::io(&path, e).to_string()),
        }
    }

    fn context(&self, output_path: &str) -> PageContext<'a> {
        PageContext::new(self.site, Links::for_output_path(output_path))
    }

    fn render_pages(&self, index: &PostIndex, renderer: &MarkdownRenderer, report: &mut BuildReport) {
        let about_html = if self.site.site.about.trim().is_empty() {
            String::new()
        } else {
            renderer.render(&self.site.site.about)
        };

        let recent: Vec<&Post> = index.all().iter().take(self.site.posts.home_recent).collect();
        self.write_page(
            "index.html",
            pages::home(&self.context("index.html"), &about_html, &recent),
            report,
        );
        self.write_page(
            "about/index.html",
            pages::about(&self.context("about/index.html"), &about_html),
            report,
        );

        // Query strings do not survive a static host: one page, category pages for filtering
        let all: Vec<&Post> = index.all().iter().collect();
        let categories = index.categories();
        let view = WritingsView {
            page: paginate(&all, 1, 0),
            categories: &categories,
            selected: None,
            tag: None,
        };
        self.write_page(
            "writings/index.html",
            pages::writings(&self.context("writings/index.html"), &view),
            report,
        );

        for category in &categories {
            let out = format!("categories/{}/index.html", category.slug);
            let posts = index.by_category(&category.slug);
            let markup = pages::category(&self.context(&out), &category.name, &posts);
            self.write_page(&out, markup, report);
        }

        for tag in index.tags() {
            let out = format!("tags/{}/index.html", tag.slug);
            let posts = index.by_tag(&tag.slug);
            let markup = pages::tag(&self.context(&out), &tag.name, &posts);
            self.write_page(&out, markup, report);
        }

        self.write_page("games/index.html", pages::games(&self.context("games/index.html")), report);
        self.write_page(
            "projects/index.html",
            pages::projects(&self.context("projects/index.html")),
            report,
        );
        self.write_page("apps/index.html", pages::apps(&self.context("apps/index.html")), report);

        for game in &self.site.games {
            let out = format!("{}/index.html", game.slug);
            self.write_page(&out, pages::game(&self.context(&out), game), report);
        }

        // Served for any missing path, so links cannot be relative
        let base_url = self.site.export.base_url.trim();
        let not_found_links = if base_url.is_empty() {
            Links::absolute()
        } else {
            Links::base(base_url)
        };
        let not_found = pages::error(
            &PageContext::new(self.site, not_found_links),
            "Page Not Found",
            "The page you were looking for does not exist.",
        );
        self.write_page("404.html", not_found, report);
    }

    fn render_posts(&self, index: &PostIndex, report: &mut BuildReport) {
        for post in index.all() {
            let out = format!("{}index.html", post.url());
            let markup = pages::post(
                &self.context(&out),
                post,
                index.next(&post.slug),
                index.prev(&post.slug),
            );
            self.write_page(&out, markup, report);
        }
    }

    fn copy_extra_dirs(&self, report: &mut BuildReport) {
        for dir in &self.site.export.extra_dirs {
            let source = self.config.content_dir.join(dir);
            if !source.is_dir() {
                report.fail(format!("extra directory {} does not exist", source.display()));
                continue;
            }
            let target = self.output_dir.join(dir);
            for relative in self.walk_files(&source, report) {
                let from = source.join(&relative);
                let to = target.join(&relative);
                let is_html = relative.extension().is_some_and(|e| e == "html");
                let result = if is_html {
                    let depth = to
                        .strip_prefix(&self.output_dir)
                        .map(depth_of)
                        .unwrap_or(0);
                    rewrite_file(&from, &to, depth)
                } else {
                    copy_file(&from, &to)
                };
                match result {
                    Ok(()) => report.assets_copied += 1,
                    Err(e) => report.fail(e.to_string()),
                }
            }
        }
    }

    fn copy_cname(&self, report: &mut BuildReport) {
        if !self.site.export.copy_cname {
            return;
        }
        let cname = self.config.content_dir.join("CNAME");
        if cname.is_file() {
            match copy_file(&cname, &self.output_dir.join("CNAME")) {
                Ok(()) => log::info!("[EXPORT] Copied CNAME"),
                Err(e) => report.fail(e.to_string()),
            }
        }
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<(), ExportError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    fs::copy(from, to).map_err(|e| ExportError::io(from, e))?;
    Ok(())
}

fn rewrite_file(from: &Path, to: &Path, depth: usize) -> Result<(), ExportError> {
    let content = fs::read_to_string(from).map_err(|e| ExportError::io(from, e))?;
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    fs::write(to, rewrite_html(&content, depth)).map_err(|e| ExportError::io(to, e))
}
