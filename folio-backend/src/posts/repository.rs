//! PostRepository — the file-backed post collection
//!
//! Loads every post in the posts directory into a [`PostIndex`] sorted
//! newest first. The index is cached; with `auto_reload` it is rebuilt on
//! every access so edits show up without a restart.

use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::file_ops::{self, slugify};
use super::markdown::MarkdownRenderer;
use super::post::Post;

/// A post file that could not be loaded
#[derive(Debug, Clone)]
pub struct SkippedPost {
    pub path: PathBuf,
    pub kind: &'static str,
    pub reason: String,
}

/// A category or tag with the number of posts using it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermCount {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// Immutable snapshot of all posts, newest first
#[derive(Debug, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
    skipped: Vec<SkippedPost>,
}

impl PostIndex {
    /// Load all posts from `posts_dir`. Broken files are logged and skipped.
    pub fn load(posts_dir: &Path, extension: &str, renderer: &MarkdownRenderer) -> Self {
        let files = match file_ops::list_post_files(posts_dir, extension) {
            Ok(files) => files,
            Err(e) => {
                log::error!("[POSTS] Error listing {}: {}", posts_dir.display(), e);
                return Self::default();
            }
        };

        let mut posts = Vec::with_capacity(files.len());
        let mut skipped = Vec::new();
        for path in files {
            match Post::from_file(&path, renderer) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    log::warn!("[POSTS] Skipping post {}: {}", path.display(), e);
                    skipped.push(SkippedPost {
                        path,
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Self::from_posts(posts, skipped)
    }

    /// Build an index from already parsed posts
    pub fn from_posts(mut posts: Vec<Post>, mut skipped: Vec<SkippedPost>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

        let mut seen = HashSet::new();
        posts.retain(|post| {
            if seen.insert(post.slug.clone()) {
                return true;
            }
            log::warn!(
                "[POSTS] Duplicate slug '{}' in {}, keeping the newer post",
                post.slug,
                post.source_path.display()
            );
            skipped.push(SkippedPost {
                path: post.source_path.clone(),
                kind: "duplicate",
                reason: format!("duplicate slug {}", post.slug),
            });
            false
        });

        Self { posts, skipped }
    }

    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    pub fn skipped(&self) -> &[SkippedPost] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn position(&self, slug: &str) -> Option<usize> {
        let slug = slug.trim_matches('/');
        self.posts.iter().position(|p| p.slug == slug)
    }

    /// Look up a post by slug; surrounding slashes are ignored
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.position(slug).map(|i| &self.posts[i])
    }

    /// The next newer post
    pub fn next(&self, slug: &str) -> Option<&Post> {
        match self.position(slug)? {
            0 => None,
            i => self.posts.get(i - 1),
        }
    }

    /// The next older post
    pub fn prev(&self, slug: &str) -> Option<&Post> {
        let i = self.position(slug)?;
        self.posts.get(i + 1)
    }

    /// Posts in a category, matched by name or slug
    pub fn by_category(&self, category: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.in_category(category)).collect()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.has_tag(tag)).collect()
    }

    /// All categories sorted by name
    pub fn categories(&self) -> Vec<TermCount> {
        count_terms(self.posts.iter().map(|p| p.categories.as_slice()))
    }

    pub fn tags(&self) -> Vec<TermCount> {
        count_terms(self.posts.iter().map(|p| p.tags.as_slice()))
    }

    /// Display name of a category slug, as first written in a post
    pub fn category_name(&self, slug: &str) -> Option<String> {
        find_name(self.categories(), slug)
    }

    pub fn tag_name(&self, slug: &str) -> Option<String> {
        find_name(self.tags(), slug)
    }
}

fn find_name(terms: Vec<TermCount>, slug: &str) -> Option<String> {
    let slug = slugify(slug);
    terms.into_iter().find(|t| t.slug == slug).map(|t| t.name)
}

fn count_terms<'a>(terms: impl Iterator<Item = &'a [String]>) -> Vec<TermCount> {
    let mut counts: BTreeMap<String, TermCount> = BTreeMap::new();
    for list in terms {
        let mut in_post = HashSet::new();
        for name in list {
            let slug = slugify(name);
            if slug.is_empty() || !in_post.insert(slug.clone()) {
                continue;
            }
            counts
                .entry(slug.clone())
                .or_insert_with(|| TermCount {
                    name: name.clone(),
                    slug,
                    count: 0,
                })
                .count += 1;
        }
    }
    counts.into_values().collect()
}

/// One page of a paginated listing, 1-based
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn is_out_of_range(&self) -> bool {
        self.number > self.total_pages
    }
}

/// Slice `items` into pages of `per_page`. A `per_page` of 0 puts everything on one page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let number = page.max(1);
    let per_page = if per_page == 0 { items.len().max(1) } else { per_page };
    let total_pages = items.len().div_ceil(per_page).max(1);
    let start = (number - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    Page {
        items: &items[start..end],
        number,
        per_page,
        total_items: items.len(),
        total_pages,
    }
}

/// Cached access to the posts directory
pub struct PostRepository {
    posts_dir: PathBuf,
    extension: String,
    renderer: MarkdownRenderer,
    auto_reload: bool,
    snapshot: RwLock<Option<Arc<PostIndex>>>,
}

impl PostRepository {
    pub fn new(
        posts_dir: PathBuf,
        extension: &str,
        renderer: MarkdownRenderer,
        auto_reload: bool,
    ) -> Self {
        Self {
            posts_dir,
            extension: extension.trim_start_matches('.').to_string(),
            renderer,
            auto_reload,
            snapshot: RwLock::new(None),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Current snapshot, loading it on first use (or every call with auto_reload)
    pub fn index(&self) -> Arc<PostIndex> {
        if !self.auto_reload {
            if let Some(index) = self.snapshot.read().as_ref() {
                return Arc::clone(index);
            }
        }
        self.reload()
    }

    /// Re-read the posts directory and replace the snapshot
    pub fn reload(&self) -> Arc<PostIndex> {
        let index = Arc::new(PostIndex::load(&self.posts_dir, &self.extension, &self.renderer));
        log::debug!(
            "[POSTS] Loaded {} posts from {} ({} skipped)",
            index.len(),
            self.posts_dir.display(),
            index.skipped().len()
        );
        *self.snapshot.write() = Some(Arc::clone(&index));
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_post(dir: &Path, name: &str, title: &str, date: &str, categories: &str) {
        let content = format!(
            "---\ntitle: {}\ndate: {}\ncategories: [{}]\n---\n\nBody of {}.\n",
            title, date, categories, title
        );
        fs::write(dir.join(name), content).unwrap();
    }

    fn sample_dir() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        write_post(dir.path(), "first.markdown", "First", "2020-01-01", "rust");
        write_post(dir.path(), "second.markdown", "Second", "2021-06-15", "rust, games");
        write_post(dir.path(), "third.markdown", "Third", "2022-03-03", "Games");
        fs::write(dir.path().join("broken.markdown"), "no front matter").unwrap();
        dir
    }

    fn slugs(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_load_sorts_newest_first_and_skips_broken() {
        let dir = sample_dir();
        let index = PostIndex::load(dir.path(), "markdown", &MarkdownRenderer::default());

        let order: Vec<&str> = index.all().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["third", "second", "first"]);
        assert_eq!(index.skipped().len(), 1);
        assert_eq!(index.skipped()[0].kind, "metadata");
    }

    #[test]
    fn test_same_date_sorted_by_slug() {
        let dir = tempdir().unwrap();
        write_post(dir.path(), "b.markdown", "B", "2020-01-01", "x");
        write_post(dir.path(), "a.markdown", "A", "2020-01-01", "x");
        let index = PostIndex::load(dir.path(), "markdown", &MarkdownRenderer::default());
        let order: Vec<&str> = index.all().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_next_and_prev() {
        let dir = sample_dir();
        let index = PostIndex::load(dir.path(), "markdown", &MarkdownRenderer::default());

        assert!(index.next("third").is_none());
        assert_eq!(index.prev("third").unwrap().slug, "second");
        assert_eq!(index.next("second").unwrap().slug, "third");
        assert_eq!(index.prev("second").unwrap().slug, "first");
        assert!(index.prev("first").is_none());
        assert!(index.next("missing").is_none());
        assert!(index.prev("missing").is_none());
        assert_eq!(index.get("second/").unwrap().title, "Second");
    }

    #[test]
    fn test_categories_and_filter() {
        let dir = sample_dir();
        let index = PostIndex::load(dir.path(), "markdown", &MarkdownRenderer::default());

        assert_eq!(slugs(&index.by_category("games")), vec!["third", "second"]);
        assert_eq!(slugs(&index.by_category("Rust")), vec!["second", "first"]);
        assert!(index.by_category("python").is_empty());

        let categories = index.categories();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].slug, "games");
        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[1].slug, "rust");
        assert_eq!(index.category_name("games").as_deref(), Some("Games"));
    }

    #[test]
    fn test_tags() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("t.markdown"),
            "---\ntitle: T\ndate: 2020-01-01\ntags: [wasm, Wasm, canvas]\n---\nx",
        )
        .unwrap();
        let index = PostIndex::load(dir.path(), "markdown", &MarkdownRenderer::default());
        let tags = index.tags();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[1].slug, "wasm");
        assert_eq!(tags[1].count, 1);
        assert_eq!(index.by_tag("wasm").len(), 1);
        assert_eq!(index.tag_name("WASM").as_deref(), Some("wasm"));
        assert!(index.tag_name("rust").is_none());
    }

    #[test]
    fn test_duplicate_slugs_keep_newer() {
        let dir = tempdir().unwrap();
        write_post(dir.path(), "2019-01-01-hello.markdown", "Old Hello", "2019-01-01", "x");
        write_post(dir.path(), "hello.markdown", "New Hello", "2020-01-01", "x");
        let index = PostIndex::load(dir.path(), "markdown", &MarkdownRenderer::default());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("hello").unwrap().title, "New Hello");
        assert_eq!(index.skipped()[0].kind, "duplicate");
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=25).collect();

        let page = paginate(&items, 1, 10);
        assert_eq!(page.items, &items[0..10]);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_prev());
        assert!(page.has_next());

        let page = paginate(&items, 3, 10);
        assert_eq!(page.items, &[21, 22, 23, 24, 25]);
        assert!(page.has_prev());
        assert!(!page.has_next());

        let page = paginate(&items, 4, 10);
        assert!(page.items.is_empty());
        assert!(page.is_out_of_range());

        let page = paginate(&items, 0, 0);
        assert_eq!(page.number, 1);
        assert_eq!(page.items.len(), 25);

        let page = paginate(&items, 2, usize::MAX);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(page.is_out_of_range());

        let page = paginate(&items, usize::MAX, 10);
        assert!(page.items.is_empty());
        assert!(page.is_out_of_range());

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 1, 10);
        assert_eq!(page.total_pages, 1);
        assert!(!page.is_out_of_range());
    }

    #[test]
    fn test_repository_caches_until_reload() {
        let dir = sample_dir();
        let repo = PostRepository::new(
            dir.path().to_path_buf(),
            ".markdown",
            MarkdownRenderer::default(),
            false,
        );
        assert_eq!(repo.index().len(), 3);

        write_post(dir.path(), "fourth.markdown", "Fourth", "2023-01-01", "rust");
        assert_eq!(repo.index().len(), 3);
        assert_eq!(repo.reload().len(), 4);
        assert_eq!(repo.index().all()[0].slug, "fourth");
    }

    #[test]
    fn test_repository_auto_reload() {
        let dir = sample_dir();
        let repo = PostRepository::new(
            dir.path().to_path_buf(),
            "markdown",
            MarkdownRenderer::default(),
            true,
        );
        assert_eq!(repo.index().len(), 3);
        fs::remove_file(dir.path().join("first.markdown")).unwrap();
        assert_eq!(repo.index().len(), 2);
    }
}
