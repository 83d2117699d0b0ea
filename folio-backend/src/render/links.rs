//! URL building for rendered pages.
//!
//! The server links from the site root (`/static/css/style.css`). The static
//! export links relative to the page's own directory
//! (`../../static/css/style.css`) so the output works under any prefix.
//! Pages served at arbitrary paths, like `404.html`, link through the
//! published base URL instead.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode<'a> {
    Absolute,
    /// Number of directories between the page and the site root
    Relative { depth: usize },
    /// Full URL the site root is published at
    Base(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Links<'a> {
    mode: LinkMode<'a>,
}

impl<'a> Links<'a> {
    pub fn absolute() -> Self {
        Self {
            mode: LinkMode::Absolute,
        }
    }

    pub fn relative(depth: usize) -> Self {
        Self {
            mode: LinkMode::Relative { depth },
        }
    }

    pub fn base(base_url: &'a str) -> Self {
        Self {
            mode: LinkMode::Base(base_url.trim_end_matches('/')),
        }
    }

    /// Relative links for a file at `output_path` (e.g. `posts/hello/index.html`)
    pub fn for_output_path(output_path: &str) -> Self {
        let depth = output_path
            .trim_matches('/')
            .split('/')
            .filter(|part| !part.is_empty())
            .count()
            .saturating_sub(1);
        Self::relative(depth)
    }

    pub fn mode(&self) -> LinkMode<'a> {
        self.mode
    }

    /// Link to the site root
    pub fn root(&self) -> String {
        self.page("")
    }

    /// Link to a site-relative path such as `writings/` or `posts/x/`.
    /// Full URLs (`https://...`, `//cdn...`, `mailto:`) pass through untouched.
    pub fn page(&self, path: &str) -> String {
        if is_external(path) {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        match self.mode {
            LinkMode::Absolute => format!("/{}", path),
            LinkMode::Relative { depth } => {
                let url = format!("{}{}", "../".repeat(depth), path);
                if url.is_empty() { "./".to_string() } else { url }
            }
            LinkMode::Base(base) => format!("{}/{}", base, path),
        }
    }

    /// Link to a file in the static directory
    pub fn asset(&self, path: &str) -> String {
        if is_external(path) {
            return path.to_string();
        }
        self.page(&format!("static/{}", path.trim_start_matches('/')))
    }
}

pub fn is_external(url: &str) -> bool {
    url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_links() {
        let links = Links::absolute();
        assert_eq!(links.root(), "/");
        assert_eq!(links.page("writings/"), "/writings/");
        assert_eq!(links.page("/games/"), "/games/");
        assert_eq!(links.asset("css/style.css"), "/static/css/style.css");
    }

    #[test]
    fn test_relative_links() {
        let top = Links::for_output_path("index.html");
        assert_eq!(top, Links::relative(0));
        assert_eq!(top.root(), "./");
        assert_eq!(top.page("writings/"), "writings/");

        let post = Links::for_output_path("posts/hello/index.html");
        assert_eq!(post.mode(), LinkMode::Relative { depth: 2 });
        assert_eq!(post.root(), "../../");
        assert_eq!(post.asset("/js/snake.js"), "../../static/js/snake.js");
    }

    #[test]
    fn test_base_links() {
        let links = Links::base("https://me.github.io/folio/");
        assert_eq!(links.root(), "https://me.github.io/folio/");
        assert_eq!(links.page("/games/"), "https://me.github.io/folio/games/");
        assert_eq!(links.asset("css/style.css"), "https://me.github.io/folio/static/css/style.css");
    }

    #[test]
    fn test_external_links_untouched() {
        let links = Links::relative(1);
        assert_eq!(links.page("https://github.com/x"), "https://github.com/x");
        assert_eq!(links.asset("//cdn.example.com/a.css"), "//cdn.example.com/a.css");
        assert_eq!(links.page("mailto:me@example.com"), "mailto:me@example.com");
    }
}
