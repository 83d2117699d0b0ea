//! Page templates. Each function returns a complete HTML document.

use maud::{html, Markup, PreEscaped};

use super::layout::{self, NavItem, PageContext};
use crate::models::site_config::{GameEntry, ListingEntry};
use crate::posts::file_ops::slugify;
use crate::posts::repository::{Page, TermCount};
use crate::posts::Post;

/// Data for the writings listing
pub struct WritingsView<'a> {
    pub page: Page<'a, &'a Post>,
    pub categories: &'a [TermCount],
    /// Category slug when the listing is filtered
    pub selected: Option<&'a str>,
    pub tag: Option<&'a str>,
}

fn category_links(ctx: &PageContext, categories: &[String]) -> Markup {
    html! {
        @if !categories.is_empty() {
            span.post-categories {
                @for (i, category) in categories.iter().enumerate() {
                    @if i > 0 { ", " }
                    a.category href=(ctx.links.page(&format!("categories/{}/", slugify(category)))) { (category) }
                }
            }
        }
    }
}

fn post_list(ctx: &PageContext, posts: &[&Post]) -> Markup {
    let cfg = &ctx.site.posts;
    html! {
        ul.post-list {
            @for post in posts {
                li.post-item data-title=(post.title) data-date=(post.date.format("%Y-%m-%d").to_string()) {
                    a.post-link href=(ctx.links.page(&post.url())) { (post.title) }
                    " "
                    span.post-date { (post.formatted_date(&cfg.date_format)) }
                    " "
                    (category_links(ctx, &post.categories))
                    p.post-excerpt { (post.excerpt(cfg.excerpt_length)) }
                }
            }
        }
    }
}

/// Home page: the about text followed by the most recent posts
pub fn home(ctx: &PageContext, about_html: &str, recent: &[&Post]) -> Markup {
    let ctx = ctx.with_active(NavItem::About);
    let body = html! {
        header.page-header {
            h1 { (ctx.site.site.title) }
            @if !ctx.site.site.description.is_empty() {
                p.lead { (ctx.site.site.description) }
            }
        }
        @if !about_html.is_empty() {
            div.page-content { (PreEscaped(about_html)) }
        }
        section.recent-posts {
            h2 { "Recent Writings" }
            @if recent.is_empty() {
                p.empty { "No posts yet." }
            } @else {
                (post_list(&ctx, recent))
                a.more href=(ctx.links.page("writings/")) { "All writings" }
            }
        }
    };
    layout::page(&ctx, "Home", body)
}

/// About page; `about_html` is the rendered about markdown
pub fn about(ctx: &PageContext, about_html: &str) -> Markup {
    let ctx = ctx.with_active(NavItem::About);
    let body = html! {
        article.page {
            header.page-header { h1 { "About" } }
            div.page-content { (PreEscaped(about_html)) }
        }
    };
    layout::page(&ctx, "About", body)
}

pub fn writings(ctx: &PageContext, view: &WritingsView) -> Markup {
    let ctx = ctx.with_active(NavItem::Writings);
    let base = ctx.links.page("writings/");
    let page_url = |n: usize| {
        let mut url = format!("{}?", base);
        if let Some(category) = view.selected {
            url.push_str(&format!("category={}&", urlencoding::encode(category)));
        }
        if let Some(tag) = view.tag {
            url.push_str(&format!("tag={}&", urlencoding::encode(tag)));
        }
        format!("{}page={}", url, n)
    };

    let body = html! {
        header.page-header { h1 { "Writings" } }
        @if !view.categories.is_empty() {
            nav.category-filter {
                a.active[view.selected.is_none()] href=(base) { "All" }
                @for category in view.categories {
                    " "
                    a.active[view.selected == Some(category.slug.as_str())]
                        href=(ctx.links.page(&format!("categories/{}/", category.slug))) {
                        (category.name) " (" (category.count) ")"
                    }
                }
            }
        }
        @if view.page.items.is_empty() {
            p.empty { "No posts found." }
        } @else {
            (post_list(&ctx, view.page.items))
        }
        @if view.page.total_pages > 1 {
            nav.pagination {
                @if view.page.has_prev() {
                    a.prev href=(page_url(view.page.number - 1)) { "Newer" }
                }
                span.page-number { "Page " (view.page.number) " of " (view.page.total_pages) }
                @if view.page.has_next() {
                    a.next href=(page_url(view.page.number + 1)) { "Older" }
                }
            }
        }
    };
    layout::page(&ctx, "Writings", body)
}

/// Posts of one category
pub fn category(ctx: &PageContext, name: &str, posts: &[&Post]) -> Markup {
    term_page(ctx, "Category", name, posts)
}

pub fn tag(ctx: &PageContext, name: &str, posts: &[&Post]) -> Markup {
    term_page(ctx, "Tag", name, posts)
}

fn term_page(ctx: &PageContext, kind: &str, name: &str, posts: &[&Post]) -> Markup {
    let ctx = ctx.with_active(NavItem::Writings);
    let body = html! {
        header.page-header {
            h1 { (kind) ": " (name) }
            a.back href=(ctx.links.page("writings/")) { "All writings" }
        }
        (post_list(&ctx, posts))
    };
    layout::page(&ctx, name, body)
}

/// Single post. `newer`/`older` feed the previous/next navigation.
pub fn post(ctx: &PageContext, post: &Post, newer: Option<&Post>, older: Option<&Post>) -> Markup {
    let ctx = ctx.with_active(NavItem::Writings);
    let date_format = &ctx.site.posts.date_format;
    let body = html! {
        article.post {
            header.page-header {
                h1 { (post.title) }
                p.post-meta {
                    time datetime=(post.date.format("%Y-%m-%d").to_string()) { (post.formatted_date(date_format)) }
                    " "
                    (category_links(&ctx, &post.categories))
                }
            }
            div.post-content {
                (PreEscaped(&post.html_content))
            }
            @if !post.tags.is_empty() {
                ul.post-tags {
                    @for tag in &post.tags {
                        li.tag { a href=(ctx.links.page(&format!("tags/{}/", slugify(tag)))) { (tag) } }
                    }
                }
            }
        }
        nav.post-navigation {
            @if let Some(older) = older {
                a.prev-post href=(ctx.links.page(&older.url())) { "\u{2190} " (older.title) }
            }
            @if let Some(newer) = newer {
                a.next-post href=(ctx.links.page(&newer.url())) { (newer.title) " \u{2192}" }
            }
        }
    };
    layout::page(&ctx, &post.title, body)
}

fn listing(ctx: &PageContext, entries: &[ListingEntry], empty: &str) -> Markup {
    html! {
        @if entries.is_empty() {
            p.empty { (empty) }
        } @else {
            div.project-grid {
                @for entry in entries {
                    div.project-card {
                        @if let Some(image) = &entry.image {
                            img.project-image src=(ctx.links.asset(image)) alt=(entry.name);
                        }
                        h3 {
                            @if let Some(url) = &entry.url {
                                a href=(ctx.links.page(url)) { (entry.name) }
                            } @else {
                                (entry.name)
                            }
                        }
                        p { (entry.description) }
                        @if !entry.tags.is_empty() {
                            ul.project-tags {
                                @for tag in &entry.tags { li { (tag) } }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn projects(ctx: &PageContext) -> Markup {
    let ctx = ctx.with_active(NavItem::Projects);
    let body = html! {
        header.page-header { h1 { "Projects" } }
        (listing(&ctx, &ctx.site.projects, "No projects yet."))
    };
    layout::page(&ctx, "Projects", body)
}

pub fn apps(ctx: &PageContext) -> Markup {
    let ctx = ctx.with_active(NavItem::Apps);
    let body = html! {
        header.page-header { h1 { "AI Generated Apps" } }
        (listing(&ctx, &ctx.site.apps, "No apps yet."))
    };
    layout::page(&ctx, "AI Generated Apps", body)
}

pub fn games(ctx: &PageContext) -> Markup {
    let ctx = ctx.with_active(NavItem::Games);
    let body = html! {
        header.page-header { h1 { "Games" } }
        @if ctx.site.games.is_empty() {
            p.empty { "No games yet." }
        } @else {
            div.game-grid {
                @for game in &ctx.site.games {
                    a.game-card href=(ctx.links.page(&format!("{}/", game.slug))) {
                        @if let Some(thumbnail) = &game.thumbnail {
                            img src=(ctx.links.asset(thumbnail)) alt=(game.title);
                        }
                        h3 { (game.title) }
                        p { (game.description) }
                    }
                }
            }
        }
    };
    layout::page(&ctx, "Games", body)
}

/// Shell page for a browser game; the script draws into `#game-container`
pub fn game(ctx: &PageContext, game: &GameEntry) -> Markup {
    let ctx = ctx.with_active(NavItem::Games);
    let body = html! {
        @if let Some(stylesheet) = &game.stylesheet {
            link rel="stylesheet" href=(ctx.links.asset(stylesheet));
        }
        header.page-header {
            h1 { (game.title) }
            @if !game.description.is_empty() { p.lead { (game.description) } }
        }
        div id="game-container" class="game-container" data-game=(game.slug) {}
        a.back href=(ctx.links.page("games/")) { "\u{2190} All games" }
        script src=(ctx.links.asset(&game.script_path())) {}
    };
    layout::page(&ctx, &game.title, body)
}

/// Error page shown for unknown routes and failed loads
pub fn error(ctx: &PageContext, title: &str, message: &str) -> Markup {
    let body = html! {
        div.error-page {
            h1 { (title) }
            p { (message) }
            a href=(ctx.links.root()) { "Back to home" }
        }
    };
    layout::page(ctx, title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::site_config::SiteConfig;
    use crate::posts::{paginate, MarkdownRenderer, PostIndex};
    use crate::render::Links;

    fn index() -> PostIndex {
        let renderer = MarkdownRenderer::default();
        let posts = vec![
            Post::parse(
                "2021-01-01-alpha",
                "---\ntitle: Alpha & Omega\ncategories: [Rust Lang]\ntags: [Web Assembly]\n---\nAlpha body.",
                &renderer,
            )
            .unwrap(),
            Post::parse("2022-01-01-beta", "---\ntitle: Beta\n---\nBeta *body*.", &renderer).unwrap(),
        ];
        PostIndex::from_posts(posts, Vec::new())
    }

    #[test]
    fn test_post_page_navigation() {
        let site = SiteConfig::default();
        let index = index();
        let ctx = PageContext::new(&site, Links::for_output_path("posts/alpha/index.html"));
        let alpha = index.get("alpha").unwrap();

        let out = post(&ctx, alpha, index.next("alpha"), index.prev("alpha")).into_string();
        assert!(out.contains("<h1>Alpha &amp; Omega</h1>"));
        assert!(out.contains("January 01, 2021"));
        assert!(out.contains("href=\"../../categories/rust-lang/\""));
        assert!(out.contains("<li class=\"tag\"><a href=\"../../tags/web-assembly/\">Web Assembly</a></li>"));
        assert!(out.contains("href=\"../../posts/beta/\""));
        assert!(!out.contains("prev-post"));
        assert!(out.contains("<p>Alpha body.</p>"));
    }

    #[test]
    fn test_writings_items_and_pagination() {
        let mut site = SiteConfig::default();
        site.posts.per_page = 1;
        let index = index();
        let all: Vec<&Post> = index.all().iter().collect();
        let categories = index.categories();
        let view = WritingsView {
            page: paginate(&all, 1, site.posts.per_page),
            categories: &categories,
            selected: None,
            tag: None,
        };
        let ctx = PageContext::new(&site, Links::absolute());

        let out = writings(&ctx, &view).into_string();
        assert!(out.contains("data-title=\"Beta\""));
        assert!(out.contains("data-date=\"2022-01-01\""));
        assert!(!out.contains("data-title=\"Alpha"));
        assert!(out.contains("href=\"/writings/?page=2\""));
        assert!(out.contains("Rust Lang (1)"));
    }

    #[test]
    fn test_game_page() {
        let site = SiteConfig::default();
        let game_entry = GameEntry {
            slug: "snake".to_string(),
            title: "Snake Game".to_string(),
            description: String::new(),
            script: None,
            stylesheet: Some("css/snake.css".to_string()),
            thumbnail: None,
        };
        let ctx = PageContext::new(&site, Links::for_output_path("snake/index.html"));
        let out = game(&ctx, &game_entry).into_string();
        assert!(out.contains("src=\"../static/js/snake.js\""));
        assert!(out.contains("href=\"../static/css/snake.css\""));
        assert!(out.contains("data-game=\"snake\""));
    }

    #[test]
    fn test_error_page() {
        let site = SiteConfig::default();
        let ctx = PageContext::new(&site, Links::absolute());
        let out = error(&ctx, "Post Not Found", "The post 'x' could not be found.").into_string();
        assert!(out.contains("<h1>Post Not Found</h1>"));
        assert!(out.contains("could not be found."));
    }
}
