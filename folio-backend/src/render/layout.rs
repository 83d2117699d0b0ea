use maud::{html, Markup, DOCTYPE};

use super::links::Links;
use crate::models::site_config::SiteConfig;

/// Sidebar navigation entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    About,
    Writings,
    Games,
    Projects,
    Apps,
    None,
}

const NAV: &[(NavItem, &str, &str)] = &[
    (NavItem::About, "", "About Me"),
    (NavItem::Writings, "writings/", "Writings"),
    (NavItem::Games, "games/", "Games"),
    (NavItem::Projects, "projects/", "Projects"),
    (NavItem::Apps, "apps/", "Apps"),
];

/// Everything a template needs besides its own data
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub site: &'a SiteConfig,
    pub links: Links<'a>,
    pub active: NavItem,
}

impl<'a> PageContext<'a> {
    pub fn new(site: &'a SiteConfig, links: Links<'a>) -> Self {
        Self {
            site,
            links,
            active: NavItem::None,
        }
    }

    pub fn with_active(mut self, active: NavItem) -> Self {
        self.active = active;
        self
    }
}

/// Full HTML document: head, sidebar and `body` in the content column
pub fn page(ctx: &PageContext, title: &str, body: Markup) -> Markup {
    let site = &ctx.site.site;
    let links = &ctx.links;
    let full_title = if title.is_empty() || title == site.title {
        site.title.clone()
    } else {
        format!("{} | {}", title, site.title)
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(site.description);
                meta name="author" content=(site.author);
                title { (full_title) }
                @for stylesheet in &ctx.site.static_files.stylesheets {
                    link rel="stylesheet" href=(links.asset(stylesheet));
                }
            }
            body {
                div.container {
                    div.sidebar {
                        div.about {
                            h2.site-title { a href=(links.root()) { (site.title) } }
                            @if !site.description.is_empty() {
                                p.site-description { (site.description) }
                            }
                            @if !site.social.is_empty() {
                                ul.social {
                                    @for social in &site.social {
                                        li {
                                            a href=(links.page(&social.url)) title=(social.name) {
                                                @if let Some(icon) = &social.icon {
                                                    i class=(format!("fa fa-{}", icon)) {}
                                                    " "
                                                }
                                                span { (social.name) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        hr;
                        nav.main-nav {
                            ul {
                                @for (item, path, label) in NAV {
                                    li {
                                        a.active[*item == ctx.active] href=(links.page(path)) { (label) }
                                    }
                                }
                            }
                        }
                    }
                    div.content {
                        (body)
                    }
                }
            }
        }
    }
}
