//! folio: a markdown blog and portfolio site.
//!
//! The same templates back the actix-web server (`folio-backend`) and the
//! static export (`folio build`).

use actix_web::web;
use std::sync::Arc;

pub mod config;
pub mod controllers;
pub mod export;
pub mod models;
pub mod posts;
pub mod render;

use config::Config;
use models::SiteConfig;
use posts::{MarkdownRenderer, PostRepository};

pub struct AppState {
    pub config: Config,
    pub site: Arc<SiteConfig>,
    pub posts: Arc<PostRepository>,
    /// Server start time for uptime calculation
    pub started_at: std::time::Instant,
}

impl AppState {
    pub fn new(config: Config, site: SiteConfig) -> Self {
        let posts = build_repository(&config, &site);
        Self {
            config,
            site: Arc::new(site),
            posts: Arc::new(posts),
            started_at: std::time::Instant::now(),
        }
    }
}

/// Post repository for the configured posts directory.
/// Debug mode re-reads the directory on every access.
pub fn build_repository(config: &Config, site: &SiteConfig) -> PostRepository {
    PostRepository::new(
        config.posts_dir.clone(),
        &site.posts.extension,
        MarkdownRenderer::new(&site.posts.code_css_class),
        config.debug,
    )
}

/// Register every route. `/{game}` is a catch-all and must come last.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.configure(controllers::health::config_routes)
        .configure(controllers::static_files::config)
        .configure(controllers::posts::config)
        .configure(controllers::pages::config);
}
