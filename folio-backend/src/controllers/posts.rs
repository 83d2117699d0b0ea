use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{error_response, html_response};
use crate::posts::file_ops::slugify;
use crate::posts::{paginate, Post};
use crate::render::pages::{self, WritingsView};
use crate::render::{Links, PageContext};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WritingsQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    /// Kept as text so a malformed value falls back to page 1
    pub page: Option<String>,
}

async fn writings(state: web::Data<AppState>, query: web::Query<WritingsQuery>) -> HttpResponse {
    let index = state.posts.index();
    let selected = query
        .category
        .as_deref()
        .map(slugify)
        .filter(|slug| !slug.is_empty());
    let page_number = query
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<usize>().ok())
        .unwrap_or(1);

    let tag = query.tag.as_deref().map(slugify).filter(|slug| !slug.is_empty());

    let mut posts: Vec<&Post> = match &tag {
        Some(tag) => index.by_tag(tag),
        None => index.all().iter().collect(),
    };
    if let Some(category) = &selected {
        posts.retain(|p| p.in_category(category));
    }
    let page = paginate(&posts, page_number, state.site.posts.per_page);
    if page.is_out_of_range() {
        return error_response(
            &state,
            StatusCode::NOT_FOUND,
            "Page Not Found",
            &format!("There is no page {} of writings.", page.number),
        );
    }

    let categories = index.categories();
    let view = WritingsView {
        page,
        categories: &categories,
        selected: selected.as_deref(),
        tag: tag.as_deref(),
    };
    let ctx = PageContext::new(&state.site, Links::absolute());
    html_response(StatusCode::OK, pages::writings(&ctx, &view))
}

async fn post_detail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let slug = path.into_inner();
    let index = state.posts.index();
    log::debug!("[POSTS] Looking up post {}", slug);

    let Some(post) = index.get(&slug) else {
        log::warn!("[POSTS] Post not found: {}", slug);
        return error_response(
            &state,
            StatusCode::NOT_FOUND,
            "Post Not Found",
            &format!("The post '{}' could not be found.", slug),
        );
    };

    let ctx = PageContext::new(&state.site, Links::absolute());
    html_response(
        StatusCode::OK,
        pages::post(&ctx, post, index.next(&slug), index.prev(&slug)),
    )
}

async fn category(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let slug = path.into_inner();
    let index = state.posts.index();

    let Some(name) = index.category_name(&slug) else {
        return error_response(
            &state,
            StatusCode::NOT_FOUND,
            "Category Not Found",
            &format!("No posts are filed under '{}'.", slug),
        );
    };

    let posts = index.by_category(&slug);
    let ctx = PageContext::new(&state.site, Links::absolute());
    html_response(StatusCode::OK, pages::category(&ctx, &name, &posts))
}

async fn tag(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let slug = path.into_inner();
    let index = state.posts.index();

    let Some(name) = index.tag_name(&slug) else {
        return error_response(
            &state,
            StatusCode::NOT_FOUND,
            "Tag Not Found",
            &format!("No posts are tagged '{}'.", slug),
        );
    };

    let posts = index.by_tag(&slug);
    let ctx = PageContext::new(&state.site, Links::absolute());
    html_response(StatusCode::OK, pages::tag(&ctx, &name, &posts))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["/writings", "/writings/"]).route(web::get().to(writings)))
        .service(web::resource(["/posts/{slug}", "/posts/{slug}/"]).route(web::get().to(post_detail)))
        .service(
            web::resource(["/categories/{slug}", "/categories/{slug}/"])
                .route(web::get().to(category)),
        )
        .service(web::resource(["/tags/{slug}", "/tags/{slug}/"]).route(web::get().to(tag)));
}
