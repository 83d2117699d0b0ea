use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use maud::Markup;

use crate::render::{self, Links, PageContext};
use crate::AppState;

pub mod health;
pub mod pages;
pub mod posts;
pub mod static_files;

/// Wrap rendered markup in an HTML response
pub fn html_response(status: StatusCode, markup: Markup) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(markup.into_string())
}

/// Render the error template with the given status
pub fn error_response(state: &AppState, status: StatusCode, title: &str, message: &str) -> HttpResponse {
    let ctx = PageContext::new(&state.site, Links::absolute());
    html_response(status, render::pages::error(&ctx, title, message))
}

/// Fallback for routes nothing else matched
pub async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    error_response(
        &state,
        StatusCode::NOT_FOUND,
        "Page Not Found",
        "The page you were looking for does not exist.",
    )
}
