use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};

use super::{error_response, html_response};
use crate::posts::Post;
use crate::render::{pages, Links, PageContext};
use crate::AppState;

fn context(state: &AppState) -> PageContext<'_> {
    PageContext::new(&state.site, Links::absolute())
}

fn about_html(state: &AppState) -> String {
    let about = &state.site.site.about;
    if about.trim().is_empty() {
        String::new()
    } else {
        state.posts.renderer().render(about)
    }
}

async fn index(state: web::Data<AppState>) -> HttpResponse {
    let posts = state.posts.index();
    let recent: Vec<&Post> = posts.all().iter().take(state.site.posts.home_recent).collect();
    html_response(StatusCode::OK, pages::home(&context(&state), &about_html(&state), &recent))
}

async fn about(state: web::Data<AppState>) -> HttpResponse {
    html_response(StatusCode::OK, pages::about(&context(&state), &about_html(&state)))
}

async fn games(state: web::Data<AppState>) -> HttpResponse {
    html_response(StatusCode::OK, pages::games(&context(&state)))
}

async fn projects(state: web::Data<AppState>) -> HttpResponse {
    html_response(StatusCode::OK, pages::projects(&context(&state)))
}

async fn apps(state: web::Data<AppState>) -> HttpResponse {
    html_response(StatusCode::OK, pages::apps(&context(&state)))
}

async fn game(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let slug = path.into_inner();
    match state.site.game(&slug) {
        Some(game) => html_response(StatusCode::OK, pages::game(&context(&state), game)),
        None => error_response(
            &state,
            StatusCode::NOT_FOUND,
            "Page Not Found",
            "The page you were looking for does not exist.",
        ),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource(["/about", "/about/"]).route(web::get().to(about)))
        .service(web::resource(["/games", "/games/"]).route(web::get().to(games)))
        .service(web::resource(["/projects", "/projects/"]).route(web::get().to(projects)))
        .service(web::resource(["/apps", "/apps/"]).route(web::get().to(apps)))
        .service(web::resource(["/{game}", "/{game}/"]).route(web::get().to(game)));
}
