use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::error_response;
use crate::AppState;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Why a requested asset path was refused
#[derive(Debug, PartialEq, Eq)]
pub enum AssetError {
    /// `..`, absolute paths, backslashes or hidden segments
    Invalid,
    NotFound,
    /// Resolved outside the static dir (symlink escape)
    Forbidden,
}

/// Resolve `requested` inside `root`, rejecting anything that could escape it
pub fn resolve_asset(root: &Path, requested: &str) -> Result<PathBuf, AssetError> {
    if requested.is_empty() || requested.starts_with('/') || requested.contains('\\') {
        return Err(AssetError::Invalid);
    }
    for segment in requested.split('/') {
        if segment == ".." || segment.starts_with('.') {
            return Err(AssetError::Invalid);
        }
    }

    let canonical_root = root.canonicalize().map_err(|_| AssetError::NotFound)?;
    let canonical_file = root
        .join(requested)
        .canonicalize()
        .map_err(|_| AssetError::NotFound)?;

    if !canonical_file.starts_with(&canonical_root) {
        return Err(AssetError::Forbidden);
    }
    if !canonical_file.is_file() {
        return Err(AssetError::NotFound);
    }
    Ok(canonical_file)
}

/// MIME type by extension; text types carry a utf-8 charset
fn content_type_for(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let mime = actix_files::file_extension_to_mime(&ext);
    if mime.type_().as_str() == "text" || ext == "js" {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.to_string()
    }
}

async fn serve_static(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let requested = path.into_inner();
    let file_path = match resolve_asset(&state.config.static_dir, &requested) {
        Ok(p) => p,
        Err(AssetError::NotFound) => {
            return error_response(
                &state,
                StatusCode::NOT_FOUND,
                "File Not Found",
                &format!("No static file named '{}'.", requested),
            );
        }
        Err(e) => {
            log::warn!("[STATIC] Rejected asset path {:?}: {:?}", requested, e);
            return error_response(&state, StatusCode::FORBIDDEN, "Access Denied", "Invalid file path.");
        }
    };

    let last_modified = tokio::fs::metadata(&file_path)
        .await
        .ok()
        .and_then(|m| m.modified().ok())
        .map(|t| DateTime::<Utc>::from(t).format(HTTP_DATE_FORMAT).to_string());

    if let (Some(last_modified), Some(since)) = (
        last_modified.as_deref(),
        req.headers()
            .get(actix_web::http::header::IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok()),
    ) {
        if since == last_modified {
            return HttpResponse::NotModified().finish();
        }
    }

    match tokio::fs::read(&file_path).await {
        Ok(contents) => {
            let mut resp = HttpResponse::Ok();
            resp.content_type(content_type_for(&file_path)).append_header((
                "Cache-Control",
                format!("public, max-age={}", state.site.static_files.cache_timeout),
            ));
            if let Some(last_modified) = last_modified {
                resp.append_header(("Last-Modified", last_modified));
            }
            resp.body(contents)
        }
        Err(e) => {
            log::error!("[STATIC] Failed to read {}: {}", file_path.display(), e);
            error_response(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error",
                "The file could not be read.",
            )
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/static/{path:.*}").route(web::get().to(serve_static)));
}
