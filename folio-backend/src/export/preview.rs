//! Local preview of the exported site. Everything is sent with no-cache
//! headers so a rebuild shows up on the next reload.

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpResponse, HttpServer};
use std::path::PathBuf;

fn no_cache() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .add(("Pragma", "no-cache"))
        .add(("Expires", "0"))
}

/// Routes serving `output_dir` with directory index files
pub fn configure(output_dir: PathBuf) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        let not_found = output_dir.join("404.html");
        cfg.service(
            Files::new("/", output_dir.clone())
                .index_file("index.html")
                .redirect_to_slash_directory()
                .use_etag(false)
                .use_last_modified(false)
                .default_handler(fn_service(move |req: ServiceRequest| {
                    let not_found = not_found.clone();
                    async move {
                        let (req, _) = req.into_parts();
                        let resp = match NamedFile::open_async(&not_found).await {
                            Ok(file) => {
                                let mut resp = file.into_response(&req);
                                *resp.status_mut() = StatusCode::NOT_FOUND;
                                resp
                            }
                            Err(_) => HttpResponse::NotFound().body("Not Found"),
                        };
                        Ok::<_, actix_web::Error>(ServiceResponse::new(req, resp))
                    }
                })),
        );
    }
}

pub async fn serve(output_dir: PathBuf, host: &str, port: u16) -> std::io::Result<()> {
    if !output_dir.join("index.html").is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no index.html, build the site first", output_dir.display()),
        ));
    }

    log::info!("[PREVIEW] Serving {} at http://{}:{}/", output_dir.display(), host, port);
    let routes = configure(output_dir);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(no_cache())
            .wrap(Logger::default())
            .configure(routes.clone())
    })
    .bind((host, port))?
    .run();

    let server_handle = server.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("[PREVIEW] Received Ctrl+C, stopping...");
            server_handle.stop(true).await;
        }
    });

    server.await
}
