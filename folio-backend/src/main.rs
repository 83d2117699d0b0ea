use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use folio_backend::config::Config;
use folio_backend::controllers;
use folio_backend::models::SiteConfig;
use folio_backend::{configure_app, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("Folio v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using content directory: {:?}", config.content_dir);

    let site = match SiteConfig::load(&config.site_config_path) {
        Ok(site) => site,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };
    log::info!("Loaded site config for '{}'", site.site.title);

    let state = web::Data::new(AppState::new(config.clone(), site));

    // Load once up front so broken posts are reported at startup
    let index = state.posts.index();
    log::info!(
        "[POSTS] {} posts loaded from {} ({} skipped)",
        index.len(),
        state.posts.posts_dir().display(),
        index.skipped().len()
    );
    if config.debug {
        log::info!("Debug mode: posts are re-read on every request");
    }

    let (host, port) = config.bind_addr();
    log::info!("Starting server on http://{}:{}", host, port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_app)
            .default_service(web::to(controllers::not_found))
    })
    .bind((host.as_str(), port))?
    .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();

    // Spawn Ctrl+C handler
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        log::info!("Received Ctrl+C, shutting down...");

        let server_stop = server_handle.stop(true);
        if tokio::time::timeout(std::time::Duration::from_secs(5), server_stop).await.is_err() {
            log::warn!("Timeout waiting for HTTP server to stop, forcing exit...");
        }

        log::info!("Shutdown complete");
    });

    server.await
}
