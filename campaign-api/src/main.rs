use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use tracing_subscriber::prelude::*;

use campaign_api::config::ApiConfig;
use campaign_api::handlers::{self, ProxyState};

#[get("/health")]
async fn health(state: web::Data<ProxyState>) -> impl Responder {
    if state.is_configured() {
        HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "backend": "configured"
        }))
    } else {
        HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "backend": "missing"
        }))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("campaign-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (config, config_path) = ApiConfig::load().map_err(std::io::Error::other)?;
    tracing::info!("Loaded config from {:?}", config_path);

    let backend_url = config.proxy_backend_url();
    match &backend_url {
        Some(url) => tracing::info!("Proxying contacts and invitations to {}", url),
        None => tracing::warn!(
            "No backend configured (BACKEND_URL, API_BASE_URL or [backend] base_url); proxy routes will respond with 500"
        ),
    }
    let proxy_state = ProxyState::new(backend_url.as_deref());

    let (host, port) = config.server_addr();
    tracing::info!("Server will listen on {}:{}", host, port);

    HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(proxy_state.clone()))
            .service(health)
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
