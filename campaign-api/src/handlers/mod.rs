use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpResponse};
use shared_types::ErrorResponse;
use tracing::error;

use crate::integrations::backend::{BackendClient, BackendError, UpstreamResponse, JSON};

pub mod contacts;
pub mod invitations;

#[cfg(test)]
pub(crate) mod test_upstream;

/// Shared by every proxy route. `backend` is `None` when no backend
/// location is configured.
#[derive(Clone)]
pub struct ProxyState {
    backend: Option<BackendClient>,
}

impl ProxyState {
    pub fn new(backend_url: Option<&str>) -> Self {
        Self {
            backend: backend_url.map(BackendClient::new),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Result<&BackendClient, ProxyError> {
        self.backend.as_ref().ok_or(ProxyError::MissingBackendUrl)
    }
}

#[derive(Debug)]
pub enum ProxyError {
    MissingBackendUrl,
    MissingId,
    InvalidBody(String),
    UpstreamFetch(String),
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyError::MissingBackendUrl => write!(f, "Missing BACKEND_URL env var"),
            ProxyError::MissingId => write!(f, "Missing id"),
            ProxyError::InvalidBody(msg) => write!(f, "Invalid request body: {}", msg),
            ProxyError::UpstreamFetch(_) => write!(f, "Upstream fetch failed"),
        }
    }
}

impl actix_web::error::ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingBackendUrl => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::MissingId | ProxyError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ProxyError::UpstreamFetch(detail) => {
                ErrorResponse::new(self.to_string()).with_detail(detail.clone())
            }
            _ => ErrorResponse::new(self.to_string()),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<BackendError> for ProxyError {
    fn from(e: BackendError) -> Self {
        error!("Upstream request failed: {}", e);
        match e {
            BackendError::Transport(inner) => ProxyError::UpstreamFetch(inner.to_string()),
            other => ProxyError::UpstreamFetch(other.to_string()),
        }
    }
}

/// Upstream success becomes 200 with the body as-is; upstream failure keeps
/// its status and body.
pub(crate) fn forward(upstream: UpstreamResponse) -> HttpResponse {
    let status = if upstream.is_success() {
        StatusCode::OK
    } else {
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY)
    };

    HttpResponse::build(status)
        .content_type(upstream.content_type.as_deref().unwrap_or(JSON))
        .body(upstream.body)
}

fn method_not_allowed(allow: &'static str) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, allow))
        .json(ErrorResponse::new("Method Not Allowed"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/contacts")
            .route(web::get().to(contacts::list_contacts))
            .route(web::post().to(contacts::create_contact))
            .default_service(web::to(|| async { method_not_allowed("GET, POST") })),
    )
    .service(
        web::resource("/api/contacts/{id}")
            .route(web::get().to(contacts::get_contact))
            .route(web::put().to(contacts::update_contact))
            .route(web::patch().to(contacts::update_contact))
            .route(web::delete().to(contacts::delete_contact))
            .default_service(web::to(|| async {
                method_not_allowed("GET, PUT, PATCH, DELETE")
            })),
    )
    .service(
        web::resource("/api/invitations/html")
            .route(web::post().to(invitations::preview_html))
            .default_service(web::to(|| async { method_not_allowed("POST") })),
    )
    .service(
        web::resource("/api/invitations/pdf")
            .route(web::post().to(invitations::download_pdf))
            .default_service(web::to(|| async { method_not_allowed("POST") })),
    );
}
