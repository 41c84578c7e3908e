use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Result};
use reqwest::Method;
use shared_types::invitation::PDF_FILE_NAME;

use super::{forward, ProxyError, ProxyState};

// Invitation bodies are forwarded byte for byte; nothing is reshaped.

pub async fn preview_html(
    state: web::Data<ProxyState>,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;

    let upstream = backend
        .send(Method::POST, "/api/invitations/html", None, Some(body.to_vec()))
        .await?;
    if !upstream.is_success() {
        return Ok(forward(upstream));
    }

    let content_type = upstream
        .content_type
        .unwrap_or_else(|| "text/html; charset=utf-8".to_string());
    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .body(upstream.body))
}

pub async fn download_pdf(
    state: web::Data<ProxyState>,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;

    let upstream = backend
        .send(Method::POST, "/api/invitations/pdf", None, Some(body.to_vec()))
        .await?;
    if !upstream.is_success() {
        return Ok(forward(upstream));
    }

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(PDF_FILE_NAME.to_string())],
        })
        .body(upstream.body))
}
