use reqwest::{header, Method};
use serde::Serialize;
use shared_types::{
    BackendCreateContact, BackendUpdateContact, Contact, ContactList, ContactPayload,
    InvitationRequest,
};
use thiserror::Error;
use tracing::{debug, warn};

pub const JSON: &str = "application/json";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Upstream fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Backend responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw upstream reply; the proxy forwards it mostly untouched.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn error_for_status(self) -> Result<Self, BackendError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BackendError::Status {
                status: self.status,
                body: self.text(),
            })
        }
    }
}

/// HTTP client for the remote backend that owns contacts and renders
/// invitations. No retries and no timeouts.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// One round trip. Only transport failures are errors here; any status
    /// code comes back as an [`UpstreamResponse`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        accept: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<UpstreamResponse, BackendError> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }
        if let Some(body) = body {
            request = request.header(header::CONTENT_TYPE, JSON).body(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            e
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        if !(200..300).contains(&status) {
            warn!("{} {} responded with {}", method, url, status);
        }

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<UpstreamResponse, BackendError> {
        let body = serde_json::to_vec(body)?;
        self.send(method, path, Some(JSON), Some(body)).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>, BackendError> {
        let response = self
            .send(Method::GET, "/api/contacts", Some(JSON), None)
            .await?
            .error_for_status()?;
        let list: ContactList = serde_json::from_slice(&response.body)?;
        Ok(list.into_contacts())
    }

    pub async fn get_contact(&self, id: i64) -> Result<Contact, BackendError> {
        let response = self
            .send(Method::GET, &contact_path(id), Some(JSON), None)
            .await?
            .error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn create_contact(&self, payload: ContactPayload) -> Result<Contact, BackendError> {
        let body = BackendCreateContact::from(payload);
        let response = self
            .send_json(Method::POST, "/api/contacts", &body)
            .await?
            .error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn update_contact(
        &self,
        id: i64,
        payload: ContactPayload,
    ) -> Result<Contact, BackendError> {
        let body = BackendUpdateContact::from(payload);
        let response = self
            .send_json(Method::PUT, &contact_path(id), &body)
            .await?
            .error_for_status()?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub async fn delete_contact(&self, id: i64) -> Result<(), BackendError> {
        self.send(Method::DELETE, &contact_path(id), None, None)
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Rendered invitation as an HTML document.
    pub async fn preview_invitation(
        &self,
        invitation: &InvitationRequest,
    ) -> Result<String, BackendError> {
        let body = serde_json::to_vec(invitation)?;
        let response = self
            .send(Method::POST, "/api/invitations/html", None, Some(body))
            .await?
            .error_for_status()?;
        Ok(response.text())
    }

    pub async fn invitation_pdf(
        &self,
        invitation: &InvitationRequest,
    ) -> Result<Vec<u8>, BackendError> {
        let body = serde_json::to_vec(invitation)?;
        let response = self
            .send(Method::POST, "/api/invitations/pdf", None, Some(body))
            .await?
            .error_for_status()?;
        Ok(response.body)
    }
}

pub fn contact_path(id: impl std::fmt::Display) -> String {
    format!("/api/contacts/{id}")
}
