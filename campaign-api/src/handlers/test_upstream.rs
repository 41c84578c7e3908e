//! In-process stand-in for the remote backend, bound to an ephemeral port.

use actix_web::http::header::{self, HeaderMap, HeaderName};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpRequest, HttpResponse, HttpServer};
use std::sync::{Arc, Mutex};

use super::{configure, ProxyState};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Answers every request with the same canned reply and records it.
#[derive(Clone)]
pub struct FakeUpstream {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl FakeUpstream {
    pub fn replying(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Starts serving and returns the base URL.
    pub fn start(&self) -> String {
        let upstream = self.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(upstream.clone()))
                .default_service(web::to(record))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn record(
    req: HttpRequest,
    body: web::Bytes,
    upstream: web::Data<FakeUpstream>,
) -> HttpResponse {
    upstream.requests.lock().unwrap().push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        accept: header_value(req.headers(), header::ACCEPT),
        content_type: header_value(req.headers(), header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    let mut response = HttpResponse::build(StatusCode::from_u16(upstream.status).unwrap());
    if !upstream.body.is_empty() {
        response.content_type(upstream.content_type);
    }
    response.body(upstream.body.clone())
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: web::Bytes,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn header(&self, name: HeaderName) -> Option<String> {
        header_value(&self.headers, name)
    }
}

/// Runs one request through the proxy routes.
pub async fn call(backend_url: Option<&str>, request: test::TestRequest) -> Reply {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ProxyState::new(backend_url)))
            .configure(configure),
    )
    .await;

    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let headers = response.headers().clone();
    let body = test::read_body(response).await;

    Reply {
        status,
        headers,
        body,
    }
}
