use actix_web::{web, HttpResponse, Result};
use reqwest::Method;
use shared_types::{BackendCreateContact, BackendUpdateContact, ContactPayload};
use tracing::info;

use super::{forward, ProxyError, ProxyState};
use crate::integrations::backend::{contact_path, JSON};

const CONTACTS_PATH: &str = "/api/contacts";

pub async fn list_contacts(state: web::Data<ProxyState>) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;

    let upstream = backend
        .send(Method::GET, CONTACTS_PATH, Some(JSON), None)
        .await?;

    Ok(forward(upstream))
}

pub async fn create_contact(
    state: web::Data<ProxyState>,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;
    let payload = parse_payload(&body)?;

    let create = BackendCreateContact::from(payload);
    if create.name.is_none() {
        info!("Creating contact without a name");
    }

    let upstream = backend
        .send_json(Method::POST, CONTACTS_PATH, &create)
        .await?;

    Ok(forward(upstream))
}

pub async fn get_contact(
    state: web::Data<ProxyState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;
    let id = contact_id(path)?;

    let upstream = backend
        .send(Method::GET, &contact_path(&id), Some(JSON), None)
        .await?;

    Ok(forward(upstream))
}

/// Serves both PUT and PATCH; the backend always receives a PUT with only
/// the fields present in the edit.
pub async fn update_contact(
    state: web::Data<ProxyState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;
    let id = contact_id(path)?;
    let payload = parse_payload(&body)?;

    let update = BackendUpdateContact::from(payload);
    let upstream = backend
        .send_json(Method::PUT, &contact_path(&id), &update)
        .await?;

    Ok(forward(upstream))
}

pub async fn delete_contact(
    state: web::Data<ProxyState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ProxyError> {
    let backend = state.backend()?;
    let id = contact_id(path)?;

    let upstream = backend
        .send(Method::DELETE, &contact_path(&id), None, None)
        .await?;

    if upstream.is_success() && upstream.body.is_empty() {
        return Ok(HttpResponse::Ok().content_type(JSON).body("{}"));
    }

    Ok(forward(upstream))
}

fn contact_id(path: web::Path<String>) -> Result<String, ProxyError> {
    let id = path.into_inner();
    if id.trim().is_empty() {
        return Err(ProxyError::MissingId);
    }
    Ok(id)
}

// An empty body or a JSON `null` is an empty edit.
fn parse_payload(body: &[u8]) -> Result<ContactPayload, ProxyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactPayload::default());
    }

    let payload: Option<ContactPayload> =
        serde_json::from_slice(body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;

    Ok(payload.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_upstream::{call, FakeUpstream};
    use actix_web::http::{header, StatusCode};
    use actix_web::test::TestRequest;
    use serde_json::json;

    #[actix_web::test]
    async fn test_list_is_passed_through_verbatim() {
        let raw = r#"[{"id":1,"name":"Anna Muster","createdAt":"2024-01-01"}]"#;
        let upstream = FakeUpstream::replying(200, raw);
        let base = upstream.start();

        let reply = call(Some(&base), TestRequest::get().uri("/api/contacts")).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, raw.as_bytes());

        let requests = upstream.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/contacts");
        assert_eq!(requests[0].accept.as_deref(), Some("application/json"));
    }

    #[actix_web::test]
    async fn test_create_synthesizes_name() {
        let upstream = FakeUpstream::replying(201, r#"{"id":12}"#);
        let base = upstream.start();

        let request = TestRequest::post()
            .uri("/api/contacts")
            .set_json(json!({ "firstName": "Anna", "lastName": "Muster", "phone": "0123" }));
        let reply = call(Some(&base), request).await;

        // Created upstream still reads as a plain 200 here.
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json(), json!({ "id": 12 }));
        assert_eq!(
            upstream.requests()[0].json(),
            json!({
                "name": "Anna Muster",
                "role": null,
                "city": null,
                "email": null,
                "consent": true
            })
        );
    }

    #[actix_web::test]
    async fn test_create_without_name_omits_it() {
        let upstream = FakeUpstream::replying(200, "{}");
        let base = upstream.start();

        let request = TestRequest::post()
            .uri("/api/contacts")
            .set_json(json!({ "city": "Mainz", "consent": false }));
        call(Some(&base), request).await;

        assert_eq!(
            upstream.requests()[0].json(),
            json!({ "role": null, "city": "Mainz", "email": null, "consent": false })
        );
    }

    #[actix_web::test]
    async fn test_create_with_empty_body() {
        let upstream = FakeUpstream::replying(200, "{}");
        let base = upstream.start();

        call(Some(&base), TestRequest::post().uri("/api/contacts")).await;

        assert_eq!(
            upstream.requests()[0].json(),
            json!({ "role": null, "city": null, "email": null, "consent": true })
        );
    }

    #[actix_web::test]
    async fn test_create_rejects_malformed_json() {
        let upstream = FakeUpstream::replying(200, "{}");
        let base = upstream.start();

        let request = TestRequest::post()
            .uri("/api/contacts")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json");
        let reply = call(Some(&base), request).await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(upstream.requests().is_empty());
    }

    #[actix_web::test]
    async fn test_update_rejects_wrong_typed_field() {
        let upstream = FakeUpstream::replying(200, "{}");
        let base = upstream.start();

        let request = TestRequest::put()
            .uri("/api/contacts/3")
            .set_json(json!({ "role": 5 }));
        let reply = call(Some(&base), request).await;

        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert!(upstream.requests().is_empty());
    }

    #[actix_web::test]
    async fn test_update_forwards_only_present_fields() {
        let upstream = FakeUpstream::replying(200, r#"{"id":3,"email":"a@b.c"}"#);
        let base = upstream.start();

        let request = TestRequest::patch()
            .uri("/api/contacts/3")
            .set_json(json!({ "email": "a@b.c" }));
        let reply = call(Some(&base), request).await;

        assert_eq!(reply.status, StatusCode::OK);
        let requests = upstream.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, "/api/contacts/3");
        assert_eq!(requests[0].json(), json!({ "email": "a@b.c" }));
    }

    #[actix_web::test]
    async fn test_update_drops_non_boolean_consent() {
        let upstream = FakeUpstream::replying(200, "{}");
        let base = upstream.start();

        let request = TestRequest::put()
            .uri("/api/contacts/3")
            .set_json(json!({ "name": "Anna Muster", "consent": "true", "tags": "x" }));
        call(Some(&base), request).await;

        assert_eq!(upstream.requests()[0].json(), json!({ "name": "Anna Muster" }));
    }

    #[actix_web::test]
    async fn test_upstream_error_is_forwarded() {
        let upstream = FakeUpstream::replying(422, r#"{"message":"email taken"}"#);
        let base = upstream.start();

        let request = TestRequest::put()
            .uri("/api/contacts/3")
            .set_json(json!({ "email": "a@b.c" }));
        let reply = call(Some(&base), request).await;

        assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(reply.body, r#"{"message":"email taken"}"#.as_bytes());
    }

    #[actix_web::test]
    async fn test_get_not_found_is_forwarded() {
        let upstream = FakeUpstream::replying(404, "Contact 99 not found").with_content_type("text/plain");
        let base = upstream.start();

        let reply = call(Some(&base), TestRequest::get().uri("/api/contacts/99")).await;

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(reply.body, "Contact 99 not found".as_bytes());
        assert_eq!(upstream.requests()[0].path, "/api/contacts/99");
    }

    #[actix_web::test]
    async fn test_delete_no_content_becomes_empty_object() {
        let upstream = FakeUpstream::replying(204, "");
        let base = upstream.start();

        let reply = call(Some(&base), TestRequest::delete().uri("/api/contacts/7")).await;

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json(), json!({}));
        let requests = upstream.requests();
        assert_eq!(requests[0].method, "DELETE");
        assert!(requests[0].body.is_empty());
        assert_eq!(requests[0].content_type, None);
    }

    #[actix_web::test]
    async fn test_delete_failure_is_forwarded() {
        let upstream = FakeUpstream::replying(409, "still referenced");
        let base = upstream.start();

        let reply = call(Some(&base), TestRequest::delete().uri("/api/contacts/7")).await;

        assert_eq!(reply.status, StatusCode::CONFLICT);
        assert_eq!(reply.body, "still referenced".as_bytes());
    }

    #[actix_web::test]
    async fn test_missing_backend_url() {
        let reply = call(None, TestRequest::get().uri("/api/contacts")).await;

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.json(), json!({ "error": "Missing BACKEND_URL env var" }));

        let reply = call(None, TestRequest::delete().uri("/api/contacts/1")).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let reply = call(
            Some("http://127.0.0.1:1"),
            TestRequest::get().uri("/api/contacts/1"),
        )
        .await;

        assert_eq!(reply.status, StatusCode::BAD_GATEWAY);
        let body = reply.json();
        assert_eq!(body["error"], "Upstream fetch failed");
        assert!(body["detail"].is_string());
    }

    #[actix_web::test]
    async fn test_unsupported_method() {
        let reply = call(
            Some("http://127.0.0.1:1"),
            TestRequest::delete().uri("/api/contacts"),
        )
        .await;

        assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(reply.header(header::ALLOW).as_deref(), Some("GET, POST"));
        assert_eq!(reply.json(), json!({ "error": "Method Not Allowed" }));
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(b"").unwrap(), ContactPayload::default());
        assert_eq!(parse_payload(b"null").unwrap(), ContactPayload::default());
        assert_eq!(
            parse_payload(br#"{"role":"Presse"}"#).unwrap().role.as_deref(),
            Some("Presse")
        );
        assert!(matches!(
            parse_payload(b"[1, 2]"),
            Err(ProxyError::InvalidBody(_))
        ));
    }
}
