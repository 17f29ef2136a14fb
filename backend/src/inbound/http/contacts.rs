//! Contact resource HTTP handlers.
//!
//! ```text
//! GET    /api/contacts
//! POST   /api/contacts
//! GET    /api/contacts/{id}
//! PATCH  /api/contacts/{id}
//! DELETE /api/contacts/{id}
//! ```
//!
//! Every handler resolves the session first: anonymous requests fail with 401
//! before validation, policy, or store access.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::contact::{ContactId, ContactInput};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::presentation::{self, ContactEnvelope, ContactListEnvelope};

/// Request payload for creating or replacing a contact.
///
/// There is deliberately no owner field; ownership always comes from the
/// session.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Accepts `MM/DD/YYYY` or `Month DD, YYYY`.
    #[schema(example = "05/14/1988")]
    pub birthday: Option<String>,
    pub company: Option<String>,
}

impl From<ContactPayload> for ContactInput {
    fn from(value: ContactPayload) -> Self {
        Self {
            name: value.name,
            email: value.email,
            birthday: value.birthday,
            company: value.company,
        }
    }
}

/// Unwrap the body extractor after the session has been resolved.
///
/// Handlers take the payload as a `Result` so a malformed body does not
/// short-circuit ahead of the session check: anonymous callers get 401 even
/// when the body is unparseable, and authenticated callers get the domain
/// 400 envelope instead of the framework's default rejection.
fn require_payload(
    payload: Result<web::Json<ContactPayload>, actix_web::Error>,
) -> Result<ContactPayload, Error> {
    payload
        .map(web::Json::into_inner)
        .map_err(|error| Error::invalid_request(format!("malformed contact payload: {error}")))
}

/// List the authenticated user's contacts.
#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "The caller's contacts", body = ContactListEnvelope),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("/contacts")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ContactListEnvelope>> {
    let user = session.require_user_id()?;
    let contacts = state.contacts_query.list(&user).await?;
    Ok(web::Json(presentation::list(&contacts, Utc::now())))
}

/// Create a contact owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Created contact with self link", body = ContactEnvelope),
        (status = 400, description = "Malformed payload", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
#[post("/contacts")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Result<web::Json<ContactPayload>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let payload = require_payload(payload)?;
    let contact = state.contacts.create(&user, payload.into()).await?;
    let envelope = presentation::single(&contact, state.public_base_url.as_ref(), Utc::now());
    Ok(HttpResponse::Created().json(envelope))
}

/// Fetch one of the authenticated user's contacts.
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The contact", body = ContactEnvelope),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such contact", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "showContact"
)]
#[get("/contacts/{id}")]
pub async fn show_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ContactEnvelope>> {
    let user = session.require_user_id()?;
    let id = ContactId::new(path.into_inner());
    let contact = state.contacts_query.fetch(&user, id).await?;
    Ok(web::Json(presentation::single(
        &contact,
        state.public_base_url.as_ref(),
        Utc::now(),
    )))
}

/// Replace the business fields of one of the authenticated user's contacts.
#[utoipa::path(
    patch,
    path = "/api/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    request_body = ContactPayload,
    responses(
        (status = 200, description = "Updated contact with self link", body = ContactEnvelope),
        (status = 400, description = "Malformed payload", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such contact", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[patch("/contacts/{id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: Result<web::Json<ContactPayload>, actix_web::Error>,
) -> ApiResult<web::Json<ContactEnvelope>> {
    let user = session.require_user_id()?;
    let id = ContactId::new(path.into_inner());
    let payload = require_payload(payload)?;
    let contact = state.contacts.update(&user, id, payload.into()).await?;
    Ok(web::Json(presentation::single(
        &contact,
        state.public_base_url.as_ref(),
        Utc::now(),
    )))
}

/// Permanently delete one of the authenticated user's contacts.
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "No such contact", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact"
)]
#[delete("/contacts/{id}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let id = ContactId::new(path.into_inner());
    state.contacts.delete(&user, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactsService, UserId};
    use crate::inbound::http::test_utils::test_session_middleware;
    use crate::outbound::{InMemoryContactStore, InMemoryUserDirectory};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn payload() -> ContactPayload {
        ContactPayload {
            name: Some("Test Name".into()),
            email: Some("test@email.com".into()),
            birthday: Some("05/14/1988".into()),
            company: Some("ABC String".into()),
        }
    }

    fn state() -> HttpState {
        let service = Arc::new(ContactsService::new(Arc::new(InMemoryContactStore::new())));
        HttpState::new(
            service.clone(),
            service,
            Arc::new(InMemoryUserDirectory::new()),
        )
    }

    #[::core::prelude::v1::test]
    fn payload_maps_onto_domain_input() {
        let input: ContactInput = payload().into();
        assert_eq!(input.name.as_deref(), Some("Test Name"));
        assert_eq!(input.birthday.as_deref(), Some("05/14/1988"));
    }

    #[actix_web::test]
    async fn anonymous_requests_are_rejected_before_validation() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .wrap(test_session_middleware())
                .service(web::scope("/api").service(create_contact).service(list_contacts)),
        )
        .await;

        // An empty payload would otherwise be a validation failure; the
        // missing session must win.
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contacts")
                .set_json(ContactPayload {
                    name: None,
                    email: None,
                    birthday: None,
                    company: None,
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/contacts").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_body_without_a_session_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .wrap(test_session_middleware())
                .service(web::scope("/api").service(create_contact)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contacts")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_body_with_a_session_is_a_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .wrap(test_session_middleware())
                .route(
                    "/become-user",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_user(&UserId::random())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .service(web::scope("/api").service(create_contact)),
        )
        .await;

        let login = test::call_service(
            &app,
            test::TestRequest::get().uri("/become-user").to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/contacts")
                .cookie(cookie)
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
    }
}
