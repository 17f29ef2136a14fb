//! Registration and login HTTP handlers.
//!
//! ```text
//! POST /api/register {"username":"ada","password":"secret"}
//! POST /api/login    {"username":"ada","password":"secret"}
//! ```
//!
//! Both establish a session cookie on success. Credential storage and
//! verification live behind the user directory port.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UserDirectoryError;
use crate::domain::{Error, FieldErrors};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credentials payload shared by register and login.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn validate_credentials(payload: &CredentialsRequest) -> Result<(String, String), Error> {
    let mut errors = FieldErrors::default();
    let username = match payload.username.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Some(name.to_owned()),
        _ => {
            errors.push("username", "the username field is required");
            None
        }
    };
    let password = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => Some(password.to_owned()),
        _ => {
            errors.push("password", "the password field is required");
            None
        }
    };
    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => Err(Error::validation_failed(&errors)),
    }
}

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
        UserDirectoryError::DuplicateUsername { .. } => {
            let mut fields = FieldErrors::default();
            fields.push("username", "the username has already been taken");
            Error::validation_failed(&fields)
        }
    }
}

/// Register a new user and establish a session.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered, session established"),
        (status = 422, description = "Validation failed or username taken", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = validate_credentials(&payload)?;
    let user_id = state
        .directory
        .register(&username, &password)
        .await
        .map_err(map_directory_error)?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Created().finish())
}

/// Verify credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success, session established"),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 422, description = "Validation failed", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let (username, password) = validate_credentials(&payload)?;
    let user_id = state
        .directory
        .verify(&username, &password)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactsService;
    use crate::inbound::http::test_utils::test_session_middleware;
    use crate::outbound::{InMemoryContactStore, InMemoryUserDirectory};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn test_app_state() -> HttpState {
        let service = Arc::new(ContactsService::new(Arc::new(InMemoryContactStore::new())));
        HttpState::new(
            service.clone(),
            service,
            Arc::new(InMemoryUserDirectory::new()),
        )
    }

    fn credentials(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    macro_rules! init_auth_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(test_app_state()))
                    .wrap(test_session_middleware())
                    .service(web::scope("/api").service(register).service(login)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn register_establishes_a_session() {
        let app = init_auth_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(credentials("ada", "secret"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }

    #[actix_web::test]
    async fn register_rejects_duplicate_usernames() {
        let app = init_auth_app!();
        let first = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(credentials("ada", "secret"))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(credentials("ada", "other"))
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let value: Value = test::read_body_json(second).await;
        assert!(value.pointer("/details/fields/username").is_some());
    }

    #[actix_web::test]
    async fn register_enumerates_missing_fields() {
        let app = init_auth_app!();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(CredentialsRequest {
                    username: None,
                    password: None,
                })
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let value: Value = test::read_body_json(res).await;
        assert!(value.pointer("/details/fields/username").is_some());
        assert!(value.pointer("/details/fields/password").is_some());
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials() {
        let app = init_auth_app!();
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(credentials("ada", "secret"))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(credentials("ada", "wrong"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn login_succeeds_with_registered_credentials() {
        let app = init_auth_app!();
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/register")
                .set_json(credentials("ada", "secret"))
                .to_request(),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/login")
                .set_json(credentials("ada", "secret"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(
            res.response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
    }
}
