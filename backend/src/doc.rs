//! OpenAPI document for the contacts API.
//!
//! Registers every HTTP path plus the request and response schemas, and the
//! session cookie security scheme. Swagger UI serves the document in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::contacts::ContactPayload;
use crate::inbound::http::users::CredentialsRequest;
use crate::presentation::{ContactData, ContactEnvelope, ContactListEnvelope, Links};

/// Attach the session cookie security scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/register or POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contacts API",
        description = "Session-authenticated contact management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::contacts::create_contact,
        crate::inbound::http::contacts::show_contact,
        crate::inbound::http::contacts::update_contact,
        crate::inbound::http::contacts::delete_contact,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        CredentialsRequest,
        ContactPayload,
        ContactData,
        ContactEnvelope,
        ContactListEnvelope,
        Links,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "contacts", description = "Contact records owned by the caller"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_contact_path() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/register"));
        assert!(paths.contains_key("/api/login"));
        assert!(paths.contains_key("/api/contacts"));
        assert!(paths.contains_key("/api/contacts/{id}"));
        assert!(paths.contains_key("/health/ready"));
        assert!(paths.contains_key("/health/live"));
    }

    #[test]
    fn error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.keys().any(|name| name.ends_with("Error")));
    }
}
