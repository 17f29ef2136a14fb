//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ContactsService;
use crate::inbound::http::contacts::{
    create_contact, delete_contact, list_contacts, show_contact, update_contact,
};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{login, register};
use crate::middleware::RequestId;
use crate::outbound::{InMemoryContactStore, InMemoryUserDirectory};

use std::sync::Arc;

/// Wire the default adapters behind the HTTP state.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let service = Arc::new(ContactsService::new(Arc::new(InMemoryContactStore::new())));
    let state = HttpState::new(
        service.clone(),
        service,
        Arc::new(InMemoryUserDirectory::new()),
    );
    match &config.public_base_url {
        Some(base) => state.with_public_base_url(base.clone()),
        None => state,
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api")
        .wrap(session)
        .service(register)
        .service(login)
        .service(list_contacts)
        .service(create_contact)
        .service(show_contact)
        .service(update_contact)
        .service(delete_contact);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestId)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server and mark it ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        public_base_url: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
