//! Shared helpers for HTTP adapter tests.

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;

/// Cookie session middleware with a throwaway key for in-process tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}
