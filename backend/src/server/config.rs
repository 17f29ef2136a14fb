//! HTTP server configuration.

use actix_web::cookie::{Key, SameSite};
use std::net::SocketAddr;
use url::Url;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) public_base_url: Option<Url>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            public_base_url: None,
        }
    }

    /// Attach the externally visible base URL used to render absolute `self`
    /// links. Links stay path-relative when unset.
    #[must_use]
    pub fn with_public_base_url(mut self, base: Url) -> Self {
        self.public_base_url = Some(base);
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
