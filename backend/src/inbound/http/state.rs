//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{ContactsCommand, ContactsQuery, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub contacts: Arc<dyn ContactsCommand>,
    pub contacts_query: Arc<dyn ContactsQuery>,
    pub directory: Arc<dyn UserDirectory>,
    /// Public base for `self` links; links stay path-relative when unset.
    pub public_base_url: Option<Url>,
}

impl HttpState {
    /// Construct state from port implementations, without a public base URL.
    pub fn new(
        contacts: Arc<dyn ContactsCommand>,
        contacts_query: Arc<dyn ContactsQuery>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            contacts,
            contacts_query,
            directory,
            public_base_url: None,
        }
    }

    /// Attach the public base URL used to render absolute `self` links.
    #[must_use]
    pub fn with_public_base_url(mut self, base: Url) -> Self {
        self.public_base_url = Some(base);
        self
    }
}
