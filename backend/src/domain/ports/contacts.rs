//! Driving ports for the contact resource.
//!
//! HTTP handlers depend on these traits rather than on the service type so
//! they stay testable without I/O. Every operation takes the authenticated
//! user explicitly; there is no ambient request context.

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::contact::{Contact, ContactId, ContactInput};
use crate::domain::user::UserId;

/// Read side of the contact resource.
#[async_trait]
pub trait ContactsQuery: Send + Sync {
    /// List the caller's own contacts in store order.
    async fn list(&self, user: &UserId) -> Result<Vec<Contact>, Error>;

    /// Fetch a single contact the caller owns.
    async fn fetch(&self, user: &UserId, id: ContactId) -> Result<Contact, Error>;
}

/// Write side of the contact resource.
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    /// Validate input and create a contact owned by the caller.
    async fn create(&self, user: &UserId, input: ContactInput) -> Result<Contact, Error>;

    /// Validate input and replace the business fields of a contact the caller
    /// owns. Either the full update lands or nothing changes.
    async fn update(
        &self,
        user: &UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Contact, Error>;

    /// Permanently delete a contact the caller owns.
    async fn delete(&self, user: &UserId, id: ContactId) -> Result<(), Error>;
}
