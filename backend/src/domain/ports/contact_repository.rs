//! Port for contact persistence.
//!
//! The store is an external collaborator: a keyed repository with relational
//! filtering by owner. It assigns ids on insert and maintains the created and
//! updated timestamps. Single-record operations are assumed atomic.

use async_trait::async_trait;

use crate::domain::contact::{Contact, ContactDraft, ContactId};
use crate::domain::user::UserId;

/// Errors raised by contact repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactRepositoryError {
    /// Repository connection could not be established.
    #[error("contact repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("contact repository query failed: {message}")]
    Query { message: String },
    /// A targeted mutation found no row for the id.
    #[error("no contact with id {id}")]
    Missing { id: ContactId },
}

/// Port for contact storage and retrieval.
///
/// `update` replaces the four business fields in one write and refreshes the
/// updated timestamp; `delete` removes the row permanently. Both fail with
/// [`ContactRepositoryError::Missing`] when the id is absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// List every contact owned by `owner`, in stable store order.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Fetch a contact by id, returning `None` when absent.
    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Insert a new contact owned by `owner`, assigning id and timestamps.
    async fn insert(
        &self,
        owner: &UserId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactRepositoryError>;

    /// Replace the business fields of an existing contact.
    async fn update(
        &self,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactRepositoryError>;

    /// Permanently remove a contact.
    async fn delete(&self, id: ContactId) -> Result<(), ContactRepositoryError>;
}
