//! Contact resource service.
//!
//! Orchestrates input validation, the authorization policy, and the contact
//! store for the five lifecycle operations. Targeted operations look the
//! contact up first and consult the policy with the found record, so a denial
//! is reported as forbidden regardless of why.
//!
//! Callers must arrive authenticated; the HTTP adapter rejects anonymous
//! requests before any service method runs.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::contact::{Contact, ContactDraft, ContactId, ContactInput};
use crate::domain::policy::{ContactAction, Decision, decide};
use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, ContactsCommand, ContactsQuery,
};
use crate::domain::user::UserId;
use crate::domain::Error;

const FORBIDDEN_MESSAGE: &str = "this action is not allowed";
const NOT_FOUND_MESSAGE: &str = "no such contact";

/// Contact resource service implementing the driving ports.
#[derive(Clone)]
pub struct ContactsService<R> {
    repo: Arc<R>,
}

impl<R> ContactsService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> ContactsService<R>
where
    R: ContactRepository,
{
    fn map_repo_error(error: ContactRepositoryError) -> Error {
        match error {
            ContactRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("contact store unavailable: {message}"))
            }
            ContactRepositoryError::Query { message } => {
                Error::internal(format!("contact store error: {message}"))
            }
            // The row vanished between lookup and mutation; last write wins
            // and the loser sees the same outcome as a stale id.
            ContactRepositoryError::Missing { .. } => Error::not_found(NOT_FOUND_MESSAGE),
        }
    }

    fn authorize(user: &UserId, action: ContactAction, target: Option<&Contact>) -> Result<(), Error> {
        match decide(user, action, target) {
            Decision::Allow => Ok(()),
            Decision::Deny => {
                debug!(user = %user, ?action, "policy denied contact action");
                Err(Error::forbidden(FORBIDDEN_MESSAGE))
            }
        }
    }

    fn validate(input: &ContactInput) -> Result<ContactDraft, Error> {
        ContactDraft::validate(input).map_err(|fields| Error::validation_failed(&fields))
    }

    /// Look up a contact and authorize `action` against it.
    ///
    /// Absent ids surface as not-found; foreign ids as forbidden. The policy
    /// only ever sees records that exist.
    async fn find_authorized(
        &self,
        user: &UserId,
        id: ContactId,
        action: ContactAction,
    ) -> Result<Contact, Error> {
        let contact = self
            .repo
            .find_by_id(id)
            .await
            .map_err(Self::map_repo_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND_MESSAGE))?;
        Self::authorize(user, action, Some(&contact))?;
        Ok(contact)
    }
}

#[async_trait]
impl<R> ContactsQuery for ContactsService<R>
where
    R: ContactRepository,
{
    async fn list(&self, user: &UserId) -> Result<Vec<Contact>, Error> {
        Self::authorize(user, ContactAction::ViewAny, None)?;
        self.repo
            .list_by_owner(user)
            .await
            .map_err(Self::map_repo_error)
    }

    async fn fetch(&self, user: &UserId, id: ContactId) -> Result<Contact, Error> {
        self.find_authorized(user, id, ContactAction::View).await
    }
}

#[async_trait]
impl<R> ContactsCommand for ContactsService<R>
where
    R: ContactRepository,
{
    async fn create(&self, user: &UserId, input: ContactInput) -> Result<Contact, Error> {
        // Validation runs before the policy: it needs no target, and an
        // invalid payload must never reach the store.
        let draft = Self::validate(&input)?;
        Self::authorize(user, ContactAction::Create, None)?;
        self.repo
            .insert(user, draft)
            .await
            .map_err(Self::map_repo_error)
    }

    async fn update(
        &self,
        user: &UserId,
        id: ContactId,
        input: ContactInput,
    ) -> Result<Contact, Error> {
        self.find_authorized(user, id, ContactAction::Update).await?;
        let draft = Self::validate(&input)?;
        self.repo
            .update(id, draft)
            .await
            .map_err(Self::map_repo_error)
    }

    async fn delete(&self, user: &UserId, id: ContactId) -> Result<(), Error> {
        self.find_authorized(user, id, ContactAction::Delete).await?;
        self.repo.delete(id).await.map_err(Self::map_repo_error)
    }
}
