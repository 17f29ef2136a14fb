//! In-memory adapters for the contact store and user directory.
//!
//! Single-process stand-ins for the external persistence collaborators. Each
//! guards its table with an `RwLock`, giving the row-level atomicity the
//! service relies on: one lookup plus at most one mutation per request, last
//! write wins.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::contact::{Contact, ContactDraft, ContactId};
use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, UserDirectory, UserDirectoryError,
};
use crate::domain::user::UserId;

#[derive(Debug, Default)]
struct ContactTable {
    next_id: i64,
    // BTreeMap keeps iteration in id order, so lists are stable.
    rows: BTreeMap<ContactId, Contact>,
}

/// In-memory [`ContactRepository`] adapter.
#[derive(Debug, Default)]
pub struct InMemoryContactStore {
    table: RwLock<ContactTable>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ContactTable> {
        self.table
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ContactTable> {
        self.table
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactStore {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(self
            .read()
            .rows
            .values()
            .filter(|contact| contact.owner == *owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ContactId) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self.read().rows.get(&id).cloned())
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut table = self.write();
        table.next_id += 1;
        let id = ContactId::new(table.next_id);
        let now = Utc::now();
        let contact = Contact {
            id,
            owner: owner.clone(),
            name: draft.name,
            email: draft.email,
            birthday: draft.birthday,
            company: draft.company,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, contact.clone());
        Ok(contact)
    }

    async fn update(
        &self,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut table = self.write();
        let row = table
            .rows
            .get_mut(&id)
            .ok_or(ContactRepositoryError::Missing { id })?;
        row.name = draft.name;
        row.email = draft.email;
        row.birthday = draft.birthday;
        row.company = draft.company;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: ContactId) -> Result<(), ContactRepositoryError> {
        let mut table = self.write();
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(ContactRepositoryError::Missing { id })
    }
}

#[derive(Debug, Clone)]
struct DirectoryEntry {
    id: UserId,
    password: String,
}

/// In-memory [`UserDirectory`] adapter keyed by username.
///
/// Stores passwords as given; credential hashing belongs to the real identity
/// provider this adapter stands in for.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    entries: RwLock<HashMap<String, DirectoryEntry>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserId, UserDirectoryError> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if entries.contains_key(username) {
            return Err(UserDirectoryError::DuplicateUsername {
                username: username.to_owned(),
            });
        }
        let id = UserId::random();
        entries.insert(
            username.to_owned(),
            DirectoryEntry {
                id: id.clone(),
                password: password.to_owned(),
            },
        );
        Ok(id)
    }

    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserId>, UserDirectoryError> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries
            .get(username)
            .filter(|entry| entry.password == password)
            .map(|entry| entry.id.clone()))
    }
}
