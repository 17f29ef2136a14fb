//! Port for user registration and credential verification.
//!
//! The identity mechanism itself is a trusted collaborator; this port is the
//! seam the HTTP adapter uses to register users and resolve login credentials
//! to a [`UserId`]. How credentials are stored or hashed is the adapter's
//! concern.

use async_trait::async_trait;

use crate::domain::user::UserId;

/// Errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserDirectoryError {
    /// Lookup or mutation failed during execution.
    #[error("user directory query failed: {message}")]
    Query { message: String },
    /// The username is already registered.
    #[error("username {username} is already taken")]
    DuplicateUsername { username: String },
}

/// Port resolving credentials to user identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a new user, returning the assigned id.
    async fn register(&self, username: &str, password: &str)
    -> Result<UserId, UserDirectoryError>;

    /// Verify credentials, returning the user's id on a match and `None`
    /// otherwise. Unknown usernames and wrong passwords are indistinguishable
    /// to the caller.
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserId>, UserDirectoryError>;
}
