//! Domain primitives and services.
//!
//! Everything here is transport agnostic: the policy, the contact lifecycle
//! service, and the ports they speak through. Inbound adapters map domain
//! errors to protocol-specific envelopes.

pub mod contact;
pub mod contacts_service;
pub mod error;
pub mod policy;
pub mod ports;
pub mod user;

pub use self::contact::{Contact, ContactDraft, ContactId, ContactInput, FieldErrors};
pub use self::contacts_service::ContactsService;
pub use self::error::{Error, ErrorCode};
pub use self::user::{UserId, UserIdError};

/// Convenient result alias for domain operations.
pub type DomainResult<T> = Result<T, Error>;
