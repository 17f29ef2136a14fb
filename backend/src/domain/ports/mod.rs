//! Domain ports: the seams between the core and its collaborators.

mod contact_repository;
mod contacts;
mod user_directory;

pub use contact_repository::{ContactRepository, ContactRepositoryError};
pub use contacts::{ContactsCommand, ContactsQuery};
pub use user_directory::{UserDirectory, UserDirectoryError};

#[cfg(test)]
pub use contact_repository::MockContactRepository;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
