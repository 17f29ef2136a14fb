//! User identity.
//!
//! The backend never mutates users beyond registration; a [`UserId`] is the
//! only identity detail the contact lifecycle needs. Credentials live behind
//! the user directory port.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    #[error("user id must not be empty")]
    Empty,
    #[error("user id must be a valid UUID")]
    Invalid,
}

/// Stable user identifier stored as a UUID.
///
/// Serialized as its canonical string form; deserialization re-validates so a
/// tampered session cookie can never smuggle in a malformed id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserIdError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserIdError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdError::Invalid);
        }
        let parsed = Uuid::parse_str(id).map_err(|_| UserIdError::Invalid)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_canonical_uuid() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("", UserIdError::Empty)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserIdError::Invalid)]
    #[case("not-a-uuid", UserIdError::Invalid)]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: UserIdError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[test]
    fn serde_round_trips() {
        let id = UserId::random();
        let json = serde_json::to_string(&id).expect("serialize");
        let back: UserId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, back);
    }

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
    }
}
