//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! status codes and JSON payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::contact::FieldErrors;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed and could not be interpreted.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request was well-formed but one or more fields failed validation.
    ValidationFailed,
    /// A required collaborator is temporarily unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

/// Error payload returned to adapters.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("no such contact");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct Error {
    #[schema(example = "validation_failed")]
    code: ErrorCode,
    #[schema(example = "one or more fields failed validation")]
    message: String,
    /// Supplementary structured context, e.g. a field→reason map for
    /// validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    ///
    /// Forbidden responses deliberately carry no detail about why access was
    /// denied, so the caller cannot distinguish a foreign contact from other
    /// denial reasons.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Build a [`ErrorCode::ValidationFailed`] error enumerating every
    /// failing field.
    pub fn validation_failed(fields: &FieldErrors) -> Self {
        Self::new(
            ErrorCode::ValidationFailed,
            "one or more fields failed validation",
        )
        .with_details(json!({ "fields": fields.as_map() }))
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::FieldErrors;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
    #[case(Error::forbidden("no"), ErrorCode::Forbidden)]
    #[case(Error::not_found("gone"), ErrorCode::NotFound)]
    #[case(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_expected_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn validation_failed_carries_every_field() {
        let mut fields = FieldErrors::default();
        fields.push("name", "the name field is required");
        fields.push("email", "the email must be a valid email address");

        let error = Error::validation_failed(&fields);
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
        let details = error
            .details()
            .and_then(|value| value.get("fields"))
            .and_then(|value| value.as_object())
            .expect("fields map");
        assert_eq!(details.len(), 2);
        assert_eq!(
            details.get("name").and_then(|v| v.as_str()),
            Some("the name field is required")
        );
    }

    #[test]
    fn error_serializes_code_as_snake_case() {
        let error = Error::validation_failed(&FieldErrors::default());
        let value = serde_json::to_value(&error).expect("serialize error");
        assert_eq!(
            value.get("code").and_then(|v| v.as_str()),
            Some("validation_failed")
        );
    }
}
