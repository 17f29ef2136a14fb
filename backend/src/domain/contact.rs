//! Contact aggregate and input validation.
//!
//! A contact always belongs to exactly one user, fixed at creation. The four
//! business fields (name, email, birthday, company) are validated together so
//! a single failed request reports every failing field at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Store-assigned contact identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored contact record.
///
/// ## Invariants
/// - `owner` is fixed at creation and never transferred.
/// - The four business fields are non-empty; `email` is syntactically valid
///   and `birthday` is a normalized calendar date.
/// - `updated_at` is refreshed by the store on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub owner: UserId,
    pub name: String,
    pub email: String,
    pub birthday: NaiveDate,
    pub company: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated contact fields as supplied by a caller.
///
/// Deliberately has no owner field: the owning user is always taken from the
/// authenticated identity, never from input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<String>,
    pub company: Option<String>,
}

/// Validated business fields ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub birthday: NaiveDate,
    pub company: String,
}

/// Ordered field→reason map collected during validation.
///
/// Ordered so error payloads are stable for clients and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// Textual date formats accepted for birthdays, tried in order.
const BIRTHDAY_FORMATS: &[&str] = &["%m/%d/%Y", "%B %d, %Y", "%Y-%m-%d"];

/// Rendering format for birthdays at the boundary.
pub const BIRTHDAY_DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Parse a birthday from any accepted textual format.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    BIRTHDAY_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn require_non_empty(value: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Some(raw.trim().to_owned()),
        _ => {
            errors.push(field, format!("the {field} field is required"));
            None
        }
    }
}

impl ContactDraft {
    /// Validate raw input into a draft, collecting every failing field.
    ///
    /// Create and update apply identical rules; no partial result is ever
    /// produced.
    pub fn validate(input: &ContactInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = require_non_empty(input.name.as_deref(), "name", &mut errors);
        let company = require_non_empty(input.company.as_deref(), "company", &mut errors);

        let email = require_non_empty(input.email.as_deref(), "email", &mut errors)
            .and_then(|candidate| {
                if email_regex().is_match(&candidate) {
                    Some(candidate)
                } else {
                    errors.push("email", "the email must be a valid email address");
                    None
                }
            });

        let birthday = require_non_empty(input.birthday.as_deref(), "birthday", &mut errors)
            .and_then(|candidate| match parse_birthday(&candidate) {
                Some(date) => Some(date),
                None => {
                    errors.push("birthday", "the birthday is not a valid date");
                    None
                }
            });

        match (name, email, birthday, company) {
            (Some(name), Some(email), Some(birthday), Some(company)) if errors.is_empty() => {
                Ok(Self {
                    name,
                    email,
                    birthday,
                    company,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn full_input() -> ContactInput {
        ContactInput {
            name: Some("Test Name".into()),
            email: Some("test@email.com".into()),
            birthday: Some("05/14/1988".into()),
            company: Some("ABC String".into()),
        }
    }

    #[test]
    fn valid_input_produces_draft() {
        let draft = ContactDraft::validate(&full_input()).expect("valid input");
        assert_eq!(draft.name, "Test Name");
        assert_eq!(draft.email, "test@email.com");
        assert_eq!(
            draft.birthday,
            NaiveDate::from_ymd_opt(1988, 5, 14).expect("date")
        );
        assert_eq!(draft.company, "ABC String");
    }

    #[rstest]
    #[case::name("name")]
    #[case::email("email")]
    #[case::birthday("birthday")]
    #[case::company("company")]
    fn each_field_is_required(#[case] field: &str) {
        let mut input = full_input();
        match field {
            "name" => input.name = Some(String::new()),
            "email" => input.email = None,
            "birthday" => input.birthday = Some("   ".into()),
            "company" => input.company = None,
            other => panic!("unexpected field {other}"),
        }

        let errors = ContactDraft::validate(&input).expect_err("missing field");
        assert!(errors.contains(field), "expected error for {field}");
    }

    #[test]
    fn all_failing_fields_are_enumerated_together() {
        let errors = ContactDraft::validate(&ContactInput::default()).expect_err("empty input");
        for field in ["name", "email", "birthday", "company"] {
            assert!(errors.contains(field), "expected error for {field}");
        }
        assert_eq!(errors.as_map().len(), 4);
    }

    #[test]
    fn email_must_be_syntactically_valid() {
        let mut input = full_input();
        input.email = Some("NOT AN EMAIL".into());

        let errors = ContactDraft::validate(&input).expect_err("invalid email");
        assert!(errors.contains("email"));
        assert_eq!(errors.as_map().len(), 1);
    }

    #[rstest]
    #[case("05/14/1988")]
    #[case("May 14, 1988")]
    #[case("1988-05-14")]
    fn accepted_birthday_formats_normalize_to_one_date(#[case] raw: &str) {
        let date = parse_birthday(raw).expect("parseable date");
        assert_eq!(date, NaiveDate::from_ymd_opt(1988, 5, 14).expect("date"));
        assert_eq!(date.format(BIRTHDAY_DISPLAY_FORMAT).to_string(), "05/14/1988");
    }

    #[rstest]
    #[case("14/05/1988")]
    #[case("yesterday")]
    #[case("02/30/1988")]
    fn unparseable_birthdays_are_rejected(#[case] raw: &str) {
        assert!(parse_birthday(raw).is_none());
        let mut input = full_input();
        input.birthday = Some(raw.into());
        let errors = ContactDraft::validate(&input).expect_err("invalid birthday");
        assert!(errors.contains("birthday"));
    }
}
