//! Presentation mapper for the contact resource.
//!
//! Deterministic transform from a stored [`Contact`] to the external JSON
//! envelope. The shape is part of the API contract: a `data` object carrying
//! the business fields (birthday rendered `MM/DD/YYYY`, `last_updated` as a
//! human-relative duration) and, on single-contact responses, a `links.self`
//! URL pointing at the contact's read endpoint.
//!
//! The mapper takes `now` explicitly so responses are reproducible in tests.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use crate::domain::contact::{BIRTHDAY_DISPLAY_FORMAT, Contact, ContactId};

/// Business fields of one contact as exposed at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContactData {
    #[schema(example = 1)]
    pub contact_id: i64,
    pub name: String,
    pub email: String,
    #[schema(example = "05/14/1988")]
    pub birthday: String,
    pub company: String,
    #[schema(example = "3 minutes ago")]
    pub last_updated: String,
}

/// Hypermedia links attached to a single-contact response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Links {
    #[serde(rename = "self")]
    #[schema(example = "/api/contacts/1")]
    pub self_link: String,
}

/// Envelope around one contact. List items omit `links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContactEnvelope {
    pub data: ContactData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

/// Envelope around an ordered contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContactListEnvelope {
    pub data: Vec<ContactEnvelope>,
}

/// Canonical URL of a contact's read endpoint.
///
/// Absolute when a public base URL is configured, path-relative otherwise.
pub fn self_link(base: Option<&Url>, id: ContactId) -> String {
    let path = format!("/api/contacts/{id}");
    match base {
        Some(base) => base
            .join(path.trim_start_matches('/'))
            .map(|url| url.to_string())
            .unwrap_or(path),
        None => path,
    }
}

fn contact_data(contact: &Contact, now: DateTime<Utc>) -> ContactData {
    ContactData {
        contact_id: contact.id.as_i64(),
        name: contact.name.clone(),
        email: contact.email.clone(),
        birthday: contact.birthday.format(BIRTHDAY_DISPLAY_FORMAT).to_string(),
        company: contact.company.clone(),
        last_updated: humanize_since(contact.updated_at, now),
    }
}

/// Map a contact to the single-response envelope, including its self link.
pub fn single(contact: &Contact, base: Option<&Url>, now: DateTime<Utc>) -> ContactEnvelope {
    ContactEnvelope {
        data: contact_data(contact, now),
        links: Some(Links {
            self_link: self_link(base, contact.id),
        }),
    }
}

/// Map contacts to the list envelope, preserving the given order.
pub fn list(contacts: &[Contact], now: DateTime<Utc>) -> ContactListEnvelope {
    ContactListEnvelope {
        data: contacts
            .iter()
            .map(|contact| ContactEnvelope {
                data: contact_data(contact, now),
                links: None,
            })
            .collect(),
    }
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Render the elapsed time between `then` and `now` as a coarse
/// human-relative phrase, e.g. "3 minutes ago".
///
/// Clock skew can put `then` slightly ahead of `now`; that renders as
/// "just now" rather than a negative duration.
pub fn humanize_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds <= 1 {
        "just now".to_owned()
    } else if seconds < MINUTE {
        plural(seconds, "second")
    } else if seconds < HOUR {
        plural(seconds / MINUTE, "minute")
    } else if seconds < DAY {
        plural(seconds / HOUR, "hour")
    } else if seconds < MONTH {
        plural(seconds / DAY, "day")
    } else if seconds < YEAR {
        plural(seconds / MONTH, "month")
    } else {
        plural(seconds / YEAR, "year")
    }
}
