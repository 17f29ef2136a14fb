//! HTTP inbound adapter.
//!
//! Translates actix requests into calls on the domain ports and domain errors
//! into JSON responses. No business rules live here.

pub mod contacts;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::ApiResult;
pub use state::HttpState;
