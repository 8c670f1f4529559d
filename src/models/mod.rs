//! Data models for the Scryfall API.
//!
//! Payloads are kept as [`serde_json::Value`]; the wrappers here add record
//! lookup and, for lists, lazy page loading.
//!
//! - [`response`] - Single-object and paginated response wrappers
//! - [`identifiers`] - Card identifiers for collection requests

pub mod identifiers;
pub mod response;

pub use identifiers::{collection_body, CardIdentifier, MAX_COLLECTION_IDENTIFIERS};
pub use response::{Keyed, Response, SingleResponse};
pub use crate::client::paginated::PaginatedResponse;
