//! API service modules for Scryfall endpoints.
//!
//! Each service provides methods for interacting with one group of the
//! Scryfall API. Every method resolves through the endpoint table, so
//! `client.sets().code("khm")` issues exactly the request that
//! `client.endpoint("sets.code")?.call(Args::new().arg("khm"))` does.

mod bulk_data;
mod cards;
mod catalog;
mod sets;
mod symbology;

use std::sync::Arc;

use crate::client::{ClientInner, PaginatedResponse};
use crate::endpoint::{Args, Node};
use crate::models::SingleResponse;
use crate::Result;

pub use bulk_data::BulkDataService;
pub use cards::{CardIdKind, CardsService};
pub use catalog::CatalogService;
pub use sets::SetsService;
pub use symbology::SymbologyService;

/// Call a non-paginated endpoint by key.
pub(crate) async fn single(
    inner: &Arc<ClientInner>,
    key: &str,
    args: Args,
) -> Result<SingleResponse> {
    let request = Node::at(inner.clone(), key)?.resolve(&args)?;
    SingleResponse::fetch(inner, request).await
}

/// Call a paginated endpoint by key.
pub(crate) async fn list(
    inner: &Arc<ClientInner>,
    key: &str,
    args: Args,
) -> Result<PaginatedResponse> {
    let request = Node::at(inner.clone(), key)?.resolve(&args)?;
    PaginatedResponse::fetch(inner.clone(), request).await
}
