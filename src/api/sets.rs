//! Sets service.

use std::fmt;
use std::sync::Arc;

use crate::client::{ClientInner, PaginatedResponse};
use crate::endpoint::Args;
use crate::models::SingleResponse;
use crate::Result;

use super::{list, single};

/// Service for set operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: scryfall_rs::ScryfallClient) -> scryfall_rs::Result<()> {
/// let kaldheim = client.sets().code("khm").await?;
/// println!("{} cards", kaldheim.get("card_count")?);
///
/// let mut all = client.sets().list().await?;
/// println!("{:?} sets", all.total());
/// # Ok(())
/// # }
/// ```
pub struct SetsService {
    inner: Arc<ClientInner>,
}

impl SetsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// All sets.
    pub async fn list(&self) -> Result<PaginatedResponse> {
        list(&self.inner, "sets", Args::new()).await
    }

    /// Set by its three to five letter code.
    pub async fn code(&self, code: &str) -> Result<SingleResponse> {
        single(&self.inner, "sets.code", Args::new().arg(code)).await
    }

    /// Set by Scryfall id.
    pub async fn id(&self, id: &str) -> Result<SingleResponse> {
        single(&self.inner, "sets.id", Args::new().arg(id)).await
    }

    /// Set by TCGplayer group id.
    pub async fn tcgplayer(&self, id: impl fmt::Display) -> Result<SingleResponse> {
        single(&self.inner, "sets.tcgplayer", Args::new().arg(id)).await
    }
}
