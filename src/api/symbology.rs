//! Symbology service.

use std::sync::Arc;

use crate::client::{ClientInner, PaginatedResponse};
use crate::endpoint::Args;
use crate::models::SingleResponse;
use crate::Result;

use super::{list, single};

/// Service for card symbols and mana costs.
pub struct SymbologyService {
    inner: Arc<ClientInner>,
}

impl SymbologyService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Every card symbol.
    pub async fn list(&self) -> Result<PaginatedResponse> {
        list(&self.inner, "symbology", Args::new()).await
    }

    /// Parse a mana cost string such as `"2WW"` into its normalized form.
    pub async fn parse_mana(&self, cost: &str) -> Result<SingleResponse> {
        single(&self.inner, "symbology.parse_mana", Args::new().arg(cost)).await
    }
}
