//! Catalog service.
//!
//! Catalogs are lists of strings (card names, creature types, powers, ...).

use std::sync::Arc;

use crate::client::{ClientInner, PaginatedResponse};
use crate::endpoint::{table, Args};
use crate::Result;

use super::list;

/// Service for catalog operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: scryfall_rs::ScryfallClient) -> scryfall_rs::Result<()> {
/// // By name; spacing, case and underscores are normalized.
/// let powers = client.catalog().get("Powers").await?;
/// let names = client.catalog().get("card_names").await?;
///
/// // Or through a named accessor.
/// let words = client.catalog().word_bank().await?.collect_all().await?;
/// println!("{} words", words.len());
/// # Ok(())
/// # }
/// ```
pub struct CatalogService {
    inner: Arc<ClientInner>,
}

impl CatalogService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Catalog by name, e.g. `"card-names"` or `"Keyword_Abilities"`.
    pub async fn get(&self, name: &str) -> Result<PaginatedResponse> {
        list(&self.inner, "catalog", Args::new().arg(name)).await
    }

    /// Names of every catalog the table knows.
    pub fn names(&self) -> Vec<&'static str> {
        table::children("catalog")
    }

    async fn fixed(&self, key: &str) -> Result<PaginatedResponse> {
        list(&self.inner, key, Args::new()).await
    }

    /// Every English card name.
    pub async fn card_names(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.card_names").await
    }

    /// Every artist name.
    pub async fn artist_names(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.artist_names").await
    }

    /// Every word that appears in a card name.
    pub async fn word_bank(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.word_bank").await
    }

    /// Creature types.
    pub async fn creature_types(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.creature_types").await
    }

    /// Planeswalker types.
    pub async fn planeswalker_types(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.planeswalker_types").await
    }

    /// Land types.
    pub async fn land_types(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.land_types").await
    }

    /// Artifact types.
    pub async fn artifact_types(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.artifact_types").await
    }

    /// Enchantment types.
    pub async fn enchantment_types(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.enchantment_types").await
    }

    /// Spell types.
    pub async fn spell_types(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.spell_types").await
    }

    /// Every printed power value.
    pub async fn powers(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.powers").await
    }

    /// Every printed toughness value.
    pub async fn toughnesses(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.toughnesses").await
    }

    /// Every printed loyalty value.
    pub async fn loyalties(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.loyalties").await
    }

    /// Watermarks.
    pub async fn watermarks(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.watermarks").await
    }

    /// Keyword abilities.
    pub async fn keyword_abilities(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.keyword_abilities").await
    }

    /// Keyword actions.
    pub async fn keyword_actions(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.keyword_actions").await
    }

    /// Ability words.
    pub async fn ability_words(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.ability_words").await
    }

    /// Supertypes.
    pub async fn supertypes(&self) -> Result<PaginatedResponse> {
        self.fixed("catalog.supertypes").await
    }
}
