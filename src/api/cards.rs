//! Cards service for card lookup and search.

use std::fmt;
use std::sync::Arc;

use crate::client::{ClientInner, PaginatedResponse};
use crate::endpoint::{Args, Node};
use crate::models::{collection_body, CardIdentifier, SingleResponse};
use crate::Result;

use super::{list, single};

/// External catalog a card id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardIdKind {
    /// Gatherer multiverse id
    Multiverse,
    /// Magic Online id
    Mtgo,
    /// MTG Arena id
    Arena,
    /// TCGplayer product id
    Tcgplayer,
    /// Cardmarket product id
    Cardmarket,
}

impl CardIdKind {
    /// Endpoint key of the lookup for this kind.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CardIdKind::Multiverse => "cards.multiverse",
            CardIdKind::Mtgo => "cards.mtgo",
            CardIdKind::Arena => "cards.arena",
            CardIdKind::Tcgplayer => "cards.tcgplayer",
            CardIdKind::Cardmarket => "cards.cardmarket",
        }
    }

    fn rulings_endpoint(&self) -> &'static str {
        match self {
            CardIdKind::Multiverse => "cards.multiverse.rulings",
            CardIdKind::Mtgo => "cards.mtgo.rulings",
            CardIdKind::Arena => "cards.arena.rulings",
            CardIdKind::Tcgplayer => "cards.tcgplayer.rulings",
            CardIdKind::Cardmarket => "cards.cardmarket.rulings",
        }
    }
}

/// Service for card operations.
///
/// # Example
///
/// ```no_run
/// use scryfall_rs::{Args, CardIdentifier};
///
/// # async fn example(client: scryfall_rs::ScryfallClient) -> scryfall_rs::Result<()> {
/// // Full-text search, with extra options forwarded as query parameters
/// let mut results = client
///     .cards()
///     .search_with(Args::new().arg("t:goblin").param("order", "cmc"))
///     .await?;
/// println!("{:?} matches", results.total());
///
/// // A specific printing
/// let plunder = client.cards().code("xln", "96").await?;
/// println!("{}", plunder.get("name")?);
///
/// // Many cards at once
/// let found = client
///     .cards()
///     .collection(&[CardIdentifier::name("Opt"), CardIdentifier::multiverse_id(409574)])
///     .await?;
/// println!("missing: {:?}", found.not_found());
/// # Ok(())
/// # }
/// ```
pub struct CardsService {
    inner: Arc<ClientInner>,
}

impl CardsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// The `cards` node, for dynamic access.
    pub fn node(&self) -> Result<Node> {
        Node::at(self.inner.clone(), "cards")
    }

    /// Full-text search using Scryfall's query syntax.
    pub async fn search(&self, query: &str) -> Result<PaginatedResponse> {
        self.search_with(Args::new().arg(query)).await
    }

    /// Search with arbitrary options (`unique`, `order`, `dir`, ...).
    pub async fn search_with(&self, args: Args) -> Result<PaginatedResponse> {
        list(&self.inner, "cards.search", args).await
    }

    /// Card with exactly this name.
    pub async fn named_exact(&self, name: &str) -> Result<SingleResponse> {
        self.named(Args::new().param("exact", name)).await
    }

    /// Best fuzzy match for `name`.
    pub async fn named_fuzzy(&self, name: &str) -> Result<SingleResponse> {
        self.named(Args::new().param("fuzzy", name)).await
    }

    /// Name lookup with arbitrary options (`exact`/`fuzzy`, `set`, ...).
    pub async fn named(&self, args: Args) -> Result<SingleResponse> {
        single(&self.inner, "cards.named", args).await
    }

    /// Up to 20 card names starting with `query`, as a catalog object.
    pub async fn autocomplete(&self, query: &str) -> Result<SingleResponse> {
        single(&self.inner, "cards.autocomplete", Args::new().arg(query)).await
    }

    /// A random card.
    pub async fn random(&self) -> Result<SingleResponse> {
        single(&self.inner, "cards.random", Args::new()).await
    }

    /// A random card matching a search query.
    pub async fn random_matching(&self, query: &str) -> Result<SingleResponse> {
        single(&self.inner, "cards.random", Args::new().param("q", query)).await
    }

    /// Fetch up to 75 cards in one request.
    ///
    /// Identifiers that matched nothing are reported by
    /// [`PaginatedResponse::not_found`].
    pub async fn collection(&self, identifiers: &[CardIdentifier]) -> Result<PaginatedResponse> {
        let body = collection_body(identifiers)?;
        tracing::debug!(count = identifiers.len(), "Requesting card collection");
        list(&self.inner, "cards.collection", Args::new().body(body)).await
    }

    /// Card by Scryfall id.
    pub async fn by_id(&self, id: &str) -> Result<SingleResponse> {
        single(&self.inner, "cards.id", Args::new().arg(id)).await
    }

    /// Rulings of a card by Scryfall id.
    pub async fn rulings(&self, id: &str) -> Result<PaginatedResponse> {
        list(&self.inner, "cards.id.rulings", Args::new().arg(id)).await
    }

    /// Card by set code and collector number.
    pub async fn code(&self, set: &str, number: impl fmt::Display) -> Result<SingleResponse> {
        single(&self.inner, "cards.code", Args::new().arg(set).arg(number)).await
    }

    /// Card by set code and collector number, in a given language.
    pub async fn code_lang(
        &self,
        set: &str,
        number: impl fmt::Display,
        lang: &str,
    ) -> Result<SingleResponse> {
        let args = Args::new().arg(set).arg(number).arg(lang);
        single(&self.inner, "cards.code.lang", args).await
    }

    /// Rulings of a card by set code and collector number.
    pub async fn code_rulings(
        &self,
        set: &str,
        number: impl fmt::Display,
    ) -> Result<PaginatedResponse> {
        list(&self.inner, "cards.code.rulings", Args::new().arg(set).arg(number)).await
    }

    /// Every printing sharing an oracle id.
    pub async fn oracle(&self, oracle_id: &str) -> Result<PaginatedResponse> {
        list(&self.inner, "cards.oracle", Args::new().arg(oracle_id)).await
    }

    /// Card by an external catalog id.
    pub async fn by(&self, kind: CardIdKind, id: impl fmt::Display) -> Result<SingleResponse> {
        single(&self.inner, kind.endpoint(), Args::new().arg(id)).await
    }

    /// Rulings of a card by an external catalog id.
    pub async fn rulings_by(
        &self,
        kind: CardIdKind,
        id: impl fmt::Display,
    ) -> Result<PaginatedResponse> {
        list(&self.inner, kind.rulings_endpoint(), Args::new().arg(id)).await
    }
}
