//! # scryfall-rs
//!
//! An async Rust client for the [Scryfall](https://scryfall.com/docs/api)
//! Magic: The Gathering card API.
//!
//! The API is exposed twice over the same static endpoint table:
//!
//! - **Typed services**: `client.cards().search(..)`, `client.sets().code(..)`,
//!   `client.catalog().get(..)`, `client.bulk_data().by_type(..)`, ...
//! - **The endpoint tree**: `client.endpoint("cards.multiverse")?` returns a
//!   [`Node`] that can be descended, partially bound and called with
//!   positional and keyword [`Args`], mirroring the URL hierarchy.
//!
//! ## Features
//!
//! - **Lazy pagination**: list endpoints return a [`PaginatedResponse`] that
//!   fetches further pages only when a record past the buffer is requested
//! - **Record lookup**: both response wrappers answer key lookups through
//!   [`Keyed`], falling back from payload fields to wrapper attributes
//! - **Politeness**: a configurable delay precedes every request
//! - **Bulk downloads**: stream the daily exports to any `AsyncWrite` sink
//!   or straight to a file
//! - **Pluggable transport**: everything above [`Transport`] is pure logic
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scryfall_rs::{Keyed, ScryfallClient};
//!
//! #[tokio::main]
//! async fn main() -> scryfall_rs::Result<()> {
//!     let client = ScryfallClient::new()?;
//!
//!     // A single card
//!     let card = client.cards().named_exact("Lightning Bolt").await?;
//!     println!("{} costs {}", card.get("name")?, card.get("mana_cost")?);
//!
//!     // A lazily paginated search
//!     let mut goblins = client.cards().search("t:goblin").await?;
//!     println!("{} goblins in total", goblins.lookup("total_cards")?);
//!
//!     let mut records = goblins.records();
//!     while let Some(card) = records.next().await {
//!         println!("{}", card?["name"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## The Endpoint Tree
//!
//! ```rust,no_run
//! use scryfall_rs::{Args, Keyed, ScryfallClient};
//!
//! #[tokio::main]
//! async fn main() -> scryfall_rs::Result<()> {
//!     let client = ScryfallClient::new()?;
//!
//!     // GET /sets/khm, through an alias keyword on `sets`
//!     let khm = client
//!         .endpoint("sets")?
//!         .call(Args::new().param("code", "khm"))
//!         .await?;
//!     println!("{}", khm.lookup("name")?);
//!
//!     // GET /cards/xln/96/ja
//!     let card = client
//!         .endpoint("cards.code")?
//!         .call(Args::new().arg("xln").arg(96).param("lang", "ja"))
//!         .await?;
//!     println!("{}", card.lookup("printed_name")?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Settings
//!
//! ```rust,no_run
//! use scryfall_rs::{ScryfallClient, Settings, SharedSettings};
//!
//! # fn example() -> scryfall_rs::Result<()> {
//! // Process-wide defaults, changeable at runtime
//! SharedSettings::global().update(|s| s.sleep_time = 0.25)?;
//!
//! // Or a client with its own settings, read from SCRYFALL_* variables
//! let client = ScryfallClient::with_settings(SharedSettings::new(Settings::from_env()?))?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use client::{
    PaginatedResponse, Protocol, ReqwestTransport, ScryfallClient, Settings, SharedSettings,
    Transport, TransportConfig,
};
pub use endpoint::{Args, Node, ResolvedRequest};
pub use models::{CardIdentifier, Keyed, Response, SingleResponse};

/// Prelude module for convenient imports.
///
/// ```rust
/// use scryfall_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        BulkDataService, CardIdKind, CardsService, CatalogService, SetsService,
        SymbologyService,
    };
    pub use crate::client::{
        PaginatedResponse, Protocol, Records, ScryfallClient, Settings, SharedSettings,
        TransportConfig,
    };
    pub use crate::endpoint::{Args, Node};
    pub use crate::error::{Error, Result};
    pub use crate::models::{CardIdentifier, Keyed, Response, SingleResponse};
}
