//! HTTP client and service layer for the Scryfall API.
//!
//! This module provides the main entry point [`ScryfallClient`] together with
//! the settings it reads on every request and the [`Transport`] seam that
//! performs the actual I/O.
//!
//! # Example
//!
//! ```no_run
//! use scryfall_rs::{ScryfallClient, Settings, SharedSettings};
//!
//! # async fn example() -> scryfall_rs::Result<()> {
//! let settings = SharedSettings::new(Settings::new().with_sleep_time(0.2));
//! let client = ScryfallClient::with_settings(settings.clone())?;
//!
//! let set = client.sets().code("khm").await?;
//! println!("{}", set.get("name")?);
//!
//! // Takes effect on the next request.
//! settings.update(|s| s.sleep_time = 0.5)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
mod transport;

pub use config::{Protocol, Settings, SharedSettings, TransportConfig};
pub use http::ScryfallClient;
pub use paginated::{PaginatedResponse, Records};
pub use transport::{
    rechunk, ChunkStream, HttpRequest, HttpResponse, Method, ReqwestTransport, StreamResponse,
    Transport,
};
pub(crate) use http::{ClientInner, Target};
