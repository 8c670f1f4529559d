//! HTTP client implementation for the Scryfall API.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::api::{BulkDataService, CardsService, CatalogService, SetsService, SymbologyService};
use crate::endpoint::Node;
use crate::{Error, Result};

use super::config::{Settings, SharedSettings, TransportConfig};
use super::transport::{HttpRequest, Method, ReqwestTransport, Transport};

/// The main client for the Scryfall API.
///
/// The client is the root of the endpoint tree. Typed services
/// ([`cards`](Self::cards), [`sets`](Self::sets), ...) and the dynamic
/// [`endpoint`](Self::endpoint) lookup both resolve through the same static
/// endpoint table.
///
/// # Example
///
/// ```no_run
/// use scryfall_rs::ScryfallClient;
///
/// # async fn example() -> scryfall_rs::Result<()> {
/// let client = ScryfallClient::new()?;
///
/// let mut results = client.cards().search("t:goblin c:r").await?;
/// println!("{:?} goblins", results.total());
///
/// let first = results.get(0).await?;
/// println!("{}", first["name"]);
/// # Ok(())
/// # }
/// ```
pub struct ScryfallClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) settings: SharedSettings,
}

impl ScryfallClient {
    /// Create a client using the process-wide settings and the default
    /// transport.
    pub fn new() -> Result<Self> {
        Self::with_settings(SharedSettings::global())
    }

    /// Create a client with its own settings handle.
    pub fn with_settings(settings: SharedSettings) -> Result<Self> {
        let transport = ReqwestTransport::new(&TransportConfig::default())?;
        Ok(Self::with_transport(settings, Arc::new(transport)))
    }

    /// Create a client with custom settings and transport configuration.
    pub fn with_config(settings: Settings, config: TransportConfig) -> Result<Self> {
        settings.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(
            SharedSettings::new(settings),
            Arc::new(transport),
        ))
    }

    /// Create a client over an arbitrary [`Transport`].
    pub fn with_transport(settings: SharedSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                settings,
            }),
        }
    }

    /// The settings handle this client reads on every request.
    pub fn settings(&self) -> &SharedSettings {
        &self.inner.settings
    }

    /// The root node of the endpoint tree.
    pub fn root(&self) -> Node {
        Node::root(self.inner.clone())
    }

    /// Look up a node by its dotted capability path, e.g.
    /// `"cards.multiverse"` or `"catalog.card_names"`.
    pub fn endpoint(&self, path: &str) -> Result<Node> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root(), |node, segment| node.child(segment))
    }

    /// Get the cards service.
    pub fn cards(&self) -> CardsService {
        CardsService::new(self.inner.clone())
    }

    /// Get the sets service.
    pub fn sets(&self) -> SetsService {
        SetsService::new(self.inner.clone())
    }

    /// Get the symbology service.
    pub fn symbology(&self) -> SymbologyService {
        SymbologyService::new(self.inner.clone())
    }

    /// Get the catalog service.
    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.inner.clone())
    }

    /// Get the bulk data service.
    pub fn bulk_data(&self) -> BulkDataService {
        BulkDataService::new(self.inner.clone())
    }

    /// Irregular root alias of `catalog.supertypes`, kept for parity with
    /// the accessor name users already know.
    pub fn catalog_supertypes(&self) -> Result<Node> {
        self.root().child("catalog_supertypes")
    }
}

/// Where a request goes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    /// Path relative to `{protocol}://{domain}/`
    Path(&'a str),
    /// Absolute URL (continuation cursors, download URIs)
    Url(&'a str),
}

impl ClientInner {
    fn url_for(settings: &Settings, target: Target<'_>) -> String {
        match target {
            Target::Path(path) => {
                format!("{}/{}", settings.base_url(), path.trim_start_matches('/'))
            }
            Target::Url(url) => url.to_string(),
        }
    }

    /// Settings headers overlaid with per-call ones.
    ///
    /// Header names are case-insensitive, so they are lowercased before
    /// merging and a per-call header replaces any settings header it matches.
    fn merge_headers(
        settings: &Settings,
        extra: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        settings
            .headers
            .iter()
            .chain(extra)
            .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
            .collect()
    }

    /// Throttle, then perform one request and decode its JSON body.
    ///
    /// The settings are read once, when the call starts.
    pub(crate) async fn execute(
        &self,
        method: Method,
        target: Target<'_>,
        query: &[(String, String)],
        body: Option<&Value>,
        headers: &BTreeMap<String, String>,
    ) -> Result<Value> {
        let settings = self.settings.snapshot();
        let request = HttpRequest {
            method,
            url: Self::url_for(&settings, target),
            query: query.to_vec(),
            headers: Self::merge_headers(&settings, headers),
            body: body.cloned(),
        };

        tokio::time::sleep(settings.throttle()).await;
        tracing::debug!(method = method.as_str(), url = %request.url, "Scryfall request");

        let response = self.transport.send(request).await?;

        if (200..300).contains(&response.status) {
            Ok(serde_json::from_slice(&response.body)?)
        } else {
            let err = Error::from_api_response(response.status, &response.body);
            tracing::debug!(status = response.status, error = %err, "Scryfall request failed");
            Err(err)
        }
    }

    /// Throttle, then stream a body into `sink` in `chunk_size` pieces.
    ///
    /// Returns the number of bytes written.
    pub(crate) async fn download<W>(
        &self,
        url: &str,
        headers: &BTreeMap<String, String>,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let settings = self.settings.snapshot();
        let request = HttpRequest {
            method: Method::Get,
            url: url.to_string(),
            query: Vec::new(),
            headers: Self::merge_headers(&settings, headers),
            body: None,
        };

        tokio::time::sleep(settings.throttle()).await;
        tracing::debug!(url = %request.url, chunk_size = settings.chunk_size, "Scryfall download");

        let mut response = self.transport.stream(request, settings.chunk_size).await?;

        if !(200..300).contains(&response.status) {
            let mut raw = Vec::new();
            while let Some(chunk) = response.chunks.next().await {
                raw.extend_from_slice(&chunk?);
            }
            return Err(Error::from_api_response(response.status, &raw));
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunks.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        tracing::debug!(url, bytes = written, "Scryfall download complete");
        Ok(written)
    }
}

impl Clone for ScryfallClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for ScryfallClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScryfallClient")
            .field("settings", &self.inner.settings.snapshot())
            .finish()
    }
}
