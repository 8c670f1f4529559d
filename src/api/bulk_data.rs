//! Bulk data service for the daily card database exports.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWrite;

use crate::client::{ClientInner, PaginatedResponse};
use crate::endpoint::Args;
use crate::models::SingleResponse;
use crate::{Error, Result};

use super::{list, single};

/// Service for bulk data items and their downloads.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: scryfall_rs::ScryfallClient) -> scryfall_rs::Result<()> {
/// let bulk = client.bulk_data();
/// let item = bulk.by_type("oracle_cards").await?;
///
/// // Written to ./data/<file name of download_uri> when ./data exists,
/// // otherwise to the working directory.
/// let path = bulk.download_to_dir(&item, Some("data".as_ref())).await?;
/// println!("saved to {}", path.display());
/// # Ok(())
/// # }
/// ```
pub struct BulkDataService {
    inner: Arc<ClientInner>,
}

impl BulkDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Every bulk data item.
    pub async fn list(&self) -> Result<PaginatedResponse> {
        list(&self.inner, "bulk_data", Args::new()).await
    }

    /// Bulk data item by Scryfall id.
    pub async fn by_id(&self, id: &str) -> Result<SingleResponse> {
        single(&self.inner, "bulk_data.id", Args::new().arg(id)).await
    }

    /// Bulk data item by type, e.g. `oracle_cards` or `default_cards`.
    pub async fn by_type(&self, kind: &str) -> Result<SingleResponse> {
        single(&self.inner, "bulk_data.type", Args::new().arg(kind)).await
    }

    /// Stream the item's `download_uri` into `sink`.
    ///
    /// Returns the number of bytes written.
    pub async fn download<W>(&self, item: &SingleResponse, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let uri = download_uri(item)?;
        self.inner.download(&uri, &Default::default(), sink).await
    }

    /// Download the item into `dir`, named after the last segment of its
    /// `download_uri`, and return the file's path.
    ///
    /// An absolute `dir` is used as given. A relative one is joined to the
    /// working directory if that directory exists; otherwise, and when `dir`
    /// is `None`, the file lands in the working directory.
    ///
    /// The body is written to a temporary file in the same directory and
    /// renamed over the target only once the download completes, so a failed
    /// download leaves any existing file untouched.
    pub async fn download_to_dir(
        &self,
        item: &SingleResponse,
        dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let uri = download_uri(item)?;
        let dir = save_dir(dir).await?;
        let path = dir.join(file_name(&uri)?);

        let (file, temp_path) = tempfile::Builder::new()
            .prefix(".scryfall-")
            .suffix(".part")
            .tempfile_in(&dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        // On any early return `temp_path` is dropped and the partial file removed.
        let bytes = self.inner.download(&uri, &Default::default(), &mut file).await?;
        file.sync_all().await?;
        drop(file);

        temp_path.persist(&path).map_err(|e| Error::Io(e.error))?;
        tracing::info!(path = %path.display(), bytes, "Saved bulk data file");
        Ok(path)
    }
}

fn download_uri(item: &SingleResponse) -> Result<String> {
    item.get_str("download_uri")
        .map(String::from)
        .ok_or_else(|| Error::KeyNotFound("download_uri".to_string()))
}

/// Last path segment of `uri`, kept percent-encoded.
///
/// Encoded separators stay inert, and names that would still leave the
/// target directory are rejected.
fn file_name(uri: &str) -> Result<String> {
    let url = url::Url::parse(uri)?;
    let invalid = |reason: &str| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("download URI {reason}: {uri}"),
        ))
    };
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| invalid("has no file name"))?;
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(invalid("has an unsafe file name"));
    }
    Ok(name.to_string())
}

async fn save_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let Some(dir) = dir else {
        return Ok(cwd);
    };
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let joined = cwd.join(dir);
    match tokio::fs::metadata(&joined).await {
        Ok(meta) if meta.is_dir() => Ok(joined),
        _ => {
            tracing::debug!(dir = %dir.display(), "Directory not found, saving to working directory");
            Ok(cwd)
        }
    }
}
