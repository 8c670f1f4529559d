//! Lazily paginated list responses.
//!
//! A [`PaginatedResponse`] buffers the records of every page fetched so far
//! and follows the API's `next_page` cursor only when a caller asks for a
//! record past the end of the buffer. Pages are appended strictly in cursor
//! order and never fetched twice.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::http::{ClientInner, Target};
use super::transport::Method;
use crate::endpoint::ResolvedRequest;
use crate::models::Keyed;
use crate::{Error, Result};

/// Continuation metadata of one page.
#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    has_more: bool,
    next_page: Option<String>,
    total_cards: Option<u64>,
    total_items: Option<u64>,
    total_values: Option<u64>,
    #[serde(default)]
    not_found: Vec<Value>,
    #[serde(default)]
    warnings: Vec<String>,
}

/// One decoded page: records plus everything else at the top level.
#[derive(Debug)]
struct Page {
    records: Vec<Value>,
    meta: Map<String, Value>,
    info: PageInfo,
}

impl Page {
    /// List, catalog and collection payloads carry their records in `data`.
    /// Anything else is taken as a single record.
    fn parse(payload: Value) -> Result<Self> {
        match payload {
            Value::Object(mut meta) => match meta.remove("data") {
                Some(Value::Array(records)) => {
                    let info: PageInfo = serde_json::from_value(Value::Object(meta.clone()))?;
                    Ok(Self { records, meta, info })
                }
                Some(other) => {
                    meta.insert("data".to_string(), other);
                    Ok(Self::single(Value::Object(meta)))
                }
                None => Ok(Self::single(Value::Object(meta))),
            },
            Value::Array(records) => Ok(Self {
                records,
                meta: Map::new(),
                info: PageInfo::default(),
            }),
            other => Ok(Self::single(other)),
        }
    }

    fn single(record: Value) -> Self {
        Self {
            records: vec![record],
            meta: Map::new(),
            info: PageInfo::default(),
        }
    }

    fn cursor(&self) -> Option<String> {
        match (self.info.has_more, &self.info.next_page) {
            (true, Some(url)) => Some(url.clone()),
            (true, None) => {
                tracing::warn!("Page reports has_more without a next_page; treating list as complete");
                None
            }
            (false, _) => None,
        }
    }

    fn total(&self) -> Option<u64> {
        self.info
            .total_cards
            .or(self.info.total_items)
            .or(self.info.total_values)
    }
}

/// A list response that fetches further pages on demand.
///
/// It is both a keyed record ([`Keyed::lookup`] over its own metadata) and an
/// ordered sequence ([`get`](Self::get), [`records`](Self::records),
/// [`stream`](Self::stream)).
///
/// Whether pages load lazily is fixed when the response is created, from
/// the `lazy_loading` setting at that time; with lazy loading off, every
/// page is fetched before the response is returned.
///
/// A failed fetch leaves the buffer and cursor as they were, so retrying the
/// same access resumes at the page that failed.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: scryfall_rs::ScryfallClient) -> scryfall_rs::Result<()> {
/// let mut goblins = client.cards().search("t:goblin").await?;
///
/// // Fetches pages until index 300 is buffered.
/// let card = goblins.get(300).await?;
/// println!("{}", card["name"]);
///
/// let mut records = goblins.records();
/// while let Some(card) = records.next().await {
///     println!("{}", card?["name"]);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PaginatedResponse {
    inner: Arc<ClientInner>,
    endpoint: &'static str,
    headers: BTreeMap<String, String>,
    lazy: bool,
    buffer: Vec<Value>,
    cursor: Option<String>,
    meta: Map<String, Value>,
    total: Option<u64>,
    not_found: Vec<Value>,
    warnings: Vec<String>,
    pages: usize,
}

impl PaginatedResponse {
    /// Perform the first request and, when lazy loading is off, every
    /// following one.
    pub(crate) async fn fetch(inner: Arc<ClientInner>, request: ResolvedRequest) -> Result<Self> {
        let lazy = inner.settings.snapshot().lazy_loading;
        let payload = inner
            .execute(
                request.method,
                Target::Path(&request.path),
                &request.query,
                request.body.as_ref(),
                &request.headers,
            )
            .await?;

        let mut response = Self {
            inner,
            endpoint: request.endpoint,
            headers: request.headers,
            lazy,
            buffer: Vec::new(),
            cursor: None,
            meta: Map::new(),
            total: None,
            not_found: Vec::new(),
            warnings: Vec::new(),
            pages: 0,
        };
        response.absorb(Page::parse(payload)?);

        if !lazy {
            response.load().await?;
        }
        Ok(response)
    }

    fn absorb(&mut self, page: Page) {
        let next = page.cursor();
        if next.is_some() && next == self.cursor {
            tracing::warn!(endpoint = self.endpoint, "next_page did not advance; stopping pagination");
            self.cursor = None;
        } else {
            self.cursor = next;
        }

        self.total = page.total().or(self.total);
        self.pages += 1;
        tracing::trace!(
            endpoint = self.endpoint,
            page = self.pages,
            records = page.records.len(),
            complete = self.cursor.is_none(),
            "Appended page"
        );

        self.buffer.extend(page.records);
        self.not_found.extend(page.info.not_found);
        self.warnings.extend(page.info.warnings);
        self.meta = page.meta;
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let Some(url) = self.cursor.clone() else {
            return Ok(());
        };
        let payload = self
            .inner
            .execute(Method::Get, Target::Url(&url), &[], None, &self.headers)
            .await?;
        self.absorb(Page::parse(payload)?);
        Ok(())
    }

    /// Fetch pages until `index` is buffered or the list is complete.
    /// Returns whether `index` is now buffered.
    async fn ensure(&mut self, index: usize) -> Result<bool> {
        while self.lazy && index >= self.buffer.len() && self.cursor.is_some() {
            self.fetch_next_page().await?;
        }
        Ok(index < self.buffer.len())
    }

    /// Record at `index`, fetching pages as needed.
    pub async fn get(&mut self, index: usize) -> Result<&Value> {
        self.ensure(index).await?;
        let len = self.buffer.len();
        self.buffer
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Fetch every remaining page. Does nothing once complete.
    pub async fn load(&mut self) -> Result<()> {
        while self.cursor.is_some() {
            self.fetch_next_page().await?;
        }
        Ok(())
    }

    /// Load every page and return all records.
    pub async fn collect_all(mut self) -> Result<Vec<Value>> {
        self.load().await?;
        Ok(self.buffer)
    }

    /// Sequential cursor over the records, starting at index 0.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            response: self,
            index: 0,
            failed: false,
        }
    }

    /// The records as a [`Stream`], starting at index 0. The stream ends
    /// after yielding a fetch error.
    pub fn stream(&mut self) -> impl Stream<Item = Result<Value>> + '_ {
        stream::try_unfold((self, 0usize), |(this, index)| async move {
            if let Err(e) = this.ensure(index).await {
                return Err(e);
            }
            let record = this.buffer.get(index).cloned();
            Ok(record.map(|record| (record, (this, index + 1))))
        })
    }

    /// Records fetched so far.
    pub fn buffered(&self) -> &[Value] {
        &self.buffer
    }

    /// Number of records fetched so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether no records have been fetched.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the last page has been fetched.
    pub fn is_complete(&self) -> bool {
        self.cursor.is_none()
    }

    /// Whether pages are fetched on demand.
    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    /// URL of the next page, if any.
    pub fn next_page(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Number of pages fetched.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Total reported by the API, or the record count once complete.
    pub fn total(&self) -> Option<u64> {
        self.total
            .or_else(|| self.is_complete().then_some(self.buffer.len() as u64))
    }

    /// Identifiers the API could not match (collection requests).
    pub fn not_found(&self) -> &[Value] {
        &self.not_found
    }

    /// Warnings the API attached to any page.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Key of the endpoint that produced this list.
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Own metadata first (latest page, without `data`), then computed
    /// attributes. Never looks into the records.
    pub fn field(&self, key: &str) -> Result<Value> {
        if let Some(value) = self.meta.get(key) {
            return Ok(value.clone());
        }
        let value = match key {
            "total" => self.total().map(Value::from).unwrap_or(Value::Null),
            "has_more" => Value::Bool(!self.is_complete()),
            "next_page" => self.cursor.clone().map(Value::String).unwrap_or(Value::Null),
            "object" => Value::String("list".to_string()),
            "len" => Value::from(self.buffer.len()),
            "endpoint" => Value::String(self.endpoint.to_string()),
            "not_found" => Value::Array(self.not_found.clone()),
            "warnings" => Value::from(self.warnings.clone()),
            _ => return Err(Error::KeyNotFound(key.to_string())),
        };
        Ok(value)
    }
}

impl Keyed for PaginatedResponse {
    fn lookup(&self, key: &str) -> Result<Value> {
        self.field(key)
    }
}

impl fmt::Debug for PaginatedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedResponse")
            .field("endpoint", &self.endpoint)
            .field("buffered", &self.buffer.len())
            .field("total", &self.total())
            .field("next_page", &self.cursor)
            .field("lazy", &self.lazy)
            .finish()
    }
}

/// Sequential cursor returned by [`PaginatedResponse::records`].
///
/// After yielding an error it yields nothing more; call `records()` again
/// to retry from the buffered state.
pub struct Records<'a> {
    response: &'a mut PaginatedResponse,
    index: usize,
    failed: bool,
}

impl Records<'_> {
    /// Next record, fetching a page first if the buffer is exhausted.
    pub async fn next(&mut self) -> Option<Result<Value>> {
        if self.failed {
            return None;
        }
        match self.response.ensure(self.index).await {
            Ok(true) => {
                let record = self.response.buffer.get(self.index).cloned();
                self.index += 1;
                record.map(Ok)
            }
            Ok(false) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    /// Index of the record the next call will yield.
    pub fn position(&self) -> usize {
        self.index
    }
}
