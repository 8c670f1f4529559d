//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use serde_json::{json, Value};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use scryfall_rs::client::{rechunk, HttpRequest, HttpResponse, StreamResponse};
use scryfall_rs::{Error, Result, ScryfallClient, Settings, SharedSettings, Transport};

pub const BASE: &str = "https://api.scryfall.com";

static INIT: Once = Once::new();

/// Initialize logging for tests
pub fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

enum Scripted {
    Reply(u16, Bytes),
    Fail,
}

/// In-memory transport answering scripted replies per URL, in order.
///
/// The last reply for a URL is repeated once its queue is down to one.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, url: &str, reply: Scripted) {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn reply(&self, url: &str, status: u16, body: Value) {
        self.push(url, Scripted::Reply(status, Bytes::from(body.to_string())));
    }

    pub fn reply_raw(&self, url: &str, status: u16, body: &'static [u8]) {
        self.push(url, Scripted::Reply(status, Bytes::from_static(body)));
    }

    /// Next call to `url` fails without a response.
    pub fn fail(&self, url: &str) {
        self.push(url, Scripted::Fail);
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    fn next(&self, request: HttpRequest) -> Result<(u16, Bytes)> {
        let url = request.url.clone();
        self.calls.lock().unwrap().push((Instant::now(), request));

        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(&url)
            .unwrap_or_else(|| panic!("unscripted request to {url}"));
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|r| match r {
                Scripted::Reply(status, body) => Scripted::Reply(*status, body.clone()),
                Scripted::Fail => Scripted::Fail,
            })
        };
        match reply {
            Some(Scripted::Reply(status, body)) => Ok((status, body)),
            Some(Scripted::Fail) | None => Err(Error::Transport {
                url,
                source: "connection reset".into(),
            }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let (status, body) = self.next(request)?;
        Ok(HttpResponse { status, body })
    }

    async fn stream(&self, request: HttpRequest, chunk_size: usize) -> Result<StreamResponse> {
        let (status, body) = self.next(request)?;
        let pieces: Vec<Result<Bytes>> = body
            .chunks(3)
            .map(|piece| Ok(Bytes::copy_from_slice(piece)))
            .collect();
        Ok(StreamResponse {
            status,
            chunks: rechunk(stream::iter(pieces).boxed(), chunk_size),
        })
    }
}

/// Client over `transport` with no throttle delay.
pub fn client(transport: Arc<MockTransport>) -> ScryfallClient {
    client_with(transport, Settings::default().with_sleep_time(0.0))
}

pub fn client_with(transport: Arc<MockTransport>, settings: Settings) -> ScryfallClient {
    init_logging();
    ScryfallClient::with_transport(SharedSettings::new(settings), transport)
}

/// Page URL of the scripted search listing.
pub fn page_url(page: usize) -> String {
    format!("{BASE}/cards/search?page={page}")
}

/// Script a search over pages of the given sizes. Records are numbered
/// from 0 across pages.
pub fn script_search(transport: &MockTransport, sizes: &[usize]) {
    let total: usize = sizes.iter().sum();
    let mut start = 0;
    for (i, size) in sizes.iter().enumerate() {
        let has_more = i + 1 < sizes.len();
        let data: Vec<Value> = (start..start + size)
            .map(|n| json!({"object": "card", "n": n}))
            .collect();
        let mut page = json!({
            "object": "list",
            "total_cards": total,
            "has_more": has_more,
            "data": data,
        });
        if has_more {
            page["next_page"] = json!(page_url(i + 2));
        }
        let url = if i == 0 {
            format!("{BASE}/cards/search")
        } else {
            page_url(i + 1)
        };
        transport.reply(&url, 200, page);
        start += size;
    }
}
