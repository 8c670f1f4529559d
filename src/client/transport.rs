//! The HTTP boundary.
//!
//! Everything above this module talks to a [`Transport`]; the default
//! [`ReqwestTransport`] performs real requests. Tests and embedders may plug
//! in their own implementation.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use super::config::TransportConfig;
use crate::{Error, Result};

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST with a JSON body
    Post,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully built request handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Merged headers
    pub headers: BTreeMap<String, String>,
    /// JSON body for POST requests
    pub body: Option<Value>,
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body bytes
    pub body: Bytes,
}

/// Chunked body of a streamed request.
pub type ChunkStream = BoxStream<'static, Result<Bytes>>;

/// Status and chunked body of a streamed request.
pub struct StreamResponse {
    /// HTTP status code
    pub status: u16,
    /// Body chunks of at most the requested size
    pub chunks: ChunkStream,
}

impl std::fmt::Debug for StreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Performs HTTP requests.
///
/// Implementations report a failure to obtain any response as
/// [`Error::Transport`]; any response, whatever its status, is returned as-is.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a request and buffer the whole body.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Perform a request and expose the body as chunks of `chunk_size` bytes
    /// (the last chunk may be shorter).
    async fn stream(&self, request: HttpRequest, chunk_size: usize) -> Result<StreamResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Build a transport from a configuration.
    ///
    /// The total timeout is applied per buffered request, never on the
    /// client, so streamed downloads are not cut off mid-body.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            timeout: config.timeout,
        })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self {
            http,
            timeout: None,
        }
    }

    fn build(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| Error::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        let builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        let mut builder = builder.headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        Ok(builder)
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> Error {
    Error::Transport {
        url: url.to_string(),
        source: Box::new(err),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.build(&request)?;
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        Ok(HttpResponse { status, body })
    }

    async fn stream(&self, request: HttpRequest, chunk_size: usize) -> Result<StreamResponse> {
        let response = self
            .build(&request)?
            .send()
            .await
            .map_err(|e| transport_error(&request.url, e))?;

        let status = response.status().as_u16();
        let url = request.url.clone();
        let raw = response
            .bytes_stream()
            .map(move |chunk| chunk.map_err(|e| transport_error(&url, e)))
            .boxed();

        Ok(StreamResponse {
            status,
            chunks: rechunk(raw, chunk_size),
        })
    }
}

/// Regroup a byte stream into chunks of exactly `chunk_size` bytes, except
/// for a possibly shorter final chunk. An error is passed through and ends
/// the stream.
pub fn rechunk(inner: ChunkStream, chunk_size: usize) -> ChunkStream {
    struct State {
        inner: ChunkStream,
        pending: BytesMut,
        done: bool,
    }

    let chunk_size = chunk_size.max(1);
    let state = State {
        inner,
        pending: BytesMut::new(),
        done: false,
    };

    stream::unfold(state, move |mut state| async move {
        loop {
            if state.pending.len() >= chunk_size {
                let chunk = state.pending.split_to(chunk_size).freeze();
                return Some((Ok(chunk), state));
            }
            if state.done {
                if state.pending.is_empty() {
                    return None;
                }
                let rest = state.pending.split().freeze();
                return Some((Ok(rest), state));
            }
            match state.inner.next().await {
                Some(Ok(bytes)) => state.pending.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    state.done = true;
                    state.pending.clear();
                    return Some((Err(e), state));
                }
                None => state.done = true,
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(parts: &[&'static [u8]]) -> ChunkStream {
        let items: Vec<Result<Bytes>> = parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        stream::iter(items).boxed()
    }

    #[tokio::test]
    async fn test_rechunk_regroups_bytes() {
        let chunks: Vec<Bytes> = rechunk(source(&[b"abc", b"defgh", b"ij"]), 4)
            .map(|c| c.unwrap())
            .collect()
            .await;

        assert_eq!(
            chunks,
            vec![
                Bytes::from_static(b"abcd"),
                Bytes::from_static(b"efgh"),
                Bytes::from_static(b"ij"),
            ]
        );
    }

    #[tokio::test]
    async fn test_rechunk_empty_stream() {
        let chunks: Vec<Result<Bytes>> = rechunk(source(&[]), 8).collect().await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_rechunk_stops_after_error() {
        let items: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"abcdef")),
            Err(Error::Config("boom".into())),
            Ok(Bytes::from_static(b"never")),
        ];
        let results: Vec<Result<Bytes>> = rechunk(stream::iter(items).boxed(), 4).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &Bytes::from_static(b"abcd"));
        assert!(results[1].is_err());
    }

    #[test]
    fn test_build_rejects_bad_header() {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        let request = HttpRequest {
            method: Method::Get,
            url: "https://api.scryfall.com/sets".to_string(),
            query: vec![],
            headers: [("bad header".to_string(), "x".to_string())].into_iter().collect(),
            body: None,
        };
        assert!(matches!(transport.build(&request), Err(Error::InvalidHeader(_))));
    }
}
