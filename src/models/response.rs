//! Response wrappers returned by endpoint calls.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::paginated::PaginatedResponse;
use crate::client::{ClientInner, Target};
use crate::endpoint::ResolvedRequest;
use crate::{Error, Result};

/// Record-style lookup shared by both wrappers.
///
/// Payload fields win over the wrapper's own attributes; a key found in
/// neither fails with [`Error::KeyNotFound`].
pub trait Keyed {
    /// Look up `key`.
    fn lookup(&self, key: &str) -> Result<Value>;

    /// Whether [`lookup`](Self::lookup) would succeed.
    fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_ok()
    }
}

/// A single JSON object returned by a non-paginated endpoint.
///
/// Read-only. Besides payload fields, [`get`](Self::get) answers `url`,
/// `endpoint`, `data` and `object` when the payload does not define them.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleResponse {
    endpoint: &'static str,
    url: String,
    data: Value,
}

impl SingleResponse {
    /// Wrap an already decoded payload.
    pub fn new(endpoint: &'static str, url: impl Into<String>, data: Value) -> Self {
        Self {
            endpoint,
            url: url.into(),
            data,
        }
    }

    pub(crate) async fn fetch(inner: &ClientInner, request: ResolvedRequest) -> Result<Self> {
        let url = inner.settings.snapshot().base_url() + "/" + &request.path;
        let data = inner
            .execute(
                request.method,
                Target::Path(&request.path),
                &request.query,
                request.body.as_ref(),
                &request.headers,
            )
            .await?;
        Ok(Self::new(request.endpoint, url, data))
    }

    /// Payload field, then wrapper attribute.
    pub fn get(&self, key: &str) -> Result<Value> {
        if let Some(value) = self.data.get(key) {
            return Ok(value.clone());
        }
        match key {
            "url" => Ok(Value::String(self.url.clone())),
            "endpoint" => Ok(Value::String(self.endpoint.to_string())),
            "data" => Ok(self.data.clone()),
            "object" => Ok(Value::Null),
            _ => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    /// Payload field as a string slice, if it is one.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// The raw payload.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consume the wrapper, returning the payload.
    pub fn into_data(self) -> Value {
        self.data
    }

    /// Key of the endpoint that produced this response.
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// URL the request went to (without query string).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The payload's `object` discriminator (`card`, `set`, ...).
    pub fn object(&self) -> Option<&str> {
        self.get_str("object")
    }

    /// Deserialize the payload into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

impl Keyed for SingleResponse {
    fn lookup(&self, key: &str) -> Result<Value> {
        self.get(key)
    }
}

/// Result of [`Node::call`](crate::endpoint::Node::call): which variant is
/// decided by the endpoint's declared pagination, not by the payload.
#[derive(Debug)]
pub enum Response {
    /// Non-paginated endpoint
    Single(SingleResponse),
    /// Paginated endpoint
    Paginated(PaginatedResponse),
}

impl Response {
    /// Whether this came from a paginated endpoint.
    pub fn is_paginated(&self) -> bool {
        matches!(self, Response::Paginated(_))
    }

    /// Borrow the single-object variant.
    pub fn as_single(&self) -> Option<&SingleResponse> {
        match self {
            Response::Single(single) => Some(single),
            Response::Paginated(_) => None,
        }
    }

    /// Borrow the paginated variant mutably (fetching needs `&mut`).
    pub fn as_paginated(&mut self) -> Option<&mut PaginatedResponse> {
        match self {
            Response::Paginated(list) => Some(list),
            Response::Single(_) => None,
        }
    }

    /// Take the single-object variant.
    pub fn into_single(self) -> Option<SingleResponse> {
        match self {
            Response::Single(single) => Some(single),
            Response::Paginated(_) => None,
        }
    }

    /// Take the paginated variant.
    pub fn into_paginated(self) -> Option<PaginatedResponse> {
        match self {
            Response::Paginated(list) => Some(list),
            Response::Single(_) => None,
        }
    }
}

impl Keyed for Response {
    fn lookup(&self, key: &str) -> Result<Value> {
        match self {
            Response::Single(single) => single.lookup(key),
            Response::Paginated(list) => list.lookup(key),
        }
    }
}
