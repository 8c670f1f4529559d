//! The endpoint tree.
//!
//! A [`Node`] is a position in the tree plus the path parameters bound so
//! far. Descending with [`Node::child`] and calling with [`Node::call`] mirror
//! the remote API's URL hierarchy:
//!
//! ```no_run
//! use scryfall_rs::{Args, ScryfallClient};
//!
//! # async fn example(client: ScryfallClient) -> scryfall_rs::Result<()> {
//! // GET /cards/multiverse/409574/rulings
//! let rulings = client
//!     .endpoint("cards.multiverse")?
//!     .with(Args::new().param("id", 409574))?
//!     .child("rulings")?
//!     .call(Args::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Resolution is a pure function of the static [`table`] and the arguments;
//! [`Node::resolve`] exposes it without performing a request.

pub mod table;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::client::{paginated::PaginatedResponse, ClientInner, Method};
use crate::models::{Response, SingleResponse};
use crate::{Error, Result};

pub use table::EndpointSpec;

/// Arguments of one call: positional values, keyword values, per-call
/// headers and an optional JSON body.
///
/// ```
/// use scryfall_rs::Args;
///
/// let args = Args::new()
///     .arg("xln")
///     .arg(96)
///     .param("format", "json")
///     .header("Accept", "application/json");
/// assert_eq!(args.positional(), ["xln", "96"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<String>,
    keywords: Vec<(String, String)>,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl Args {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Append a keyword argument.
    pub fn param(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.keywords.push((name.into(), value.to_string()));
        self
    }

    /// Add a header for this call only.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the JSON body (POST endpoints).
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Positional arguments.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Keyword arguments, in the order given.
    pub fn keywords(&self) -> &[(String, String)] {
        &self.keywords
    }
}

/// A request ready for the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    /// Key of the endpoint that was finally selected
    pub endpoint: &'static str,
    /// HTTP method
    pub method: Method,
    /// Path relative to the API root
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// JSON body, POST only
    pub body: Option<Value>,
    /// Per-call headers
    pub headers: BTreeMap<String, String>,
    /// Whether the result is a paginated list
    pub paginated: bool,
}

/// Where a path value came from; used to detect double assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Bound,
    Positional,
    Keyword,
}

struct Binding {
    spec: &'static EndpointSpec,
    path: Vec<(&'static str, Option<(String, Source)>)>,
    query_positional: Vec<(&'static str, String)>,
    query: Vec<(String, String)>,
}

/// Apply alias redirects, then fill path parameters from bound values,
/// positional arguments and keywords. Anything left over becomes a query
/// parameter.
fn bind(
    start: &'static EndpointSpec,
    bound: &[(&'static str, String)],
    args: &Args,
    allow_query: bool,
) -> Result<Binding> {
    let mut spec = start;
    let mut keywords = args.keywords.clone();

    for _ in 0..table::ALIASES.len() {
        let Some(alias) = table::alias_for(spec.key, |kw| keywords.iter().any(|(k, _)| k == kw))
        else {
            break;
        };
        spec = table::lookup(alias.target)
            .ok_or_else(|| Error::UnknownEndpoint(alias.target.to_string()))?;
        // Every spelling of this alias fills the same slot, so two of them
        // collide there instead of leaking into the query.
        let spellings: Vec<&str> = table::ALIASES
            .iter()
            .filter(|a| a.node == alias.node && a.target == alias.target && a.param == alias.param)
            .map(|a| a.keyword)
            .collect();
        for (name, _) in keywords.iter_mut() {
            if spellings.contains(&name.as_str()) {
                *name = alias.param.to_string();
            }
        }
    }

    let mut path: Vec<(&'static str, Option<(String, Source)>)> = spec
        .params
        .iter()
        .map(|param| {
            let value = bound
                .iter()
                .find(|(name, _)| name == param)
                .map(|(_, v)| (v.clone(), Source::Bound));
            (*param, value)
        })
        .collect();

    let open_path = path.iter().filter(|(_, v)| v.is_none()).count();
    let open_slots = if allow_query {
        open_path + spec.query_positional.len()
    } else {
        open_path
    };
    if args.positional.len() > open_slots {
        return Err(Error::TooManyArguments {
            endpoint: spec.key.to_string(),
            expected: open_slots,
            given: args.positional.len(),
        });
    }

    let mut positional = args.positional.iter();
    for (_, slot) in path.iter_mut().filter(|(_, v)| v.is_none()) {
        match positional.next() {
            Some(value) => *slot = Some((value.clone(), Source::Positional)),
            None => break,
        }
    }
    let query_positional: Vec<(&'static str, String)> = spec
        .query_positional
        .iter()
        .zip(positional)
        .map(|(name, value)| (*name, value.clone()))
        .collect();

    let mut query = Vec::new();
    for (name, value) in keywords {
        if let Some((param, slot)) = path.iter_mut().find(|(p, _)| *p == name) {
            if slot.is_some() {
                return Err(Error::AmbiguousParameter {
                    endpoint: spec.key.to_string(),
                    param: param.to_string(),
                });
            }
            *slot = Some((value, Source::Keyword));
        } else if query_positional.iter().any(|(p, _)| *p == name) {
            return Err(Error::AmbiguousParameter {
                endpoint: spec.key.to_string(),
                param: name,
            });
        } else if allow_query {
            query.push((name, value));
        } else {
            return Err(Error::UnexpectedParameter {
                endpoint: spec.key.to_string(),
                param: name,
            });
        }
    }

    Ok(Binding {
        spec,
        path,
        query_positional,
        query,
    })
}

/// Lower-case, trim and hyphenate a name (`Card_Names` becomes `card-names`).
pub(crate) fn slug(value: &str) -> String {
    value.trim().to_lowercase().replace('_', "-")
}

fn render(spec: &EndpointSpec, values: &[(&'static str, String)]) -> String {
    let mut path = spec.template.to_string();
    for (param, value) in values {
        let value = if spec.normalize { slug(value) } else { value.clone() };
        path = path.replace(&format!("{{{param}}}"), &urlencoding::encode(&value));
    }
    path
}

/// Resolve a call on `start` into a concrete request.
pub(crate) fn resolve(
    start: &'static EndpointSpec,
    bound: &[(&'static str, String)],
    args: &Args,
) -> Result<ResolvedRequest> {
    let binding = bind(start, bound, args, true)?;
    let spec = binding.spec;

    let mut values = Vec::with_capacity(binding.path.len());
    for (param, slot) in binding.path {
        match slot {
            Some((value, _)) => values.push((param, value)),
            None => {
                return Err(Error::MissingPathParameter {
                    endpoint: spec.key.to_string(),
                    param: param.to_string(),
                })
            }
        }
    }

    let mut query: Vec<(String, String)> = binding
        .query_positional
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    query.extend(binding.query);

    let body = match (&args.body, spec.method) {
        (Some(body), Method::Post) => Some(body.clone()),
        (Some(_), Method::Get) => {
            tracing::warn!(endpoint = spec.key, "Ignoring JSON body on a GET endpoint");
            None
        }
        (None, _) => None,
    };

    Ok(ResolvedRequest {
        endpoint: spec.key,
        method: spec.method,
        path: render(spec, &values),
        query,
        body,
        headers: args.headers.clone(),
        paginated: spec.paginated,
    })
}

/// A position in the endpoint tree.
///
/// Nodes are cheap to create and hold no state besides their position and
/// the path parameters bound with [`with`](Self::with).
#[derive(Clone)]
pub struct Node {
    inner: Arc<ClientInner>,
    spec: Option<&'static EndpointSpec>,
    bound: Vec<(&'static str, String)>,
}

impl Node {
    pub(crate) fn root(inner: Arc<ClientInner>) -> Self {
        Self {
            inner,
            spec: None,
            bound: Vec::new(),
        }
    }

    pub(crate) fn at(inner: Arc<ClientInner>, key: &str) -> Result<Self> {
        let spec = table::lookup(key).ok_or_else(|| Error::UnknownEndpoint(key.to_string()))?;
        Ok(Self {
            inner,
            spec: Some(spec),
            bound: Vec::new(),
        })
    }

    /// Dotted key of this node (`""` for the root).
    pub fn key(&self) -> &'static str {
        self.spec.map(|s| s.key).unwrap_or("")
    }

    /// Static descriptor of this node, `None` for the root.
    pub fn spec(&self) -> Option<&'static EndpointSpec> {
        self.spec
    }

    /// Path parameters bound so far.
    pub fn bound(&self) -> &[(&'static str, String)] {
        &self.bound
    }

    /// Names of the children reachable from here.
    pub fn children(&self) -> Vec<&'static str> {
        table::children(self.key())
    }

    /// Descend to a child node. `-` in `name` is read as `_`, so
    /// `child("card-names")` and `child("card_names")` are the same node.
    pub fn child(&self, name: &str) -> Result<Node> {
        let name = name.trim().replace('-', "_");
        let key = table::child_key(self.key(), &name).ok_or_else(|| {
            let parent = self.key();
            Error::UnknownEndpoint(if parent.is_empty() {
                name.clone()
            } else {
                format!("{parent}.{name}")
            })
        })?;
        let spec = table::lookup(key).ok_or_else(|| Error::UnknownEndpoint(key.to_string()))?;

        Ok(Node {
            inner: self.inner.clone(),
            spec: Some(spec),
            bound: self.bound.clone(),
        })
    }

    /// Bind path parameters without issuing a request.
    ///
    /// Aliases apply, so `sets.with(code=X)` is the `sets.code` node with
    /// `code` bound. Parameters may be left open for a later call.
    pub fn with(&self, args: Args) -> Result<Node> {
        let spec = self.callable()?;
        let binding = bind(spec, &self.bound, &args, false)?;

        let mut bound = self.bound.clone();
        for (param, slot) in binding.path {
            if let Some((value, source)) = slot {
                if source != Source::Bound {
                    bound.retain(|(name, _)| *name != param);
                    bound.push((param, value));
                }
            }
        }

        Ok(Node {
            inner: self.inner.clone(),
            spec: Some(binding.spec),
            bound,
        })
    }

    /// Resolve a call into a request without performing it.
    pub fn resolve(&self, args: &Args) -> Result<ResolvedRequest> {
        resolve(self.callable()?, &self.bound, args)
    }

    /// Resolve and perform the call.
    ///
    /// The endpoint's declared pagination decides the wrapper: a paginated
    /// endpoint returns [`Response::Paginated`] even for zero results.
    pub async fn call(&self, args: Args) -> Result<Response> {
        let request = self.resolve(&args)?;
        if request.paginated {
            Ok(Response::Paginated(
                PaginatedResponse::fetch(self.inner.clone(), request).await?,
            ))
        } else {
            Ok(Response::Single(
                SingleResponse::fetch(&self.inner, request).await?,
            ))
        }
    }

    fn callable(&self) -> Result<&'static EndpointSpec> {
        self.spec
            .ok_or_else(|| Error::UnknownEndpoint("the root node is not callable".to_string()))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key())
            .field("bound", &self.bound)
            .finish()
    }
}
