//! Offline asset cache for the service worker
//!
//! Each build stores its assets in its own named cache (a generation). Installing
//! fills the new generation, activating deletes every other one, and requests
//! are answered from the cache or the network depending on their kind.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from the cache or the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OfflineError {
    /// A cache operation failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// A network request failed.
    #[error("Network error: {0}")]
    Network(String),
}

/// How a request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A page navigation.
    Navigate,
    /// Anything else: scripts, styles, images, `fetch()`.
    Other,
}

/// The parts of a request that decide how it is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    /// HTTP method.
    pub method: String,
    /// Absolute url.
    pub url: String,
    /// How the request was made.
    pub mode: RequestMode,
}

/// How to answer a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Try the network, fall back to the cache.
    NetworkFirst,
    /// Try the cache, fall back to the network.
    CacheFirst,
    /// Do not intercept.
    PassThrough,
}

fn same_origin(url: &str, origin: &str) -> bool {
    url.strip_prefix(origin)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
}

/// Pick the strategy for a request made from a page at `origin`.
#[must_use]
pub fn strategy(request: &RequestInfo, origin: &str) -> Strategy {
    if !request.method.eq_ignore_ascii_case("GET") {
        Strategy::PassThrough
    } else if request.mode == RequestMode::Navigate {
        Strategy::NetworkFirst
    } else if same_origin(&request.url, origin) {
        Strategy::CacheFirst
    } else {
        Strategy::PassThrough
    }
}

/// Messages a page can post to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlMessage {
    /// Activate the waiting worker now instead of when every tab closes.
    SkipWaiting,
}

impl ControlMessage {
    /// Parse a posted message, ignoring anything unrecognised.
    #[must_use]
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Cache storage and network access, as provided by the host.
#[allow(async_fn_in_trait)]
pub trait CacheBackend {
    /// A request to answer.
    type Request;
    /// A response to a request.
    type Response;

    /// Fetch every url and store them all in the named cache, or store nothing.
    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), OfflineError>;

    /// Names of every stored cache.
    async fn cache_names(&self) -> Result<Vec<String>, OfflineError>;

    /// Delete a named cache. Returns `true` if it existed.
    async fn delete_cache(&self, cache: &str) -> Result<bool, OfflineError>;

    /// Find a stored response for a request in any cache.
    async fn lookup(&self, request: &Self::Request)
        -> Result<Option<Self::Response>, OfflineError>;

    /// Find a stored response for a url in any cache.
    async fn lookup_url(&self, url: &str) -> Result<Option<Self::Response>, OfflineError>;

    /// Send a request to the network.
    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, OfflineError>;
}

/// Lifecycle of the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing done yet.
    Pending,
    /// All assets stored.
    Installed,
    /// Old generations removed; serving requests.
    Active,
    /// Installing failed; this generation must not activate.
    Failed,
}

/// The page served when a navigation fails offline.
pub const FALLBACK_PAGE: &str = "./index.html";

/// Offline cache manager for one generation.
pub struct OfflineCache<B> {
    backend: B,
    cache_name: String,
    assets: Vec<String>,
    phase: Cell<Phase>,
}

impl<B: CacheBackend> OfflineCache<B> {
    /// Create a manager for the named generation.
    pub fn new(backend: B, cache_name: impl Into<String>, assets: Vec<String>) -> Self {
        Self {
            backend,
            cache_name: cache_name.into(),
            assets,
            phase: Cell::new(Phase::Pending),
        }
    }

    /// The generation this manager owns.
    #[must_use]
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Where the generation is in its lifecycle.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Store every asset in this generation.
    ///
    /// # Errors
    ///
    /// Returns an error if any asset could not be stored; nothing is stored then.
    pub async fn install(&self) -> Result<(), OfflineError> {
        info!(
            "Installing {} assets into {}",
            self.assets.len(),
            self.cache_name
        );
        match self.backend.add_all(&self.cache_name, &self.assets).await {
            Ok(()) => {
                self.phase.set(Phase::Installed);
                Ok(())
            }
            Err(err) => {
                warn!("Install of {} failed: {err}", self.cache_name);
                self.phase.set(Phase::Failed);
                Err(err)
            }
        }
    }

    /// Delete every other generation.
    ///
    /// Returns the names of the deleted caches.
    ///
    /// # Errors
    ///
    /// Returns an error if the caches could not be listed or deleted.
    pub async fn activate(&self) -> Result<Vec<String>, OfflineError> {
        let mut deleted = Vec::new();
        for name in self.backend.cache_names().await? {
            if name != self.cache_name {
                info!("Deleting old cache {name}");
                if self.backend.delete_cache(&name).await? {
                    deleted.push(name);
                }
            }
        }
        self.phase.set(Phase::Active);
        Ok(deleted)
    }

    async fn from_cache(&self, request: &B::Request) -> Option<B::Response> {
        self.backend.lookup(request).await.unwrap_or_else(|err| {
            warn!("Cache lookup failed: {err}");
            None
        })
    }

    /// Answer a request using a strategy from [`strategy`].
    ///
    /// # Errors
    ///
    /// Returns an error if neither the network nor the cache can answer.
    pub async fn respond(
        &self,
        strategy: Strategy,
        request: &B::Request,
    ) -> Result<B::Response, OfflineError> {
        match strategy {
            Strategy::NetworkFirst => match self.backend.fetch(request).await {
                Ok(response) => Ok(response),
                Err(err) => {
                    debug!("Network failed, trying cache: {err}");
                    if let Some(response) = self.from_cache(request).await {
                        return Ok(response);
                    }
                    match self.backend.lookup_url(FALLBACK_PAGE).await {
                        Ok(Some(response)) => Ok(response),
                        Ok(None) => Err(err),
                        Err(cache_err) => {
                            warn!("Fallback lookup failed: {cache_err}");
                            Err(err)
                        }
                    }
                }
            },
            Strategy::CacheFirst => match self.from_cache(request).await {
                Some(response) => Ok(response),
                None => self.backend.fetch(request).await,
            },
            Strategy::PassThrough => self.backend.fetch(request).await,
        }
    }
}
