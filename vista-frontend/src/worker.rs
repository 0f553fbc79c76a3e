//! The service worker side of the crate
//!
//! `sw.js` loads this same module into the worker, calls
//! [`service_worker`] once and forwards the worker's events to the returned
//! object.
use std::rc::Rc;

use js_sys::{Array, Promise, JSON};
use tracing::{debug, info, warn};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope};

use vista_common::{
    config::Config,
    offline::{
        self, CacheBackend, ControlMessage, OfflineCache, OfflineError, RequestInfo, RequestMode,
    },
    version::Version,
};

use crate::services;

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn cache_error(value: JsValue) -> OfflineError {
    OfflineError::Cache(js_message(&value))
}

/// Cache storage and `fetch` of the worker global scope.
pub struct BrowserCache {
    scope: ServiceWorkerGlobalScope,
}

impl BrowserCache {
    fn caches(&self) -> Result<CacheStorage, OfflineError> {
        self.scope.caches().map_err(cache_error)
    }

    async fn matched(promise: Promise) -> Result<Option<Response>, OfflineError> {
        let value = JsFuture::from(promise).await.map_err(cache_error)?;
        Ok(value.dyn_into::<Response>().ok())
    }
}

impl CacheBackend for BrowserCache {
    type Request = Request;
    type Response = Response;

    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), OfflineError> {
        let cache: Cache = JsFuture::from(self.caches()?.open(cache))
            .await
            .map_err(cache_error)?
            .unchecked_into();
        let urls: Array = urls.iter().map(|url| JsValue::from_str(url)).collect();
        JsFuture::from(cache.add_all_with_str_sequence(&urls))
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn cache_names(&self) -> Result<Vec<String>, OfflineError> {
        let names: Array = JsFuture::from(self.caches()?.keys())
            .await
            .map_err(cache_error)?
            .unchecked_into();
        Ok(names.iter().filter_map(|name| name.as_string()).collect())
    }

    async fn delete_cache(&self, cache: &str) -> Result<bool, OfflineError> {
        let deleted = JsFuture::from(self.caches()?.delete(cache))
            .await
            .map_err(cache_error)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn lookup(&self, request: &Request) -> Result<Option<Response>, OfflineError> {
        Self::matched(self.caches()?.match_with_request(request)).await
    }

    async fn lookup_url(&self, url: &str) -> Result<Option<Response>, OfflineError> {
        Self::matched(self.caches()?.match_with_str(url)).await
    }

    async fn fetch(&self, request: &Request) -> Result<Response, OfflineError> {
        let response = JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(|err| OfflineError::Network(js_message(&err)))?;
        response
            .dyn_into::<Response>()
            .map_err(|err| OfflineError::Network(js_message(&err)))
    }
}

fn request_info(request: &Request) -> RequestInfo {
    RequestInfo {
        method: request.method(),
        url: request.url(),
        mode: if request.mode() == web_sys::RequestMode::Navigate {
            RequestMode::Navigate
        } else {
            RequestMode::Other
        },
    }
}

/// Handles the events of one service worker generation.
#[wasm_bindgen]
pub struct OfflineWorker {
    scope: ServiceWorkerGlobalScope,
    origin: String,
    cache: Rc<OfflineCache<BrowserCache>>,
}

#[wasm_bindgen]
impl OfflineWorker {
    /// Fill this generation's cache, then take over without waiting.
    pub fn install(&self) -> Promise {
        let cache = self.cache.clone();
        let scope = self.scope.clone();
        future_to_promise(async move {
            cache
                .install()
                .await
                .map_err(|err| JsValue::from_str(&err.to_string()))?;
            JsFuture::from(scope.skip_waiting()?).await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Delete older generations and take control of open pages.
    pub fn activate(&self) -> Promise {
        let cache = self.cache.clone();
        let scope = self.scope.clone();
        future_to_promise(async move {
            match cache.activate().await {
                Ok(deleted) => info!("Activated {}, removed {deleted:?}", cache.cache_name()),
                Err(err) => warn!("Failed to remove old caches: {err}"),
            }
            JsFuture::from(scope.clients().claim()).await?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Answer a fetch, or return `undefined` to let the browser handle it.
    pub fn handle_fetch(&self, request: Request) -> Option<Promise> {
        let strategy = offline::strategy(&request_info(&request), &self.origin);
        if strategy == offline::Strategy::PassThrough {
            return None;
        }
        let cache = self.cache.clone();
        Some(future_to_promise(async move {
            debug!("{strategy:?} {}", request.url());
            cache
                .respond(strategy, &request)
                .await
                .map(JsValue::from)
                .map_err(|err| JsValue::from_str(&err.to_string()))
        }))
    }

    /// Handle a message posted by a page.
    pub fn message(&self, data: &JsValue) {
        let json = JSON::stringify(data)
            .ok()
            .and_then(|json| json.as_string())
            .unwrap_or_default();
        match ControlMessage::from_json(&json) {
            Some(ControlMessage::SkipWaiting) => {
                info!("Page asked us to take over");
                if let Err(err) = self.scope.skip_waiting() {
                    warn!("skipWaiting failed: {err:?}");
                }
            }
            None => debug!("Ignoring message {json}"),
        }
    }
}

/// Set up the worker. Called once by `sw.js`.
#[wasm_bindgen]
pub async fn service_worker() -> Result<OfflineWorker, JsValue> {
    let scope: ServiceWorkerGlobalScope = js_sys::global().dyn_into()?;
    let origin = scope.location().origin();
    let config: Config = services::config::load().await;
    let version = Version::get();
    let cache_name = config.cache_name(version.build_key());
    info!("Service worker for {cache_name} ({version})");

    let backend = BrowserCache {
        scope: scope.clone(),
    };
    Ok(OfflineWorker {
        scope,
        origin,
        cache: Rc::new(OfflineCache::new(backend, cache_name, config.assets)),
    })
}
