//! API layer over the two remote APIs.
//!
//! The admin API exposes only the login mutation; the public directory
//! API (users/posts) reads go through a request cache. The cache and the
//! patch registry are provided to the app by [`ApiProvider`] as explicit
//! signals, not ambient globals.

use dioxus::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::optimistic::PatchRegistry;
use crate::query::{CacheKey, EndpointSpec, FetchPlan, QueryCache, Tag};

pub mod auth;
pub mod directory;

/// Bumped whenever a window focus/reconnect event marks entries stale, so
/// subscribed queries re-run.
pub static REFETCH_TICK: GlobalSignal<u32> = Signal::global(|| 0);

/// The public API's cache plus the optimistic-patch registry. The admin
/// API is mutation-only today, so it carries no cache; an admin read
/// endpoint would add its own cache signal here, keeping the two tag
/// namespaces separate.
#[derive(Clone, Copy)]
pub struct ApiContext {
    pub public_cache: Signal<QueryCache>,
    pub patches: Signal<PatchRegistry>,
}

/// Provider component that sets up the API context
#[component]
pub fn ApiProvider(children: Element) -> Element {
    let public_cache = use_signal(QueryCache::new);
    let patches = use_signal(PatchRegistry::new);

    use_context_provider(|| ApiContext {
        public_cache,
        patches,
    });

    // Window focus / reconnect listeners drive the per-endpoint refetch
    // policies on web.
    #[cfg(target_arch = "wasm32")]
    use_hook(move || install_refetch_listeners(public_cache));

    children
}

#[cfg(target_arch = "wasm32")]
fn install_refetch_listeners(public_cache: Signal<QueryCache>) {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };

    let mut cache = public_cache;
    let on_focus = Closure::wrap(Box::new(move |_: web_sys::Event| {
        cache.write().mark_stale_on_focus();
        *REFETCH_TICK.write() += 1;
    }) as Box<dyn FnMut(web_sys::Event)>);
    let _ = window.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
    on_focus.forget();

    let mut cache = public_cache;
    let on_online = Closure::wrap(Box::new(move |_: web_sys::Event| {
        cache.write().mark_stale_on_reconnect();
        *REFETCH_TICK.write() += 1;
    }) as Box<dyn FnMut(web_sys::Event)>);
    let _ = window.add_event_listener_with_callback("online", on_online.as_ref().unchecked_ref());
    on_online.forget();
}

/// Settles the owned fetch's cache entry even when the owning future is
/// dropped mid-flight (resource restart, route change, refetch tick).
/// Without this, an abandoned `Start` would leave the entry `Loading`
/// with joiners parked forever.
struct FetchGuard {
    cache: Signal<QueryCache>,
    key: CacheKey,
    generation: u64,
    settled: bool,
}

impl FetchGuard {
    fn new(cache: Signal<QueryCache>, key: CacheKey, generation: u64) -> Self {
        Self {
            cache,
            key,
            generation,
            settled: false,
        }
    }

    fn complete(mut self, result: Result<Value, ApiError>) {
        self.settled = true;
        let mut cache = self.cache;
        cache.write().complete(&self.key, self.generation, result);
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        if !self.settled {
            let mut cache = self.cache;
            cache.write().abort(&self.key, self.generation);
        }
    }
}

/// Run one cached read: serve fresh data, join the in-flight fetch, or
/// perform the network call and settle the cache entry.
pub async fn fetch_query<T: DeserializeOwned>(
    cache: Signal<QueryCache>,
    client: ApiClient,
    key: CacheKey,
    spec: EndpointSpec,
    tags: Vec<Tag>,
) -> Result<T, ApiError> {
    let mut cache = cache;
    let plan = cache.write().begin(&key, spec, tags);
    let value = match plan {
        FetchPlan::Cached(value) => {
            crate::log_debug!("cache hit: {key}");
            Ok(value)
        }
        FetchPlan::Join(receiver) => receiver
            .await
            .unwrap_or_else(|_| Err(ApiError::Network("fetch abandoned".to_string()))),
        FetchPlan::Start(generation) => {
            let guard = FetchGuard::new(cache, key.clone(), generation);
            let result = client.get_json::<Value>(&key).await;
            guard.complete(result.clone());
            result
        }
    }?;
    serde_json::from_value(value).map_err(|e| ApiError::Deserialize(e.to_string()))
}
