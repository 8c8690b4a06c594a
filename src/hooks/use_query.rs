//! Cached-resource hook over a [`QueryCache`].

use dioxus::prelude::*;
use serde::de::DeserializeOwned;

use crate::api::{fetch_query, REFETCH_TICK};
use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::query::{CacheKey, EndpointSpec, QueryCache, Tag};

/// A hook that reads one endpoint through the cache and tracks viewer
/// interest for eviction accounting.
///
/// The resource re-runs when the key changes or a focus/reconnect event
/// bumps the refetch tick; a fresh cache entry short-circuits without a
/// network call either way. `make_client` is invoked per fetch so the
/// bearer token is read at dispatch time.
///
/// ### Example
///
/// ```rust,ignore
/// let posts = use_query::<Vec<Post>, _>(
///     api.public_cache,
///     move || auth.public_client(),
///     user_posts_key(user_id),
///     GET_USER_POSTS,
///     user_posts_tags(user_id),
/// );
/// ```
pub fn use_query<T, F>(
    cache: Signal<QueryCache>,
    make_client: F,
    key: CacheKey,
    spec: EndpointSpec,
    tags: Vec<Tag>,
) -> Resource<Result<T, ApiError>>
where
    T: DeserializeOwned + 'static,
    F: Fn() -> ApiClient + 'static,
{
    let mut key_sig = use_signal(|| key.clone());
    if *key_sig.peek() != key {
        key_sig.set(key.clone());
    }

    // Subscribe to the current key, moving the subscription when the key
    // changes (e.g. route param updates without a remount).
    let mut subscribed = use_signal(|| None::<CacheKey>);
    use_effect(move || {
        let key = key_sig();
        let previous = subscribed.peek().clone();
        if previous.as_deref() == Some(key.as_str()) {
            return;
        }
        let mut cache = cache;
        {
            let mut cache = cache.write();
            if let Some(previous) = previous {
                cache.unsubscribe(&previous);
            }
            cache.subscribe(&key);
        }
        subscribed.set(Some(key));
    });
    use_drop(move || {
        if let Some(key) = subscribed.peek().clone() {
            let mut cache = cache;
            cache.write().unsubscribe(&key);
            cache.write().sweep();
        }
    });

    use_resource(move || {
        let _ = REFETCH_TICK.read();
        let key = key_sig();
        let client = make_client();
        let tags = tags.clone();
        async move { fetch_query::<T>(cache, client, key, spec, tags).await }
    })
}
