//! Request-caching query layer.
//!
//! One `QueryCache` per API client. Cached entries are keyed by the request
//! path (endpoint plus parameters) and carry the tags their endpoint
//! provides, so a mutation can invalidate related reads by tag instead of
//! by key.
//!
//! Guarantees:
//! - at most one in-flight fetch per key; later callers join the pending
//!   result instead of issuing a second request
//! - a fresh entry is served without a network call until its endpoint's
//!   freshness window elapses or a tag invalidation marks it stale
//! - a completion carrying a superseded generation is discarded, so a late
//!   response to an abandoned fetch never overwrites newer state
//! - entries with no remaining subscriber are evicted after their
//!   endpoint's keep-unused duration

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use futures_channel::oneshot;
use serde_json::Value;

use crate::error::ApiError;

/// Cache key: endpoint path plus serialized parameters.
pub type CacheKey = String;

/// Invalidation labels. `Posts` is scoped per user so creating a post for
/// one user never touches another user's cached list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Users,
    Posts(i64),
}

/// Static description of one read endpoint's caching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    pub name: &'static str,
    /// Seconds a successful result is served without refetching.
    pub freshness_secs: i64,
    /// Seconds an unsubscribed entry survives before eviction.
    pub keep_unused_secs: i64,
    pub refetch_on_focus: bool,
    pub refetch_on_reconnect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Success,
    Error,
}

struct CacheEntry {
    data: Option<Value>,
    error: Option<ApiError>,
    status: FetchStatus,
    fetched_at: Option<DateTime<Utc>>,
    stale: bool,
    tags: Vec<Tag>,
    generation: u64,
    spec: EndpointSpec,
    waiters: Vec<oneshot::Sender<Result<Value, ApiError>>>,
}

impl CacheEntry {
    fn new(spec: EndpointSpec) -> Self {
        Self {
            data: None,
            error: None,
            status: FetchStatus::Loading,
            fetched_at: None,
            stale: false,
            tags: Vec::new(),
            generation: 0,
            spec,
            waiters: Vec::new(),
        }
    }
}

#[derive(Default)]
struct SubState {
    count: usize,
    unused_since: Option<DateTime<Utc>>,
}

/// What the caller of [`QueryCache::begin`] must do next.
pub enum FetchPlan {
    /// Fresh data was cached; no network call.
    Cached(Value),
    /// The caller owns the fetch for this generation and must call
    /// [`QueryCache::complete`] with it.
    Start(u64),
    /// Another fetch for the same key is in flight; await its result.
    Join(oneshot::Receiver<Result<Value, ApiError>>),
}

pub struct QueryCache {
    entries: HashMap<CacheKey, CacheEntry>,
    subs: HashMap<CacheKey, SubState>,
    tag_index: HashMap<Tag, HashSet<CacheKey>>,
    clock: Box<dyn Fn() -> DateTime<Utc>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Cache with an injected clock; freshness and eviction tests drive
    /// time through this.
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self {
            entries: HashMap::new(),
            subs: HashMap::new(),
            tag_index: HashMap::new(),
            clock: Box::new(clock),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Start, join or short-circuit a read for `key`.
    pub fn begin(&mut self, key: &str, spec: EndpointSpec, tags: Vec<Tag>) -> FetchPlan {
        let now = self.now();

        if let Some(entry) = self.entries.get_mut(key) {
            match entry.status {
                FetchStatus::Loading => {
                    let (tx, rx) = oneshot::channel();
                    entry.waiters.push(tx);
                    return FetchPlan::Join(rx);
                }
                FetchStatus::Success if !entry.stale => {
                    if let (Some(at), Some(data)) = (entry.fetched_at, entry.data.as_ref()) {
                        if now - at < Duration::seconds(entry.spec.freshness_secs) {
                            return FetchPlan::Cached(data.clone());
                        }
                    }
                }
                _ => {}
            }
        }

        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(spec));
        entry.generation += 1;
        entry.status = FetchStatus::Loading;
        entry.stale = false;
        entry.error = None;
        entry.spec = spec;
        entry.tags = tags.clone();
        let generation = entry.generation;

        for tag in tags {
            self.tag_index.entry(tag).or_default().insert(key.to_string());
        }
        // Entries created with no viewer start their keep-unused countdown
        // immediately.
        self.subs.entry(key.to_string()).or_insert(SubState {
            count: 0,
            unused_since: Some(now),
        });

        FetchPlan::Start(generation)
    }

    /// Settle the fetch started by the matching [`FetchPlan::Start`].
    ///
    /// A completion for a stale generation (the entry was evicted and
    /// recreated, or a newer fetch superseded this one) is discarded.
    pub fn complete(&mut self, key: &str, generation: u64, result: Result<Value, ApiError>) {
        let now = self.now();
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        if entry.generation != generation || entry.status != FetchStatus::Loading {
            return;
        }

        match &result {
            Ok(value) => {
                entry.data = Some(value.clone());
                entry.error = None;
                entry.status = FetchStatus::Success;
                entry.fetched_at = Some(now);
            }
            Err(err) => {
                entry.error = Some(err.clone());
                entry.status = FetchStatus::Error;
                entry.fetched_at = None;
            }
        }

        for waiter in entry.waiters.drain(..) {
            let _ = waiter.send(result.clone());
        }
    }

    /// Abandon the fetch started by the matching [`FetchPlan::Start`]
    /// without a result (the owning future was dropped mid-flight).
    ///
    /// Joined waiters are released with an error and the entry is returned
    /// to a state where the next read starts a fresh fetch; nothing stays
    /// `Loading` with no owner. A mismatched generation is a no-op.
    pub fn abort(&mut self, key: &str, generation: u64) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        if entry.generation != generation || entry.status != FetchStatus::Loading {
            return;
        }

        let err = ApiError::Network("fetch aborted".to_string());
        for waiter in entry.waiters.drain(..) {
            let _ = waiter.send(Err(err.clone()));
        }

        if entry.data.is_some() {
            // Keep the stale payload; the next read refetches.
            entry.status = FetchStatus::Success;
            entry.stale = true;
        } else if let Some(entry) = self.entries.remove(key) {
            for tag in entry.tags {
                if let Some(keys) = self.tag_index.get_mut(&tag) {
                    keys.remove(key);
                }
            }
        }
    }

    pub fn data(&self, key: &str) -> Option<Value> {
        self.entries.get(key).and_then(|e| e.data.clone())
    }

    pub fn status(&self, key: &str) -> Option<FetchStatus> {
        self.entries.get(key).map(|e| e.status)
    }

    /// Register a viewer for `key`; cancels any pending eviction countdown.
    pub fn subscribe(&mut self, key: &str) {
        let sub = self.subs.entry(key.to_string()).or_default();
        sub.count += 1;
        sub.unused_since = None;
    }

    /// Drop a viewer for `key`; the last one starts the keep-unused
    /// countdown.
    pub fn unsubscribe(&mut self, key: &str) {
        let now = self.now();
        if let Some(sub) = self.subs.get_mut(key) {
            sub.count = sub.count.saturating_sub(1);
            if sub.count == 0 {
                sub.unused_since = Some(now);
            }
        }
    }

    /// Evict entries whose keep-unused duration elapsed with no subscriber.
    pub fn sweep(&mut self) {
        let now = self.now();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, entry)| {
                let Some(sub) = self.subs.get(*key) else {
                    return false;
                };
                sub.count == 0
                    && sub
                        .unused_since
                        .map(|at| now - at >= Duration::seconds(entry.spec.keep_unused_secs))
                        .unwrap_or(false)
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired {
            self.evict(&key);
        }
    }

    fn evict(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            for tag in entry.tags {
                if let Some(keys) = self.tag_index.get_mut(&tag) {
                    keys.remove(key);
                }
            }
        }
        self.subs.remove(key);
    }

    /// Mark every entry providing one of `tags` stale. Returns the keys
    /// that still have subscribers, so the caller can schedule refetches.
    pub fn invalidate(&mut self, tags: &[Tag]) -> Vec<CacheKey> {
        let mut affected = Vec::new();
        for tag in tags {
            let Some(keys) = self.tag_index.get(tag) else {
                continue;
            };
            for key in keys {
                if let Some(entry) = self.entries.get_mut(key) {
                    entry.stale = true;
                }
                let subscribed = self.subs.get(key).map(|s| s.count > 0).unwrap_or(false);
                if subscribed && !affected.contains(key) {
                    affected.push(key.clone());
                }
            }
        }
        affected
    }

    /// Force the next read of `key` to refetch (manual refresh).
    pub fn mark_stale(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    /// Window regained focus: stale-out entries that opted in.
    pub fn mark_stale_on_focus(&mut self) {
        for entry in self.entries.values_mut() {
            if entry.spec.refetch_on_focus && entry.status == FetchStatus::Success {
                entry.stale = true;
            }
        }
    }

    /// Network came back: stale-out entries that opted in.
    pub fn mark_stale_on_reconnect(&mut self) {
        for entry in self.entries.values_mut() {
            if entry.spec.refetch_on_reconnect && entry.status == FetchStatus::Success {
                entry.stale = true;
            }
        }
    }

    /// Append `item` to a cached list entry. Returns `false` when the key
    /// holds no cached list (nothing to patch).
    pub fn push_to_list(&mut self, key: &str, item: Value) -> bool {
        if let Some(entry) = self.entries.get_mut(key) {
            if let Some(Value::Array(list)) = entry.data.as_mut() {
                list.push(item);
                return true;
            }
        }
        false
    }

    /// Remove the element with the given `"id"` field from a cached list
    /// entry. Returns whether an element was removed.
    pub fn remove_from_list(&mut self, key: &str, id: i64) -> bool {
        if let Some(entry) = self.entries.get_mut(key) {
            if let Some(Value::Array(list)) = entry.data.as_mut() {
                let before = list.len();
                list.retain(|item| item.get("id").and_then(Value::as_i64) != Some(id));
                return list.len() != before;
            }
        }
        false
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    const POSTS: EndpointSpec = EndpointSpec {
        name: "getUserPosts",
        freshness_secs: 300,
        keep_unused_secs: 300,
        refetch_on_focus: true,
        refetch_on_reconnect: true,
    };

    fn test_cache() -> (QueryCache, Rc<Cell<i64>>) {
        let time = Rc::new(Cell::new(0_i64));
        let handle = Rc::clone(&time);
        let cache = QueryCache::with_clock(move || {
            Utc.timestamp_opt(handle.get(), 0).unwrap()
        });
        (cache, time)
    }

    fn start_and_complete(cache: &mut QueryCache, key: &str, data: Value) {
        let generation = match cache.begin(key, POSTS, vec![Tag::Posts(3)]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!("expected a fetch to start"),
        };
        cache.complete(key, generation, Ok(data));
    }

    #[test]
    fn concurrent_reads_share_one_fetch() {
        let (mut cache, _) = test_cache();

        let generation = match cache.begin("/posts?userId=3", POSTS, vec![Tag::Posts(3)]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!("first read must start the fetch"),
        };
        let mut rx = match cache.begin("/posts?userId=3", POSTS, vec![Tag::Posts(3)]) {
            FetchPlan::Join(rx) => rx,
            _ => panic!("second read must join, not start"),
        };

        cache.complete("/posts?userId=3", generation, Ok(json!([{"id": 1}])));
        let joined = rx.try_recv().unwrap().expect("waiter not resolved");
        assert_eq!(joined.unwrap(), json!([{"id": 1}]));
    }

    #[test]
    fn freshness_window_boundaries() {
        let (mut cache, time) = test_cache();
        start_and_complete(&mut cache, "/posts?userId=5", json!([{"id": 1}]));

        time.set(299);
        assert!(matches!(
            cache.begin("/posts?userId=5", POSTS, vec![Tag::Posts(5)]),
            FetchPlan::Cached(_)
        ));

        time.set(301);
        assert!(matches!(
            cache.begin("/posts?userId=5", POSTS, vec![Tag::Posts(5)]),
            FetchPlan::Start(_)
        ));
    }

    #[test]
    fn tag_invalidation_forces_refetch() {
        let (mut cache, _) = test_cache();
        start_and_complete(&mut cache, "/posts?userId=3", json!([{"id": 1}]));

        cache.subscribe("/posts?userId=3");
        let affected = cache.invalidate(&[Tag::Posts(3)]);
        assert_eq!(affected, vec!["/posts?userId=3".to_string()]);

        assert!(matches!(
            cache.begin("/posts?userId=3", POSTS, vec![Tag::Posts(3)]),
            FetchPlan::Start(_)
        ));
    }

    #[test]
    fn stale_generation_completion_is_discarded() {
        let (mut cache, _) = test_cache();
        let old = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        cache.complete("/users", old, Ok(json!([1])));

        cache.mark_stale("/users");
        let new = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        assert_ne!(old, new);

        // Late response from the superseded fetch.
        cache.complete("/users", old, Ok(json!([9, 9, 9])));
        assert_eq!(cache.status("/users"), Some(FetchStatus::Loading));

        cache.complete("/users", new, Ok(json!([2])));
        assert_eq!(cache.data("/users"), Some(json!([2])));
    }

    #[test]
    fn unsubscribed_entries_are_evicted_after_keep_unused() {
        let (mut cache, time) = test_cache();
        cache.subscribe("/posts?userId=3");
        start_and_complete(&mut cache, "/posts?userId=3", json!([{"id": 1}]));

        time.set(10);
        cache.unsubscribe("/posts?userId=3");

        time.set(10 + 299);
        cache.sweep();
        assert!(cache.data("/posts?userId=3").is_some());

        time.set(10 + 300);
        cache.sweep();
        assert!(cache.data("/posts?userId=3").is_none());

        // A fresh subscription after eviction refetches from scratch.
        cache.subscribe("/posts?userId=3");
        assert!(matches!(
            cache.begin("/posts?userId=3", POSTS, vec![Tag::Posts(3)]),
            FetchPlan::Start(_)
        ));
    }

    #[test]
    fn subscriber_holds_entry_past_keep_unused() {
        let (mut cache, time) = test_cache();
        cache.subscribe("/posts?userId=3");
        start_and_complete(&mut cache, "/posts?userId=3", json!([{"id": 1}]));

        time.set(10_000);
        cache.sweep();
        assert!(cache.data("/posts?userId=3").is_some());
    }

    #[test]
    fn abandoned_fetch_releases_joiners_and_allows_restart() {
        let (mut cache, _) = test_cache();
        let generation = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        let mut rx = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Join(rx) => rx,
            _ => panic!(),
        };

        // The owner was dropped without completing.
        cache.abort("/users", generation);

        let joined = rx.try_recv().unwrap().expect("waiter must be released");
        assert!(matches!(joined, Err(ApiError::Network(_))));

        // The key is not stuck Loading; the next read starts over.
        assert!(matches!(
            cache.begin("/users", POSTS, vec![Tag::Users]),
            FetchPlan::Start(_)
        ));
    }

    #[test]
    fn aborted_refetch_keeps_the_previous_payload() {
        let (mut cache, _) = test_cache();
        start_and_complete(&mut cache, "/posts?userId=3", json!([{"id": 1}]));

        cache.mark_stale("/posts?userId=3");
        let generation = match cache.begin("/posts?userId=3", POSTS, vec![Tag::Posts(3)]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        cache.abort("/posts?userId=3", generation);

        assert_eq!(cache.data("/posts?userId=3"), Some(json!([{"id": 1}])));
        assert!(matches!(
            cache.begin("/posts?userId=3", POSTS, vec![Tag::Posts(3)]),
            FetchPlan::Start(_)
        ));
    }

    #[test]
    fn abort_with_a_superseded_generation_is_discarded() {
        let (mut cache, _) = test_cache();
        let old = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        cache.complete("/users", old, Ok(json!([1])));

        cache.mark_stale("/users");
        let new = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };

        // Straggling abort from the superseded fetch.
        cache.abort("/users", old);
        assert_eq!(cache.status("/users"), Some(FetchStatus::Loading));

        cache.complete("/users", new, Ok(json!([2])));
        assert_eq!(cache.data("/users"), Some(json!([2])));
    }

    #[test]
    fn error_completion_drops_freshness() {
        let (mut cache, time) = test_cache();
        start_and_complete(&mut cache, "/users", json!([1]));

        cache.mark_stale("/users");
        let generation = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        cache.complete(
            "/users",
            generation,
            Err(ApiError::Network("down".to_string())),
        );

        // The old payload survives for display, but a read inside the
        // original freshness window refetches instead of serving it.
        assert_eq!(cache.data("/users"), Some(json!([1])));
        time.set(5);
        assert!(matches!(
            cache.begin("/users", POSTS, vec![Tag::Users]),
            FetchPlan::Start(_)
        ));
    }

    #[test]
    fn failed_fetch_notifies_joined_waiters() {
        let (mut cache, _) = test_cache();
        let generation = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        let mut rx = match cache.begin("/users", POSTS, vec![Tag::Users]) {
            FetchPlan::Join(rx) => rx,
            _ => panic!(),
        };

        let err = ApiError::Http {
            status: 503,
            body: String::new(),
        };
        cache.complete("/users", generation, Err(err.clone()));
        assert_eq!(rx.try_recv().unwrap().unwrap(), Err(err));
        assert_eq!(cache.status("/users"), Some(FetchStatus::Error));
    }
}
