//! Optimistic cache patches for write mutations.
//!
//! A patch is a command pair captured at dispatch time: the forward
//! operation (splice a provisional entry into a cached list) and its
//! inverse (remove exactly that entry, keyed by the provisional id). The
//! write either commits (provisional entry stays, superseded by the real
//! record on the next refetch) or rolls back by applying the inverse,
//! never both.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::query::{CacheKey, QueryCache};

/// Handle for one in-flight mutation's patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationTicket {
    pub mutation_id: Uuid,
    pub provisional_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingPatch {
    key: CacheKey,
    provisional_id: i64,
    /// False when the target list was not cached; rollback is then a no-op.
    applied: bool,
}

/// Pending patches indexed by mutation id, so concurrent mutations against
/// the same list never collide.
pub struct PatchRegistry {
    // Provisional ids are negative; server-assigned ids are positive, so
    // the two spaces can never collide.
    next_provisional_id: i64,
    pending: HashMap<Uuid, PendingPatch>,
}

impl PatchRegistry {
    pub fn new() -> Self {
        Self {
            next_provisional_id: -1,
            pending: HashMap::new(),
        }
    }

    /// Splice `item` into the cached list at `key` under a fresh
    /// provisional id and record the inverse. A cold cache (no viewer ever
    /// fetched the list) makes the splice a no-op, but the mutation still
    /// proceeds.
    pub fn apply(&mut self, cache: &mut QueryCache, key: &str, mut item: Value) -> MutationTicket {
        let provisional_id = self.next_provisional_id;
        self.next_provisional_id -= 1;

        if let Some(object) = item.as_object_mut() {
            object.insert("id".to_string(), provisional_id.into());
        }
        let applied = cache.push_to_list(key, item);

        let mutation_id = Uuid::new_v4();
        self.pending.insert(
            mutation_id,
            PendingPatch {
                key: key.to_string(),
                provisional_id,
                applied,
            },
        );

        MutationTicket {
            mutation_id,
            provisional_id,
        }
    }

    /// The write succeeded: drop the inverse, the entry stays in place.
    pub fn commit(&mut self, ticket: MutationTicket) {
        self.pending.remove(&ticket.mutation_id);
    }

    /// The write failed: remove exactly the provisional entry.
    pub fn rollback(&mut self, cache: &mut QueryCache, ticket: MutationTicket) {
        if let Some(patch) = self.pending.remove(&ticket.mutation_id) {
            if patch.applied {
                cache.remove_from_list(&patch.key, patch.provisional_id);
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for PatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::query::{EndpointSpec, FetchPlan, Tag};

    const POSTS: EndpointSpec = EndpointSpec {
        name: "getUserPosts",
        freshness_secs: 300,
        keep_unused_secs: 300,
        refetch_on_focus: true,
        refetch_on_reconnect: true,
    };

    fn cache_with_posts(key: &str, data: Value) -> QueryCache {
        let mut cache = QueryCache::new();
        let generation = match cache.begin(key, POSTS, vec![Tag::Posts(1)]) {
            FetchPlan::Start(generation) => generation,
            _ => panic!(),
        };
        cache.complete(key, generation, Ok(data));
        cache
    }

    #[test]
    fn commit_keeps_the_provisional_entry() {
        let key = "/posts?userId=1";
        let mut cache = cache_with_posts(key, json!([{"id": 10, "title": "first"}]));
        let mut patches = PatchRegistry::new();

        let ticket = patches.apply(
            &mut cache,
            key,
            json!({"title": "hello", "body": "world", "userId": 1}),
        );
        patches.commit(ticket);

        let list = cache.data(key).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
        assert_eq!(list[1]["title"], "hello");
        assert_eq!(list[1]["body"], "world");
        assert_eq!(list[1]["id"], ticket.provisional_id);
        assert_eq!(patches.pending_count(), 0);
    }

    #[test]
    fn rollback_restores_the_exact_pre_mutation_list() {
        let key = "/posts?userId=1";
        let before = json!([{"id": 10, "title": "a"}, {"id": 11, "title": "b"}]);
        let mut cache = cache_with_posts(key, before.clone());
        let mut patches = PatchRegistry::new();

        let ticket = patches.apply(&mut cache, key, json!({"title": "x", "userId": 1}));
        patches.rollback(&mut cache, ticket);

        assert_eq!(cache.data(key).unwrap(), before);
    }

    #[test]
    fn concurrent_patches_roll_back_independently() {
        let key = "/posts?userId=1";
        let mut cache = cache_with_posts(key, json!([{"id": 10}]));
        let mut patches = PatchRegistry::new();

        let first = patches.apply(&mut cache, key, json!({"title": "one", "userId": 1}));
        let second = patches.apply(&mut cache, key, json!({"title": "two", "userId": 1}));
        assert_ne!(first.provisional_id, second.provisional_id);

        // Roll back only the first; the second's entry must survive.
        patches.rollback(&mut cache, first);
        let list = cache.data(key).unwrap();
        let titles: Vec<_> = list
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p.get("title").and_then(|t| t.as_str()))
            .collect();
        assert_eq!(titles, vec!["two"]);

        patches.commit(second);
        assert_eq!(patches.pending_count(), 0);
    }

    #[test]
    fn cold_cache_patch_is_a_noop_and_rollback_is_safe() {
        let mut cache = QueryCache::new();
        let mut patches = PatchRegistry::new();

        let ticket = patches.apply(
            &mut cache,
            "/posts?userId=7",
            json!({"title": "x", "userId": 7}),
        );
        assert!(cache.data("/posts?userId=7").is_none());

        patches.rollback(&mut cache, ticket);
        assert!(cache.data("/posts?userId=7").is_none());
    }
}
