//! Declarative endpoint table for both remote APIs.
//!
//! Each read endpoint is declared once: cache key builder, provided tags
//! and caching policy. The API layer never hardcodes a path or a tag
//! anywhere else.

use crate::query::{CacheKey, EndpointSpec, Tag};
use crate::storage;

/// Admin (bearer-authenticated) API.
pub const ADMIN_API_BASE: &str = "https://apidev.edufee.online/api";
/// Storage key holding an admin API base override (dev/staging builds).
pub const ADMIN_API_BASE_KEY: &str = "api_base";
/// Public directory API.
pub const PUBLIC_API_BASE: &str = "https://jsonplaceholder.typicode.com";

pub fn admin_api_base() -> String {
    storage::load::<String>(ADMIN_API_BASE_KEY)
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| ADMIN_API_BASE.to_string())
}

// Mutation paths.
pub const LOGIN_PATH: &str = "/merchant/login";
pub const CREATE_POST_PATH: &str = "/posts";

pub const GET_USERS: EndpointSpec = EndpointSpec {
    name: "getUsers",
    freshness_secs: 60,
    keep_unused_secs: 60,
    refetch_on_focus: false,
    refetch_on_reconnect: false,
};

pub const GET_USER_POSTS: EndpointSpec = EndpointSpec {
    name: "getUserPosts",
    freshness_secs: 300,
    keep_unused_secs: 300,
    refetch_on_focus: true,
    refetch_on_reconnect: true,
};

pub fn users_key() -> CacheKey {
    "/users".to_string()
}

pub fn user_posts_key(user_id: i64) -> CacheKey {
    format!("/posts?userId={user_id}")
}

pub fn users_tags() -> Vec<Tag> {
    vec![Tag::Users]
}

pub fn user_posts_tags(user_id: i64) -> Vec<Tag> {
    vec![Tag::Posts(user_id)]
}
