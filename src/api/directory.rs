//! Users and posts from the public directory API, plus the optimistic
//! create-post mutation.

use dioxus::prelude::*;
use serde_json::Value;

use crate::api_client::ApiClient;
use crate::endpoints::{
    user_posts_key, user_posts_tags, users_key, users_tags, CREATE_POST_PATH, GET_USERS,
    GET_USER_POSTS,
};
use crate::error::ApiError;
use crate::models::{CreatePostRequest, Post, User};

use super::{fetch_query, ApiContext};

/// Cached `GET /users`.
pub async fn get_users(api: ApiContext, client: ApiClient) -> Result<Vec<User>, ApiError> {
    fetch_query(api.public_cache, client, users_key(), GET_USERS, users_tags()).await
}

/// Cached `GET /posts?userId=<id>` (300 s freshness window).
pub async fn get_user_posts(
    api: ApiContext,
    client: ApiClient,
    user_id: i64,
) -> Result<Vec<Post>, ApiError> {
    fetch_query(
        api.public_cache,
        client,
        user_posts_key(user_id),
        GET_USER_POSTS,
        user_posts_tags(user_id),
    )
    .await
}

/// `POST /posts` with an optimistic splice into the user's cached post
/// list.
///
/// The provisional entry is applied before the request is sent, so the
/// list reflects it on the next render. On success it stays (the server
/// record replaces it on the next refetch); on failure the recorded
/// inverse removes exactly that entry and the error is surfaced to the
/// caller.
pub async fn create_post(
    api: ApiContext,
    client: ApiClient,
    input: CreatePostRequest,
) -> Result<Post, ApiError> {
    let key = user_posts_key(input.user_id);
    let mut cache = api.public_cache;
    let mut patches = api.patches;

    let provisional: Value =
        serde_json::to_value(&input).map_err(|e| ApiError::Deserialize(e.to_string()))?;
    let ticket = patches.write().apply(&mut cache.write(), &key, provisional);

    match client.post_json::<CreatePostRequest, Post>(CREATE_POST_PATH, &input).await {
        Ok(post) => {
            patches.write().commit(ticket);
            Ok(post)
        }
        Err(err) => {
            patches.write().rollback(&mut cache.write(), ticket);
            crate::log_warn!("create_post failed, rolled back: {err}");
            Err(err)
        }
    }
}
