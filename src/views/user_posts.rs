use dioxus::prelude::*;

use crate::api::ApiContext;
use crate::auth_session::AuthContext;
use crate::components::ui::{Card, InfoRow};
use crate::endpoints::{
    user_posts_key, user_posts_tags, users_key, users_tags, GET_USERS, GET_USER_POSTS,
};
use crate::hooks::use_query;
use crate::models::{Post, User};
use crate::theme;

#[component]
pub fn UserPosts(user_id: i64) -> Element {
    let auth = use_context::<AuthContext>();
    let api = use_context::<ApiContext>();

    // The users list is usually still cached from the list screen; this
    // read then costs no network call.
    let users = use_query::<Vec<User>, _>(
        api.public_cache,
        move || auth.public_client(),
        users_key(),
        GET_USERS,
        users_tags(),
    );

    let posts = use_query::<Vec<Post>, _>(
        api.public_cache,
        move || auth.public_client(),
        user_posts_key(user_id),
        GET_USER_POSTS,
        user_posts_tags(user_id),
    );

    let dark = theme::is_dark();
    let muted = if dark { "text-gray-400" } else { "text-gray-600" };
    let post_class = if dark {
        "bg-gray-800 border-gray-700 p-4 rounded-lg mb-3 border"
    } else {
        "bg-gray-100 border-gray-300 p-4 rounded-lg mb-3 border"
    };

    let user = match users.read().as_ref() {
        Some(Ok(list)) => list.iter().find(|u| u.id == user_id).cloned(),
        _ => None,
    };

    rsx! {
        div { class: "flex flex-col items-center p-4",
            div { class: "w-full max-w-2xl",
                h2 { class: "text-xl font-bold mb-3", "Posts" }

                match posts.read().as_ref() {
                    Some(Ok(list)) => rsx! {
                        if list.is_empty() {
                            p { class: "text-center mt-8 {muted}", "No posts found" }
                        } else {
                            for post in list.iter() {
                                div { key: "{post.id}", class: post_class,
                                    p { class: "text-lg font-semibold", "{post.title}" }
                                    p { class: "mt-2 {muted}", "{post.body}" }
                                }
                            }
                        }
                    },
                    Some(Err(e)) => rsx! {
                        p { class: "text-red-500 text-center my-4", "Failed to load posts: {e}" }
                    },
                    None => rsx! {
                        div { class: "flex items-center justify-center mt-6 {muted}", "Loading…" }
                    },
                }

                if let Some(user) = user {
                    Card { class: "mt-4".to_string(),
                        h2 { class: "text-2xl font-bold mb-3", "User Details" }
                        InfoRow { label: "Name".to_string(), value: user.name.clone() }
                        InfoRow { label: "Email".to_string(), value: user.email.clone() }
                        InfoRow { label: "Phone".to_string(), value: user.phone.clone() }
                        InfoRow { label: "City".to_string(), value: user.address.city.clone() }
                        InfoRow { label: "Company".to_string(), value: user.company.name.clone() }
                    }
                } else {
                    p { class: "text-center text-red-500 mt-4", "User not found" }
                }
            }
        }
    }
}
