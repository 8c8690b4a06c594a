use dioxus::prelude::*;

use crate::api::ApiContext;
use crate::auth_session::AuthContext;
use crate::components::ui::TextInput;
use crate::endpoints::{users_key, users_tags, GET_USERS};
use crate::hooks::use_query;
use crate::models::User;
use crate::theme;
use crate::Route;

#[component]
pub fn Users() -> Element {
    let auth = use_context::<AuthContext>();
    let api = use_context::<ApiContext>();
    let mut search = use_signal(String::new);
    let nav = use_navigator();

    let mut users = use_query::<Vec<User>, _>(
        api.public_cache,
        move || auth.public_client(),
        users_key(),
        GET_USERS,
        users_tags(),
    );

    let dark = theme::is_dark();
    let row_class = if dark {
        "block p-4 rounded-2xl mb-3 bg-gray-800 cursor-pointer hover:bg-gray-700"
    } else {
        "block p-4 rounded-2xl mb-3 bg-gray-200 cursor-pointer hover:bg-gray-300"
    };
    let muted = if dark { "text-gray-400" } else { "text-gray-600" };

    rsx! {
        div { class: "flex flex-col items-center p-4",
            div { class: "w-full max-w-2xl",
                TextInput {
                    class: "mb-4".to_string(),
                    value: search(),
                    placeholder: "Search user...".to_string(),
                    oninput: move |e: FormEvent| search.set(e.value()),
                }

                match users.read().as_ref() {
                    Some(Ok(list)) => {
                        let needle = search.read().to_lowercase();
                        let filtered: Vec<User> = list
                            .iter()
                            .filter(|u| u.name.to_lowercase().contains(&needle))
                            .cloned()
                            .collect();
                        rsx! {
                            div { class: "flex justify-end mb-2",
                                button {
                                    class: "text-sm text-blue-500",
                                    onclick: move |_| {
                                        let mut cache = api.public_cache;
                                        cache.write().mark_stale(&users_key());
                                        users.restart();
                                    },
                                    "Refresh"
                                }
                            }
                            if filtered.is_empty() {
                                p { class: "text-center mt-10 {muted}", "No users found" }
                            } else {
                                for user in filtered.iter() {
                                    div {
                                        key: "{user.id}",
                                        class: row_class,
                                        onclick: {
                                            let user_id = user.id;
                                            move |_| {
                                                nav.push(Route::UserPosts { user_id });
                                            }
                                        },
                                        p { class: "text-lg font-semibold", "{user.name}" }
                                        p { class: muted, "{user.email}" }
                                        p { class: muted, "{user.address.city}" }
                                    }
                                }
                            }
                        }
                    }
                    Some(Err(e)) => rsx! {
                        p { class: "text-red-500 text-center my-4", "Failed to load users: {e}" }
                    },
                    None => rsx! {
                        div { class: "flex items-center justify-center mt-10 {muted}", "Loading…" }
                    },
                }
            }
        }
    }
}
