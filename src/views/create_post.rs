use dioxus::prelude::*;

use crate::api::{self, ApiContext};
use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, TextInput};
use crate::models::{CreatePostRequest, Post};
use crate::theme;

// Demo account posts against this directory user, matching the seeded
// admin.
const DEFAULT_POST_USER_ID: i64 = 1;

#[component]
pub fn CreatePost() -> Element {
    let auth = use_context::<AuthContext>();
    let api = use_context::<ApiContext>();
    let mut title = use_signal(String::new);
    let mut body = use_signal(String::new);
    let mut success = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);
    let mut created = use_signal(Vec::<Post>::new);

    let dark = theme::is_dark();
    let muted = if dark { "text-gray-400" } else { "text-gray-600" };
    let post_class = if dark {
        "bg-gray-800 p-4 rounded-lg mb-3"
    } else {
        "bg-gray-100 p-4 rounded-lg mb-3"
    };

    rsx! {
        div { class: "flex flex-col items-center p-5",
            div { class: "w-full max-w-2xl",
                h2 { class: "text-2xl font-bold mb-5", "Create Post" }

                if let Some(msg) = success.cloned() {
                    p { class: "text-green-600 mb-3", "{msg}" }
                }
                if let Some(msg) = error.cloned() {
                    p { class: "text-red-500 mb-3", "{msg}" }
                }

                form {
                    class: "space-y-4",
                    onsubmit: move |e| async move {
                        e.stop_propagation();
                        e.prevent_default();
                        if is_submitting() {
                            return;
                        }

                        success.set(None);
                        error.set(None);

                        let title_value = title.read().trim().to_string();
                        let body_value = body.read().trim().to_string();
                        if title_value.is_empty() {
                            error.set(Some("Title is required".to_string()));
                            return;
                        }
                        if body_value.is_empty() {
                            error.set(Some("Body is required".to_string()));
                            return;
                        }

                        is_submitting.set(true);

                        let input = CreatePostRequest {
                            title: title_value,
                            body: body_value,
                            user_id: DEFAULT_POST_USER_ID,
                        };

                        match api::directory::create_post(api, auth.public_client(), input).await {
                            Ok(post) => {
                                created.write().insert(0, post);
                                success.set(Some("Post created successfully!".to_string()));
                                title.set(String::new());
                                body.set(String::new());
                            }
                            Err(_) => {
                                // The optimistic entry has already been
                                // rolled back at this point.
                                error.set(Some("Failed to create post".to_string()));
                            }
                        }
                        is_submitting.set(false);
                    },

                    TextInput {
                        value: title(),
                        placeholder: "Title".to_string(),
                        oninput: move |e: FormEvent| title.set(e.value()),
                    }
                    TextInput {
                        value: body(),
                        placeholder: "Body".to_string(),
                        oninput: move |e: FormEvent| body.set(e.value()),
                    }

                    Button {
                        r#type: "submit".to_string(),
                        variant: ButtonVariant::Primary,
                        class: "w-full".to_string(),
                        disabled: is_submitting(),
                        if is_submitting() {
                            "Creating…"
                        } else {
                            "Create"
                        }
                    }
                }

                h3 { class: "text-xl font-bold mt-8 mb-3", "Created this session" }
                if created.read().is_empty() {
                    p { class: "text-center mt-5 {muted}", "No posts created yet" }
                } else {
                    for post in created.read().iter() {
                        div { key: "{post.id}", class: post_class,
                            p { class: "text-lg font-semibold", "{post.title}" }
                            p { class: "mt-1 {muted}", "{post.body}" }
                        }
                    }
                }
            }
        }
    }
}
